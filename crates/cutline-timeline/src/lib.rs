//! Cutline Timeline - Timeline data model
//!
//! Implements the editing core of Cutline:
//! - Tracks and clips with frame-accurate placement invariants
//! - The clip manipulation engine (move/trim/split/delete with magnetic
//!   snapping to the playhead)
//! - Snapshot-based linear undo/redo
//! - Versioned project serialization

pub mod clip;
pub mod engine;
pub mod history;
pub mod serialization;
pub mod timeline;
pub mod track;

pub use clip::{Clip, MediaRef};
pub use engine::{ClipEngine, Throttle, SNAP_TOLERANCE};
pub use history::History;
pub use serialization::ProjectFile;
pub use timeline::{Segment, Timeline};
pub use track::{Track, TrackKind};
