//! Cutline Session - interaction and transport layer
//!
//! Sits between the surrounding UI and the timeline model:
//! - Pointer-gesture state machine (click vs. move vs. trim)
//! - Track-lane geometry and hit testing
//! - Playback transport with poll-driven advancement
//! - Named command surface and keyboard shortcut resolution
//! - The editor-session object owning all of the above

pub mod commands;
pub mod geometry;
pub mod gesture;
pub mod playback;
pub mod session;
pub mod store;

pub use commands::{command_for_key, EditorCommand, Modifiers};
pub use geometry::{HitTarget, PointerPos, TimelineGeometry};
pub use gesture::{GestureController, GestureResolution, CLICK_THRESHOLD_PX};
pub use playback::PlaybackController;
pub use session::EditorSession;
pub use store::{MemoryProjectStore, ProjectStore};
