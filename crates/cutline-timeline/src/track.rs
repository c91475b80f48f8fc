//! Track types for the timeline.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of track. Video and audio lanes are segregated: a clip may only
/// live on a track of matching kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackKind {
    Video,
    Audio,
}

/// A horizontal lane hosting clips of one kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Unique track ID
    pub id: Uuid,
    /// Position in the track list (unique, ordering-significant)
    pub index: usize,
    /// Track kind
    pub kind: TrackKind,
    /// Track name
    pub name: String,
}

impl Track {
    /// Create a new track.
    pub fn new(kind: TrackKind, index: usize, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            index,
            kind,
            name: name.into(),
        }
    }

    /// Whether a clip of the given kind may be placed on this track.
    #[inline]
    pub fn accepts(&self, kind: TrackKind) -> bool {
        self.kind == kind
    }
}
