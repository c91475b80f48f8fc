//! Clip types for the timeline.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Reference to a source media asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRef {
    /// Identifier resolved by the media collaborator.
    pub media_id: String,
    /// Full duration of the source in frames.
    pub duration_frames: i64,
}

impl MediaRef {
    /// Create a new media reference.
    pub fn new(media_id: impl Into<String>, duration_frames: i64) -> Self {
        Self {
            media_id: media_id.into(),
            duration_frames,
        }
    }
}

/// A clip on the timeline: a window into a source media asset placed at a
/// frame position on one track.
///
/// The clip's duration is derived from its source window
/// (`source_out - source_in`), so the two can never disagree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    /// Unique clip ID
    pub id: Uuid,
    /// Clip name (displayed in UI)
    pub name: String,
    /// Index of the track hosting this clip
    pub track_index: usize,
    /// Timeline position of the clip's first frame
    pub start_frame: i64,
    /// Source in point (inclusive)
    pub source_in: i64,
    /// Source out point (exclusive)
    pub source_out: i64,
    /// Reference to source media
    pub source: MediaRef,
    /// Is clip selected
    #[serde(default)]
    pub selected: bool,
}

impl Clip {
    /// Create a clip exposing the full source range.
    pub fn new(
        name: impl Into<String>,
        source: MediaRef,
        track_index: usize,
        start_frame: i64,
    ) -> Self {
        let source_out = source.duration_frames;
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            track_index,
            start_frame: start_frame.max(0),
            source_in: 0,
            source_out,
            source,
            selected: false,
        }
    }

    /// Duration on the timeline in frames.
    #[inline]
    pub fn duration_frames(&self) -> i64 {
        self.source_out - self.source_in
    }

    /// Timeline frame just past the clip's last frame.
    #[inline]
    pub fn end_frame(&self) -> i64 {
        self.start_frame + self.duration_frames()
    }

    /// Full duration of the underlying source media.
    #[inline]
    pub fn original_duration_frames(&self) -> i64 {
        self.source.duration_frames
    }

    /// Whether the timeline frame falls within this clip's span.
    pub fn contains_frame(&self, frame: i64) -> bool {
        frame >= self.start_frame && frame < self.end_frame()
    }

    /// Whether this clip's timeline span intersects `[start, end)`.
    pub fn overlaps_range(&self, start: i64, end: i64) -> bool {
        self.start_frame < end && start < self.end_frame()
    }

    /// Check the placement invariants. Engine operations maintain these by
    /// clamping; this exists for tests and debug assertions.
    pub fn is_valid(&self) -> bool {
        self.start_frame >= 0
            && self.source_in >= 0
            && self.source_in < self.source_out
            && self.source_out <= self.source.duration_frames
    }
}
