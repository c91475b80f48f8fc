//! The timeline aggregate: ordered tracks, clips, playhead, and selection.
//!
//! All mutation beyond simple add/remove/selection goes through the
//! manipulation engine in [`crate::engine`], which restores every invariant
//! by clamping or rejecting. The aggregate is fully updated before any
//! consumer observes it; no partially-applied state is ever visible.

use cutline_core::FrameRate;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use uuid::Uuid;

use crate::clip::Clip;
use crate::track::{Track, TrackKind};

/// One exportable stretch of media: a clip's source window in timeline order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Source media identifier.
    pub media_id: String,
    /// Source in point (inclusive).
    pub source_in: i64,
    /// Source out point (exclusive).
    pub source_out: i64,
    /// Timeline position the segment starts at.
    pub start_frame: i64,
}

impl Segment {
    /// Length of the segment in frames.
    #[inline]
    pub fn duration_frames(&self) -> i64 {
        self.source_out - self.source_in
    }
}

/// The timeline aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    /// Ordered tracks.
    pub tracks: Vec<Track>,
    /// All clips, across every track.
    pub clips: Vec<Clip>,
    /// Fixed project frame rate.
    pub frame_rate: FrameRate,
    /// Playhead position.
    pub current_frame: i64,
    /// Selected clip, if any. Mutually exclusive with `selected_track`.
    pub selected_clip: Option<Uuid>,
    /// Selected track, if any.
    pub selected_track: Option<usize>,
}

impl Timeline {
    /// Create an empty timeline with the fixed starting track set (V1 + A1).
    pub fn new(frame_rate: FrameRate) -> Self {
        Self {
            tracks: vec![
                Track::new(TrackKind::Video, 0, "V1"),
                Track::new(TrackKind::Audio, 1, "A1"),
            ],
            clips: Vec::new(),
            frame_rate,
            current_frame: 0,
            selected_clip: None,
            selected_track: None,
        }
    }

    // ── Lookup ──────────────────────────────────────────────────────

    /// Find a clip by ID.
    pub fn clip(&self, id: Uuid) -> Option<&Clip> {
        self.clips.iter().find(|c| c.id == id)
    }

    /// Find a clip mutably by ID.
    pub fn clip_mut(&mut self, id: Uuid) -> Option<&mut Clip> {
        self.clips.iter_mut().find(|c| c.id == id)
    }

    /// Track at the given index.
    pub fn track(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    /// Kind of the track hosting the given clip.
    pub fn clip_kind(&self, id: Uuid) -> Option<TrackKind> {
        let clip = self.clip(id)?;
        self.track(clip.track_index).map(|t| t.kind)
    }

    /// Clips on one track, ordered by start frame.
    pub fn clips_on_track(&self, index: usize) -> Vec<&Clip> {
        let mut clips: Vec<&Clip> = self
            .clips
            .iter()
            .filter(|c| c.track_index == index)
            .collect();
        clips.sort_by_key(|c| c.start_frame);
        clips
    }

    // ── Derived state ───────────────────────────────────────────────

    /// Frame just past the last clip's end (0 for an empty timeline).
    pub fn content_end_frame(&self) -> i64 {
        self.clips.iter().map(Clip::end_frame).max().unwrap_or(0)
    }

    /// Content duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.frame_rate.frames_to_secs(self.content_end_frame())
    }

    /// Whether the timeline carries any content.
    pub fn has_content(&self) -> bool {
        !self.clips.is_empty() || self.content_end_frame() > 0
    }

    /// Whether placing a span `[start, start+duration)` on `track_index`
    /// would overlap an existing clip (excluding `exclude`, usually the clip
    /// being moved).
    pub fn would_overlap(
        &self,
        track_index: usize,
        start: i64,
        duration: i64,
        exclude: Option<Uuid>,
    ) -> bool {
        let end = start + duration;
        self.clips.iter().any(|c| {
            c.track_index == track_index
                && Some(c.id) != exclude
                && c.overlaps_range(start, end)
        })
    }

    /// Timeline bounds imposed by the clip's neighbors on its track:
    /// `(previous clip's end, next clip's start)`. Open sides are `0` and
    /// `i64::MAX`.
    pub fn neighbor_bounds(&self, id: Uuid) -> (i64, i64) {
        let Some(clip) = self.clip(id) else {
            return (0, i64::MAX);
        };
        let mut prev_end = 0i64;
        let mut next_start = i64::MAX;
        let neighbors: SmallVec<[&Clip; 8]> = self
            .clips
            .iter()
            .filter(|c| c.track_index == clip.track_index && c.id != id)
            .collect();
        for other in neighbors {
            if other.end_frame() <= clip.start_frame {
                prev_end = prev_end.max(other.end_frame());
            } else if other.start_frame >= clip.end_frame() {
                next_start = next_start.min(other.start_frame);
            }
        }
        (prev_end, next_start)
    }

    /// Ordered list of exportable segments. Only frame ranges actually
    /// covered by clips appear; gaps between clips are skipped entirely.
    pub fn segments(&self) -> Vec<Segment> {
        let mut clips: Vec<&Clip> = self.clips.iter().collect();
        clips.sort_by_key(|c| (c.start_frame, c.track_index));
        clips
            .into_iter()
            .map(|c| Segment {
                media_id: c.source.media_id.clone(),
                source_in: c.source_in,
                source_out: c.source_out,
                start_frame: c.start_frame,
            })
            .collect()
    }

    // ── Structure ───────────────────────────────────────────────────

    /// Add an imported clip. Returns its ID.
    pub fn add_clip(&mut self, clip: Clip) -> Uuid {
        let id = clip.id;
        self.clips.push(clip);
        id
    }

    /// Remove a clip. Gaps left behind are not closed.
    pub fn remove_clip(&mut self, id: Uuid) -> Option<Clip> {
        let pos = self.clips.iter().position(|c| c.id == id)?;
        if self.selected_clip == Some(id) {
            self.selected_clip = None;
        }
        Some(self.clips.remove(pos))
    }

    /// Append a new lane of the given kind. Returns its index.
    pub fn add_track(&mut self, kind: TrackKind) -> usize {
        let index = self.tracks.len();
        let ordinal = self.tracks.iter().filter(|t| t.kind == kind).count() + 1;
        let name = match kind {
            TrackKind::Video => format!("V{ordinal}"),
            TrackKind::Audio => format!("A{ordinal}"),
        };
        self.tracks.push(Track::new(kind, index, name));
        index
    }

    // ── Selection ───────────────────────────────────────────────────

    /// Select a clip (clears any track selection), or clear clip selection.
    pub fn select_clip(&mut self, id: Option<Uuid>) {
        self.selected_clip = id.filter(|id| self.clip(*id).is_some());
        if self.selected_clip.is_some() {
            self.selected_track = None;
        }
        let selected = self.selected_clip;
        for clip in &mut self.clips {
            clip.selected = Some(clip.id) == selected;
        }
    }

    /// Select a track (clears any clip selection).
    pub fn select_track(&mut self, index: usize) {
        if index < self.tracks.len() {
            self.select_clip(None);
            self.selected_track = Some(index);
        }
    }

    /// Clear both selection kinds.
    pub fn deselect(&mut self) {
        self.select_clip(None);
        self.selected_track = None;
    }

    /// Move the playhead. Clamped to be non-negative; the upper bound is
    /// enforced by the playback controller against the displayed length.
    pub fn set_playhead(&mut self, frame: i64) {
        self.current_frame = frame.max(0);
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new(FrameRate::default())
    }
}
