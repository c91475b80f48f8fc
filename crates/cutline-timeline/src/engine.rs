//! Clip manipulation engine: move, trim, split, delete.
//!
//! Every operation clamps out-of-range input into the valid range instead of
//! returning an error, so interactive editing never blocks. An operation that
//! cannot be clamped into validity (a move onto an occupied span, a split
//! outside the clip) leaves the aggregate untouched.
//!
//! Magnetic snapping pulls a dragged boundary onto the playhead when it lands
//! within [`SNAP_TOLERANCE`] frames of it.

use std::time::{Duration, Instant};

use tracing::debug;
use uuid::Uuid;

use crate::clip::Clip;
use crate::timeline::Timeline;
use crate::track::TrackKind;

/// Snap distance to the playhead, in frames.
pub const SNAP_TOLERANCE: i64 = 3;

/// Rate gate for trim-drag updates (~10/s keeps recomputation bounded).
#[derive(Debug)]
pub struct Throttle {
    min_interval: Duration,
    last: Option<Instant>,
}

impl Throttle {
    /// Gate allowing roughly `per_second` passes per second.
    pub fn new(per_second: u32) -> Self {
        Self {
            min_interval: Duration::from_millis(1000 / per_second.max(1) as u64),
            last: None,
        }
    }

    /// Returns true (and arms the gate) when enough time has passed since
    /// the previous accepted update.
    pub fn ready(&mut self) -> bool {
        let now = Instant::now();
        match self.last {
            Some(prev) if now.duration_since(prev) < self.min_interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }

    /// Disarm the gate (e.g. at gesture end) so the next update passes.
    pub fn reset(&mut self) {
        self.last = None;
    }
}

/// The manipulation engine. Stateless apart from the snapping toggle; all
/// data lives in the [`Timeline`] it operates on.
#[derive(Debug, Clone)]
pub struct ClipEngine {
    /// Magnetic snapping to the playhead.
    pub snap_enabled: bool,
}

impl ClipEngine {
    pub fn new() -> Self {
        Self { snap_enabled: true }
    }

    /// Relocate a clip to a new start frame and optionally another track.
    ///
    /// - negative start clamps to 0
    /// - start/end within [`SNAP_TOLERANCE`] of the playhead snaps onto it
    /// - an incompatible target track kind is silently ignored
    /// - a target index past the last lane grows a new lane of the clip's kind
    /// - a destination overlapping another clip rejects the whole move
    ///
    /// Returns whether the clip was actually moved.
    pub fn move_clip(
        &self,
        timeline: &mut Timeline,
        id: Uuid,
        new_start: i64,
        new_track: Option<usize>,
    ) -> bool {
        let Some(kind) = timeline.clip_kind(id) else {
            return false;
        };
        let (duration, current_track) = {
            let clip = timeline.clip(id).expect("clip_kind implies clip exists");
            (clip.duration_frames(), clip.track_index)
        };

        let mut start = new_start.max(0);
        if self.snap_enabled {
            start = snap_move(start, duration, timeline.current_frame).max(0);
        }

        let track_index = match new_track {
            Some(target) if target >= timeline.tracks.len() => timeline.add_track(kind),
            Some(target) => {
                let track = &timeline.tracks[target];
                if track.accepts(kind) {
                    target
                } else {
                    current_track
                }
            }
            None => current_track,
        };

        if timeline.would_overlap(track_index, start, duration, Some(id)) {
            debug!(%id, start, track_index, "Move rejected: destination occupied");
            return false;
        }

        let clip = timeline.clip_mut(id).expect("checked above");
        clip.start_frame = start;
        clip.track_index = track_index;
        debug!(%id, start, track_index, "Clip moved");
        true
    }

    /// Adjust the clip's source in point, keeping its timeline end fixed.
    ///
    /// `new_in` is clamped to `[0, source_out - 1]`, then further so the
    /// clip's start stays non-negative and clear of the previous clip on the
    /// track. Returns whether anything changed.
    pub fn trim_start(&self, timeline: &mut Timeline, id: Uuid, new_in: i64) -> bool {
        let Some(clip) = timeline.clip(id) else {
            return false;
        };
        let end = clip.end_frame();
        let source_out = clip.source_out;
        let old_in = clip.source_in;

        let mut new_in = new_in;
        if self.snap_enabled {
            if let Some(target) = playhead_source_offset(clip, timeline.current_frame) {
                if (new_in - target).abs() <= SNAP_TOLERANCE {
                    new_in = target;
                }
            }
        }

        let (prev_end, _) = timeline.neighbor_bounds(id);
        new_in = new_in
            .clamp(0, source_out - 1)
            // keep start_frame >= 0
            .max(source_out - end)
            // keep start_frame >= previous clip's end
            .max(source_out - (end - prev_end));

        if new_in == old_in {
            return false;
        }
        let clip = timeline.clip_mut(id).expect("checked above");
        clip.source_in = new_in;
        clip.start_frame = end - (source_out - new_in);
        debug!(%id, source_in = new_in, start = clip.start_frame, "Trimmed start");
        true
    }

    /// Adjust the clip's source out point; its timeline start stays fixed.
    ///
    /// `new_out` is clamped to `[source_in + 1, original duration]`, then
    /// against the next clip on the track. Returns whether anything changed.
    pub fn trim_end(&self, timeline: &mut Timeline, id: Uuid, new_out: i64) -> bool {
        let Some(clip) = timeline.clip(id) else {
            return false;
        };
        let source_in = clip.source_in;
        let start = clip.start_frame;
        let original = clip.original_duration_frames();
        let old_out = clip.source_out;

        let mut new_out = new_out;
        if self.snap_enabled {
            if let Some(target) = playhead_source_offset(clip, timeline.current_frame) {
                if (new_out - target).abs() <= SNAP_TOLERANCE {
                    new_out = target;
                }
            }
        }

        let (_, next_start) = timeline.neighbor_bounds(id);
        new_out = new_out.clamp(source_in + 1, original);
        if next_start < i64::MAX {
            // end_frame = start + (new_out - source_in) must not cross the neighbor
            new_out = new_out.min(source_in + (next_start - start));
        }
        new_out = new_out.max(source_in + 1);

        if new_out == old_out {
            return false;
        }
        let clip = timeline.clip_mut(id).expect("checked above");
        clip.source_out = new_out;
        debug!(%id, source_out = new_out, "Trimmed end");
        true
    }

    /// Split a clip at a timeline frame strictly inside its span, producing
    /// two clips whose combined source and timeline ranges equal the
    /// original's. A boundary or out-of-range split is a no-op.
    ///
    /// Returns the right-hand clip's ID when the split happened.
    pub fn split(&self, timeline: &mut Timeline, id: Uuid, at_frame: i64) -> Option<Uuid> {
        let clip = timeline.clip(id)?;
        if at_frame <= clip.start_frame || at_frame >= clip.end_frame() {
            return None;
        }
        let cut = clip.source_in + (at_frame - clip.start_frame);

        let mut right = clip.clone();
        right.id = Uuid::new_v4();
        right.source_in = cut;
        right.start_frame = at_frame;
        right.selected = false;
        let right_id = right.id;

        let left = timeline.clip_mut(id).expect("checked above");
        left.source_out = cut;
        timeline.clips.push(right);
        debug!(%id, %right_id, at_frame, "Clip split");
        Some(right_id)
    }

    /// Remove a clip. The gap it leaves is not closed.
    pub fn delete(&self, timeline: &mut Timeline, id: Uuid) -> Option<Clip> {
        let removed = timeline.remove_clip(id);
        if removed.is_some() {
            debug!(%id, "Clip deleted");
        }
        removed
    }
}

impl Default for ClipEngine {
    fn default() -> Self {
        Self::new()
    }
}

// ── Snapping helpers ────────────────────────────────────────────────

/// Snap a move: if the prospective start or end lands within tolerance of
/// the playhead, align that boundary exactly onto it.
fn snap_move(start: i64, duration: i64, playhead: i64) -> i64 {
    if (start - playhead).abs() <= SNAP_TOLERANCE {
        playhead
    } else if (start + duration - playhead).abs() <= SNAP_TOLERANCE {
        playhead - duration
    } else {
        start
    }
}

/// The playhead's implied offset in the clip's source, or `None` when the
/// playhead sits before the clip (trim snapping only fires inside the span).
fn playhead_source_offset(clip: &Clip, playhead: i64) -> Option<i64> {
    let offset = playhead - clip.start_frame;
    (offset >= 0).then(|| clip.source_in + offset)
}
