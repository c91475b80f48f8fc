//! Timeline geometry: track lanes and hit testing.
//!
//! The track under a pointer is pure arithmetic (`pointer_y / track_height`)
//! over the ordered track list — no dependency on rendered element bounds.

use cutline_core::Viewport;
use cutline_timeline::Timeline;
use uuid::Uuid;

/// Height of one track lane in pixels.
pub const TRACK_HEIGHT: f32 = 36.0;

/// Height of the ruler strip above the lanes.
pub const RULER_HEIGHT: f32 = 20.0;

/// Width of a clip's trim handle zone in pixels.
pub const TRIM_HANDLE_WIDTH: f32 = 6.0;

/// A pointer position in timeline-local pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerPos {
    pub x: f32,
    pub y: f32,
}

impl PointerPos {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Straight-line distance to another position.
    pub fn distance_to(&self, other: PointerPos) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// What sits under a pointer position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    /// The left trim handle of a selected clip.
    TrimStartHandle(Uuid),
    /// The right trim handle of a selected clip.
    TrimEndHandle(Uuid),
    /// A clip's body.
    ClipBody(Uuid),
    /// Empty space on a track lane.
    Track(usize),
    /// The ruler strip.
    Ruler,
    /// Below the last lane.
    Background,
}

/// Geometric model of the timeline area.
#[derive(Debug, Clone)]
pub struct TimelineGeometry {
    pub track_height: f32,
    pub ruler_height: f32,
    pub handle_width: f32,
}

impl TimelineGeometry {
    pub fn new() -> Self {
        Self {
            track_height: TRACK_HEIGHT,
            ruler_height: RULER_HEIGHT,
            handle_width: TRIM_HANDLE_WIDTH,
        }
    }

    /// Lane index under a y position, if any.
    pub fn track_at_y(&self, y: f32, track_count: usize) -> Option<usize> {
        if y < self.ruler_height {
            return None;
        }
        let index = ((y - self.ruler_height) / self.track_height).floor() as usize;
        (index < track_count).then_some(index)
    }

    /// Resolve what the pointer is over.
    ///
    /// Trim handles hit-test only on the selected clip and take priority
    /// over the clip body, so a press on a handle can never double as a
    /// press on the body.
    pub fn hit_test(&self, timeline: &Timeline, viewport: &Viewport, pos: PointerPos) -> HitTarget {
        if pos.y < self.ruler_height {
            return HitTarget::Ruler;
        }
        let Some(lane) = self.track_at_y(pos.y, timeline.tracks.len()) else {
            return HitTarget::Background;
        };

        let rate = timeline.frame_rate;
        for clip in timeline.clips_on_track(lane) {
            let start_px = viewport.frame_to_px(clip.start_frame, rate);
            let end_px = viewport.frame_to_px(clip.end_frame(), rate);
            if pos.x < start_px || pos.x > end_px {
                continue;
            }
            if clip.selected {
                if pos.x <= start_px + self.handle_width {
                    return HitTarget::TrimStartHandle(clip.id);
                }
                if pos.x >= end_px - self.handle_width {
                    return HitTarget::TrimEndHandle(clip.id);
                }
            }
            return HitTarget::ClipBody(clip.id);
        }
        HitTarget::Track(lane)
    }
}

impl Default for TimelineGeometry {
    fn default() -> Self {
        Self::new()
    }
}
