//! Pointer-gesture state machine.
//!
//! `Idle → PointerDown(mode) → Dragging → released`. Pointer-down records
//! the starting screen position and the pre-drag reference values; every
//! pointer-move recomputes the frame delta from that fixed origin rather
//! than accumulating increment by increment, so rounding can never drift.
//! Pointer-up resolves the gesture: under the click threshold it is a
//! selection click, otherwise a drag that commits exactly one history entry.
//!
//! Only one gesture is ever active, which serializes all access to the
//! manipulation engine.

use tracing::debug;
use uuid::Uuid;

use cutline_core::Viewport;
use cutline_timeline::{ClipEngine, History, Throttle, Timeline};

use crate::geometry::{HitTarget, PointerPos, TimelineGeometry};

/// Pointer travel below this resolves as a click instead of a drag.
pub const CLICK_THRESHOLD_PX: f32 = 5.0;

/// Trim-drag updates are limited to roughly this many per second.
pub const TRIM_UPDATES_PER_SECOND: u32 = 10;

/// What a pointer-down grabbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GestureTarget {
    Clip { mode: DragMode, clip_id: Uuid },
    Track(usize),
    Ruler,
}

/// Drag interpretation for a clip gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMode {
    Move,
    TrimStart,
    TrimEnd,
}

#[derive(Debug)]
struct ActiveGesture {
    target: GestureTarget,
    origin: PointerPos,
    /// Pre-drag start frame (move) — deltas apply against this, never
    /// against the clip's live position.
    ref_start_frame: i64,
    /// Pre-drag source window (trims).
    ref_source_in: i64,
    ref_source_out: i64,
    max_travel_px: f32,
}

/// How a finished gesture resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureResolution {
    /// Sub-threshold release: selection was updated (or ignored under a
    /// modifier).
    Click,
    /// A drag completed and one history entry was committed.
    Drag,
    /// No gesture was active.
    Idle,
}

/// The interaction controller.
#[derive(Debug)]
pub struct GestureController {
    active: Option<ActiveGesture>,
    trim_throttle: Throttle,
}

impl GestureController {
    pub fn new() -> Self {
        Self {
            active: None,
            trim_throttle: Throttle::new(TRIM_UPDATES_PER_SECOND),
        }
    }

    /// Whether a gesture is in progress.
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Begin a gesture. Ignored while another gesture is active (pointer
    /// capture guarantees one at a time; this enforces it structurally).
    pub fn pointer_down(
        &mut self,
        timeline: &mut Timeline,
        geometry: &TimelineGeometry,
        viewport: &Viewport,
        pos: PointerPos,
    ) {
        if self.active.is_some() {
            return;
        }
        let target = match geometry.hit_test(timeline, viewport, pos) {
            HitTarget::TrimStartHandle(id) => GestureTarget::Clip {
                mode: DragMode::TrimStart,
                clip_id: id,
            },
            HitTarget::TrimEndHandle(id) => GestureTarget::Clip {
                mode: DragMode::TrimEnd,
                clip_id: id,
            },
            HitTarget::ClipBody(id) => GestureTarget::Clip {
                mode: DragMode::Move,
                clip_id: id,
            },
            HitTarget::Track(index) => GestureTarget::Track(index),
            HitTarget::Ruler => {
                // Ruler press seeks immediately; dragging scrubs.
                let frame = viewport.px_to_frame(pos.x, timeline.frame_rate);
                timeline.set_playhead(frame);
                GestureTarget::Ruler
            }
            HitTarget::Background => return,
        };

        let (ref_start_frame, ref_source_in, ref_source_out) = match target {
            GestureTarget::Clip { clip_id, .. } => match timeline.clip(clip_id) {
                Some(clip) => (clip.start_frame, clip.source_in, clip.source_out),
                None => return,
            },
            _ => (0, 0, 0),
        };

        debug!(?target, "Gesture start");
        self.trim_throttle.reset();
        self.active = Some(ActiveGesture {
            target,
            origin: pos,
            ref_start_frame,
            ref_source_in,
            ref_source_out,
            max_travel_px: 0.0,
        });
    }

    /// Apply pointer movement. The frame delta is always recomputed from
    /// the gesture origin.
    pub fn pointer_move(
        &mut self,
        timeline: &mut Timeline,
        engine: &ClipEngine,
        geometry: &TimelineGeometry,
        viewport: &Viewport,
        pos: PointerPos,
    ) {
        let Some(gesture) = self.active.as_mut() else {
            return;
        };
        gesture.max_travel_px = gesture.max_travel_px.max(pos.distance_to(gesture.origin));

        let rate = timeline.frame_rate;
        let delta_frames = viewport.px_delta_to_frames(pos.x - gesture.origin.x, rate);

        match gesture.target {
            GestureTarget::Clip {
                mode: DragMode::Move,
                clip_id,
            } => {
                let new_start = gesture.ref_start_frame + delta_frames;
                let lane = geometry.track_at_y(pos.y, timeline.tracks.len());
                engine.move_clip(timeline, clip_id, new_start, lane);
            }
            GestureTarget::Clip {
                mode: DragMode::TrimStart,
                clip_id,
            } => {
                if self.trim_throttle.ready() {
                    engine.trim_start(timeline, clip_id, gesture.ref_source_in + delta_frames);
                }
            }
            GestureTarget::Clip {
                mode: DragMode::TrimEnd,
                clip_id,
            } => {
                if self.trim_throttle.ready() {
                    engine.trim_end(timeline, clip_id, gesture.ref_source_out + delta_frames);
                }
            }
            GestureTarget::Ruler => {
                let frame = viewport.px_to_frame(pos.x, rate);
                timeline.set_playhead(frame);
            }
            GestureTarget::Track(_) => {}
        }
    }

    /// Finish the gesture, resolving click vs. drag.
    pub fn pointer_up(
        &mut self,
        timeline: &mut Timeline,
        engine: &ClipEngine,
        viewport: &Viewport,
        history: &mut History,
        pos: PointerPos,
        modifier_held: bool,
    ) -> GestureResolution {
        let Some(mut gesture) = self.active.take() else {
            return GestureResolution::Idle;
        };
        gesture.max_travel_px = gesture.max_travel_px.max(pos.distance_to(gesture.origin));
        self.trim_throttle.reset();

        if gesture.max_travel_px < CLICK_THRESHOLD_PX {
            // A modified click never mutates selection.
            if !modifier_held {
                match gesture.target {
                    GestureTarget::Clip { clip_id, .. } => {
                        if timeline.selected_clip == Some(clip_id) {
                            timeline.select_clip(None);
                        } else {
                            timeline.select_clip(Some(clip_id));
                        }
                    }
                    GestureTarget::Track(index) => timeline.select_track(index),
                    GestureTarget::Ruler => {}
                }
            }
            debug!("Gesture resolved as click");
            return GestureResolution::Click;
        }

        // One history entry for the whole gesture, never per move frame.
        if let GestureTarget::Clip { mode, clip_id } = gesture.target {
            // The release position lands un-throttled so the committed trim
            // matches where the pointer actually stopped.
            let delta = viewport.px_delta_to_frames(pos.x - gesture.origin.x, timeline.frame_rate);
            let label = match mode {
                DragMode::Move => "Move clip",
                DragMode::TrimStart => {
                    engine.trim_start(timeline, clip_id, gesture.ref_source_in + delta);
                    "Trim clip"
                }
                DragMode::TrimEnd => {
                    engine.trim_end(timeline, clip_id, gesture.ref_source_out + delta);
                    "Trim clip"
                }
            };
            history.commit(label, timeline.clone());
        }
        debug!("Gesture resolved as drag");
        GestureResolution::Drag
    }
}

impl Default for GestureController {
    fn default() -> Self {
        Self::new()
    }
}
