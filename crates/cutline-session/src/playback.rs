//! Playback transport: play/pause, seeking, frame stepping.
//!
//! Advancement is poll-driven: the host calls [`PlaybackController::tick`]
//! on a fixed interval (~100 ms) and the controller moves the playhead by
//! however many whole frames elapsed. On-screen indicators do not need
//! sub-poll precision, so no frame-exact callback exists.

use std::time::{Duration, Instant};

use tracing::debug;

use cutline_timeline::Timeline;

/// Suggested polling cadence for hosts driving [`PlaybackController::tick`].
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Frame step with the secondary modifier held.
pub const LARGE_STEP_FRAMES: i64 = 10;

/// Paused ↔ Playing transport over the timeline playhead.
#[derive(Debug)]
pub struct PlaybackController {
    playing: bool,
    last_tick: Option<Instant>,
}

impl PlaybackController {
    pub fn new() -> Self {
        Self {
            playing: false,
            last_tick: None,
        }
    }

    /// Whether playback is running.
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Whether there is anything to play.
    pub fn has_video(timeline: &Timeline) -> bool {
        timeline.has_content()
    }

    /// Start playback.
    pub fn play(&mut self) {
        self.playing = true;
        self.last_tick = None;
        debug!("Playback started");
    }

    /// Pause playback at the current position.
    pub fn pause(&mut self) {
        self.playing = false;
        self.last_tick = None;
        debug!("Playback paused");
    }

    /// Toggle between playing and paused.
    pub fn toggle(&mut self) {
        if self.playing {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Seek to a frame, clamped to `[0, total_frames]`.
    pub fn seek(&self, timeline: &mut Timeline, frame: i64, total_frames: i64) {
        timeline.set_playhead(frame.clamp(0, total_frames.max(0)));
        debug!(frame = timeline.current_frame, "Seeked");
    }

    /// Step the playhead by one frame (`LARGE_STEP_FRAMES` with the
    /// secondary modifier), at the timeline's fixed nominal rate regardless
    /// of any source clip's native rate.
    pub fn step(&self, timeline: &mut Timeline, direction: i64, large: bool, total_frames: i64) {
        let step = if large { LARGE_STEP_FRAMES } else { 1 };
        let target = timeline.current_frame + direction.signum() * step;
        self.seek(timeline, target, total_frames);
    }

    /// Poll-driven advancement. Moves the playhead by the number of whole
    /// frames elapsed since the previous tick; pauses at the end.
    pub fn tick(&mut self, timeline: &mut Timeline, now: Instant, total_frames: i64) {
        if !self.playing {
            return;
        }
        let Some(prev) = self.last_tick else {
            self.last_tick = Some(now);
            return;
        };
        let elapsed = now.duration_since(prev).as_secs_f64();
        let advance = (elapsed * timeline.frame_rate.as_f64()).floor() as i64;
        if advance == 0 {
            return; // keep `prev` so the fraction carries into the next poll
        }
        self.last_tick = Some(now);

        let target = timeline.current_frame + advance;
        if target >= total_frames {
            timeline.set_playhead(total_frames.max(0));
            self.pause();
        } else {
            timeline.set_playhead(target);
        }
    }
}

impl Default for PlaybackController {
    fn default() -> Self {
        Self::new()
    }
}
