//! Frame-accurate time representation.
//!
//! The timeline's atomic unit is the frame. All conversions between frames,
//! seconds, and pixels go through `FrameRate` using rational arithmetic, and
//! every lossy conversion applies the same rounding rule (floor) so scrubbing
//! and clip placement can never disagree by a frame.

use num_rational::Rational64;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Frame rate as a rational number (e.g., 30000/1001 for 29.97 fps).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameRate {
    /// Numerator (e.g., 30000)
    pub numerator: u32,
    /// Denominator (e.g., 1001)
    pub denominator: u32,
}

impl FrameRate {
    /// Create a new frame rate.
    #[inline]
    pub const fn new(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// Convert to frames per second as f64.
    #[inline]
    pub fn as_f64(self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }

    /// Duration of `frames` frames as an exact rational number of seconds.
    #[inline]
    pub fn frames_to_secs_exact(self, frames: i64) -> Rational64 {
        Rational64::new(frames * self.denominator as i64, self.numerator as i64)
    }

    /// Duration of `frames` frames in seconds.
    #[inline]
    pub fn frames_to_secs(self, frames: i64) -> f64 {
        let r = self.frames_to_secs_exact(frames);
        *r.numer() as f64 / *r.denom() as f64
    }

    /// Frame index containing the given time. Uses floor — the uniform
    /// rounding rule for the whole editor.
    #[inline]
    pub fn secs_to_frames(self, secs: f64) -> i64 {
        (secs * self.as_f64()).floor() as i64
    }

    /// Common frame rates
    pub const FPS_24: Self = Self::new(24, 1);
    pub const FPS_25: Self = Self::new(25, 1);
    pub const FPS_29_97: Self = Self::new(30000, 1001);
    pub const FPS_30: Self = Self::new(30, 1);
    pub const FPS_60: Self = Self::new(60, 1);
}

impl Default for FrameRate {
    fn default() -> Self {
        Self::FPS_30
    }
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fps = self.as_f64();
        if (fps - fps.round()).abs() < 0.001 {
            write!(f, "{} fps", fps.round() as u32)
        } else {
            write!(f, "{:.3} fps", fps)
        }
    }
}

/// Format a frame index as `MM:SS:FF` timecode at the given rate.
pub fn format_timecode(frame: i64, rate: FrameRate) -> String {
    let fps = (rate.as_f64().round() as i64).max(1);
    let frame = frame.max(0);
    let total_secs = frame / fps;
    let ff = frame % fps;
    let m = total_secs / 60;
    let ss = total_secs % 60;
    format!("{:02}:{:02}:{:02}", m, ss, ff)
}
