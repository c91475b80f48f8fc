//! Viewport sizing and zoom for the timeline.
//!
//! The horizontal scale is `pixels_per_second = base × zoom`. Zoom is clamped
//! to `[min_zoom, MAX_ZOOM]`, where `min_zoom` is recomputed whenever the
//! viewport width or the timeline length changes so the whole timeline can
//! always be zoomed out to fit. Timeline length follows the content: it
//! extends when the last clip approaches the end and contracts when too much
//! trailing space accumulates.

use crate::time::FrameRate;

/// Upper zoom bound.
pub const MAX_ZOOM: f32 = 2.0;

/// Horizontal scale at zoom 1.0.
pub const BASE_PIXELS_PER_SECOND: f32 = 50.0;

/// Space kept after the last clip before the timeline end.
const TRAIL_MARGIN_SECS: f64 = 10.0;

/// Trailing empty space beyond which the timeline contracts back down.
const CONTRACT_THRESHOLD_SECS: f64 = 30.0;

/// The timeline never shrinks below one minute.
const MIN_LENGTH_SECS: f64 = 60.0;

/// Timeline viewport: zoom state plus the displayed timeline length.
#[derive(Debug, Clone)]
pub struct Viewport {
    base_pixels_per_second: f32,
    zoom: f32,
    viewport_width_px: f32,
    length_secs: f64,
}

impl Viewport {
    /// Create a viewport of the given pixel width with an empty timeline.
    pub fn new(viewport_width_px: f32) -> Self {
        let mut vp = Self {
            base_pixels_per_second: BASE_PIXELS_PER_SECOND,
            zoom: 1.0,
            viewport_width_px: viewport_width_px.max(1.0),
            length_secs: MIN_LENGTH_SECS,
        };
        vp.length_secs = vp.floor_length(0.0);
        vp.clamp_zoom();
        vp
    }

    /// Current horizontal scale in pixels per second.
    #[inline]
    pub fn pixels_per_second(&self) -> f32 {
        self.base_pixels_per_second * self.zoom
    }

    /// Current zoom level.
    #[inline]
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Smallest zoom that still fits the whole timeline in the viewport.
    pub fn min_zoom(&self) -> f32 {
        let fit = self.viewport_width_px / (self.base_pixels_per_second * self.length_secs as f32);
        fit.min(MAX_ZOOM)
    }

    /// Set the zoom level, clamped to `[min_zoom, MAX_ZOOM]`.
    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = zoom;
        self.clamp_zoom();
    }

    /// Multiply the zoom level by `factor` (e.g. 1.25 to zoom in).
    pub fn zoom_by(&mut self, factor: f32) {
        self.set_zoom(self.zoom * factor);
    }

    /// Update the viewport pixel width, re-clamping zoom against the new fit.
    pub fn set_viewport_width(&mut self, width_px: f32) {
        self.viewport_width_px = width_px.max(1.0);
        self.length_secs = self.length_secs.max(self.floor_length(0.0));
        self.clamp_zoom();
    }

    /// Viewport width expressed in seconds at zoom 1.0.
    #[inline]
    pub fn viewport_secs(&self) -> f64 {
        (self.viewport_width_px / self.base_pixels_per_second) as f64
    }

    /// Current displayed timeline length in seconds.
    #[inline]
    pub fn length_secs(&self) -> f64 {
        self.length_secs
    }

    /// Displayed timeline length in frames (totalFrames, extended for fit).
    pub fn total_frames(&self, rate: FrameRate) -> i64 {
        rate.secs_to_frames(self.length_secs)
    }

    /// Adjust the timeline length to follow the content.
    ///
    /// Extends when the last clip end crosses into the trailing margin;
    /// contracts when trailing empty space exceeds the contract threshold.
    pub fn fit_content(&mut self, last_clip_end_secs: f64) {
        let floor = self.floor_length(last_clip_end_secs);
        if last_clip_end_secs > self.length_secs - TRAIL_MARGIN_SECS {
            self.length_secs = last_clip_end_secs + TRAIL_MARGIN_SECS;
        } else if self.length_secs - last_clip_end_secs > CONTRACT_THRESHOLD_SECS {
            self.length_secs = floor;
        }
        self.length_secs = self.length_secs.max(floor);
        self.clamp_zoom();
    }

    /// Lower bound for the timeline length given the content end.
    fn floor_length(&self, last_clip_end_secs: f64) -> f64 {
        MIN_LENGTH_SECS
            .max(self.viewport_secs())
            .max(last_clip_end_secs + TRAIL_MARGIN_SECS)
    }

    fn clamp_zoom(&mut self) {
        self.zoom = self.zoom.clamp(self.min_zoom(), MAX_ZOOM);
    }

    // ── Frame ↔ pixel conversion (uniform floor) ────────────────────

    /// Pixel x-position of a frame.
    pub fn frame_to_px(&self, frame: i64, rate: FrameRate) -> f32 {
        (rate.frames_to_secs(frame) as f32 * self.pixels_per_second()).floor()
    }

    /// Frame under a pixel x-position.
    pub fn px_to_frame(&self, px: f32, rate: FrameRate) -> i64 {
        let secs = (px.max(0.0) / self.pixels_per_second()) as f64;
        rate.secs_to_frames(secs)
    }

    /// Frame delta corresponding to a pixel delta (may be negative).
    pub fn px_delta_to_frames(&self, dx: f32, rate: FrameRate) -> i64 {
        let secs = (dx / self.pixels_per_second()) as f64;
        (secs * rate.as_f64()).floor() as i64
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(960.0)
    }
}
