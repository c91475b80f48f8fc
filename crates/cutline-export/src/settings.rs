//! Export output settings and quality presets.

use cutline_core::{CutlineError, FrameRate, Result};
use serde::{Deserialize, Serialize};

/// Quality preset mapping to a target video bitrate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Quality {
    Draft,
    Standard,
    High,
}

impl Quality {
    /// Target video bitrate in kbps.
    pub fn video_bitrate_kbps(self) -> u32 {
        match self {
            Self::Draft => 2_000,
            Self::Standard => 8_000,
            Self::High => 16_000,
        }
    }
}

/// Output configuration for an export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportSettings {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Output frame rate.
    pub frame_rate: FrameRate,
    /// Quality preset (maps to bitrate).
    pub quality: Quality,
    /// Audio bitrate in kbps.
    pub audio_bitrate_kbps: u32,
}

impl ExportSettings {
    /// 1080p at 30 fps, standard quality.
    pub fn hd_1080() -> Self {
        Self {
            width: 1920,
            height: 1080,
            frame_rate: FrameRate::FPS_30,
            quality: Quality::Standard,
            audio_bitrate_kbps: 192,
        }
    }

    /// 720p at 30 fps, draft quality — fast previews.
    pub fn hd_720_draft() -> Self {
        Self {
            width: 1280,
            height: 720,
            frame_rate: FrameRate::FPS_30,
            quality: Quality::Draft,
            audio_bitrate_kbps: 128,
        }
    }

    /// Validate the settings before starting a pipeline run.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(CutlineError::Encode("resolution must be > 0".into()));
        }
        if self.width % 2 != 0 || self.height % 2 != 0 {
            return Err(CutlineError::Encode(
                "resolution width and height must be even".into(),
            ));
        }
        if self.frame_rate.denominator == 0 || self.frame_rate.numerator == 0 {
            return Err(CutlineError::Encode("frame rate must be > 0".into()));
        }
        Ok(())
    }
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self::hd_1080()
    }
}
