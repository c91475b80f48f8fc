//! Transcoding engine abstraction.
//!
//! [`FfmpegTranscoder`] is the real engine: ffmpeg-sidecar provisions the
//! FFmpeg binary on first use (the handle is cached so later runs skip the
//! check), and each step spawns it with a built argument list. The
//! [`NullTranscoder`] stands in where no FFmpeg is available so the
//! pipeline's control flow stays exercisable.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use cutline_core::{CutlineError, Result};
use parking_lot::Mutex;
use tracing::{debug, info};

use crate::settings::ExportSettings;

/// Trim and encode steps of the export pipeline.
#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Prepare the engine. Must be cheap after the first success.
    async fn initialize(&self) -> Result<()>;

    /// Copy `[start_secs, start_secs + duration_secs)` of `input` into
    /// `output`.
    async fn trim(
        &self,
        input: &Path,
        output: &Path,
        start_secs: f64,
        duration_secs: f64,
    ) -> Result<()>;

    /// Concatenate `parts` in order and re-encode to the requested
    /// resolution, frame rate, and bitrate.
    async fn concat(
        &self,
        parts: &[PathBuf],
        output: &Path,
        settings: &ExportSettings,
    ) -> Result<()>;
}

// ── FFmpeg-backed engine ────────────────────────────────────────────

/// Real transcoder spawning FFmpeg.
pub struct FfmpegTranscoder {
    initialized: Mutex<bool>,
}

impl FfmpegTranscoder {
    pub fn new() -> Self {
        Self {
            initialized: Mutex::new(false),
        }
    }

    async fn run_ffmpeg(&self, args: Vec<String>) -> Result<()> {
        let binary = ffmpeg_sidecar::paths::ffmpeg_path();
        debug!(?args, "Spawning ffmpeg");
        let status = tokio::process::Command::new(binary)
            .args(&args)
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .status()
            .await
            .map_err(|e| CutlineError::Encode(format!("Failed to spawn ffmpeg: {e}")))?;
        if !status.success() {
            return Err(CutlineError::Encode(format!(
                "ffmpeg exited with status: {status}"
            )));
        }
        Ok(())
    }
}

impl Default for FfmpegTranscoder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    async fn initialize(&self) -> Result<()> {
        if *self.initialized.lock() {
            return Ok(());
        }
        // Downloads a static FFmpeg build when none is installed; a no-op
        // otherwise. Blocking, so it runs off the async executor.
        let result = tokio::task::spawn_blocking(ffmpeg_sidecar::download::auto_download)
            .await
            .map_err(|e| CutlineError::EngineInit(format!("init task failed: {e}")))?;
        result.map_err(|e| CutlineError::EngineInit(e.to_string()))?;
        *self.initialized.lock() = true;
        info!("Transcode engine ready");
        Ok(())
    }

    async fn trim(
        &self,
        input: &Path,
        output: &Path,
        start_secs: f64,
        duration_secs: f64,
    ) -> Result<()> {
        let args = vec![
            "-y".into(),
            "-ss".into(),
            format!("{start_secs:.6}"),
            "-t".into(),
            format!("{duration_secs:.6}"),
            "-i".into(),
            input.to_string_lossy().into_owned(),
            "-c:v".into(),
            "libx264".into(),
            "-preset".into(),
            "fast".into(),
            "-c:a".into(),
            "aac".into(),
            output.to_string_lossy().into_owned(),
        ];
        self.run_ffmpeg(args).await
    }

    async fn concat(
        &self,
        parts: &[PathBuf],
        output: &Path,
        settings: &ExportSettings,
    ) -> Result<()> {
        // Concat demuxer needs a list file next to the parts.
        let list_path = output.with_extension("txt");
        let mut list = String::new();
        for part in parts {
            list.push_str(&format!("file '{}'\n", part.to_string_lossy()));
        }
        tokio::fs::write(&list_path, list).await?;

        let args = vec![
            "-y".into(),
            "-f".into(),
            "concat".into(),
            "-safe".into(),
            "0".into(),
            "-i".into(),
            list_path.to_string_lossy().into_owned(),
            "-vf".into(),
            format!("scale={}:{}", settings.width, settings.height),
            "-r".into(),
            format!(
                "{}/{}",
                settings.frame_rate.numerator, settings.frame_rate.denominator
            ),
            "-c:v".into(),
            "libx264".into(),
            "-b:v".into(),
            format!("{}k", settings.quality.video_bitrate_kbps()),
            "-c:a".into(),
            "aac".into(),
            "-b:a".into(),
            format!("{}k", settings.audio_bitrate_kbps),
            "-pix_fmt".into(),
            "yuv420p".into(),
            output.to_string_lossy().into_owned(),
        ];
        self.run_ffmpeg(args).await
    }
}

// ── Null engine ─────────────────────────────────────────────────────

/// Transcoder that shuffles bytes instead of encoding. Lets the pipeline's
/// phase machine run without any media tooling present.
pub struct NullTranscoder {
    /// Fail `initialize` to simulate an unavailable engine.
    pub fail_init: bool,
}

impl NullTranscoder {
    pub fn new() -> Self {
        Self { fail_init: false }
    }

    /// An engine whose initialization always fails.
    pub fn failing_init() -> Self {
        Self { fail_init: true }
    }
}

impl Default for NullTranscoder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transcoder for NullTranscoder {
    async fn initialize(&self) -> Result<()> {
        if self.fail_init {
            return Err(CutlineError::EngineInit("engine disabled".into()));
        }
        Ok(())
    }

    async fn trim(
        &self,
        input: &Path,
        output: &Path,
        _start_secs: f64,
        _duration_secs: f64,
    ) -> Result<()> {
        tokio::fs::copy(input, output)
            .await
            .map_err(|e| CutlineError::Encode(format!("trim failed: {e}")))?;
        Ok(())
    }

    async fn concat(
        &self,
        parts: &[PathBuf],
        output: &Path,
        _settings: &ExportSettings,
    ) -> Result<()> {
        let mut joined = Vec::new();
        for part in parts {
            let bytes = tokio::fs::read(part)
                .await
                .map_err(|e| CutlineError::Encode(format!("concat failed: {e}")))?;
            joined.extend_from_slice(&bytes);
        }
        tokio::fs::write(output, joined).await?;
        Ok(())
    }
}
