//! Multi-phase export pipeline.
//!
//! `Loading → Downloading → Processing → Encoding → Complete | Error`.
//! Every intermediate artifact lives in a scoped temp directory, so an
//! abort — failure or cancellation — discards partial output by dropping
//! it; only the final artifact ever reaches the output store. The pipeline
//! is retryable after an error without resetting the engine cache.
//!
//! Progress flows over a bounded channel the UI polls; the pipeline never
//! blocks on a slow consumer.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use num_rational::Rational64;
use tracing::{info, warn};

use cutline_core::{CutlineError, FrameRate, Result};
use cutline_timeline::Segment;

use crate::settings::ExportSettings;
use crate::store::{MediaResolver, OutputStore};
use crate::transcode::Transcoder;

/// Pipeline phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportPhase {
    Idle,
    Loading,
    Downloading,
    Processing,
    Encoding,
    Complete,
    Error,
}

/// A progress report emitted by the pipeline.
#[derive(Debug, Clone)]
pub struct ExportProgress {
    pub phase: ExportPhase,
    /// Overall completion, 0–100.
    pub percent: f32,
    pub message: String,
    /// 1-based clip counter during per-clip phases.
    pub current_clip: Option<usize>,
    pub total_clips: Option<usize>,
}

/// Handle for cancelling an in-progress export.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Signal cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Check if cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    fn reset(&self) {
        self.0.store(false, Ordering::Relaxed);
    }
}

/// Exact output duration of the planned export in seconds: the sum of the
/// segment source windows. Gaps between clips contribute nothing.
pub fn planned_duration_secs(segments: &[Segment], rate: FrameRate) -> f64 {
    let frames: i64 = segments.iter().map(Segment::duration_frames).sum();
    let secs = Rational64::new(frames * rate.denominator as i64, rate.numerator as i64);
    *secs.numer() as f64 / *secs.denom() as f64
}

/// The export pipeline.
pub struct ExportPipeline {
    transcoder: Arc<dyn Transcoder>,
    resolver: Arc<dyn MediaResolver>,
    output: Arc<dyn OutputStore>,
    cancel: CancelFlag,
    progress_tx: Sender<ExportProgress>,
    progress_rx: Receiver<ExportProgress>,
    phase: ExportPhase,
}

impl ExportPipeline {
    pub fn new(
        transcoder: Arc<dyn Transcoder>,
        resolver: Arc<dyn MediaResolver>,
        output: Arc<dyn OutputStore>,
    ) -> Self {
        let (progress_tx, progress_rx) = bounded(64);
        Self {
            transcoder,
            resolver,
            output,
            cancel: CancelFlag::new(),
            progress_tx,
            progress_rx,
            phase: ExportPhase::Idle,
        }
    }

    /// Handle the UI can use to cancel the running export.
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    /// Last known phase.
    pub fn phase(&self) -> ExportPhase {
        self.phase
    }

    /// Drain pending progress reports, returning the most recent.
    pub fn poll_progress(&mut self) -> Option<ExportProgress> {
        let mut latest = None;
        while let Ok(progress) = self.progress_rx.try_recv() {
            latest = Some(progress);
        }
        if let Some(ref progress) = latest {
            self.phase = progress.phase;
        }
        latest
    }

    /// Run the export: fetch, trim, concatenate/re-encode, persist.
    ///
    /// Returns the output reference ID. On failure the `Error` phase is
    /// reported, remaining steps are skipped, and nothing partial is
    /// persisted; on cancellation the pipeline resets to `Idle`.
    pub async fn run(
        &mut self,
        segments: Vec<Segment>,
        rate: FrameRate,
        settings: ExportSettings,
    ) -> Result<String> {
        self.cancel.reset();
        match self.execute(&segments, rate, &settings).await {
            Ok(output_id) => {
                info!(%output_id, "Export complete");
                self.report(ExportPhase::Complete, 100.0, "Export complete", None, None);
                Ok(output_id)
            }
            Err(CutlineError::Cancelled) => {
                info!("Export cancelled");
                self.report(ExportPhase::Idle, 0.0, "Export cancelled", None, None);
                Err(CutlineError::Cancelled)
            }
            Err(err) => {
                warn!(%err, "Export failed");
                self.report(ExportPhase::Error, 0.0, &err.to_string(), None, None);
                Err(err)
            }
        }
    }

    async fn execute(
        &self,
        segments: &[Segment],
        rate: FrameRate,
        settings: &ExportSettings,
    ) -> Result<String> {
        if segments.is_empty() {
            return Err(CutlineError::Media("timeline has no clips to export".into()));
        }
        settings.validate()?;
        let total = segments.len();

        // Phase 1: engine init (cached inside the transcoder after first use)
        self.report(
            ExportPhase::Loading,
            2.0,
            "Initializing transcode engine",
            None,
            None,
        );
        self.transcoder.initialize().await?;

        // All intermediates live here; dropped on any early return.
        let work_dir = tempfile::tempdir()?;

        // Phase 2: fetch sources
        let mut inputs = Vec::with_capacity(total);
        for (i, segment) in segments.iter().enumerate() {
            self.check_cancelled()?;
            self.report(
                ExportPhase::Downloading,
                5.0 + 40.0 * i as f32 / total as f32,
                &format!("Fetching {}", segment.media_id),
                Some(i + 1),
                Some(total),
            );
            let media = self
                .resolver
                .resolve(&segment.media_id)
                .await
                .map_err(transport)?;
            let dest = work_dir.path().join(format!("input_{i}.mp4"));
            self.resolver
                .fetch(&media, &dest)
                .await
                .map_err(transport)?;
            inputs.push(dest);
        }

        // Phase 3: trim each input to its clip's source range
        let mut parts = Vec::with_capacity(total);
        for (i, segment) in segments.iter().enumerate() {
            self.check_cancelled()?;
            self.report(
                ExportPhase::Processing,
                45.0 + 30.0 * i as f32 / total as f32,
                &format!("Trimming clip {}", i + 1),
                Some(i + 1),
                Some(total),
            );
            let start_secs = rate.frames_to_secs(segment.source_in);
            let duration_secs = rate.frames_to_secs(segment.duration_frames());
            let part = work_dir.path().join(format!("part_{i}.mp4"));
            self.transcoder
                .trim(&inputs[i], &part, start_secs, duration_secs)
                .await?;
            parts.push(part);
        }

        // Phase 4: concatenate and re-encode
        self.check_cancelled()?;
        self.report(
            ExportPhase::Encoding,
            80.0,
            "Encoding output",
            None,
            None,
        );
        let artifact = work_dir.path().join("output.mp4");
        self.transcoder.concat(&parts, &artifact, settings).await?;

        // Phase 5: persist and report the reference
        self.check_cancelled()?;
        self.report(ExportPhase::Encoding, 95.0, "Saving output", None, None);
        let output_id = self.output.persist(&artifact).await.map_err(transport)?;
        Ok(output_id)
    }

    fn check_cancelled(&self) -> Result<()> {
        if self.cancel.is_cancelled() {
            return Err(CutlineError::Cancelled);
        }
        Ok(())
    }

    fn report(
        &self,
        phase: ExportPhase,
        percent: f32,
        message: &str,
        current_clip: Option<usize>,
        total_clips: Option<usize>,
    ) {
        let progress = ExportProgress {
            phase,
            percent,
            message: message.to_string(),
            current_clip,
            total_clips,
        };
        // Drop the report rather than block when the consumer lags.
        if let Err(TrySendError::Disconnected(_)) = self.progress_tx.try_send(progress) {
            warn!("Progress receiver disconnected");
        }
    }
}

/// Resolver/store failures surface as transport errors with a retry option.
fn transport(err: CutlineError) -> CutlineError {
    match err {
        CutlineError::NotFound(what) => CutlineError::Transport(format!("{what}: not found")),
        CutlineError::Io(e) => CutlineError::Transport(e.to_string()),
        other => other,
    }
}
