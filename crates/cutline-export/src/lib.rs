//! Cutline Export - render the timeline's clips into one deliverable
//!
//! A multi-phase asynchronous pipeline: fetch each referenced source
//! segment, trim it to its clip's source range, concatenate and re-encode
//! to the requested output settings, and persist the result. Progress is
//! reported over a channel the UI polls; any failure aborts the remaining
//! steps and discards partial output.

pub mod pipeline;
pub mod settings;
pub mod store;
pub mod transcode;

pub use pipeline::{
    planned_duration_secs, CancelFlag, ExportPhase, ExportPipeline, ExportProgress,
};
pub use settings::{ExportSettings, Quality};
pub use store::{MediaResolver, MemoryMediaStore, OutputStore, DirectoryOutputStore, ResolvedMedia};
pub use transcode::{FfmpegTranscoder, NullTranscoder, Transcoder};
