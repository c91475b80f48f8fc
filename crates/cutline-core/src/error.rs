//! Error types for Cutline.
//!
//! Interactive timeline operations never produce errors — they clamp into a
//! valid range or ignore the request. Errors exist for the edges of the
//! system: persistence, media transport, and the transcoding engine.

use thiserror::Error;

/// Main error type for Cutline operations.
#[derive(Error, Debug)]
pub enum CutlineError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Media error: {0}")]
    Media(String),

    #[error("Encode error: {0}")]
    Encode(String),

    #[error("Transcode engine unavailable: {0}")]
    EngineInit(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Export cancelled")]
    Cancelled,
}

/// Result type alias for Cutline operations.
pub type Result<T> = std::result::Result<T, CutlineError>;
