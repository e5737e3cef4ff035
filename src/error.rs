//! Error types for the fail-fast paths.
//!
//! Most problems in annotated input are lenient and go through
//! [`crate::diag::Diagnostics`] instead; these errors are reserved for
//! defects in extension code and for I/O.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to read {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An event handler failed. Handler errors propagate to the emitter's
    /// caller and abort the run; they indicate a defect in extension code,
    /// not in the documented content.
    #[error("event handler failed for {event}: {message}")]
    Handler { event: String, message: String },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
