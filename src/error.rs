//! Error types shared across the crate.
//!
//! Per-unit failures (`LoadFailure`, `TransformFailure`) are contained at
//! the unit boundary and collected into the batch failure list; only
//! precondition violations such as `NotInitialized` are treated as
//! programming errors that fail the whole call.

use std::path::PathBuf;
use thiserror::Error;

/// Unified error type for pixelmill operations.
#[derive(Error, Debug)]
pub enum PixelmillError {
    #[error("invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("sample count mismatch: got {actual}, expected {expected}")]
    SampleCountMismatch { expected: usize, actual: usize },

    #[error("brightness factor must be positive, got {factor}")]
    InvalidFactor { factor: f32 },

    #[error("progress aggregator used before initialize()")]
    NotInitialized,

    #[error("failed to load image: {path}")]
    LoadFailure {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("transform failed: {reason}")]
    TransformFailure { reason: String },

    #[error("worker pool is shut down")]
    PoolShutdown,

    #[error("failed to save image: {path}")]
    SaveFailure {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("failed to read folder: {path}")]
    FolderUnreadable {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("no images found in {path}")]
    EmptyFolder { path: PathBuf },
}

/// Result type alias for pixelmill operations.
pub type Result<T> = std::result::Result<T, PixelmillError>;
