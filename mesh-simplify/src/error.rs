//! Error types for mesh simplification.

use thiserror::Error;

/// Errors that can occur during simplification.
///
/// Numeric anomalies (singular solves, degenerate faces) are recovered
/// internally and never surface here.
#[derive(Debug, Error)]
pub enum SimplifyError {
    /// No triangles survived ingestion; the scene is left untouched.
    #[error("no geometry found")]
    NoGeometry,

    /// The target ratio is not a finite number.
    #[error("invalid target ratio: {0}")]
    InvalidRatio(f64),
}

/// Result type for simplification operations.
pub type SimplifyResult<T> = std::result::Result<T, SimplifyError>;
