//! Error types for the benchmark.
//!
//! Every error here is terminal for the process: the binary prints the
//! message and exits with status 1.

use thiserror::Error;

/// Errors raised by the measurement harness.
#[derive(Error, Debug)]
pub enum HarnessError {
    /// `iterations / 2` is zero, so no sample survives the warm-up discard.
    #[error("insufficient measurements for averaging: {iterations} iteration(s) leave no samples after discarding the first half (need at least 2)")]
    InsufficientMeasurements { iterations: usize },

    #[error("failed to allocate two vectors of {len} f32 elements")]
    Allocation { len: usize },

    #[error("vector length mismatch: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },

    #[error("chunk threshold must be positive")]
    InvalidThreshold,

    #[error("{what} is not available in this build")]
    Unavailable { what: String },

    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for harness operations.
pub type HarnessResult<T> = std::result::Result<T, HarnessError>;

/// Errors reported by kernel verification.
#[derive(Error, Debug)]
pub enum VerificationError {
    #[error("no 'plain' variant found for reference")]
    MissingReference,

    #[error("variant '{variant}' failed verification on {len} elements (seed {seed}): expected {expected}, got {actual}, tolerance {tolerance}")]
    ToleranceExceeded {
        variant: &'static str,
        len: usize,
        seed: u64,
        expected: f32,
        actual: f32,
        tolerance: f32,
    },
}
