//! # Script Emission Errors

use thiserror::Error;

/// Errors that can occur while writing the output script.
#[derive(Debug, Error)]
pub enum ScadError {
    /// The underlying sink failed.
    #[error("script output failed: {0}")]
    Io(#[from] std::io::Error),

    /// A face referenced a point that was never emitted.
    #[error("face references point {index}, only {count} points emitted")]
    BadPointIndex { index: u32, count: usize },
}
