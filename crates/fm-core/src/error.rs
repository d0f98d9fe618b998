//! Shared error type.
//!
//! Sub-crates define their own error enums and wrap `FmError` as one variant
//! where configuration problems can surface.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FmError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for `fm-core`.
pub type FmResult<T> = Result<T, FmError>;
