//! Network-subsystem error type.

use thiserror::Error;

use fm_core::LinkId;

/// Errors produced by `fm-network`.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("malformed geometry in feature {feature}: {reason}")]
    MalformedGeometry { feature: usize, reason: String },

    #[error("network has no vertices")]
    EmptyNetwork,

    #[error("facility {0:?} has no point features")]
    EmptyFacility(String),

    #[error("{link} has invalid weight {value}")]
    InvalidWeight { link: LinkId, value: f64 },

    #[error("numeric attribute {0:?} not found")]
    MissingAttribute(String),

    #[error("attribute {name:?} has {got} rows, expected {expected}")]
    AttributeLength { name: String, expected: usize, got: usize },

    #[error("duplicate attribute {0:?}")]
    DuplicateAttribute(String),

    #[error("layer CRS {found:?} does not match analysis CRS {expected:?}")]
    CrsMismatch { expected: String, found: String },

    #[error("row {row}: WKT error: {message}")]
    Wkt { row: usize, message: String },

    #[error("too many {0} for 32-bit ids")]
    Capacity(&'static str),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type NetworkResult<T> = Result<T, NetworkError>;
