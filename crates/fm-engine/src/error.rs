//! Engine error type.
//!
//! "No path" is not an error here: it is absorbed into the inaccessibility
//! sentinel.  Only structural problems surface as `EngineError`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("network has no vertices")]
    EmptyNetwork,

    #[error("no facilities registered")]
    NoFacilities,

    #[error("facility {0:?} is not registered")]
    UnknownFacility(String),

    #[error("scenario {0:?} is not a numeric network attribute")]
    UnknownScenario(String),

    #[error("attribute {0:?} is not a numeric network attribute")]
    UnknownAttribute(String),

    /// None of the facility's access vertices could be wired to its sink.
    #[error("facility {facility:?} has no usable access vertex")]
    DisconnectedFacility { facility: String },

    #[error("threshold must be finite, got {0}")]
    InvalidThreshold(f64),

    #[error("column {name:?} has {got} rows, expected {expected}")]
    ColumnLength { name: String, expected: usize, got: usize },
}

pub type EngineResult<T> = Result<T, EngineError>;
