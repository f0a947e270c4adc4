//! Request layer errors.

use feel_literal::FormatError;
use thiserror::Error;

/// Reasons a request is rejected before the engine runs.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("request body is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("request body must be a JSON object of input variables")]
    NotAnObject,

    #[error("input variable `{variable}`: {source}")]
    Format {
        variable: String,
        source: FormatError,
    },
}

impl ServiceError {
    /// HTTP status for this rejection. All of them are client errors.
    pub fn status_code(&self) -> u16 {
        match self {
            ServiceError::InvalidJson(_) | ServiceError::NotAnObject | ServiceError::Format { .. } => {
                400
            }
        }
    }
}
