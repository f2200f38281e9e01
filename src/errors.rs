use thiserror::Error;

use crate::validation::ValidationErrors;

/// Enumerates high-level errors returned by this library.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The request failed field validation.
    #[error("validation failed for {} field(s)", .0.len())]
    Validation(ValidationErrors),

    /// No video has the requested ID.
    #[error("video not found")]
    NotFound,

    /// The request body is not a JSON object.
    #[error("malformed request body")]
    MalformedBody { source: serde_json::Error },

    /// The request body is larger than the service accepts.
    #[error("request body exceeds {limit} bytes")]
    BodyTooLarge { limit: usize },

    /// The store's lock was poisoned by a panicking writer.
    #[error("video store unavailable")]
    StoreUnavailable,
}

impl From<ValidationErrors> for BackendError {
    fn from(errors: ValidationErrors) -> Self {
        BackendError::Validation(errors)
    }
}
