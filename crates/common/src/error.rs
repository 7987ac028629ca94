//! Common error types shared across crates.

use thiserror::Error;

/// Top-level service error type.
///
/// Variants map to HTTP status codes returned to callers:
/// - [`ServiceError::BadRequest`] → 400
/// - [`ServiceError::EncryptionFailure`] → 500
/// - [`ServiceError::Internal`] → 500
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request was malformed — invalid JSON or an empty body field.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Encryption or decryption failed due to a crypto-layer error.
    #[error("encryption failure: {0}")]
    EncryptionFailure(String),

    /// An unexpected internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Returns the HTTP status code that should be sent for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            ServiceError::BadRequest(_) => 400,
            ServiceError::EncryptionFailure(_) => 500,
            ServiceError::Internal(_) => 500,
        }
    }
}
