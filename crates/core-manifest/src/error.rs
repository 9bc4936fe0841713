//! Error types for manifest operations

use thiserror::Error;

/// Result type for manifest operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or decoding manifest objects
#[derive(Error, Debug)]
pub enum Error {
    /// Wire encode/decode failure
    #[error("wire format error: {0}")]
    Format(String),

    /// Digest text is not 64 lowercase hex characters
    #[error("invalid digest: {0}")]
    InvalidDigest(String),

    /// Content name is not a usable locator
    #[error("invalid name: {0}")]
    InvalidName(String),
}
