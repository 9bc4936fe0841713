/*!
 * Error types for Comet
 */

use comet_core_chunker::ChunkError;
use comet_core_manifest::Digest;
use thiserror::Error;

use crate::store::StoreError;

pub type Result<T> = std::result::Result<T, CometError>;

/// Errors surfaced by repository, builder, and fetcher operations.
///
/// Nothing is retried internally; every failure propagates to the caller,
/// which owns the retry policy.
#[derive(Error, Debug)]
pub enum CometError {
    /// Filesystem read/write failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Digest store failure
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Chunker failure
    #[error(transparent)]
    Chunk(#[from] ChunkError),

    /// Manifest data model or wire format failure
    #[error(transparent)]
    Manifest(#[from] comet_core_manifest::Error),

    /// Channel send/receive failure or timeout
    #[error("transport error: {0}")]
    Transport(String),

    /// Unexpected response shape
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Response digest does not equal the requested restriction
    #[error("digest mismatch: expected {expected}, got {actual}")]
    DigestMismatch { expected: Digest, actual: Digest },

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl CometError {
    /// Create a configuration error with a message
    pub fn config<S: Into<String>>(message: S) -> Self {
        CometError::Config(message.into())
    }

    /// Create a transport error with a message
    pub fn transport<S: Into<String>>(message: S) -> Self {
        CometError::Transport(message.into())
    }

    /// Create a protocol error with a message
    pub fn protocol<S: Into<String>>(message: S) -> Self {
        CometError::Protocol(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_mismatch_display() {
        let err = CometError::DigestMismatch {
            expected: Digest::of(b"a"),
            actual: Digest::of(b"b"),
        };
        let text = err.to_string();
        assert!(text.contains("digest mismatch"));
        assert!(text.contains(&Digest::of(b"a").to_hex()));
        assert!(text.contains(&Digest::of(b"b").to_hex()));
    }

    #[test]
    fn test_io_error_conversion() {
        let err: CometError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, CometError::Io(_)));
    }

    #[test]
    fn test_transport_display() {
        let err = CometError::Transport("receive timed out".to_string());
        assert_eq!(err.to_string(), "transport error: receive timed out");
    }

    #[test]
    fn test_helper_constructors() {
        assert!(matches!(CometError::config("bad"), CometError::Config(_)));
        assert!(matches!(
            CometError::transport("link down"),
            CometError::Transport(_)
        ));
        assert!(matches!(
            CometError::protocol("odd response"),
            CometError::Protocol(_)
        ));
        assert_eq!(
            CometError::protocol("odd response").to_string(),
            "protocol error: odd response"
        );
    }
}
