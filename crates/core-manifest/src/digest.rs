//! Content digests and streaming digest computation

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest as _, Sha256};
use std::fmt;
use std::str::FromStr;

/// Length of a content digest in bytes (SHA-256)
pub const DIGEST_LEN: usize = 32;

/// A SHA-256 content digest.
///
/// The canonical textual form is 64 lowercase hex characters; equality is
/// byte-wise.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Digest([u8; DIGEST_LEN]);

impl Digest {
    /// Compute the digest of a byte slice
    pub fn of(bytes: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        Self(hasher.finalize().into())
    }

    /// Wrap raw digest bytes
    pub fn from_bytes(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }

    /// The raw digest bytes
    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    /// Lowercase hex form, 64 characters
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.to_hex())
    }
}

impl FromStr for Digest {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let bytes = hex::decode(s).map_err(|e| Error::InvalidDigest(e.to_string()))?;
        let bytes: [u8; DIGEST_LEN] = bytes.try_into().map_err(|_| {
            Error::InvalidDigest(format!("expected {} bytes, got {}", DIGEST_LEN, s.len() / 2))
        })?;
        Ok(Self(bytes))
    }
}

/// Streaming hasher for whole-stream digests.
///
/// Used by the builder to compute the overall application-data digest while
/// the file is read.
pub struct DigestHasher {
    hasher: Sha256,
}

impl DigestHasher {
    /// Create a new streaming hasher
    pub fn new() -> Self {
        Self {
            hasher: Sha256::new(),
        }
    }

    /// Update the hash with new data
    pub fn update(&mut self, data: &[u8]) {
        self.hasher.update(data);
    }

    /// Finalize and return the digest
    pub fn finalize(self) -> Digest {
        Digest(self.hasher.finalize().into())
    }
}

impl Default for DigestHasher {
    fn default() -> Self {
        Self::new()
    }
}
