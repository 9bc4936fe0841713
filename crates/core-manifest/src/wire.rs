//! Deterministic wire encoding for stored and transported objects
//!
//! Both kinds of repository object serialize through a single tagged enum,
//! so a received message discriminates itself on decode. The encoding is
//! deterministic, which is what makes `SHA-256(wire bytes)` a stable
//! identity for content addressing.

use crate::digest::Digest;
use crate::error::{Error, Result};
use crate::manifest::Manifest;
use crate::name::Name;
use crate::object::ContentObject;
use serde::{Deserialize, Serialize};

/// A wire-encodable repository object: either an application chunk or a
/// manifest node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WireObject {
    /// A content object carrying application bytes
    Content(ContentObject),
    /// A manifest node
    Manifest(Manifest),
}

impl WireObject {
    /// Encode to wire bytes
    pub fn encode(&self) -> Result<Vec<u8>> {
        bincode::serialize(self).map_err(|e| Error::Format(e.to_string()))
    }

    /// Decode from wire bytes
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        bincode::deserialize(bytes).map_err(|e| Error::Format(e.to_string()))
    }

    /// Digest of the wire encoding
    pub fn digest(&self) -> Result<Digest> {
        Ok(Digest::of(&self.encode()?))
    }

    /// The carried object's name
    pub fn name(&self) -> &Name {
        match self {
            WireObject::Content(object) => object.name(),
            WireObject::Manifest(manifest) => manifest.name(),
        }
    }

    /// Whether this object is a manifest node
    pub fn is_manifest(&self) -> bool {
        matches!(self, WireObject::Manifest(_))
    }
}
