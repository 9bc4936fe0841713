//! Content objects: named application chunks

use crate::name::Name;
use serde::{Deserialize, Serialize};

/// An immutable named payload carrying one chunk of application data.
///
/// Every content object produced for a transfer carries the same name (the
/// transfer's locator); consumers address individual objects by digest
/// restriction, not by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentObject {
    name: Name,
    payload: Vec<u8>,
}

impl ContentObject {
    /// Create a content object from a name and payload bytes
    pub fn new(name: Name, payload: Vec<u8>) -> Self {
        Self { name, payload }
    }

    /// The object's name
    pub fn name(&self) -> &Name {
        &self.name
    }

    /// The payload bytes
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Consume the object, returning its payload
    pub fn into_payload(self) -> Vec<u8> {
        self.payload
    }

    /// Payload length in bytes
    pub fn payload_len(&self) -> usize {
        self.payload.len()
    }
}
