//! Hash groups: ordered digest-pointer batches with size metadata

use crate::digest::Digest;
use serde::{Deserialize, Serialize};

/// Discriminates what a hash-group pointer references
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerKind {
    /// A content object carrying application bytes
    Data,
    /// A child manifest node
    Manifest,
}

/// A single digest pointer within a hash group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashGroupPointer {
    kind: PointerKind,
    digest: Digest,
}

impl HashGroupPointer {
    /// Create a pointer of the given kind
    pub fn new(kind: PointerKind, digest: Digest) -> Self {
        Self { kind, digest }
    }

    /// The pointer kind
    pub fn kind(&self) -> PointerKind {
        self.kind
    }

    /// The referenced object's wire digest
    pub fn digest(&self) -> &Digest {
        &self.digest
    }
}

/// An ordered batch of digest pointers together with size metadata.
///
/// Metadata semantics:
/// - `block_size`: chunk size under which this group's data chunks were cut;
///   set only when a group is sealed at rotation
/// - `entry_size`: total payload bytes covered by this group's own data
///   pointers; set only at rotation
/// - `data_size`: equal to `entry_size` on interior groups, and to the
///   overall application size on the root group
/// - `overall_data_digest`: present only on the root group, the SHA-256 of
///   the raw application stream
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashGroup {
    pointers: Vec<HashGroupPointer>,
    block_size: Option<u64>,
    entry_size: u64,
    data_size: u64,
    overall_data_digest: Option<Digest>,
}

impl HashGroup {
    /// Create an empty group with unset metadata
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a pointer at the front of the group
    pub fn prepend(&mut self, pointer: HashGroupPointer) {
        self.pointers.insert(0, pointer);
    }

    /// Insert a pointer at the back of the group
    pub fn append(&mut self, pointer: HashGroupPointer) {
        self.pointers.push(pointer);
    }

    /// Whether the group has reached the given fan-out
    pub fn is_full(&self, fan_out: usize) -> bool {
        self.pointers.len() >= fan_out
    }

    /// The pointers in sequence order
    pub fn pointers(&self) -> &[HashGroupPointer] {
        &self.pointers
    }

    /// Number of pointers in the group
    pub fn len(&self) -> usize {
        self.pointers.len()
    }

    /// Whether the group holds no pointers
    pub fn is_empty(&self) -> bool {
        self.pointers.is_empty()
    }

    /// Set the chunk size of the group's data chunks
    pub fn set_block_size(&mut self, block_size: u64) {
        self.block_size = Some(block_size);
    }

    /// The chunk size, if the group was sealed
    pub fn block_size(&self) -> Option<u64> {
        self.block_size
    }

    /// Set the bytes covered by this group's data pointers
    pub fn set_entry_size(&mut self, entry_size: u64) {
        self.entry_size = entry_size;
    }

    /// The bytes covered by this group's data pointers
    pub fn entry_size(&self) -> u64 {
        self.entry_size
    }

    /// Set the data size (group bytes, or total size on the root group)
    pub fn set_data_size(&mut self, data_size: u64) {
        self.data_size = data_size;
    }

    /// The data size
    pub fn data_size(&self) -> u64 {
        self.data_size
    }

    /// Attach the overall application-data digest (root group only)
    pub fn set_overall_data_digest(&mut self, digest: Digest) {
        self.overall_data_digest = Some(digest);
    }

    /// The overall application-data digest, if present
    pub fn overall_data_digest(&self) -> Option<&Digest> {
        self.overall_data_digest.as_ref()
    }
}
