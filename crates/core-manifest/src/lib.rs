//! Core manifest data structures for Comet
//!
//! This crate provides the data plane vocabulary for Comet transfers:
//! content objects carrying application chunks, hash groups pointing at
//! them by digest, and the manifests that tie the tree together. The wire
//! codec lives here too, because the identity of every object is the
//! SHA-256 of its wire encoding.
//!
//! # Key Concepts
//!
//! - **Content Object**: an immutable named payload carrying one chunk
//! - **Hash Group**: an ordered batch of digest pointers with size metadata
//! - **Manifest**: a named object holding an ordered list of hash groups
//! - **Digest**: SHA-256 over an object's wire bytes, used as its identity

pub mod digest;
pub mod error;
pub mod group;
pub mod manifest;
pub mod name;
pub mod object;
pub mod wire;

// Re-export main types for convenience
pub use digest::{Digest, DigestHasher, DIGEST_LEN};
pub use error::{Error, Result};
pub use group::{HashGroup, HashGroupPointer, PointerKind};
pub use manifest::Manifest;
pub use name::Name;
pub use object::ContentObject;
pub use wire::WireObject;

/// Default hash-group fan-out: the maximum number of pointers a group may
/// hold before it must be sealed into a manifest node.
pub const DEFAULT_FANOUT: usize = 64;
