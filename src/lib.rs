/*!
 * Comet - content-addressed file transfer over an ICN substrate
 *
 * A producer ingests a file into a skewed, hash-linked manifest tree whose
 * nodes and chunks all live in a flat content-addressed repository keyed by
 * SHA-256 digest. A consumer asks for the root manifest by name, then walks
 * the tree issuing digest-restricted requests, streaming the original bytes
 * back out in order.
 *
 * The transport itself is abstract: anything that can send one named,
 * digest-restricted request and return one response implements [`Channel`].
 * An in-process loopback ([`RepoChannel`]) serves a repository directly for
 * local verification and tests.
 */

pub mod builder;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod logging;
pub mod repo;
pub mod store;
pub mod transport;

// Data model and chunking (re-exported from workspace crates)
pub use comet_core_chunker as chunking;
pub use comet_core_manifest as manifest;

// Re-export commonly used types for convenience
pub use builder::{BuildStats, BuiltTree, ManifestBuilder};
pub use comet_core_chunker::{Chunk, ChunkError, FileChunker, DEFAULT_BLOCK_SIZE};
pub use comet_core_manifest::{
    ContentObject, Digest, DigestHasher, HashGroup, HashGroupPointer, Manifest, Name, PointerKind,
    WireObject, DEFAULT_FANOUT, DIGEST_LEN,
};
pub use config::{LogLevel, TransferConfig};
pub use error::{CometError, Result};
pub use fetcher::{Fill, ManifestFetcher};
pub use repo::FileRepo;
pub use store::{DigestStore, StoreError};
pub use transport::{Channel, Interest, RepoChannel};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
