/*!
 * Flat content-addressed repository keyed by digest
 */

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use comet_core_manifest::{Digest, WireObject};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::debug;

use crate::error::Result;

/// Errors raised by [`DigestStore`] operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Filesystem failure, with the path involved
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// No entry stored under the digest
    #[error("no entry for digest {digest}")]
    NotFound { digest: Digest },

    /// The backing directory is missing or not a directory
    #[error("not a directory: {path}")]
    NotADirectory { path: PathBuf },
}

/// A flat directory mapping `hex(digest)` to wire-encoded object bytes.
///
/// Entries are write-once: a digest fully determines its contents, so an
/// existing entry is never rewritten. There is no sharding, no eviction,
/// and no in-memory cache. The recorded chunk size is not used by the
/// store itself; collaborators that chunk files through the store read it
/// back so producer and repository agree on one block size.
pub struct DigestStore {
    directory: PathBuf,
    chunk_size: usize,
}

impl DigestStore {
    /// Open a store over an existing writable directory
    pub fn open<P: AsRef<Path>>(directory: P, chunk_size: usize) -> Result<Self> {
        let directory = directory.as_ref().to_path_buf();
        if !directory.is_dir() {
            return Err(StoreError::NotADirectory { path: directory }.into());
        }
        Ok(Self {
            directory,
            chunk_size,
        })
    }

    /// The backing directory
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// The chunk size recorded for collaborators
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Path of the entry for a digest
    pub fn path_for(&self, digest: &Digest) -> PathBuf {
        self.directory.join(digest.to_hex())
    }

    /// Whether an entry exists for the digest
    pub fn contains(&self, digest: &Digest) -> bool {
        self.path_for(digest).is_file()
    }

    /// Store wire bytes under their own digest.
    ///
    /// Idempotent: an existing entry is left untouched. New entries are
    /// written to a temporary file and renamed into place, so a reader
    /// never observes a partial entry.
    pub fn put_wire(&self, wire: &[u8]) -> Result<Digest> {
        let digest = Digest::of(wire);
        let path = self.path_for(&digest);
        if path.is_file() {
            return Ok(digest);
        }

        let mut tmp = NamedTempFile::new_in(&self.directory).map_err(|source| StoreError::Io {
            path: self.directory.clone(),
            source,
        })?;
        tmp.write_all(wire).map_err(|source| StoreError::Io {
            path: tmp.path().to_path_buf(),
            source,
        })?;
        tmp.persist(&path).map_err(|e| StoreError::Io {
            path: path.clone(),
            source: e.error,
        })?;

        debug!(digest = %digest, bytes = wire.len(), "stored repository entry");
        Ok(digest)
    }

    /// Encode an object and store it
    pub fn put(&self, object: &WireObject) -> Result<Digest> {
        let wire = object.encode()?;
        self.put_wire(&wire)
    }

    /// Read back the wire bytes stored under a digest
    pub fn get(&self, digest: &Digest) -> Result<Vec<u8>> {
        let path = self.path_for(digest);
        if !path.is_file() {
            return Err(StoreError::NotFound { digest: *digest }.into());
        }
        fs::read(&path)
            .map_err(|source| StoreError::Io { path, source }.into())
    }
}
