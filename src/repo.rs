/*!
 * File repository: ingest files into the digest store, answer interests
 */

use std::fs::File;
use std::path::Path;

use comet_core_chunker::FileChunker;
use comet_core_manifest::{Digest, Manifest, Name, WireObject, DEFAULT_FANOUT};
use tracing::info;

use crate::builder::{BuiltTree, ManifestBuilder};
use crate::error::{CometError, Result};
use crate::logging::transfer_span;
use crate::store::DigestStore;
use crate::transport::Interest;

/// A producer-side repository: a digest store plus the build policy used
/// to ingest files into it.
pub struct FileRepo {
    store: DigestStore,
    fan_out: usize,
}

impl FileRepo {
    /// Open a repository over an existing directory
    pub fn open<P: AsRef<Path>>(directory: P, chunk_size: usize) -> Result<Self> {
        Ok(Self {
            store: DigestStore::open(directory, chunk_size)?,
            fan_out: DEFAULT_FANOUT,
        })
    }

    /// Override the hash-group fan-out used when ingesting files
    pub fn with_fan_out(mut self, fan_out: usize) -> Result<Self> {
        // Validated the same way the builder validates it.
        ManifestBuilder::with_fan_out(fan_out)?;
        self.fan_out = fan_out;
        Ok(self)
    }

    /// The underlying digest store
    pub fn store(&self) -> &DigestStore {
        &self.store
    }

    /// Chunk the file at `path`, build its manifest tree under `name`, and
    /// persist every resulting object. The returned root manifest is what
    /// the producer serves for unrestricted interests.
    pub fn load_file(&self, name: &Name, path: &Path) -> Result<BuiltTree> {
        let span = transfer_span(name);
        let _guard = span.enter();

        let file = File::open(path)?;
        let mut chunker = FileChunker::new(file, self.store.chunk_size())?;
        let builder = ManifestBuilder::with_fan_out(self.fan_out)?;
        let built = builder.build(&mut chunker, name, &self.store)?;

        info!(
            root = %built.root_digest,
            bytes = built.stats.bytes,
            "loaded file into repository"
        );
        Ok(built)
    }

    /// Wire bytes stored under `digest`
    pub fn resolve(&self, digest: &Digest) -> Result<Vec<u8>> {
        self.store.get(digest)
    }

    /// The producer answer rule: an unrestricted interest gets the
    /// published root manifest, a restricted one gets the stored bytes it
    /// names. Interests for other names are rejected.
    pub fn respond(&self, interest: &Interest, root: &Manifest) -> Result<Vec<u8>> {
        if interest.name() != root.name() {
            return Err(CometError::protocol(format!(
                "interest name {} does not match published name {}",
                interest.name(),
                root.name()
            )));
        }
        match interest.digest_restriction() {
            Some(digest) => self.resolve(digest),
            None => Ok(WireObject::Manifest(root.clone()).encode()?),
        }
    }
}
