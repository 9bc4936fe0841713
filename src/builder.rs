/*!
 * Skewed manifest construction
 *
 * Consumes a file's chunks in reverse order and emits a left-leaning tree:
 * each interior manifest carries one group of data pointers followed by a
 * single pointer to the next-deeper manifest. Building back-to-front means
 * the deepest node (the file's tail) exists before any parent references
 * it, so one streaming pass suffices.
 */

use std::io::{Read, Seek};

use comet_core_chunker::FileChunker;
use comet_core_manifest::{
    ContentObject, Digest, DigestHasher, HashGroup, HashGroupPointer, Manifest, Name, PointerKind,
    WireObject, DEFAULT_FANOUT,
};
use tracing::{debug, info};

use crate::error::{CometError, Result};
use crate::store::DigestStore;

/// Counters for one build run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Application bytes ingested
    pub bytes: u64,
    /// Content objects emitted
    pub chunks: u64,
    /// Manifest nodes emitted, including the root
    pub manifests: u64,
}

/// A fully persisted manifest tree
#[derive(Debug, Clone)]
pub struct BuiltTree {
    /// The root manifest, ready to serve to consumers
    pub root: Manifest,
    /// Digest of the root manifest's wire encoding
    pub root_digest: Digest,
    /// Build counters
    pub stats: BuildStats,
}

/// Builds skewed manifest trees over fixed-size chunks.
///
/// The block size comes from the chunker; the builder only decides the
/// hash-group fan-out.
pub struct ManifestBuilder {
    fan_out: usize,
}

impl ManifestBuilder {
    /// Create a builder with the default fan-out
    pub fn new() -> Self {
        Self {
            fan_out: DEFAULT_FANOUT,
        }
    }

    /// Create a builder with a custom fan-out.
    ///
    /// Interior groups hold data pointers next to a child-manifest pointer,
    /// so the fan-out must be at least 2.
    pub fn with_fan_out(fan_out: usize) -> Result<Self> {
        if fan_out < 2 {
            return Err(CometError::config(format!(
                "fan-out must be at least 2, got {}",
                fan_out
            )));
        }
        Ok(Self { fan_out })
    }

    /// The hash-group fan-out
    pub fn fan_out(&self) -> usize {
        self.fan_out
    }

    /// Build the manifest tree for the chunker's stream, persisting every
    /// content object and manifest node into `store`.
    ///
    /// Two passes are taken over the stream: a forward pass computing the
    /// overall application-data digest (so consumers can verify it against
    /// the reconstructed file), then the reverse build pass.
    pub fn build<R: Read + Seek>(
        &self,
        chunker: &mut FileChunker<R>,
        name: &Name,
        store: &DigestStore,
    ) -> Result<BuiltTree> {
        let overall_digest = overall_data_digest(chunker)?;
        let block_size = chunker.block_size() as u64;

        let mut stats = BuildStats::default();
        let mut group = HashGroup::new();
        let mut entry_size: u64 = 0;
        let mut application_data_size: u64 = 0;

        for chunk in chunker.reverse() {
            let chunk = chunk?;

            // A full group rotates only when another chunk arrives, so a
            // stream of exactly fan_out chunks stays a single flat group.
            if group.is_full(self.fan_out) {
                self.rotate(&mut group, block_size, entry_size, name, store)?;
                stats.manifests += 1;
                entry_size = 0;
            }

            let payload_len = chunk.len() as u64;
            let object = ContentObject::new(name.clone(), chunk.data);
            let digest = store.put(&WireObject::Content(object))?;
            group.prepend(HashGroupPointer::new(PointerKind::Data, digest));

            entry_size += payload_len;
            application_data_size += payload_len;
            stats.chunks += 1;
        }

        // Terminal group: overall size and digest only. Its block_size and
        // entry_size stay at their fresh-group defaults; rotation is the
        // only place that seals those.
        group.set_data_size(application_data_size);
        group.set_overall_data_digest(overall_digest);

        let mut root = Manifest::new(name.clone());
        root.add_group(group);
        let root_digest = store.put(&WireObject::Manifest(root.clone()))?;
        stats.manifests += 1;
        stats.bytes = application_data_size;

        info!(
            name = %name,
            bytes = stats.bytes,
            chunks = stats.chunks,
            manifests = stats.manifests,
            root = %root_digest,
            "built manifest tree"
        );

        Ok(BuiltTree {
            root,
            root_digest,
            stats,
        })
    }

    /// Seal the full group into a manifest node and replace it with a fresh
    /// group whose first pointer references that node.
    fn rotate(
        &self,
        group: &mut HashGroup,
        block_size: u64,
        entry_size: u64,
        name: &Name,
        store: &DigestStore,
    ) -> Result<()> {
        let mut sealed = std::mem::take(group);
        sealed.set_block_size(block_size);
        sealed.set_entry_size(entry_size);
        sealed.set_data_size(entry_size);

        let mut node = Manifest::new(name.clone());
        node.add_group(sealed);
        let digest = store.put(&WireObject::Manifest(node))?;
        debug!(manifest = %digest, entry_size, "sealed interior manifest");

        group.append(HashGroupPointer::new(PointerKind::Manifest, digest));
        Ok(())
    }
}

impl Default for ManifestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Forward pass computing the digest of the raw application stream
fn overall_data_digest<R: Read + Seek>(chunker: &mut FileChunker<R>) -> Result<Digest> {
    let mut hasher = DigestHasher::new();
    for chunk in chunker.forward() {
        hasher.update(&chunk?.data);
    }
    Ok(hasher.finalize())
}
