//! Fixed-size chunking for Comet
//!
//! Splits a seekable byte stream into uniform chunks of `block_size` bytes
//! (the final chunk may be shorter). Chunks can be walked in file order or
//! back-to-front; the reverse walk is what lets the skewed manifest builder
//! run in a single pass, because the deepest manifest covers the file's
//! tail and must exist before its parent.

use std::io::{self, Read, Seek, SeekFrom};
use thiserror::Error;

/// Default chunk size in bytes
pub const DEFAULT_BLOCK_SIZE: usize = 4096;

/// Errors that can occur during chunking
#[derive(Error, Debug)]
pub enum ChunkError {
    /// I/O failure reading the underlying stream
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Rejected chunker configuration
    #[error("invalid block size: {0}")]
    InvalidBlockSize(String),
}

/// One chunk of the underlying stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Byte offset in the stream where this chunk starts
    pub offset: u64,

    /// The chunk bytes
    pub data: Vec<u8>,
}

impl Chunk {
    /// Length of this chunk in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the chunk is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Fixed-size chunker over a seekable stream.
///
/// The stream length is measured once at construction; iteration seeks to
/// each chunk, so forward and reverse walks may be taken in any order and
/// repeatedly.
pub struct FileChunker<R> {
    inner: R,
    block_size: usize,
    len: u64,
}

impl<R: Read + Seek> FileChunker<R> {
    /// Create a chunker with the given block size
    pub fn new(mut inner: R, block_size: usize) -> Result<Self, ChunkError> {
        if block_size == 0 {
            return Err(ChunkError::InvalidBlockSize(
                "block size must be positive".to_string(),
            ));
        }
        let len = inner.seek(SeekFrom::End(0))?;
        Ok(Self {
            inner,
            block_size,
            len,
        })
    }

    /// The uniform chunk size in bytes
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Total stream length in bytes
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Whether the stream is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of chunks the stream splits into
    pub fn chunk_count(&self) -> u64 {
        self.len.div_ceil(self.block_size as u64)
    }

    fn read_chunk_at(&mut self, index: u64) -> Result<Chunk, ChunkError> {
        let offset = index * self.block_size as u64;
        let take = (self.len - offset).min(self.block_size as u64) as usize;
        self.inner.seek(SeekFrom::Start(offset))?;
        let mut data = vec![0u8; take];
        self.inner.read_exact(&mut data)?;
        Ok(Chunk { offset, data })
    }

    /// Iterate chunks in file order
    pub fn forward(&mut self) -> Chunks<'_, R> {
        Chunks {
            chunker: self,
            next: 0,
        }
    }

    /// Iterate chunks back-to-front
    pub fn reverse(&mut self) -> ReverseChunks<'_, R> {
        let remaining = self.chunk_count();
        ReverseChunks {
            chunker: self,
            remaining,
        }
    }
}

/// Forward chunk iterator, see [`FileChunker::forward`]
pub struct Chunks<'a, R> {
    chunker: &'a mut FileChunker<R>,
    next: u64,
}

impl<R: Read + Seek> Iterator for Chunks<'_, R> {
    type Item = Result<Chunk, ChunkError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.chunker.chunk_count() {
            return None;
        }
        let chunk = self.chunker.read_chunk_at(self.next);
        self.next += 1;
        Some(chunk)
    }
}

/// Reverse chunk iterator, see [`FileChunker::reverse`]
pub struct ReverseChunks<'a, R> {
    chunker: &'a mut FileChunker<R>,
    remaining: u64,
}

impl<R: Read + Seek> Iterator for ReverseChunks<'_, R> {
    type Item = Result<Chunk, ChunkError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(self.chunker.read_chunk_at(self.remaining))
    }
}
