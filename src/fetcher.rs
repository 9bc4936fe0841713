/*!
 * Depth-first manifest traversal over a request/response channel
 */

use std::io::{self, Read, Write};
use std::time::Duration;

use comet_core_manifest::{Digest, HashGroupPointer, Manifest, Name, PointerKind, WireObject};
use tracing::{debug, trace};

use crate::error::{CometError, Result};
use crate::logging::transfer_span;
use crate::transport::{Channel, Interest};

/// Outcome of one [`ManifestFetcher::fill_buffer`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fill {
    /// Bytes written into the caller's buffer
    pub bytes_written: usize,
    /// True iff no application bytes remain after this fill
    pub done: bool,
}

/// One level of the traversal: a manifest plus the cursor into its groups
struct Frame {
    manifest: Manifest,
    group_index: usize,
    cursor: Option<usize>,
}

impl Frame {
    fn new(manifest: Manifest) -> Self {
        Self {
            manifest,
            group_index: 0,
            cursor: None,
        }
    }
}

/// Walks a manifest tree depth-first left-to-right, resolving digest
/// pointers through a channel and streaming application bytes into caller
/// buffers.
///
/// Strictly stop-and-wait: one outstanding request at a time. All traversal
/// state survives across calls, so fills of arbitrary sizes reassemble the
/// original stream byte-exactly. A transport failure leaves the fetcher
/// positioned on the same logical request; calling again retries it.
pub struct ManifestFetcher<C> {
    channel: C,
    locator: Name,
    stack: Vec<Frame>,
    carry: Vec<u8>,
    pending: Option<HashGroupPointer>,
    timeout: Option<Duration>,
}

impl<C: Channel> ManifestFetcher<C> {
    /// Start a traversal at `root`, resolving pointers through `channel`.
    ///
    /// All requests carry the root manifest's name; the digest restriction
    /// narrows each to the exact referenced object.
    pub fn new(channel: C, root: Manifest) -> Self {
        let locator = root.name().clone();
        Self {
            channel,
            locator,
            stack: vec![Frame::new(root)],
            carry: Vec::new(),
            pending: None,
            timeout: None,
        }
    }

    /// Abort in-flight requests after `timeout` instead of blocking forever
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The locator carried on every request
    pub fn locator(&self) -> &Name {
        &self.locator
    }

    /// Fill `buf` with the next contiguous run of application bytes.
    ///
    /// Carry-over from a previous partial delivery drains first, before any
    /// new request is issued. Never writes past the buffer; `done` is true
    /// iff the stream is exhausted by this call.
    pub fn fill_buffer(&mut self, buf: &mut [u8]) -> Result<Fill> {
        let mut written = 0;

        if !self.carry.is_empty() {
            let n = self.carry.len().min(buf.len());
            buf[..n].copy_from_slice(&self.carry[..n]);
            self.carry.drain(..n);
            written = n;
        }

        loop {
            if written == buf.len() {
                return Ok(Fill {
                    bytes_written: written,
                    done: false,
                });
            }

            if self.pending.is_none() {
                self.pending = self.next_pointer();
            }
            let pointer = match &self.pending {
                Some(pointer) => pointer.clone(),
                None => {
                    return Ok(Fill {
                        bytes_written: written,
                        done: true,
                    })
                }
            };

            let object = self.fetch(&pointer)?;
            self.pending = None;

            match object {
                WireObject::Manifest(child) => {
                    debug!(locator = %self.locator, "descending into child manifest");
                    self.stack.push(Frame::new(child));
                }
                WireObject::Content(content) => {
                    let payload = content.into_payload();
                    let space = buf.len() - written;
                    if payload.len() <= space {
                        buf[written..written + payload.len()].copy_from_slice(&payload);
                        written += payload.len();
                    } else {
                        // Keep only the undelivered tail for the next call.
                        buf[written..].copy_from_slice(&payload[..space]);
                        self.carry = payload[space..].to_vec();
                        return Ok(Fill {
                            bytes_written: buf.len(),
                            done: false,
                        });
                    }
                }
            }
        }
    }

    /// Drain the remaining stream into `writer` through an intermediate
    /// buffer of `buf_len` bytes. Returns the number of bytes delivered.
    pub fn fetch_to_writer<W: Write>(&mut self, writer: &mut W, buf_len: usize) -> Result<u64> {
        let span = transfer_span(&self.locator);
        let _guard = span.enter();

        let mut buf = vec![0u8; buf_len.max(1)];
        let mut total = 0u64;
        loop {
            let fill = self.fill_buffer(&mut buf)?;
            writer.write_all(&buf[..fill.bytes_written])?;
            total += fill.bytes_written as u64;
            if fill.done {
                return Ok(total);
            }
        }
    }

    /// Advance to the next pointer in traversal order, or `None` when the
    /// tree is exhausted.
    ///
    /// A child frame pushed mid-group leaves the parent's cursor just past
    /// the manifest pointer, so popping resumes with the next sibling.
    fn next_pointer(&mut self) -> Option<HashGroupPointer> {
        while let Some(frame) = self.stack.last_mut() {
            let groups = frame.manifest.groups();
            if frame.group_index >= groups.len() {
                self.stack.pop();
                continue;
            }

            let pointers = groups[frame.group_index].pointers();
            let cursor = frame.cursor.get_or_insert(0);
            if *cursor < pointers.len() {
                let pointer = pointers[*cursor].clone();
                *cursor += 1;
                return Some(pointer);
            }

            if frame.group_index + 1 < groups.len() {
                frame.group_index += 1;
                frame.cursor = None;
            } else {
                self.stack.pop();
            }
        }
        None
    }

    /// Resolve one pointer: send the restricted interest, verify the
    /// response digest, decode, and check the kind.
    fn fetch(&mut self, pointer: &HashGroupPointer) -> Result<WireObject> {
        let interest = Interest::restricted(self.locator.clone(), *pointer.digest());
        trace!(digest = %pointer.digest(), "requesting object");

        self.channel.send(&interest, self.timeout)?;
        let wire = self.channel.receive(self.timeout)?;

        let actual = Digest::of(&wire);
        if actual != *pointer.digest() {
            return Err(CometError::DigestMismatch {
                expected: *pointer.digest(),
                actual,
            });
        }

        let object = WireObject::decode(&wire)?;
        let kind_matches = match &object {
            WireObject::Manifest(_) => pointer.kind() == PointerKind::Manifest,
            WireObject::Content(_) => pointer.kind() == PointerKind::Data,
        };
        if !kind_matches {
            return Err(CometError::protocol(format!(
                "response kind does not match {:?} pointer",
                pointer.kind()
            )));
        }
        Ok(object)
    }
}

impl<C: Channel> Read for ManifestFetcher<C> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let fill = self
            .fill_buffer(buf)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        Ok(fill.bytes_written)
    }
}
