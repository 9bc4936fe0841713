/*!
 * Request/response channel contract and in-process loopback
 */

use std::time::Duration;

use comet_core_manifest::{Digest, Manifest, Name};

use crate::error::{CometError, Result};
use crate::repo::FileRepo;

/// A request for a named object, optionally narrowed to the single object
/// whose wire digest equals the restriction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interest {
    name: Name,
    digest_restriction: Option<Digest>,
}

impl Interest {
    /// Request the published root object for `name`
    pub fn new(name: Name) -> Self {
        Self {
            name,
            digest_restriction: None,
        }
    }

    /// Request exactly the object whose wire digest equals `digest`
    pub fn restricted(name: Name, digest: Digest) -> Self {
        Self {
            name,
            digest_restriction: Some(digest),
        }
    }

    /// The requested name
    pub fn name(&self) -> &Name {
        &self.name
    }

    /// The digest restriction, if any
    pub fn digest_restriction(&self) -> Option<&Digest> {
        self.digest_restriction.as_ref()
    }
}

/// The transport seam consumed by the fetcher.
///
/// Implementations send one request and yield one wire-encoded response;
/// the fetcher never has more than one request outstanding. A timeout of
/// `None` blocks indefinitely. Failures map to [`CometError::Transport`].
pub trait Channel {
    /// Enqueue a request
    fn send(&mut self, interest: &Interest, timeout: Option<Duration>) -> Result<()>;

    /// Receive the next response's wire bytes
    fn receive(&mut self, timeout: Option<Duration>) -> Result<Vec<u8>>;
}

/// In-process channel answering interests straight from a [`FileRepo`],
/// using the same answer rule a network producer applies. One response
/// slot, strictly stop-and-wait.
pub struct RepoChannel<'a> {
    repo: &'a FileRepo,
    root: Manifest,
    response: Option<Vec<u8>>,
}

impl<'a> RepoChannel<'a> {
    /// Serve `root` and its tree out of `repo`
    pub fn new(repo: &'a FileRepo, root: Manifest) -> Self {
        Self {
            repo,
            root,
            response: None,
        }
    }
}

impl Channel for RepoChannel<'_> {
    fn send(&mut self, interest: &Interest, _timeout: Option<Duration>) -> Result<()> {
        let wire = self.repo.respond(interest, &self.root)?;
        self.response = Some(wire);
        Ok(())
    }

    fn receive(&mut self, _timeout: Option<Duration>) -> Result<Vec<u8>> {
        self.response
            .take()
            .ok_or_else(|| CometError::transport("no response pending"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interest_accessors() {
        let name = Name::new("icn:/repo/file").unwrap();
        let plain = Interest::new(name.clone());
        assert_eq!(plain.name(), &name);
        assert!(plain.digest_restriction().is_none());

        let digest = Digest::of(b"object");
        let restricted = Interest::restricted(name, digest);
        assert_eq!(restricted.digest_restriction(), Some(&digest));
    }
}
