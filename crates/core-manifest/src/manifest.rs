//! Manifest nodes: named, ordered lists of hash groups

use crate::group::HashGroup;
use crate::name::Name;
use serde::{Deserialize, Serialize};

/// An immutable named object whose payload is an ordered list of hash
/// groups pointing at content objects and child manifests.
///
/// The skewed builder emits manifests with exactly one group, but the
/// traversal handles any group count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    name: Name,
    groups: Vec<HashGroup>,
}

impl Manifest {
    /// Create an empty manifest under the given name
    pub fn new(name: Name) -> Self {
        Self {
            name,
            groups: Vec::new(),
        }
    }

    /// Append a hash group
    pub fn add_group(&mut self, group: HashGroup) {
        self.groups.push(group);
    }

    /// The manifest's name (the transfer locator)
    pub fn name(&self) -> &Name {
        &self.name
    }

    /// The hash groups in order
    pub fn groups(&self) -> &[HashGroup] {
        &self.groups
    }

    /// A hash group by index
    pub fn group(&self, index: usize) -> Option<&HashGroup> {
        self.groups.get(index)
    }

    /// The first hash group, which on a root manifest carries the overall
    /// metadata
    pub fn root_group(&self) -> Option<&HashGroup> {
        self.groups.first()
    }
}
