//! Content locators

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A routable content name, e.g. `icn:/producer/file`.
///
/// Comet treats names as opaque locators; routing is the substrate's
/// concern. The only requirement here is that a name is non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Name(String);

impl Name {
    /// Create a name from its textual form
    pub fn new<S: Into<String>>(name: S) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::InvalidName("name cannot be empty".to_string()));
        }
        Ok(Self(name))
    }

    /// The textual form of the name
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Name {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}
