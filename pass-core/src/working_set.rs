//! The request-scoped set of files that make up a pass.

use crate::error::Error;
use crate::{MANIFEST_FILE, SIGNATURE_FILE};

/// Content files of a single pass, in insertion order.
///
/// A working set is owned by one request and never shared. It only holds content files: the
/// manifest and signature are derived from it and cannot be added to it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkingSet {
    files: Vec<(String, Vec<u8>)>,
}

impl WorkingSet {
    /// Create an empty working set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file at the archive root.
    pub fn add(&mut self, name: impl Into<String>, contents: Vec<u8>) -> Result<(), Error> {
        let name = name.into();

        if name.is_empty() || name.contains('/') || name.contains('\\') {
            return Err(Error::Layout(format!("{name:?} is not a root-level filename")));
        }

        if name == MANIFEST_FILE || name == SIGNATURE_FILE {
            return Err(Error::Layout(format!("{name} is derived, not content")));
        }

        if self.contains(&name) {
            return Err(Error::Layout(format!("{name} was already added")));
        }

        self.files.push((name, contents));

        Ok(())
    }

    /// Whether a file with this name is present.
    pub fn contains(&self, name: &str) -> bool {
        self.files.iter().any(|(n, _)| n == name)
    }

    /// Contents of a file.
    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.files
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, c)| c.as_slice())
    }

    /// Iterate over `(name, contents)` in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.files.iter().map(|(n, c)| (n.as_str(), c.as_slice()))
    }

    /// Number of files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
