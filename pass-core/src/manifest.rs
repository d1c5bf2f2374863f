//! The integrity manifest (`manifest.json`).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};

use crate::error::Error;
use crate::working_set::WorkingSet;

/// Hex-encoded SHA-1 digest for every content file, sorted by filename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest(pub BTreeMap<String, String>);

/// Hex-encoded SHA-1 digest of some bytes.
pub fn sha1_hex(bytes: &[u8]) -> String {
    hex::encode(Sha1::digest(bytes))
}

impl Manifest {
    /// Hash every file of a working set.
    ///
    /// The working set only holds content files, so the manifest never lists itself or the
    /// signature.
    pub fn generate(ws: &WorkingSet) -> Self {
        Self(
            ws.iter()
                .map(|(name, contents)| (name.to_string(), sha1_hex(contents)))
                .collect(),
        )
    }

    /// Serialize to the bytes that are stored and signed.
    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    /// Digest of a file.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the manifest is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
