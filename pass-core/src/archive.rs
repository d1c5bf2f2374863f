//! Packaging of a signed pass into a flat zip archive.

use std::io::{Cursor, Write};

use zip::write::FileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use crate::error::Error;
use crate::working_set::WorkingSet;
use crate::{MANIFEST_FILE, PKPASS_CONTENT_TYPE, PKPASS_FILENAME, SIGNATURE_FILE};

/// A finished pass archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassArchive {
    /// Serial number of the pass inside.
    pub serial_number: String,

    /// The zip bytes.
    pub bytes: Vec<u8>,
}

impl PassArchive {
    /// Content type to serve the archive with.
    pub fn content_type(&self) -> &'static str {
        PKPASS_CONTENT_TYPE
    }

    /// Suggested download filename.
    pub fn filename(&self) -> &'static str {
        PKPASS_FILENAME
    }
}

/// Zip the content files, the manifest and the signature, all at the archive root.
///
/// Every member gets the same fixed timestamp, so equal inputs give equal archives.
pub fn write(ws: &WorkingSet, manifest: &[u8], signature: &[u8]) -> Result<Vec<u8>, Error> {
    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default());

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    let members = ws
        .iter()
        .chain([(MANIFEST_FILE, manifest), (SIGNATURE_FILE, signature)]);

    for (name, contents) in members {
        zip.start_file(name, options)?;
        zip.write_all(contents)?;
    }

    Ok(zip.finish()?.into_inner())
}
