//! Brand asset lookup and bundling.
//!
//! Images are addressed by `(brand key, filename)` and copied byte-for-byte. A missing required
//! image fails the pass with [`Error::NotFound`]; missing resolution variants are skipped.
//! Brands without a style entry that ship no images of their own take them from the configured
//! fallback brand.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::config::PassConfig;
use crate::error::Error;
use crate::style::ResolvedStyle;
use crate::working_set::WorkingSet;
use crate::{OPTIONAL_ASSETS, REQUIRED_ASSETS};

/// Read-only store of brand images.
pub trait AssetStore: Send + Sync {
    /// Fetch the raw bytes of an asset, `None` if the brand has no such file.
    fn fetch(&self, brand: &str, file: &str) -> Result<Option<Vec<u8>>, Error>;
}

/// Assets on disk, laid out as `<root>/<brand>/<file>`.
#[derive(Debug, Clone)]
pub struct FsAssetStore {
    root: PathBuf,
}

impl FsAssetStore {
    /// Create a store rooted at a directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

/// Whether a path component stays inside its parent directory.
fn is_plain_component(s: &str) -> bool {
    !s.is_empty()
        && s != "."
        && s != ".."
        && !s.contains('/')
        && !s.contains('\\')
        && !s.contains('\0')
}

impl AssetStore for FsAssetStore {
    fn fetch(&self, brand: &str, file: &str) -> Result<Option<Vec<u8>>, Error> {
        if !is_plain_component(brand) || !is_plain_component(file) {
            return Ok(None);
        }

        let path = self.root.join(brand).join(file);

        match std::fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => {
                log::error!("could not read asset {}: {e}", path.display());
                Err(Error::Io(e))
            }
        }
    }
}

/// Assets held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryAssetStore {
    assets: HashMap<(String, String), Vec<u8>>,
}

impl MemoryAssetStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an asset.
    pub fn with_asset(mut self, brand: &str, file: &str, contents: impl Into<Vec<u8>>) -> Self {
        self.assets
            .insert((brand.to_string(), file.to_string()), contents.into());
        self
    }
}

impl AssetStore for MemoryAssetStore {
    fn fetch(&self, brand: &str, file: &str) -> Result<Option<Vec<u8>>, Error> {
        Ok(self
            .assets
            .get(&(brand.to_string(), file.to_string()))
            .cloned())
    }
}

/// Whether the store holds every required image of a brand.
fn has_required(store: &dyn AssetStore, brand: &str) -> Result<bool, Error> {
    for file in REQUIRED_ASSETS {
        if store.fetch(brand, file)?.is_none() {
            return Ok(false);
        }
    }

    Ok(true)
}

/// The brand directory images are taken from.
///
/// Brands are looked up under their own key first. A brand without a style entry that lacks a
/// required image takes its images from the fallback brand instead.
pub fn asset_brand<'a>(
    store: &dyn AssetStore,
    config: &'a PassConfig,
    style: &'a ResolvedStyle,
) -> Result<&'a str, Error> {
    match &config.assets.fallback_brand {
        Some(fallback) if !style.known && !has_required(store, &style.brand_key)? => {
            log::debug!(
                "brand {} has no images of its own, using {fallback}",
                style.brand_key
            );
            Ok(fallback.as_str())
        }
        _ => Ok(style.brand_key.as_str()),
    }
}

/// Copy the brand images into the working set.
///
/// Returns the names of the bundled files in the order they were added.
pub fn bundle(
    store: &dyn AssetStore,
    brand: &str,
    ws: &mut WorkingSet,
) -> Result<Vec<String>, Error> {
    let mut bundled = Vec::new();

    for file in REQUIRED_ASSETS {
        let bytes = store.fetch(brand, file)?.ok_or_else(|| Error::NotFound {
            brand: brand.to_string(),
            file: file.to_string(),
        })?;

        ws.add(file, bytes)?;
        bundled.push(file.to_string());
    }

    for file in OPTIONAL_ASSETS {
        match store.fetch(brand, file)? {
            Some(bytes) => {
                ws.add(file, bytes)?;
                bundled.push(file.to_string());
            }
            None => log::debug!("optional asset {file} not present for brand {brand}"),
        }
    }

    Ok(bundled)
}
