//! Process-wide pass configuration.
//!
//! Loaded once at startup and shared read-only by every request. Issuer identifiers and the brand
//! table live here instead of in code, so they can change without recompiling.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::style::{brand_key, StyleScheme};
use crate::FORMAT_VERSION;

/// The complete pass configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PassConfig {
    /// Identifiers of the pass issuer, they must match the signing certificate.
    pub issuer: IssuerConfig,

    /// Labels of the display fields.
    #[serde(default)]
    pub labels: LabelConfig,

    /// Scheme used for brands that are not in [`PassConfig::styles`].
    #[serde(default)]
    pub default_style: StyleScheme,

    /// Known brands by canonical (lower-case) key.
    #[serde(default)]
    pub styles: BTreeMap<String, StyleScheme>,

    /// Alternate spellings or scripts mapped to a canonical brand key.
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,

    /// Asset lookup settings.
    #[serde(default)]
    pub assets: AssetConfig,
}

impl PassConfig {
    /// Bring brand, alias and fallback keys into the form incoming brand names are resolved in,
    /// and check that the configuration is consistent.
    pub fn normalize(mut self) -> Result<Self, Error> {
        if self.issuer.pass_type_identifier.trim().is_empty()
            || self.issuer.team_identifier.trim().is_empty()
        {
            return Err(Error::Config(
                "issuer identifiers must not be empty".to_string(),
            ));
        }

        self.styles = std::mem::take(&mut self.styles)
            .into_iter()
            .map(|(k, v)| (brand_key(&k), v))
            .collect();

        self.aliases = std::mem::take(&mut self.aliases)
            .into_iter()
            .map(|(k, v)| (brand_key(&k), brand_key(&v)))
            .collect();

        for (alias, canonical) in &self.aliases {
            if !self.styles.contains_key(canonical) {
                return Err(Error::Config(format!(
                    "alias {alias} points to unknown brand {canonical}"
                )));
            }
        }

        self.assets.fallback_brand = self
            .assets
            .fallback_brand
            .take()
            .map(|b| brand_key(&b))
            .filter(|b| !b.is_empty());

        Ok(self)
    }
}

/// Identifiers of the pass issuer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuerConfig {
    /// The pass type identifier, e.g. `pass.com.example.membership`.
    pub pass_type_identifier: String,

    /// The team identifier of the issuing developer account.
    pub team_identifier: String,

    /// The pass document format version.
    #[serde(default = "default_format_version")]
    pub format_version: u32,
}

/// Labels of the primary display fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelConfig {
    /// Label of the holder name field.
    pub member: String,

    /// Label of the membership number field.
    pub number: String,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            member: "회원 이름".to_string(),
            number: "멤버십 번호".to_string(),
        }
    }
}

/// Asset lookup settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetConfig {
    /// Brand key whose images are used for brands without a style entry.
    ///
    /// When `None`, unknown brands must provide their own images.
    #[serde(default = "default_fallback_brand")]
    pub fallback_brand: Option<String>,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            fallback_brand: default_fallback_brand(),
        }
    }
}

fn default_format_version() -> u32 {
    FORMAT_VERSION
}

fn default_fallback_brand() -> Option<String> {
    Some("default".to_string())
}
