//! Brand style resolution.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::PassConfig;

/// Colors of a pass, as `rgb(r,g,b)` strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleScheme {
    /// Background color.
    pub background_color: String,

    /// Foreground (text) color.
    pub foreground_color: String,
}

impl Default for StyleScheme {
    fn default() -> Self {
        Self {
            background_color: "rgb(255,255,255)".to_string(),
            foreground_color: "rgb(0,0,0)".to_string(),
        }
    }
}

/// The outcome of resolving a brand name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedStyle {
    /// Normalized brand key, after alias substitution.
    pub brand_key: String,

    /// Whether the brand is in the style table.
    pub known: bool,

    /// The scheme to render the pass with.
    pub scheme: StyleScheme,
}

/// Trim and lower-case a brand name or table key.
pub fn brand_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Look up a normalized key in a table whose keys may not have been normalized.
fn lookup<'a, V>(table: &'a BTreeMap<String, V>, key: &str) -> Option<&'a V> {
    table.get(key).or_else(|| {
        table
            .iter()
            .find(|(k, _)| brand_key(k) == key)
            .map(|(_, v)| v)
    })
}

/// Lower-case and trim a brand name, then substitute a known alias.
pub fn normalize_brand(config: &PassConfig, brand_name: &str) -> String {
    let key = brand_key(brand_name);

    match lookup(&config.aliases, &key) {
        Some(canonical) => brand_key(canonical),
        None => key,
    }
}

/// Resolve a brand name to its style. Unknown or empty brands get the default scheme.
pub fn resolve(config: &PassConfig, brand_name: &str) -> ResolvedStyle {
    let brand_key = normalize_brand(config, brand_name);

    match lookup(&config.styles, &brand_key) {
        Some(scheme) => ResolvedStyle {
            brand_key,
            known: true,
            scheme: scheme.clone(),
        },
        None => ResolvedStyle {
            brand_key,
            known: false,
            scheme: config.default_style.clone(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::test_config;

    #[test]
    fn test_known_brand() {
        let config = test_config();

        let style = resolve(&config, "starbucks");
        assert!(style.known);
        assert_eq!(style.scheme.background_color, "rgb(0,100,0)");
        assert_eq!(style.scheme.foreground_color, "rgb(255,255,255)");
    }

    #[test]
    fn test_case_insensitive() {
        let config = test_config();

        let style = resolve(&config, " CU ");
        assert_eq!(style.brand_key, "cu");
        assert_eq!(style.scheme.background_color, "rgb(128,0,128)");
    }

    #[test]
    fn test_alias() {
        let config = test_config();

        assert_eq!(resolve(&config, "스타벅스"), resolve(&config, "Starbucks"));
        assert_eq!(resolve(&config, "L Point").brand_key, "l.point");
        assert_eq!(resolve(&config, "LPOINT").brand_key, "l.point");
    }

    #[test]
    fn test_mixed_case_table_keys() {
        let mut config = test_config();
        config.styles.insert(
            "Emart".to_string(),
            StyleScheme {
                background_color: "rgb(255,200,0)".to_string(),
                foreground_color: "rgb(0,0,0)".to_string(),
            },
        );
        config
            .aliases
            .insert(" 이마트 ".to_string(), "EMART".to_string());

        let style = resolve(&config, "Emart");
        assert!(style.known);
        assert_eq!(style.brand_key, "emart");
        assert_eq!(style.scheme.background_color, "rgb(255,200,0)");

        assert_eq!(resolve(&config, "이마트"), style);
        assert_eq!(resolve(&config, "EMART"), style);
    }

    #[test]
    fn test_unknown_brand_gets_default() {
        let config = test_config();

        for brand in ["Unknown Co", ""] {
            let style = resolve(&config, brand);
            assert!(!style.known);
            assert_eq!(style.scheme, StyleScheme::default());
        }
    }
}
