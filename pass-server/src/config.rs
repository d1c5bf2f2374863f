//! Loading of the pass configuration file.

use std::path::Path;

use pass_core::config::PassConfig;

use crate::PassServerError;

/// Read and check the TOML pass configuration.
pub fn load(path: impl AsRef<Path>) -> Result<PassConfig, PassServerError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| {
        PassServerError::Setup(format!("could not read config {}: {e}", path.display()))
    })?;

    let config = parse(&text)?;

    log::info!(
        "loaded config {} with {} brands and {} aliases",
        path.display(),
        config.styles.len(),
        config.aliases.len()
    );

    Ok(config)
}

/// Parse the TOML pass configuration.
///
/// Brand and alias keys are normalized the same way incoming brand names are.
pub fn parse(text: &str) -> Result<PassConfig, PassServerError> {
    let config: PassConfig = toml::from_str(text)?;

    config
        .normalize()
        .map_err(|e| PassServerError::Setup(e.to_string()))
}
