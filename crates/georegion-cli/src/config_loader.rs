//! Configuration loading utilities for CLI commands

use anyhow::{Context, Result};
use georegion_core::config::{validate_distance, CliConfigOverrides, LayeredConfig};
use std::path::Path;

/// Defaults, then the optional TOML file, then environment variables
pub fn load_config(config_path: Option<&Path>) -> Result<LayeredConfig> {
    let mut config = LayeredConfig::with_defaults();

    if let Some(path) = config_path {
        config = config
            .load_from_file(path)
            .with_context(|| format!("Failed to load configuration file {}", path.display()))?;
    }

    Ok(config.load_from_env())
}

/// Load layered configuration with CLI overrides
pub fn load_config_with_overrides(
    config_path: Option<&Path>,
    overrides: CliConfigOverrides,
) -> Result<LayeredConfig> {
    if let Some(distance) = overrides.tidy_buffer_distance {
        validate_distance(distance)?;
    }

    let mut config = load_config(config_path)?;
    config.update_from_cli(overrides);
    Ok(config)
}
