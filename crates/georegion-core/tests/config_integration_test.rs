//! Integration tests for layered configuration
//!
//! Environment variables are process-global, so every test touching them is serialized.

use georegion_core::config::{CliConfigOverrides, ConfigSource, LayeredConfig};
use georegion_core::models::{DimensionMode, DimensionPolicy};
use serial_test::serial;
use std::env;
use std::fs;
use tempfile::TempDir;

fn clear_env() {
    for key in [
        "GEOREGION_REGION_PREFIX",
        "GEOREGION_SUB_REGION_PREFIX",
        "GEOREGION_DIMENSION_POLICY",
        "GEOREGION_TIDY_BUFFER_DISTANCE",
        "GEOREGION_OUTPUT_EXTENSION",
        "GEOREGION_STRICT_IDS",
    ] {
        env::remove_var(key);
    }
}

#[test]
#[serial]
fn test_env_overrides_file() {
    clear_env();
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("georegion.toml");
    fs::write(&config_path, "region_prefix = \"FILE_\"\noutput_extension = \"json\"\n").unwrap();

    env::set_var("GEOREGION_REGION_PREFIX", "ENV_");
    env::set_var("GEOREGION_DIMENSION_POLICY", "tidy_buffer");
    env::set_var("GEOREGION_TIDY_BUFFER_DISTANCE", "0.5");

    let config = LayeredConfig::with_defaults().load_from_file(&config_path).unwrap().load_from_env();
    clear_env();

    assert_eq!(config.region_prefix.value, "ENV_");
    assert_eq!(config.region_prefix.source, ConfigSource::Environment);
    assert_eq!(config.output_extension.value, "json");
    assert_eq!(config.output_extension.source, ConfigSource::File);
    assert_eq!(config.dimension_policy(), DimensionPolicy::TidyBuffer { distance: 0.5 });
}

#[test]
#[serial]
fn test_invalid_env_values_are_ignored() {
    clear_env();
    env::set_var("GEOREGION_DIMENSION_POLICY", "sideways");
    env::set_var("GEOREGION_TIDY_BUFFER_DISTANCE", "-3");
    env::set_var("GEOREGION_STRICT_IDS", "perhaps");

    let config = LayeredConfig::with_defaults().load_from_env();
    clear_env();

    assert_eq!(config.dimension_policy.value, DimensionMode::Flatten);
    assert_eq!(config.dimension_policy.source, ConfigSource::Default);
    assert_eq!(config.tidy_buffer_distance.value, 1.0);
    assert!(!config.strict_ids.value);
}

#[test]
#[serial]
fn test_cli_beats_env() {
    clear_env();
    env::set_var("GEOREGION_STRICT_IDS", "true");

    let mut config = LayeredConfig::with_defaults().load_from_env();
    clear_env();
    config.update_from_cli(CliConfigOverrides { strict_ids: Some(false), ..Default::default() });

    assert!(!config.strict_ids.value);
    assert_eq!(config.strict_ids.source, ConfigSource::Cli);
}

#[test]
fn test_missing_config_file_is_an_error() {
    let result = LayeredConfig::with_defaults().load_from_file("/nonexistent/georegion.toml");
    assert!(result.is_err());
}
