use crate::error::{GeoregionError, Result};
use crate::models::{DimensionMode, DimensionPolicy};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

/// Legacy marker on region directory names
pub const DEFAULT_REGION_PREFIX: &str = "L2_";

/// Legacy marker on sub-region directory names
pub const DEFAULT_SUB_REGION_PREFIX: &str = "L2C_";

pub const DEFAULT_TIDY_BUFFER_DISTANCE: f64 = 1.0;

pub const DEFAULT_OUTPUT_EXTENSION: &str = "geojson";

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Layered configuration for GeoRegion
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub region_prefix: ConfigValue<String>,
    pub sub_region_prefix: ConfigValue<String>,
    pub dimension_policy: ConfigValue<DimensionMode>,
    pub tidy_buffer_distance: ConfigValue<f64>,
    pub output_extension: ConfigValue<String>,
    pub strict_ids: ConfigValue<bool>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            region_prefix: ConfigValue::new(
                DEFAULT_REGION_PREFIX.to_string(),
                ConfigSource::Default,
            ),
            sub_region_prefix: ConfigValue::new(
                DEFAULT_SUB_REGION_PREFIX.to_string(),
                ConfigSource::Default,
            ),
            dimension_policy: ConfigValue::new(DimensionMode::Flatten, ConfigSource::Default),
            tidy_buffer_distance: ConfigValue::new(
                DEFAULT_TIDY_BUFFER_DISTANCE,
                ConfigSource::Default,
            ),
            output_extension: ConfigValue::new(
                DEFAULT_OUTPUT_EXTENSION.to_string(),
                ConfigSource::Default,
            ),
            strict_ids: ConfigValue::new(false, ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| GeoregionError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| GeoregionError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(prefix) = file_config.region_prefix {
            self.region_prefix.update(prefix, ConfigSource::File);
        }

        if let Some(prefix) = file_config.sub_region_prefix {
            self.sub_region_prefix.update(prefix, ConfigSource::File);
        }

        if let Some(mode) = file_config.dimension_policy {
            self.dimension_policy.update(mode, ConfigSource::File);
        }

        if let Some(distance) = file_config.tidy_buffer_distance {
            self.tidy_buffer_distance.update(validate_distance(distance)?, ConfigSource::File);
        }

        if let Some(extension) = file_config.output_extension {
            self.output_extension.update(extension, ConfigSource::File);
        }

        if let Some(strict) = file_config.strict_ids {
            self.strict_ids.update(strict, ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        if let Ok(prefix) = env::var("GEOREGION_REGION_PREFIX") {
            self.region_prefix.update(prefix, ConfigSource::Environment);
        }

        if let Ok(prefix) = env::var("GEOREGION_SUB_REGION_PREFIX") {
            self.sub_region_prefix.update(prefix, ConfigSource::Environment);
        }

        if let Ok(mode_str) = env::var("GEOREGION_DIMENSION_POLICY") {
            match mode_str.parse::<DimensionMode>() {
                Ok(mode) => self.dimension_policy.update(mode, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid GEOREGION_DIMENSION_POLICY value '{}': expected flatten or tidy_buffer",
                    mode_str
                ),
            }
        }

        if let Ok(distance_str) = env::var("GEOREGION_TIDY_BUFFER_DISTANCE") {
            match distance_str.parse::<f64>().ok().and_then(|d| validate_distance(d).ok()) {
                Some(distance) => {
                    self.tidy_buffer_distance.update(distance, ConfigSource::Environment)
                }
                None => tracing::warn!(
                    "Invalid GEOREGION_TIDY_BUFFER_DISTANCE value '{}': expected positive number",
                    distance_str
                ),
            }
        }

        if let Ok(extension) = env::var("GEOREGION_OUTPUT_EXTENSION") {
            self.output_extension.update(extension, ConfigSource::Environment);
        }

        if let Ok(strict_str) = env::var("GEOREGION_STRICT_IDS") {
            match parse_bool(&strict_str) {
                Ok(strict) => self.strict_ids.update(strict, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid GEOREGION_STRICT_IDS value '{}': expected true or false",
                    strict_str
                ),
            }
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        if let Some(prefix) = overrides.region_prefix {
            self.region_prefix.update(prefix, ConfigSource::Cli);
        }

        if let Some(prefix) = overrides.sub_region_prefix {
            self.sub_region_prefix.update(prefix, ConfigSource::Cli);
        }

        if let Some(mode) = overrides.dimension_policy {
            self.dimension_policy.update(mode, ConfigSource::Cli);
        }

        if let Some(distance) = overrides.tidy_buffer_distance {
            self.tidy_buffer_distance.update(distance, ConfigSource::Cli);
        }

        if let Some(strict) = overrides.strict_ids {
            self.strict_ids.update(strict, ConfigSource::Cli);
        }
    }

    /// Dimensionality policy resolved from mode and buffer distance
    pub fn dimension_policy(&self) -> DimensionPolicy {
        DimensionPolicy::from_mode(self.dimension_policy.value, self.tidy_buffer_distance.value)
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        map.insert(
            "region_prefix".to_string(),
            (self.region_prefix.value.clone(), self.region_prefix.source),
        );

        map.insert(
            "sub_region_prefix".to_string(),
            (self.sub_region_prefix.value.clone(), self.sub_region_prefix.source),
        );

        map.insert(
            "dimension_policy".to_string(),
            (format!("{:?}", self.dimension_policy.value), self.dimension_policy.source),
        );

        map.insert(
            "tidy_buffer_distance".to_string(),
            (self.tidy_buffer_distance.value.to_string(), self.tidy_buffer_distance.source),
        );

        map.insert(
            "output_extension".to_string(),
            (self.output_extension.value.clone(), self.output_extension.source),
        );

        map.insert(
            "strict_ids".to_string(),
            (self.strict_ids.value.to_string(), self.strict_ids.source),
        );

        map
    }
}

impl Default for LayeredConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    region_prefix: Option<String>,
    sub_region_prefix: Option<String>,
    dimension_policy: Option<DimensionMode>,
    tidy_buffer_distance: Option<f64>,
    output_extension: Option<String>,
    strict_ids: Option<bool>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub region_prefix: Option<String>,
    pub sub_region_prefix: Option<String>,
    pub dimension_policy: Option<DimensionMode>,
    pub tidy_buffer_distance: Option<f64>,
    pub strict_ids: Option<bool>,
}

/// Buffer distance must be a positive finite number
pub fn validate_distance(distance: f64) -> Result<f64> {
    if distance.is_finite() && distance > 0.0 {
        Ok(distance)
    } else {
        Err(GeoregionError::ConfigInvalid {
            key: "tidy_buffer_distance".to_string(),
            reason: format!("Buffer distance must be positive, got {}", distance),
        })
    }
}

/// Parse a boolean flag from string
pub fn parse_bool(s: &str) -> Result<bool> {
    match s.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(GeoregionError::ConfigInvalid {
            key: "strict_ids".to_string(),
            reason: format!("Invalid boolean: {}. Use true or false", s),
        }),
    }
}
