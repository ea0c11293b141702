//! Config command implementation

use crate::config_loader::load_config;
use crate::output::OutputWriter;
use crate::output_types::{ConfigEntry, ConfigOutput};
use anyhow::Result;
use std::path::Path;

pub fn execute(config_path: Option<&Path>, output: &OutputWriter) -> Result<()> {
    let config = load_config(config_path)?;

    let mut values: Vec<ConfigEntry> = config
        .to_inspection_map()
        .into_iter()
        .map(|(key, (value, source))| ConfigEntry { key, value, source: format!("{:?}", source) })
        .collect();
    values.sort_by(|a, b| a.key.cmp(&b.key));

    if output.is_json() {
        output.result(ConfigOutput { values })
    } else {
        output.section("Configuration Values");
        output.table(values);
        Ok(())
    }
}
