//! Query command implementation

use super::{load_index, print_query, run_query};
use crate::cli::QueryArgs;
use crate::config_loader::load_config_with_overrides;
use crate::output::OutputWriter;
use anyhow::Result;
use georegion_core::config::CliConfigOverrides;
use std::path::Path;

pub fn execute(args: QueryArgs, config_path: Option<&Path>, output: &OutputWriter) -> Result<()> {
    let config = load_config_with_overrides(
        config_path,
        CliConfigOverrides { strict_ids: args.strict_ids.then_some(true), ..Default::default() },
    )?;

    let (index, elapsed_secs) = load_index(
        &args.geojson_root,
        &config.output_extension.value,
        config.strict_ids.value,
    )?;
    tracing::info!("{} features processed in {:.2} seconds.", index.len(), elapsed_secs);

    let query = run_query(&index, args.bbox);
    if output.is_json() {
        output.result(query)
    } else {
        print_query(query, output);
        Ok(())
    }
}
