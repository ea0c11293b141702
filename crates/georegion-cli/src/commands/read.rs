//! Read command implementation

use super::{load_index, print_query, run_query};
use crate::cli::ReadArgs;
use crate::config_loader::load_config_with_overrides;
use crate::output::OutputWriter;
use crate::output_types::ReadOutput;
use anyhow::Result;
use georegion_core::config::CliConfigOverrides;
use georegion_core::models::BoundingBox;
use std::path::Path;

/// Boxes exercised by the demonstration run
const DEMO_BOXES: [(f64, f64, f64, f64); 3] =
    [(17.0, 40.0, 18.0, 41.0), (10.0, 53.0, 12.0, 54.0), (16.0, 58.0, 18.0, 60.0)];

pub fn execute(args: ReadArgs, config_path: Option<&Path>, output: &OutputWriter) -> Result<()> {
    let config = load_config_with_overrides(
        config_path,
        CliConfigOverrides { strict_ids: args.strict_ids.then_some(true), ..Default::default() },
    )?;

    let (index, elapsed_secs) = load_index(
        &args.geojson_root,
        &config.output_extension.value,
        config.strict_ids.value,
    )?;

    let queries = DEMO_BOXES
        .iter()
        .map(|&(min_x, min_y, max_x, max_y)| {
            BoundingBox::new(min_x, min_y, max_x, max_y).map(|bbox| run_query(&index, bbox))
        })
        .collect::<georegion_core::Result<Vec<_>>>()?;

    if output.is_json() {
        return output.result(ReadOutput {
            features_processed: index.len(),
            elapsed_secs,
            hierarchy: index.hierarchy(),
            queries,
        });
    }

    output.section("Region hierarchy");
    output.data(index.hierarchy())?;
    output.info(format!("{} features processed in {:.2} seconds.", index.len(), elapsed_secs));

    for query in queries {
        print_query(query, output);
    }

    Ok(())
}
