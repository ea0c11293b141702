//! Command implementations

mod config;
mod query;
mod read;
mod write;

use crate::cli::{Cli, Commands};
use crate::output::OutputWriter;
use anyhow::Result;
use georegion_core::models::{BoundingBox, Feature};
use georegion_index::{load_collections, RegionIndex};
use std::path::Path;
use std::time::Instant;

use crate::output_types::{MatchRow, QueryOutput};

/// Execute a CLI command
pub fn execute(cli: Cli) -> Result<()> {
    let output = OutputWriter::new(cli.json);
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Write(args) => write::execute(args, config_path, &output),
        Commands::Read(args) => read::execute(args, config_path, &output),
        Commands::Query(args) => query::execute(args, config_path, &output),
        Commands::Config => config::execute(config_path, &output),
    }
}

/// Load every `*.{extension}` collection under `root` and index it
pub(crate) fn load_index(
    root: &Path,
    extension: &str,
    strict_ids: bool,
) -> Result<(RegionIndex, f64)> {
    let start = Instant::now();
    let features: Vec<Feature> = load_collections(root, extension)?;
    let index = if strict_ids {
        RegionIndex::build_strict(features)?
    } else {
        RegionIndex::build(features)
    };
    Ok((index, start.elapsed().as_secs_f64()))
}

/// Run one timed bounding-box query
pub(crate) fn run_query(index: &RegionIndex, bbox: BoundingBox) -> QueryOutput {
    let start = Instant::now();
    let matches = index.query_bbox(&bbox);
    let elapsed_secs = start.elapsed().as_secs_f64();

    QueryOutput {
        bbox,
        features_found: matches.len(),
        elapsed_secs,
        matches: matches.iter().map(MatchRow::from).collect(),
    }
}

pub(crate) fn print_query(query: QueryOutput, output: &OutputWriter) {
    output.info(format!(
        "{} features found in {:.4} seconds for bbox {}",
        query.features_found, query.elapsed_secs, query.bbox
    ));
    output.table(query.matches);
}
