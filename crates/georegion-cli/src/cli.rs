use clap::{Parser, Subcommand};
use georegion_core::models::{BoundingBox, DimensionMode};
use std::path::PathBuf;

/// GeoRegion - Region-organized feature collections with bounding-box queries
#[derive(Parser, Debug)]
#[command(name = "georegion")]
#[command(about = "Normalize region source trees into GeoJSON and query them", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// TOML configuration file
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Normalize a region/sub-region source tree into one collection per sub-region
    Write(WriteArgs),

    /// Load collections, print the hierarchy and run the demonstration queries
    Read(ReadArgs),

    /// Load collections and run one bounding-box query
    Query(QueryArgs),

    /// Show effective configuration and where each value came from
    Config,
}

#[derive(Parser, Debug)]
pub struct WriteArgs {
    /// Root directory holding region directories
    #[arg(default_value = "input")]
    pub source_root: PathBuf,

    /// Directory receiving the collection files (created if missing)
    #[arg(default_value = "output")]
    pub output_root: PathBuf,

    /// How Z ordinates are removed (flatten or tidy_buffer)
    #[arg(long, value_name = "POLICY")]
    pub dimension_policy: Option<DimensionMode>,

    /// Tidy buffer distance in degrees
    #[arg(long, value_name = "DISTANCE")]
    pub buffer_distance: Option<f64>,

    /// Marker stripped from region directory names
    #[arg(long)]
    pub region_prefix: Option<String>,

    /// Marker stripped from sub-region directory names
    #[arg(long)]
    pub sub_region_prefix: Option<String>,
}

#[derive(Parser, Debug)]
pub struct ReadArgs {
    /// Directory of collection files
    #[arg(default_value = "output")]
    pub geojson_root: PathBuf,

    /// Fail on repeated feature identifiers instead of keeping the last one
    #[arg(long)]
    pub strict_ids: bool,
}

#[derive(Parser, Debug)]
pub struct QueryArgs {
    /// Directory of collection files
    #[arg(default_value = "output")]
    pub geojson_root: PathBuf,

    /// Query box as min_x,min_y,max_x,max_y in degrees
    #[arg(long, allow_hyphen_values = true, value_name = "BBOX")]
    pub bbox: BoundingBox,

    /// Fail on repeated feature identifiers instead of keeping the last one
    #[arg(long)]
    pub strict_ids: bool,
}
