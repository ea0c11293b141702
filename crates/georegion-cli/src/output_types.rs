use georegion_core::models::{BoundingBox, Feature, RegionHierarchy};
use serde::Serialize;
use tabled::Tabled;

/// Output for write command
#[derive(Debug, Serialize)]
pub struct WriteOutput {
    pub source_root: String,
    pub output_root: String,
    pub regions_processed: usize,
    pub features_written: usize,
    pub source_files: usize,
    pub files: Vec<String>,
    pub elapsed_secs: f64,
}

/// Output for read command
#[derive(Debug, Serialize)]
pub struct ReadOutput<'a> {
    pub features_processed: usize,
    pub elapsed_secs: f64,
    pub hierarchy: &'a RegionHierarchy,
    pub queries: Vec<QueryOutput>,
}

/// Output for one bounding-box query
#[derive(Debug, Serialize)]
pub struct QueryOutput {
    pub bbox: BoundingBox,
    pub features_found: usize,
    pub elapsed_secs: f64,
    pub matches: Vec<MatchRow>,
}

/// One matching feature
#[derive(Debug, Serialize, Tabled)]
pub struct MatchRow {
    #[tabled(rename = "Region")]
    pub region_name: String,
    #[tabled(rename = "Sub-region")]
    pub sub_region_name: String,
    #[tabled(rename = "ID")]
    pub id: String,
}

impl From<&Feature> for MatchRow {
    fn from(feature: &Feature) -> Self {
        Self {
            region_name: feature.region_name().unwrap_or_default().to_string(),
            sub_region_name: feature.sub_region_name().unwrap_or_default().to_string(),
            id: feature.id.clone(),
        }
    }
}

/// Output for config command
#[derive(Debug, Serialize)]
pub struct ConfigOutput {
    pub values: Vec<ConfigEntry>,
}

#[derive(Debug, Serialize, Tabled)]
pub struct ConfigEntry {
    #[tabled(rename = "Key")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(rename = "Source")]
    pub source: String,
}
