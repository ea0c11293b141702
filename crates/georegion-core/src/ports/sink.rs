use crate::error::Result;
use crate::models::Feature;

/// Port receiving one finished feature collection per (region, sub-region)
pub trait Sink {
    fn emit(&mut self, region_name: &str, sub_region_name: &str, features: Vec<Feature>)
        -> Result<()>;
}
