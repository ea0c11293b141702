//! Geometry Normalizer
//!
//! Turns raw source records into canonical features in three steps, in order:
//! reprojection into the target CRS, removal of the Z ordinate, then stamping
//! of the identifier and hierarchy attributes.

use georegion_core::error::{GeoregionError, Result};
use georegion_core::models::{
    identifier_of, Crs, DimensionPolicy, Feature, PropertyValue, RawRecord, SourceBatch, ID_KEY,
    REGION_NAME_KEY, SUB_REGION_NAME_KEY,
};
use georegion_core::ports::{CoordinateTransform, IdGenerator, Reprojector};
use georegion_geo::dimension::to_planar;
use georegion_geo::transform::{crs_match, reproject_value};

pub struct GeometryNormalizer {
    reprojector: Box<dyn Reprojector>,
    ids: Box<dyn IdGenerator>,
    policy: DimensionPolicy,
    target_crs: Crs,
}

impl GeometryNormalizer {
    /// Create a normalizer targeting the canonical CRS
    pub fn new(
        reprojector: Box<dyn Reprojector>,
        ids: Box<dyn IdGenerator>,
        policy: DimensionPolicy,
    ) -> Self {
        Self { reprojector, ids, policy, target_crs: Crs::canonical() }
    }

    /// Build the transform for a source CRS, None meaning nothing to do
    fn transform_for(&self, source_crs: Option<&Crs>) -> Result<Option<Box<dyn CoordinateTransform>>> {
        match source_crs {
            Some(crs) if !crs_match(crs, &self.target_crs) => {
                tracing::debug!("Reprojecting from {} to {}", crs, self.target_crs);
                self.reprojector.transform(crs, &self.target_crs).map(Some)
            }
            _ => Ok(None),
        }
    }

    /// Normalize one record
    ///
    /// A missing `source_crs` means the coordinates are already canonical.
    pub fn normalize(
        &self,
        record: RawRecord,
        source_crs: Option<&Crs>,
        region_name: &str,
        sub_region_name: &str,
    ) -> Result<Feature> {
        let transform = self.transform_for(source_crs)?;
        self.normalize_with(record, transform.as_deref(), region_name, sub_region_name)
    }

    /// Normalize every record of a batch, building the CRS transform once
    pub fn normalize_batch(
        &self,
        batch: SourceBatch,
        region_name: &str,
        sub_region_name: &str,
    ) -> Result<Vec<Feature>> {
        let transform = self.transform_for(batch.crs.as_ref())?;
        let source = batch.path.display().to_string();

        batch
            .records
            .into_iter()
            .enumerate()
            .map(|(n, record)| {
                self.normalize_with(record, transform.as_deref(), region_name, sub_region_name)
                    .map_err(|e| {
                        let (context, reason) = match e {
                            GeoregionError::GeometryError { context, reason } => (context, reason),
                            GeoregionError::CrsError { crs, reason } => {
                                (format!("reprojection from {}", crs), reason)
                            }
                            other => return other,
                        };
                        GeoregionError::geometry(
                            format!("{} record {} ({})", source, n + 1, context),
                            reason,
                        )
                    })
            })
            .collect()
    }

    fn normalize_with(
        &self,
        record: RawRecord,
        transform: Option<&dyn CoordinateTransform>,
        region_name: &str,
        sub_region_name: &str,
    ) -> Result<Feature> {
        let RawRecord { geometry, mut properties } = record;

        let raw = geometry
            .ok_or_else(|| GeoregionError::geometry("record", "record has no geometry"))?;
        let raw = match transform {
            Some(transform) => reproject_value(&raw, transform)?,
            None => raw,
        };
        let geometry = to_planar(&raw, self.policy)?;

        let id = match identifier_of(&properties) {
            Some(id) => id,
            None => {
                let id = self.ids.next_id();
                properties.insert(ID_KEY.to_string(), PropertyValue::String(id.clone()));
                id
            }
        };

        properties.insert(REGION_NAME_KEY.to_string(), region_name.into());
        properties.insert(SUB_REGION_NAME_KEY.to_string(), sub_region_name.into());

        Ok(Feature::new(id, geometry, properties))
    }
}
