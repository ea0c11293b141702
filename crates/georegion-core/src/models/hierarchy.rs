use serde::Serialize;
use std::collections::BTreeMap;

/// Region name -> sub-region name -> feature identifiers in first-seen order
///
/// An entry exists only once a feature declaring that pair has been inserted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RegionHierarchy {
    regions: BTreeMap<String, BTreeMap<String, Vec<String>>>,
}

impl RegionHierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an identifier, creating either level lazily
    pub fn insert(&mut self, region: &str, sub_region: &str, id: impl Into<String>) {
        self.regions
            .entry(region.to_string())
            .or_default()
            .entry(sub_region.to_string())
            .or_default()
            .push(id.into());
    }

    pub fn feature_ids(&self, region: &str, sub_region: &str) -> Option<&[String]> {
        self.regions.get(region)?.get(sub_region).map(Vec::as_slice)
    }

    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    pub fn pair_count(&self) -> usize {
        self.regions.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_creates_levels_lazily() {
        let mut hierarchy = RegionHierarchy::new();
        assert!(hierarchy.is_empty());

        hierarchy.insert("A", "X", "1");
        hierarchy.insert("A", "X", "2");
        hierarchy.insert("A", "Y", "3");
        hierarchy.insert("B", "Z", "4");

        assert_eq!(hierarchy.region_count(), 2);
        assert_eq!(hierarchy.pair_count(), 3);
        assert_eq!(hierarchy.feature_ids("A", "X").unwrap(), &["1", "2"]);
        assert!(hierarchy.feature_ids("A", "Z").is_none());
        assert!(hierarchy.feature_ids("C", "X").is_none());
    }

    #[test]
    fn test_serializes_as_nested_object() {
        let mut hierarchy = RegionHierarchy::new();
        hierarchy.insert("A", "X", "1");

        let json = serde_json::to_value(&hierarchy).unwrap();
        assert_eq!(json, serde_json::json!({"A": {"X": ["1"]}}));
    }
}
