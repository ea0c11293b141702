//! Canonical feature model shared by the write and read paths

use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::PathBuf;

use super::geometry::{Crs, Geometry};

/// Primary identifier property written by the normalizer
pub const ID_KEY: &str = "ID";

/// Lower-case identifier property some GeoJSON writers produce instead of `ID`
pub const ID_FALLBACK_KEY: &str = "id";

pub const REGION_NAME_KEY: &str = "Region_Name";
pub const SUB_REGION_NAME_KEY: &str = "Sub_Region_Name";

/// Scalar attribute value
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Null,
    Bool(bool),
    Integer(i64),
    Number(f64),
    String(String),
}

impl PropertyValue {
    /// Convert a JSON value; nested arrays and objects are kept as their JSON text
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => PropertyValue::Null,
            serde_json::Value::Bool(b) => PropertyValue::Bool(*b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => PropertyValue::Integer(i),
                None => PropertyValue::Number(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => PropertyValue::String(s.clone()),
            other => PropertyValue::String(other.to_string()),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, PropertyValue::Null)
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Null => write!(f, "null"),
            PropertyValue::Bool(b) => write!(f, "{}", b),
            PropertyValue::Integer(i) => write!(f, "{}", i),
            PropertyValue::Number(n) => write!(f, "{}", n),
            PropertyValue::String(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::String(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::String(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Integer(value)
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        PropertyValue::Number(value)
    }
}

/// Attribute bag keyed by property name
pub type Properties = BTreeMap<String, PropertyValue>;

/// Read the feature identifier, preferring `ID` over `id`
///
/// Null, boolean and empty-string values do not count as identifiers.
pub fn identifier_of(properties: &Properties) -> Option<String> {
    [ID_KEY, ID_FALLBACK_KEY].iter().find_map(|key| match properties.get(*key)? {
        PropertyValue::String(s) if !s.is_empty() => Some(s.clone()),
        PropertyValue::Integer(i) => Some(i.to_string()),
        PropertyValue::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn non_empty<'a>(properties: &'a Properties, key: &str) -> Option<&'a str> {
    properties.get(key).and_then(PropertyValue::as_str).filter(|s| !s.is_empty())
}

/// Source geometry plus attributes as produced by a format reader
///
/// The geometry may carry a Z ordinate and may be in any CRS.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub geometry: Option<geojson::Value>,
    pub properties: Properties,
}

impl RawRecord {
    pub fn new(geometry: geojson::Value, properties: Properties) -> Self {
        Self { geometry: Some(geometry), properties }
    }
}

/// Everything a reader produced for one source file
#[derive(Debug, Clone)]
pub struct SourceBatch {
    pub path: PathBuf,
    pub format_name: String,
    /// None when the format carries no CRS information
    pub crs: Option<Crs>,
    pub records: Vec<RawRecord>,
}

/// Normalized feature: 2-D canonical geometry with identity and hierarchy attributes
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub id: String,
    pub geometry: Geometry,
    pub properties: Properties,
}

impl Feature {
    pub fn new(id: impl Into<String>, geometry: Geometry, properties: Properties) -> Self {
        Self { id: id.into(), geometry, properties }
    }

    pub fn region_name(&self) -> Option<&str> {
        non_empty(&self.properties, REGION_NAME_KEY)
    }

    pub fn sub_region_name(&self) -> Option<&str> {
        non_empty(&self.properties, SUB_REGION_NAME_KEY)
    }

    /// Both hierarchy attributes, when present and non-empty
    pub fn hierarchy_position(&self) -> Option<(&str, &str)> {
        Some((self.region_name()?, self.sub_region_name()?))
    }

    pub fn property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }
}

impl Serialize for Feature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Feature", 3)?;
        state.serialize_field("type", "Feature")?;
        state.serialize_field("geometry", &self.geometry)?;
        state.serialize_field("properties", &self.properties)?;
        state.end()
    }
}

/// Features sharing one (region, sub-region) pair; the unit of output persistence
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureCollection {
    pub region_name: String,
    pub sub_region_name: String,
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(
        region_name: impl Into<String>,
        sub_region_name: impl Into<String>,
        features: Vec<Feature>,
    ) -> Self {
        Self {
            region_name: region_name.into(),
            sub_region_name: sub_region_name.into(),
            features,
        }
    }

    /// `{Region_Name}-{Sub_Region_Name}.{extension}`
    pub fn file_name(&self, extension: &str) -> String {
        format!("{}-{}.{}", self.region_name, self.sub_region_name, extension)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

impl Serialize for FeatureCollection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("FeatureCollection", 2)?;
        state.serialize_field("type", "FeatureCollection")?;
        state.serialize_field("features", &self.features)?;
        state.end()
    }
}

/// Identifier to feature map that remembers first insertion order
///
/// Re-inserting an existing identifier replaces the feature in place.
#[derive(Debug, Clone, Default)]
pub struct FeatureMap {
    features: Vec<Feature>,
    positions: HashMap<String, usize>,
}

impl FeatureMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a feature, returning the one it replaced
    pub fn insert(&mut self, feature: Feature) -> Option<Feature> {
        match self.positions.get(&feature.id) {
            Some(&position) => Some(std::mem::replace(&mut self.features[position], feature)),
            None => {
                self.positions.insert(feature.id.clone(), self.features.len());
                self.features.push(feature);
                None
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&Feature> {
        self.positions.get(id).map(|&position| &self.features[position])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.positions.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Feature> {
        self.features.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.features.iter().map(|f| f.id.as_str())
    }
}

impl FromIterator<Feature> for FeatureMap {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        let mut map = FeatureMap::new();
        for feature in iter {
            map.insert(feature);
        }
        map
    }
}
