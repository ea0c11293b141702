//! Pin lists: tab-delimited text with a header row
//!
//! `Longitude` and `Latitude` columns become a point; every other column is
//! copied verbatim into the record's string properties.

use std::path::Path;

use crate::error::{GeoregionError, Result};
use crate::formats::{read_text, FormatReader};
use crate::models::{Properties, PropertyValue, RawRecord, SourceBatch};

pub const LONGITUDE_COLUMN: &str = "Longitude";
pub const LATITUDE_COLUMN: &str = "Latitude";

const DELIMITER: char = '\t';

pub struct PinsReader;

impl FormatReader for PinsReader {
    fn read(&self, path: &Path) -> Result<SourceBatch> {
        tracing::info!("<-- Reading {} ...", path.display());

        let content = read_text(path, self.format_name())?;
        let records = parse_pins(&content).map_err(|message| GeoregionError::SourceFormatError {
            format: self.format_name().to_string(),
            path: path.to_path_buf(),
            message,
        })?;

        Ok(SourceBatch {
            path: path.to_path_buf(),
            format_name: self.format_name().to_string(),
            crs: None,
            records,
        })
    }

    fn patterns(&self) -> &[&str] {
        &["*_pins.txt"]
    }

    fn format_name(&self) -> &str {
        "Pins"
    }
}

fn split_row(line: &str) -> Vec<&str> {
    line.trim_end_matches(['\r', '\n']).split(DELIMITER).collect()
}

/// Parse pin rows; errors carry the 1-based line number
pub fn parse_pins(content: &str) -> std::result::Result<Vec<RawRecord>, String> {
    let mut lines = content.lines().enumerate().filter(|(_, l)| !l.trim().is_empty());

    let header = match lines.next() {
        Some((_, line)) => split_row(line.trim_start_matches('\u{feff}')),
        None => return Ok(Vec::new()),
    };

    let column = |name: &str| {
        header
            .iter()
            .position(|h| *h == name)
            .ok_or_else(|| format!("missing '{}' column in header", name))
    };
    let lon_idx = column(LONGITUDE_COLUMN)?;
    let lat_idx = column(LATITUDE_COLUMN)?;

    let mut records = Vec::new();
    for (idx, line) in lines {
        let line_no = idx + 1;
        let fields = split_row(line);
        if fields.len() != header.len() {
            return Err(format!(
                "line {}: expected {} columns, found {}",
                line_no,
                header.len(),
                fields.len()
            ));
        }

        let coordinate = |i: usize, name: &str| {
            fields[i]
                .trim()
                .parse::<f64>()
                .map_err(|_| format!("line {}: invalid {} '{}'", line_no, name, fields[i]))
        };
        let lon = coordinate(lon_idx, LONGITUDE_COLUMN)?;
        let lat = coordinate(lat_idx, LATITUDE_COLUMN)?;

        let properties: Properties = header
            .iter()
            .zip(fields.iter())
            .enumerate()
            .filter(|(i, _)| *i != lon_idx && *i != lat_idx)
            .map(|(_, (name, value))| (name.to_string(), PropertyValue::from(*value)))
            .collect();

        records.push(RawRecord::new(geojson::Value::Point(vec![lon, lat]), properties));
    }

    Ok(records)
}
