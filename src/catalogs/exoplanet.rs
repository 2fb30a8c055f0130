//! Exoplanet catalog loading
//!
//! This module loads an exoplanet table (for example a NASA Exoplanet Archive
//! CSV export) and decodes its sexagesimal coordinates. The table is loaded
//! once and then only read.

use serde::Serialize;
use serde_json::{Map, Number, Value};
use std::io::Read;
use std::path::Path;

use super::open_table;
use crate::coordinates::{parse_dec, parse_ra, SphericalCoord};
use crate::{ExoskyError, Result};

/// Column holding right ascension as `H:M:S`
pub const RA_COLUMN: &str = "ra";
/// Column holding declination as `D:M:S`
pub const DEC_COLUMN: &str = "dec";
/// Column holding system distance in parsecs
pub const DISTANCE_COLUMN: &str = "sy_dist";

const REQUIRED_COLUMNS: [&str; 3] = [RA_COLUMN, DEC_COLUMN, DISTANCE_COLUMN];

/// One exoplanet with decoded position and its other columns passed through
///
/// Serializes as a flat JSON object of all source columns, with `ra` and
/// `dec` in decimal degrees.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExoplanetRecord {
    #[serde(skip)]
    position: SphericalCoord,
    #[serde(flatten)]
    columns: Map<String, Value>,
}

impl ExoplanetRecord {
    /// Earth-centered position (degrees, parsecs)
    pub fn position(&self) -> SphericalCoord {
        self.position
    }

    pub fn ra(&self) -> f64 {
        self.position.ra
    }

    pub fn dec(&self) -> f64 {
        self.position.dec
    }

    pub fn distance(&self) -> f64 {
        self.position.distance
    }

    /// A column value by name
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns.get(column)
    }

    /// Planet name, if the table has a `pl_name` column
    pub fn name(&self) -> Option<&str> {
        self.get("pl_name").and_then(Value::as_str)
    }

    pub fn columns(&self) -> &Map<String, Value> {
        &self.columns
    }
}

/// In-memory exoplanet table
#[derive(Debug, Clone, Default)]
pub struct ExoplanetCatalog {
    /// Column names in source order
    columns: Vec<String>,
    records: Vec<ExoplanetRecord>,
}

impl ExoplanetCatalog {
    /// Load from a file (either CSV or gzipped CSV)
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        log::info!("Loading exoplanet catalog from {}", path.as_ref().display());
        let catalog = Self::from_reader(open_table(&path)?)?;
        log::info!(
            "Loaded {} exoplanets with {} columns",
            catalog.len(),
            catalog.columns.len()
        );
        Ok(catalog)
    }

    /// Load from any CSV byte stream
    ///
    /// Lines starting with `#` are comments. Required columns are `ra`,
    /// `dec` and `sy_dist`; everything else passes through.
    ///
    /// # Errors
    ///
    /// - [`ExoskyError::Schema`] naming the first missing required column
    /// - [`ExoskyError::Format`] for a malformed angle or distance, with row
    ///   and column in the message
    /// - [`ExoskyError::Csv`] for structurally broken CSV
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .comment(Some(b'#'))
            .trim(csv::Trim::All)
            .from_reader(reader);

        let columns: Vec<String> = csv_reader.headers()?.iter().map(str::to_string).collect();
        let find_column = |name: &str| -> Result<usize> {
            columns
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| ExoskyError::Schema {
                    column: name.to_string(),
                })
        };

        let mut indices = [0usize; 3];
        for (slot, name) in indices.iter_mut().zip(REQUIRED_COLUMNS) {
            *slot = find_column(name)?;
        }
        let [ra_idx, dec_idx, dist_idx] = indices;

        let mut records = Vec::new();
        for (row, result) in csv_reader.records().enumerate() {
            let record = result?;
            let field = |idx: usize| record.get(idx).unwrap_or("");
            let locate = |column: &str, e: ExoskyError| match e {
                ExoskyError::Format(msg) => {
                    ExoskyError::Format(format!("row {}, column '{}': {}", row + 1, column, msg))
                }
                other => other,
            };

            let ra = parse_ra(field(ra_idx)).map_err(|e| locate(RA_COLUMN, e))?;
            if !(0.0..360.0).contains(&ra) {
                return Err(ExoskyError::Format(format!(
                    "row {}, column '{}': right ascension {} is outside [0, 360)",
                    row + 1,
                    RA_COLUMN,
                    ra
                )));
            }

            let dec = parse_dec(field(dec_idx)).map_err(|e| locate(DEC_COLUMN, e))?;
            if !(-90.0..=90.0).contains(&dec) {
                return Err(ExoskyError::Format(format!(
                    "row {}, column '{}': declination {} is outside [-90, 90]",
                    row + 1,
                    DEC_COLUMN,
                    dec
                )));
            }

            let distance = field(dist_idx)
                .parse::<f64>()
                .ok()
                .filter(|d| d.is_finite() && *d >= 0.0)
                .ok_or_else(|| {
                    ExoskyError::Format(format!(
                        "row {}, column '{}': '{}' is not a non-negative distance",
                        row + 1,
                        DISTANCE_COLUMN,
                        field(dist_idx)
                    ))
                })?;

            let mut values = Map::with_capacity(columns.len());
            for (idx, name) in columns.iter().enumerate() {
                let value = if idx == ra_idx {
                    number(ra)
                } else if idx == dec_idx {
                    number(dec)
                } else if idx == dist_idx {
                    number(distance)
                } else {
                    cell_value(field(idx))
                };
                values.insert(name.clone(), value);
            }

            records.push(ExoplanetRecord {
                position: SphericalCoord::new(ra, dec, distance),
                columns: values,
            });
        }

        if records.is_empty() {
            log::warn!("Exoplanet catalog has no rows");
        }

        Ok(Self { columns, records })
    }

    /// Record at a zero-based row position
    ///
    /// # Errors
    ///
    /// [`ExoskyError::Range`] for a negative index or one past the end.
    pub fn get(&self, index: i64) -> Result<&ExoplanetRecord> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.records.get(i))
            .ok_or(ExoskyError::Range {
                index,
                len: self.records.len(),
            })
    }

    pub fn records(&self) -> &[ExoplanetRecord] {
        &self.records
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn number(value: f64) -> Value {
    Number::from_f64(value).map_or(Value::Null, Value::Number)
}

/// Passthrough cell: integer, float, `null` for empty, otherwise text
fn cell_value(text: &str) -> Value {
    if text.is_empty() {
        return Value::Null;
    }
    if let Ok(int) = text.parse::<i64>() {
        return Value::Number(int.into());
    }
    match text.parse::<f64>() {
        Ok(float) if float.is_finite() => number(float),
        _ => Value::String(text.to_string()),
    }
}
