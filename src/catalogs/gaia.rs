//! Gaia star records
//!
//! This module provides the star record handed to the projection pipeline
//! and the decoding of Gaia-style CSV (archive exports and TAP results).

use serde::{Deserialize, Serialize};
use std::io::Read;

use crate::coordinates::SphericalCoord;
use crate::{ExoskyError, Result};

/// Milliarcseconds of parallax per parsec of inverse distance
const MAS_PER_ARCSEC: f64 = 1000.0;

/// A bright star returned by a star query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarRecord {
    /// Catalog identifier (Gaia source_id)
    pub id: String,
    /// Right ascension in degrees
    pub ra: f64,
    /// Declination in degrees
    pub dec: f64,
    /// Parallax (mas)
    pub parallax: f64,
    /// Apparent magnitude (lower is brighter)
    pub magnitude: f64,
}

impl StarRecord {
    pub fn new(id: impl Into<String>, ra: f64, dec: f64, parallax: f64, magnitude: f64) -> Self {
        Self {
            id: id.into(),
            ra,
            dec,
            parallax,
            magnitude,
        }
    }

    /// Distance in parsecs (1000/parallax_in_mas)
    ///
    /// # Errors
    ///
    /// [`ExoskyError::Division`] for a parallax that is zero, negative or
    /// not finite.
    pub fn distance_pc(&self) -> Result<f64> {
        if self.parallax.is_finite() && self.parallax > 0.0 {
            Ok(MAS_PER_ARCSEC / self.parallax)
        } else {
            Err(ExoskyError::Division {
                parallax: self.parallax,
            })
        }
    }

    /// Earth-centered position, using the parallax distance
    pub fn position(&self) -> Result<SphericalCoord> {
        Ok(SphericalCoord::new(self.ra, self.dec, self.distance_pc()?))
    }
}

/// Columns a Gaia CSV table must carry, in archive order
pub const GAIA_COLUMNS: [&str; 5] = ["source_id", "ra", "dec", "parallax", "phot_g_mean_mag"];

/// One row of a Gaia CSV table, as published by the archive
#[derive(Debug, Clone, Deserialize)]
pub struct GaiaRow {
    pub source_id: String,
    pub ra: f64,
    pub dec: f64,
    pub parallax: Option<f64>,
    pub phot_g_mean_mag: Option<f64>,
}

impl GaiaRow {
    /// Convert to a [`StarRecord`], or `None` if parallax or magnitude is missing
    pub fn into_star(self) -> Option<StarRecord> {
        match (self.parallax, self.phot_g_mean_mag) {
            (Some(parallax), Some(magnitude)) => Some(StarRecord {
                id: self.source_id,
                ra: self.ra,
                dec: self.dec,
                parallax,
                magnitude,
            }),
            _ => None,
        }
    }
}

/// Lazily decode Gaia CSV rows into star records
///
/// Unreadable rows and rows without parallax or magnitude are logged and
/// skipped. Extra columns are ignored.
pub fn read_gaia_csv<R: Read>(reader: R) -> impl Iterator<Item = StarRecord> {
    csv::ReaderBuilder::new()
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .from_reader(reader)
        .into_deserialize::<GaiaRow>()
        .filter_map(|row| match row {
            Ok(row) => {
                let source_id = row.source_id.clone();
                let star = row.into_star();
                if star.is_none() {
                    log::warn!("Skipping Gaia source {}: missing parallax or magnitude", source_id);
                }
                star
            }
            Err(e) => {
                log::warn!("Skipping unreadable Gaia row: {}", e);
                None
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rstest::rstest;

    #[test]
    fn test_parallax_distance() {
        let star = StarRecord::new("1", 10.0, 20.0, 5.0, 3.0);
        assert_abs_diff_eq!(star.distance_pc().unwrap(), 200.0, epsilon = 1e-12);

        let close = StarRecord::new("2", 10.0, 20.0, 1000.0, 3.0);
        assert_abs_diff_eq!(close.distance_pc().unwrap(), 1.0, epsilon = 1e-12);
    }

    #[rstest]
    #[case(0.0)]
    #[case(-2.5)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn test_bad_parallax_rejected(#[case] parallax: f64) {
        let star = StarRecord::new("bad", 10.0, 20.0, parallax, 3.0);
        assert!(matches!(star.distance_pc(), Err(ExoskyError::Division { .. })));
        assert!(star.position().is_err());
    }

    #[test]
    fn test_read_gaia_csv() {
        let data = "\
source_id,ra,dec,parallax,phot_g_mean_mag
4472832130942575872,269.45,4.69,546.98,8.19
5853498713190525696,219.9,-60.8,,-0.01
2095947430657671296,279.2,38.78,130.23,
not_a_row,abc,1.0,1.0,1.0
6752096595359340032,101.2874,-16.7161,379.21,-1.46
";
        let stars: Vec<StarRecord> = read_gaia_csv(data.as_bytes()).collect();
        assert_eq!(stars.len(), 2);
        assert_eq!(stars[0].id, "4472832130942575872");
        assert_eq!(stars[1].id, "6752096595359340032");
        assert_abs_diff_eq!(stars[1].magnitude, -1.46, epsilon = 1e-12);
    }
}
