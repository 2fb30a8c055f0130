//! Star-field projection for one exoplanet
//!
//! One query, then per star: parallax distance, recentering on the
//! exoplanet, axial rotation. Stars that cannot be placed are logged and
//! dropped; the rest keep the order the query returned them in.

use nalgebra::Rotation3;
use serde::{Deserialize, Serialize};

use crate::catalogs::{ExoplanetRecord, StarRecord};
use crate::coordinates::SphericalCoord;
use crate::framelib::{rotate_with, translate_to_frame, AxialTilt};
use crate::query::{ConeQuery, StarQuery, DEFAULT_MAX_MAGNITUDE, DEFAULT_STAR_LIMIT};
use crate::Result;

/// A star as it appears in the exoplanet's tilted sky
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RotatedStar {
    pub id: String,
    /// Right ascension after rotation, degrees
    pub ra: f64,
    /// Declination after rotation, degrees
    pub dec: f64,
    pub magnitude: f64,
}

/// Server-wide defaults for cone queries and tilt
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionSettings {
    pub radius_deg: Option<f64>,
    pub max_magnitude: f64,
    pub limit: usize,
    pub tilt: AxialTilt,
}

impl ProjectionSettings {
    /// Cone query centered on an exoplanet's sky position
    pub fn cone_for(&self, exoplanet: &ExoplanetRecord) -> ConeQuery {
        ConeQuery::around(exoplanet.ra(), exoplanet.dec())
            .with_radius(self.radius_deg)
            .with_max_magnitude(self.max_magnitude)
            .with_limit(self.limit)
    }
}

impl Default for ProjectionSettings {
    fn default() -> Self {
        Self {
            radius_deg: None,
            max_magnitude: DEFAULT_MAX_MAGNITUDE,
            limit: DEFAULT_STAR_LIMIT,
            tilt: AxialTilt::default(),
        }
    }
}

/// Place one star in the exoplanet's sky
///
/// # Errors
///
/// - [`crate::ExoskyError::Division`] for a non-positive parallax
/// - [`crate::ExoskyError::DegenerateGeometry`] when the star sits at the
///   exoplanet's position
pub fn project_star(
    star: &StarRecord,
    origin: &SphericalCoord,
    rotation: &Rotation3<f64>,
) -> Result<RotatedStar> {
    let relative = translate_to_frame(&star.position()?, origin)?;
    let (ra, dec) = rotate_with(&relative, rotation)?;

    Ok(RotatedStar {
        id: star.id.clone(),
        ra,
        dec,
        magnitude: star.magnitude,
    })
}

/// Query bright stars and project them into the exoplanet's sky
///
/// Issues exactly one query. Per-star failures are skipped; a failed query
/// fails the whole call.
pub fn project_star_field(
    exoplanet: &ExoplanetRecord,
    stars: &dyn StarQuery,
    cone: &ConeQuery,
    tilt: AxialTilt,
) -> Result<Vec<RotatedStar>> {
    let origin = exoplanet.position();
    let rotation = tilt.matrix();

    let mut projected = Vec::new();
    let mut skipped = 0usize;

    for star in stars.query(cone)? {
        match project_star(&star, &origin, &rotation) {
            Ok(rotated) => projected.push(rotated),
            Err(e) => {
                skipped += 1;
                log::warn!("Skipping star {}: {}", star.id, e);
            }
        }
    }

    log::info!(
        "Projected {} stars for {} ({} skipped)",
        projected.len(),
        exoplanet.name().unwrap_or("exoplanet"),
        skipped
    );
    Ok(projected)
}
