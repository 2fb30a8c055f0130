//! Recentering positions from Earth onto another origin

use crate::coordinates::SphericalCoord;
use crate::Result;

/// Position of `target` as seen from `origin`
///
/// Both inputs are Earth-centered spherical coordinates with their own
/// distances. They are projected to Cartesian, subtracted
/// (`target - origin`), and converted back.
///
/// # Errors
///
/// [`crate::ExoskyError::DegenerateGeometry`] when the two positions coincide.
pub fn translate_to_frame(target: &SphericalCoord, origin: &SphericalCoord) -> Result<SphericalCoord> {
    let relative = target.to_cartesian() - origin.to_cartesian();
    relative.to_spherical_degrees()
}
