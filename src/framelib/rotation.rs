//! Axial-tilt rotation of sky directions
//!
//! A direction is turned by `Rz(lambda)` about the polar axis, then by
//! `Rx(epsilon)` about the new x-axis. Distance plays no part: inputs are
//! reduced to unit vectors and only (ra, dec) comes back.

use nalgebra::{Rotation3, Vector3};
use serde::{Deserialize, Serialize};

use crate::coordinates::{Cartesian3, SphericalCoord};
use crate::{ExoskyError, Result};

/// Default orbital longitude of the tilt axis, degrees
pub const DEFAULT_LAMBDA_DEG: f64 = 45.0;
/// Default axial tilt, degrees (Earth's obliquity, rounded)
pub const DEFAULT_EPSILON_DEG: f64 = 23.5;

/// Two-angle orientation applied to the exoplanet's sky
///
/// The true tilt of most exoplanets is unknown. The defaults are
/// placeholders, and callers are expected to supply their own when they
/// have them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxialTilt {
    /// Rotation about the polar axis, degrees
    pub lambda_deg: f64,
    /// Tilt about the x-axis, degrees
    pub epsilon_deg: f64,
}

impl AxialTilt {
    /// Tilt from explicit angles, which must be finite
    pub fn new(lambda_deg: f64, epsilon_deg: f64) -> Result<Self> {
        if !lambda_deg.is_finite() || !epsilon_deg.is_finite() {
            return Err(ExoskyError::Config(format!(
                "tilt angles must be finite (lambda={}, epsilon={})",
                lambda_deg, epsilon_deg
            )));
        }
        Ok(Self {
            lambda_deg,
            epsilon_deg,
        })
    }

    /// Combined rotation `Rx(epsilon) * Rz(lambda)`
    pub fn matrix(&self) -> Rotation3<f64> {
        let rz = Rotation3::from_axis_angle(&Vector3::z_axis(), self.lambda_deg.to_radians());
        let rx = Rotation3::from_axis_angle(&Vector3::x_axis(), self.epsilon_deg.to_radians());
        rx * rz
    }
}

impl Default for AxialTilt {
    fn default() -> Self {
        Self {
            lambda_deg: DEFAULT_LAMBDA_DEG,
            epsilon_deg: DEFAULT_EPSILON_DEG,
        }
    }
}

/// Rotate a direction by `tilt`, returning `(ra, dec)` in degrees
pub fn rotate(position: &SphericalCoord, tilt: &AxialTilt) -> Result<(f64, f64)> {
    rotate_with(position, &tilt.matrix())
}

/// Rotate with a precomputed matrix, for callers rotating many directions
pub fn rotate_with(position: &SphericalCoord, rotation: &Rotation3<f64>) -> Result<(f64, f64)> {
    let unit = SphericalCoord::direction(position.ra, position.dec).to_cartesian();
    let turned = Cartesian3::from_vector3(rotation * unit.to_vector3());
    let rotated = turned.to_spherical_degrees()?;
    Ok((rotated.ra, rotated.dec))
}
