//! # Cartesian Coordinate System Module
//!
//! This module provides the 3D Cartesian representation used as the
//! intermediate format for every frame change in the crate.
//!
//! ## Coordinate System Convention
//!
//! Equatorial axes, right-handed:
//! - **X-axis**: Points toward RA = 0°, Dec = 0°
//! - **Y-axis**: Points toward RA = 90°, Dec = 0°
//! - **Z-axis**: Points toward the north celestial pole (Dec = +90°)
//!
//! Components are in parsecs. Absolute points have Earth at the origin;
//! relative points have the exoplanet at the origin.
//!
//! ## Degenerate Vectors
//!
//! A zero-length vector has no direction, so converting it back to spherical
//! coordinates fails with [`ExoskyError::DegenerateGeometry`] instead of
//! producing NaN. The same applies to vectors with non-finite components.
//!
//! ## Examples
//!
//! ```rust
//! use exosky::coordinates::cartesian::{to_cartesian, to_spherical};
//!
//! let point = to_cartesian(90.0, 0.0, 2.0);
//! assert!(point.x.abs() < 1e-12);
//! assert!((point.y - 2.0).abs() < 1e-12);
//!
//! let back = to_spherical(point.x, point.y, point.z).unwrap();
//! assert!((back.ra - 90.0).abs() < 1e-9);
//! assert!((back.distance - 2.0).abs() < 1e-12);
//! ```

use nalgebra::Vector3;

use super::spherical::{normalize_ra, SphericalCoord};
use crate::{ExoskyError, Result};

/// Three-dimensional Cartesian coordinate in parsecs
///
/// Represents either a position (with distance) or a direction (unit
/// length). Interpretation depends on context.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cartesian3 {
    /// X-component (toward RA = 0°)
    pub x: f64,
    /// Y-component (toward RA = 90°)
    pub y: f64,
    /// Z-component (toward north celestial pole)
    pub z: f64,
}

impl Cartesian3 {
    /// Creates a new Cartesian coordinate
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Cartesian3 { x, y, z }
    }

    /// Creates a Cartesian coordinate from spherical coordinates in degrees
    ///
    /// # Mathematical Conversion
    ///
    /// - `x = distance * cos(dec) * cos(ra)`
    /// - `y = distance * cos(dec) * sin(ra)`
    /// - `z = distance * sin(dec)`
    pub fn from_spherical_degrees(ra_deg: f64, dec_deg: f64, distance: f64) -> Self {
        let ra = ra_deg.to_radians();
        let dec = dec_deg.to_radians();
        let cos_dec = dec.cos();
        Cartesian3 {
            x: distance * cos_dec * ra.cos(),
            y: distance * cos_dec * ra.sin(),
            z: distance * dec.sin(),
        }
    }

    /// Converts to spherical coordinates in degrees
    ///
    /// Right ascension is normalized to [0, 360), declination lies in
    /// [-90, 90].
    ///
    /// # Errors
    ///
    /// [`ExoskyError::DegenerateGeometry`] when the vector has zero length or
    /// any non-finite component.
    pub fn to_spherical_degrees(&self) -> Result<SphericalCoord> {
        if !(self.x.is_finite() && self.y.is_finite() && self.z.is_finite()) {
            return Err(ExoskyError::DegenerateGeometry(format!(
                "non-finite vector ({}, {}, {})",
                self.x, self.y, self.z
            )));
        }

        let distance = self.magnitude();
        if distance == 0.0 {
            return Err(ExoskyError::DegenerateGeometry(
                "zero-length vector has no direction".to_string(),
            ));
        }

        // Rounding can push |z/d| a hair past 1 at the poles
        let dec = (self.z / distance).clamp(-1.0, 1.0).asin().to_degrees();
        let ra = normalize_ra(self.y.atan2(self.x).to_degrees());

        Ok(SphericalCoord { ra, dec, distance })
    }

    /// Euclidean length `sqrt(x² + y² + z²)`
    pub fn magnitude(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Dot product `x₁*x₂ + y₁*y₂ + z₁*z₂`
    pub fn dot(&self, other: &Cartesian3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Converts to nalgebra Vector3 for linear algebra operations
    pub fn to_vector3(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }

    /// Creates from nalgebra Vector3
    pub fn from_vector3(vec: Vector3<f64>) -> Self {
        Cartesian3 {
            x: vec.x,
            y: vec.y,
            z: vec.z,
        }
    }
}

/// Spherical (degrees, parsecs) to Cartesian
///
/// Free-function form of [`Cartesian3::from_spherical_degrees`].
pub fn to_cartesian(ra_deg: f64, dec_deg: f64, distance: f64) -> Cartesian3 {
    Cartesian3::from_spherical_degrees(ra_deg, dec_deg, distance)
}

/// Cartesian to spherical (degrees, parsecs)
///
/// Free-function form of [`Cartesian3::to_spherical_degrees`].
pub fn to_spherical(x: f64, y: f64, z: f64) -> Result<SphericalCoord> {
    Cartesian3::new(x, y, z).to_spherical_degrees()
}

impl std::ops::Sub for Cartesian3 {
    type Output = Cartesian3;

    fn sub(self, other: Cartesian3) -> Cartesian3 {
        Cartesian3 {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rstest::rstest;

    #[test]
    fn test_axis_directions() {
        let vernal_equinox = to_cartesian(0.0, 0.0, 1.0);
        assert_abs_diff_eq!(vernal_equinox.x, 1.0, epsilon = 1e-15);
        assert_abs_diff_eq!(vernal_equinox.y, 0.0, epsilon = 1e-15);
        assert_abs_diff_eq!(vernal_equinox.z, 0.0, epsilon = 1e-15);

        let north_pole = to_cartesian(0.0, 90.0, 3.0);
        assert_abs_diff_eq!(north_pole.x, 0.0, epsilon = 1e-15);
        assert_abs_diff_eq!(north_pole.z, 3.0, epsilon = 1e-15);

        let ra_90 = to_cartesian(90.0, 0.0, 1.0);
        assert_abs_diff_eq!(ra_90.x, 0.0, epsilon = 1e-15);
        assert_abs_diff_eq!(ra_90.y, 1.0, epsilon = 1e-15);
    }

    #[test]
    fn test_negative_y_wraps_into_range() {
        let coord = to_spherical(0.0, -1.0, 0.0).unwrap();
        assert_abs_diff_eq!(coord.ra, 270.0, epsilon = 1e-12);
        assert_abs_diff_eq!(coord.dec, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_south_pole() {
        let coord = to_spherical(0.0, 0.0, -5.0).unwrap();
        assert_abs_diff_eq!(coord.dec, -90.0, epsilon = 1e-12);
        assert_abs_diff_eq!(coord.distance, 5.0, epsilon = 1e-12);
        assert!(coord.ra >= 0.0 && coord.ra < 360.0);
    }

    #[rstest]
    #[case(0.0, 0.0, 1.0)]
    #[case(45.0, 30.0, 10.0)]
    #[case(123.4, -67.8, 250.0)]
    #[case(187.5, 89.0, 0.5)]
    #[case(359.9, -89.5, 4000.0)]
    #[case(270.0, 0.0, 1e-6)]
    fn test_round_trip(#[case] ra: f64, #[case] dec: f64, #[case] distance: f64) {
        let point = to_cartesian(ra, dec, distance);
        let back = to_spherical(point.x, point.y, point.z).unwrap();

        assert_abs_diff_eq!(back.ra, ra, epsilon = 1e-9);
        assert_abs_diff_eq!(back.dec, dec, epsilon = 1e-9);
        assert_abs_diff_eq!(back.distance, distance, epsilon = distance * 1e-12);
    }

    #[test]
    fn test_zero_vector_is_degenerate() {
        let result = to_spherical(0.0, 0.0, 0.0);
        assert!(matches!(result, Err(ExoskyError::DegenerateGeometry(_))));
    }

    #[test]
    fn test_non_finite_vector_is_degenerate() {
        let result = to_spherical(f64::NAN, 1.0, 0.0);
        assert!(matches!(result, Err(ExoskyError::DegenerateGeometry(_))));

        let result = to_spherical(f64::INFINITY, 0.0, 0.0);
        assert!(matches!(result, Err(ExoskyError::DegenerateGeometry(_))));
    }

    #[test]
    fn test_magnitude_and_dot() {
        let coord = Cartesian3::new(3.0, 4.0, 0.0);
        assert_abs_diff_eq!(coord.magnitude(), 5.0, epsilon = 1e-15);
        assert_abs_diff_eq!(coord.dot(&Cartesian3::new(1.0, 0.0, 0.0)), 3.0, epsilon = 1e-15);
    }

    #[test]
    fn test_subtraction() {
        let a = Cartesian3::new(1.0, 2.0, 3.0);
        let b = Cartesian3::new(4.0, 5.0, 6.0);
        assert_eq!(b - a, Cartesian3::new(3.0, 3.0, 3.0));
    }

    #[test]
    fn test_vector3_conversions() {
        let coord = Cartesian3::new(1.0, 2.0, 3.0);
        let vec = coord.to_vector3();
        assert_eq!(vec.x, 1.0);
        assert_eq!(vec.z, 3.0);
        assert_eq!(Cartesian3::from_vector3(vec), coord);
    }
}
