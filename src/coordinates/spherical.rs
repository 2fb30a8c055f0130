//! Spherical equatorial coordinates in degrees

use serde::{Deserialize, Serialize};

use super::cartesian::Cartesian3;

/// Position on (or off) the celestial sphere
///
/// `ra` in [0, 360) degrees, `dec` in [-90, 90] degrees, `distance` in
/// parsecs. A pure value type; directions use `distance = 1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SphericalCoord {
    /// Right ascension in degrees
    pub ra: f64,
    /// Declination in degrees
    pub dec: f64,
    /// Distance from the origin in parsecs
    pub distance: f64,
}

impl SphericalCoord {
    pub fn new(ra: f64, dec: f64, distance: f64) -> Self {
        Self { ra, dec, distance }
    }

    /// Unit-distance direction toward (ra, dec)
    pub fn direction(ra: f64, dec: f64) -> Self {
        Self::new(ra, dec, 1.0)
    }

    pub fn to_cartesian(&self) -> Cartesian3 {
        Cartesian3::from_spherical_degrees(self.ra, self.dec, self.distance)
    }

    /// Angular separation from another direction in degrees, ignoring distance
    pub fn angular_separation(&self, other: &SphericalCoord) -> f64 {
        let a = Cartesian3::from_spherical_degrees(self.ra, self.dec, 1.0);
        let b = Cartesian3::from_spherical_degrees(other.ra, other.dec, 1.0);
        a.dot(&b).clamp(-1.0, 1.0).acos().to_degrees()
    }
}

/// Wrap a right ascension into [0, 360)
pub fn normalize_ra(ra_deg: f64) -> f64 {
    let wrapped = ra_deg.rem_euclid(360.0);
    // rem_euclid of a tiny negative rounds up to exactly 360.0
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}
