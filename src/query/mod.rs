//! Star queries
//!
//! A [`StarQuery`] answers a [`ConeQuery`] with a finite, lazily produced
//! sequence of bright stars. The live implementation talks to the Gaia
//! archive; the in-memory one serves CSV exports or synthetic fields.

use serde::{Deserialize, Serialize};

use crate::catalogs::StarRecord;
use crate::coordinates::SphericalCoord;

pub mod gaia_tap;
pub mod in_memory;
pub mod synthetic;

pub use gaia_tap::{GaiaTapClient, GAIA_TAP_URL};
pub use in_memory::InMemoryStarSource;
pub use synthetic::generate_bright_stars;

/// Default cap on stars returned per query
pub const DEFAULT_STAR_LIMIT: usize = 1000;
/// Default faint limit (naked-eye visibility)
pub const DEFAULT_MAX_MAGNITUDE: f64 = 6.0;

/// Lazy, finite sequence of stars produced by a query
pub type StarStream = Box<dyn Iterator<Item = StarRecord> + Send>;

/// Parameters for a bright-star query around a sky position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConeQuery {
    /// Cone center right ascension, in degrees
    pub ra_deg: f64,
    /// Cone center declination, in degrees
    pub dec_deg: f64,
    /// Search radius in degrees; `None` searches the whole sky
    pub radius_deg: Option<f64>,
    /// Only stars strictly brighter than this magnitude
    pub max_magnitude: f64,
    /// Return at most this many stars
    pub limit: usize,
}

impl ConeQuery {
    /// Whole-sky query with default limits, centered on `(ra_deg, dec_deg)`
    pub fn around(ra_deg: f64, dec_deg: f64) -> Self {
        Self {
            ra_deg,
            dec_deg,
            radius_deg: None,
            max_magnitude: DEFAULT_MAX_MAGNITUDE,
            limit: DEFAULT_STAR_LIMIT,
        }
    }

    pub fn with_radius(mut self, radius_deg: Option<f64>) -> Self {
        self.radius_deg = radius_deg;
        self
    }

    pub fn with_max_magnitude(mut self, max_magnitude: f64) -> Self {
        self.max_magnitude = max_magnitude;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Whether a star passes the positive-parallax, magnitude and cone filters
    pub fn admits(&self, star: &StarRecord) -> bool {
        if !(star.parallax > 0.0 && star.magnitude < self.max_magnitude) {
            return false;
        }
        match self.radius_deg {
            None => true,
            Some(radius) => {
                let center = SphericalCoord::direction(self.ra_deg, self.dec_deg);
                let position = SphericalCoord::direction(star.ra, star.dec);
                center.angular_separation(&position) <= radius
            }
        }
    }
}

/// Source of bright stars for the projection pipeline
///
/// Implementations may block on I/O and are called from a blocking context.
pub trait StarQuery: Send + Sync {
    /// Run one query. Errors are [`crate::ExoskyError::Query`] for remote
    /// failures; the returned stream never yields more than `query.limit`.
    fn query(&self, query: &ConeQuery) -> crate::Result<StarStream>;
}
