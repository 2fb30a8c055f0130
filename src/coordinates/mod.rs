//! Coordinate representations and conversions
//!
//! Sexagesimal text decodes to degrees, degrees project to Cartesian
//! parsecs, and Cartesian vectors convert back to spherical coordinates.

pub mod cartesian;
pub mod sexagesimal;
pub mod spherical;

pub use cartesian::{to_cartesian, to_spherical, Cartesian3};
pub use sexagesimal::{parse_dec, parse_ra, parse_sexagesimal, AngleKind};
pub use spherical::{normalize_ra, SphericalCoord};
