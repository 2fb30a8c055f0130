//! Exosky: the night sky as seen from an exoplanet
//!
//! This crate re-projects bright stars from Earth's point of view into a frame
//! centered on a chosen exoplanet, applies an axial-tilt rotation, and serves
//! the result over a small HTTP API.
//!
//! The geometry lives in [`coordinates`] and [`framelib`], the exoplanet table
//! in [`catalogs`], star sources behind the [`query::StarQuery`] trait, and the
//! per-request work in [`pipeline`].

use thiserror::Error;

pub mod catalogs;
pub mod config;
pub mod coordinates;
pub mod framelib;
pub mod pipeline;
pub mod query;
pub mod server;

// Re-export commonly used types
pub use catalogs::{ExoplanetCatalog, ExoplanetRecord, StarRecord};
pub use coordinates::{Cartesian3, SphericalCoord};
pub use framelib::AxialTilt;
pub use pipeline::{project_star_field, ProjectionSettings, RotatedStar};
pub use query::{ConeQuery, StarQuery};

/// Main error type for the exosky library
#[derive(Debug, Error)]
pub enum ExoskyError {
    /// Malformed sexagesimal string or catalog value
    #[error("Format error: {0}")]
    Format(String),

    /// A required catalog column is absent
    #[error("Schema error: missing required column '{column}'")]
    Schema { column: String },

    /// Cartesian to spherical conversion of a zero-length or non-finite vector
    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),

    /// Star distance requested from a non-positive parallax
    #[error("Division error: parallax {parallax} mas does not yield a distance")]
    Division { parallax: f64 },

    /// Star catalog service failed or timed out
    #[error("Query error: {0}")]
    Query(String),

    /// Exoplanet index outside the loaded table
    #[error("Range error: exoplanet index {index} is outside the catalog (0..{len})")]
    Range { index: i64, len: usize },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type for exosky operations
pub type Result<T> = std::result::Result<T, ExoskyError>;
