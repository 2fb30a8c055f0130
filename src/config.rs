//! Server configuration
//!
//! Every setting is a command-line flag with an `EXOSKY_*` environment
//! fallback, parsed once at startup.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::framelib::{AxialTilt, DEFAULT_EPSILON_DEG, DEFAULT_LAMBDA_DEG};
use crate::pipeline::ProjectionSettings;
use crate::query::{
    GaiaTapClient, InMemoryStarSource, StarQuery, DEFAULT_MAX_MAGNITUDE, DEFAULT_STAR_LIMIT,
    GAIA_TAP_URL,
};
use crate::{ExoskyError, Result};

/// Where bright stars come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StarSourceKind {
    /// Live Gaia archive TAP service
    Gaia,
    /// Local Gaia-style CSV export
    Csv,
    /// Seeded random field, no network
    Synthetic,
}

/// Exosky HTTP server
#[derive(Parser, Debug, Clone)]
#[command(
    name = "exosky",
    version,
    about = "Serves bright-star skies as seen from exoplanets",
    long_about = None
)]
pub struct ServerConfig {
    /// Address to listen on
    #[arg(long, env = "EXOSKY_BIND", default_value = "127.0.0.1:5000")]
    pub bind: SocketAddr,

    /// Exoplanet catalog CSV (may be gzipped)
    #[arg(long, env = "EXOSKY_CATALOG", default_value = "exoplanet_data.csv")]
    pub catalog: PathBuf,

    /// Star source
    #[arg(long, env = "EXOSKY_STAR_SOURCE", value_enum, default_value_t = StarSourceKind::Gaia)]
    pub star_source: StarSourceKind,

    /// Gaia-style star CSV, required with `--star-source csv`
    #[arg(long, env = "EXOSKY_STARS_CSV")]
    pub stars_csv: Option<PathBuf>,

    /// Seed for the synthetic star field
    #[arg(long, env = "EXOSKY_SYNTHETIC_SEED", default_value_t = 42)]
    pub synthetic_seed: u64,

    /// Number of synthetic stars
    #[arg(long, env = "EXOSKY_SYNTHETIC_COUNT", default_value_t = 5000)]
    pub synthetic_count: usize,

    /// Gaia TAP service root
    #[arg(long, env = "EXOSKY_TAP_URL", default_value = GAIA_TAP_URL)]
    pub tap_url: String,

    /// Per-request timeout for the star service, seconds
    #[arg(long = "query-timeout", env = "EXOSKY_QUERY_TIMEOUT", default_value_t = 30)]
    pub query_timeout_secs: u64,

    /// Extra attempts after a failed star query
    #[arg(long, env = "EXOSKY_QUERY_RETRIES", default_value_t = 2)]
    pub query_retries: u32,

    /// Most stars returned per request
    #[arg(long, env = "EXOSKY_MAX_STARS", default_value_t = DEFAULT_STAR_LIMIT)]
    pub max_stars: usize,

    /// Faintest magnitude returned (exclusive)
    #[arg(long, env = "EXOSKY_MAGNITUDE_LIMIT", default_value_t = DEFAULT_MAX_MAGNITUDE)]
    pub magnitude_limit: f64,

    /// Cone radius around the exoplanet, degrees; whole sky if unset
    #[arg(long, env = "EXOSKY_SEARCH_RADIUS")]
    pub search_radius: Option<f64>,

    /// Default rotation about z, degrees
    #[arg(long, env = "EXOSKY_LAMBDA", default_value_t = DEFAULT_LAMBDA_DEG, allow_hyphen_values = true)]
    pub lambda: f64,

    /// Default axial tilt about x, degrees
    #[arg(long, env = "EXOSKY_EPSILON", default_value_t = DEFAULT_EPSILON_DEG, allow_hyphen_values = true)]
    pub epsilon: f64,
}

impl ServerConfig {
    /// Validated query and tilt defaults
    pub fn projection_settings(&self) -> Result<ProjectionSettings> {
        if !self.magnitude_limit.is_finite() {
            return Err(ExoskyError::Config(format!(
                "magnitude limit must be finite, got {}",
                self.magnitude_limit
            )));
        }
        if let Some(radius) = self.search_radius {
            if !(radius.is_finite() && radius > 0.0 && radius <= 180.0) {
                return Err(ExoskyError::Config(format!(
                    "search radius must be in (0, 180] degrees, got {}",
                    radius
                )));
            }
        }
        if self.max_stars == 0 {
            return Err(ExoskyError::Config(
                "max stars must be at least 1".to_string(),
            ));
        }

        Ok(ProjectionSettings {
            radius_deg: self.search_radius,
            max_magnitude: self.magnitude_limit,
            limit: self.max_stars,
            tilt: AxialTilt::new(self.lambda, self.epsilon)?,
        })
    }

    /// Build the configured star source
    ///
    /// The Gaia client holds a blocking HTTP client, so call this outside any
    /// async runtime.
    pub fn build_star_source(&self) -> Result<Arc<dyn StarQuery>> {
        match self.star_source {
            StarSourceKind::Gaia => {
                if self.query_timeout_secs == 0 {
                    return Err(ExoskyError::Config(
                        "query timeout must be at least 1 second".to_string(),
                    ));
                }
                log::info!("Querying Gaia TAP at {}", self.tap_url);
                let client = GaiaTapClient::new(
                    self.tap_url.clone(),
                    Duration::from_secs(self.query_timeout_secs),
                    self.query_retries,
                )?;
                Ok(Arc::new(client))
            }
            StarSourceKind::Csv => {
                let path = self.stars_csv.as_ref().ok_or_else(|| {
                    ExoskyError::Config("--stars-csv is required with --star-source csv".to_string())
                })?;
                Ok(Arc::new(InMemoryStarSource::from_csv_path(path)?))
            }
            StarSourceKind::Synthetic => Ok(Arc::new(InMemoryStarSource::synthetic(
                self.synthetic_seed,
                self.synthetic_count,
            ))),
        }
    }
}
