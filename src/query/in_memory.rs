//! Offline star source backed by a loaded star list

use std::path::Path;
use std::sync::Arc;

use super::synthetic::generate_bright_stars;
use super::{ConeQuery, StarQuery, StarStream};
use crate::catalogs::{open_table, read_gaia_csv, StarRecord};
use crate::Result;

/// Star source that answers queries from memory
///
/// Filters are applied per query exactly as the Gaia archive would apply
/// them, so it stands in for the live service in tests and offline runs.
#[derive(Debug, Clone)]
pub struct InMemoryStarSource {
    stars: Arc<Vec<StarRecord>>,
}

impl InMemoryStarSource {
    pub fn from_stars(stars: Vec<StarRecord>) -> Self {
        Self {
            stars: Arc::new(stars),
        }
    }

    /// Load a Gaia-style CSV export (plain or gzipped)
    ///
    /// Needs the columns `source_id, ra, dec, parallax, phot_g_mean_mag`.
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let stars: Vec<StarRecord> = read_gaia_csv(open_table(&path)?).collect();
        log::info!(
            "Loaded {} stars from {}",
            stars.len(),
            path.as_ref().display()
        );
        Ok(Self::from_stars(stars))
    }

    /// Reproducible pseudo-random bright-star field
    pub fn synthetic(seed: u64, count: usize) -> Self {
        log::info!("Using synthetic stars ({}), seed {}", count, seed);
        Self::from_stars(generate_bright_stars(seed, count))
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }
}

impl StarQuery for InMemoryStarSource {
    fn query(&self, query: &ConeQuery) -> Result<StarStream> {
        let stars = Arc::clone(&self.stars);
        let query = query.clone();
        let limit = query.limit;

        Ok(Box::new(
            (0..stars.len())
                .filter_map(move |i| {
                    let star = &stars[i];
                    query.admits(star).then(|| star.clone())
                })
                .take(limit),
        ))
    }
}
