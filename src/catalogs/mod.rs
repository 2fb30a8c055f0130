//! Catalogs module
//!
//! This module provides the exoplanet table the service is built around and
//! the star records that star queries return.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

pub mod exoplanet;
pub mod gaia;

pub use exoplanet::{ExoplanetCatalog, ExoplanetRecord};
pub use gaia::{read_gaia_csv, GaiaRow, StarRecord, GAIA_COLUMNS};

use crate::{ExoskyError, Result};

/// Open a tabular data file, transparently decompressing `.gz`
pub(crate) fn open_table<P: AsRef<Path>>(path: P) -> Result<Box<dyn Read + Send>> {
    let file = File::open(&path)?;

    // Check if the file is empty
    if file.metadata()?.len() == 0 {
        return Err(ExoskyError::Format(format!(
            "data file {} is empty",
            path.as_ref().display()
        )));
    }

    let is_gzipped = path
        .as_ref()
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"));

    if is_gzipped {
        log::debug!("Reading gzipped file: {}", path.as_ref().display());
        Ok(Box::new(flate2::read::GzDecoder::new(BufReader::new(file))))
    } else {
        log::debug!("Reading CSV file: {}", path.as_ref().display());
        Ok(Box::new(BufReader::new(file)))
    }
}
