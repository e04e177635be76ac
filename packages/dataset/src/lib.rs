#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Loads the dashboard dataset from disk.
//!
//! Five files make up a dataset: the survey site CSV, the municipality
//! boundary `GeoJSON`, commuter rail and rapid transit `GeoJSON`, and the
//! jobs-accessibility `TopoJSON`. Each is parsed into the plain types of
//! [`parking_map_dataset_models`] and the result is immutable.

pub mod boundaries;
pub mod config;
pub mod registry;
pub mod sites;
pub mod topojson;
pub mod transit;

use std::path::Path;

use parking_map_dataset_models::{Dataset, TransitKind};
use thiserror::Error;

pub use config::DatasetConfig;
pub use registry::{is_surveyed, surveyed_municipalities};

/// Errors that can occur while loading a dataset.
#[derive(Debug, Error)]
pub enum LoadError {
    /// A data file could not be read.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path that could not be read.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// CSV parsing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON parsing failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// `GeoJSON` parsing or geometry conversion failed.
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// TOML parsing failed.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// The `TopoJSON` topology has no object with the configured name.
    #[error("TopoJSON object '{name}' not found")]
    MissingObject {
        /// Object name that was looked up.
        name: String,
    },

    /// The data is well-formed but inconsistent.
    #[error("Data error: {message}")]
    Data {
        /// Description of what went wrong.
        message: String,
    },
}

/// Loads every collection named by `config`.
///
/// # Errors
///
/// Returns [`LoadError`] if any file cannot be read or parsed. Individual
/// malformed rows and features are skipped rather than failing the load.
pub fn load_dataset(config: &DatasetConfig) -> Result<Dataset, LoadError> {
    log::info!("Loading dataset from {}", config.data_dir.display());

    let sites = sites::parse_sites(read(&config.sites_path())?.as_bytes())?;
    let municipalities = boundaries::parse_boundaries(&read(&config.municipalities_path())?)?;
    let commuter_rail = transit::parse_transit_lines(
        &read(&config.commuter_rail_path())?,
        TransitKind::CommuterRail,
    )?;
    let rapid_transit = transit::parse_transit_lines(
        &read(&config.rapid_transit_path())?,
        TransitKind::RapidTransit,
    )?;
    let job_regions =
        topojson::parse_job_regions(&read(&config.jobs_path())?, &config.jobs_object)?;

    log::info!(
        "Loaded {} sites, {} municipalities, {} rail and {} rapid transit lines, {} job regions",
        sites.len(),
        municipalities.len(),
        commuter_rail.len(),
        rapid_transit.len(),
        job_regions.len(),
    );

    Ok(Dataset {
        sites,
        municipalities,
        commuter_rail,
        rapid_transit,
        job_regions,
    })
}

/// Features of a `GeoJSON` document. A bare geometry has none.
pub(crate) fn parse_features(text: &str) -> Result<Vec<geojson::Feature>, LoadError> {
    Ok(match text.parse::<geojson::GeoJson>()? {
        geojson::GeoJson::FeatureCollection(collection) => collection.features,
        geojson::GeoJson::Feature(feature) => vec![feature],
        geojson::GeoJson::Geometry(_) => {
            log::warn!("GeoJSON document is a bare geometry, expected features");
            Vec::new()
        }
    })
}

fn read(path: &Path) -> Result<String, LoadError> {
    log::debug!("Reading {}", path.display());
    std::fs::read_to_string(path).map_err(|e| LoadError::Io {
        path: path.display().to_string(),
        source: e,
    })
}
