#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Pollutant record sources, city registry, and fetch caching.
//!
//! Each provider implements the [`RecordSource`] trait to load the raw
//! daily readings for one city. Sources own unit normalization, sorting,
//! and deduplication by date; validation of the values themselves happens
//! in the risk engine.

pub mod cache;
pub mod city_def;
pub mod csv_file;
pub mod registry;

use air_health_air_models::RawPollutantRecord;

use crate::city_def::CityDefinition;

/// Errors that can occur during record source operations.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// I/O error (file read).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing failed.
    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    /// City definition TOML parsing failed.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// No city with this id is configured.
    #[error("Unknown city: {id}")]
    UnknownCity {
        /// The id that was looked up.
        id: String,
    },
}

/// Trait that all pollutant record sources must implement.
pub trait RecordSource: Send + Sync {
    /// Returns a unique identifier for this source (e.g., `"csv_file"`).
    fn id(&self) -> &str;

    /// Loads the daily readings for `city`, sorted by ascending date with
    /// at most one record per date.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the data cannot be read or parsed.
    fn load(&self, city: &CityDefinition) -> Result<Vec<RawPollutantRecord>, SourceError>;
}
