//! Daily readings from local CSV files.
//!
//! Expected header columns: `date` (`YYYY-MM-DD`), `pm25`, `pm10`, `no2`,
//! `co`, plus optional `temperature`, `wind_speed`, `humidity` and the
//! upstream `risk_level` label. Any other column (such as a precomputed
//! `health_risk_score`) is ignored, and empty cells are read as missing.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use air_health_air_models::RawPollutantRecord;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

use crate::city_def::CityDefinition;
use crate::{RecordSource, SourceError};

/// One CSV row as written by the export scripts.
#[derive(Debug, Deserialize)]
struct CsvRow {
    date: NaiveDate,
    #[serde(deserialize_with = "required_column")]
    pm25: Option<f64>,
    #[serde(deserialize_with = "required_column")]
    pm10: Option<f64>,
    #[serde(deserialize_with = "required_column")]
    no2: Option<f64>,
    #[serde(deserialize_with = "required_column")]
    co: Option<f64>,
    #[serde(default, alias = "temp")]
    temperature: Option<f64>,
    #[serde(default, alias = "wind")]
    wind_speed: Option<f64>,
    #[serde(default)]
    humidity: Option<f64>,
    #[serde(default)]
    risk_level: Option<String>,
}

/// The column must exist in the header, but a cell may be empty.
fn required_column<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Option::<f64>::deserialize(deserializer)
}

impl From<CsvRow> for RawPollutantRecord {
    fn from(row: CsvRow) -> Self {
        Self {
            date: row.date,
            pm25: row.pm25,
            pm10: row.pm10,
            no2: row.no2,
            co: row.co,
            temperature: row.temperature,
            wind_speed: row.wind_speed,
            humidity: row.humidity,
            risk_level: row.risk_level,
        }
    }
}

/// Reads `<data_dir>/<city.data_file>` for each city.
#[derive(Debug, Clone)]
pub struct CsvFileSource {
    data_dir: PathBuf,
}

impl CsvFileSource {
    /// Creates a source reading from `data_dir`.
    #[must_use]
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Returns the directory this source reads from.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Returns the file that holds `city`'s readings.
    #[must_use]
    pub fn path_for(&self, city: &CityDefinition) -> PathBuf {
        self.data_dir.join(&city.data_file)
    }
}

impl RecordSource for CsvFileSource {
    fn id(&self) -> &str {
        "csv_file"
    }

    fn load(&self, city: &CityDefinition) -> Result<Vec<RawPollutantRecord>, SourceError> {
        let path = self.path_for(city);
        log::info!("[{}] Reading {}", city.id, path.display());

        let file = File::open(&path)?;
        let records = parse_records(file)?;

        log::info!("[{}] {} daily record(s)", city.id, records.len());
        Ok(records)
    }
}

/// Parses CSV readings, sorts them by date, and keeps the last row for any
/// repeated date.
///
/// # Errors
///
/// Returns [`SourceError::Csv`] if the header is missing a required column
/// or a cell cannot be parsed.
pub fn parse_records<R: Read>(reader: R) -> Result<Vec<RawPollutantRecord>, SourceError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records: Vec<RawPollutantRecord> = Vec::new();
    for row in csv_reader.deserialize::<CsvRow>() {
        records.push(row?.into());
    }

    // Stable sort keeps file order among equal dates, so the last row wins.
    records.sort_by_key(|r| r.date);

    let mut deduped: Vec<RawPollutantRecord> = Vec::with_capacity(records.len());
    for record in records {
        match deduped.last_mut() {
            Some(previous) if previous.date == record.date => {
                log::warn!("Duplicate reading for {}, keeping the later row", record.date);
                *previous = record;
            }
            _ => deduped.push(record),
        }
    }

    log::debug!("Parsed {} record(s)", deduped.len());

    Ok(deduped)
}
