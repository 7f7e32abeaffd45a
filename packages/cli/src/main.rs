#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for air quality health risk reports.

mod render;
mod report;

use std::path::PathBuf;

use air_health_air_models::{ForecastHorizon, RawPollutantRecord, VulnerabilityProfile};
use air_health_risk::{advise, score, validate_record};
use air_health_source::cache::{CachedSource, DEFAULT_TTL};
use air_health_source::csv_file::CsvFileSource;
use air_health_source::registry::{all_cities, enabled_cities};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Serialize;

use crate::render::{OutputFormat, render_assessment, render_cities, render_json, render_summary};
use crate::report::report_profiles;

/// Environment variable overriding the default data directory.
const DATA_DIR_ENV_VAR: &str = "AIR_HEALTH_DATA_DIR";

/// Data directory used when neither `--data-dir` nor the environment sets one.
const DEFAULT_DATA_DIR: &str = "data";

/// Longest forecast the `report` command will produce.
const MAX_REPORT_HORIZON_DAYS: u32 = 366;

#[derive(Parser)]
#[command(name = "air_health", about = "Air quality health risk reports")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all configured cities
    Cities,
    /// Score a single pollutant reading
    Score {
        /// PM2.5 concentration (µg/m³)
        #[arg(long)]
        pm25: f64,
        /// PM10 concentration (µg/m³)
        #[arg(long)]
        pm10: f64,
        /// NO2 concentration (µg/m³)
        #[arg(long)]
        no2: f64,
        /// CO concentration (µg/m³)
        #[arg(long)]
        co: f64,
        /// Day of the reading (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Vulnerability profile: general, sensitive, or `outdoor_exertion`
        #[arg(long, default_value = "general")]
        profile: VulnerabilityProfile,
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },
    /// Summarize risk, advisories, and forecasts per city
    ///
    /// City data is loaded once per run and reused across profiles.
    Report {
        /// Comma-separated list of city IDs (overrides `AIR_HEALTH_CITIES` env var)
        #[arg(long)]
        cities: Option<String>,
        /// Directory holding the per-city CSV files (overrides `AIR_HEALTH_DATA_DIR`)
        #[arg(long)]
        data_dir: Option<PathBuf>,
        /// Comma-separated vulnerability profiles: general, sensitive, or
        /// `outdoor_exertion`
        #[arg(long = "profile", value_delimiter = ',', default_value = "general")]
        profiles: Vec<VulnerabilityProfile>,
        /// Number of days to forecast (at most 366)
        #[arg(long, default_value = "7")]
        horizon: ForecastHorizon,
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ScoreOutput {
    assessment: air_health_air_models::RiskAssessment,
    advisory: air_health_risk::Advisory,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Cities => {
            print!("{}", render_cities(&all_cities()));
        }
        Commands::Score {
            pm25,
            pm10,
            no2,
            co,
            date,
            profile,
            format,
        } => {
            let record = validate_record(&RawPollutantRecord {
                date: date.unwrap_or_else(|| chrono::Local::now().date_naive()),
                pm25: Some(pm25),
                pm10: Some(pm10),
                no2: Some(no2),
                co: Some(co),
                ..RawPollutantRecord::default()
            })?;
            let assessment = score(&record, profile)?;
            let advisory = advise(assessment.category, profile);

            match format {
                OutputFormat::Text => print!("{}", render_assessment(&assessment, &advisory)),
                OutputFormat::Json => println!(
                    "{}",
                    render_json(&ScoreOutput {
                        assessment,
                        advisory
                    })?
                ),
            }
        }
        Commands::Report {
            cities,
            data_dir,
            profiles,
            horizon,
            format,
        } => {
            if horizon.days() > MAX_REPORT_HORIZON_DAYS {
                return Err(format!(
                    "Forecast horizon of {horizon} days exceeds the maximum of {MAX_REPORT_HORIZON_DAYS}"
                )
                .into());
            }

            let data_dir = data_dir
                .or_else(|| std::env::var(DATA_DIR_ENV_VAR).ok().map(PathBuf::from))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
            let source = CachedSource::new(CsvFileSource::new(data_dir), DEFAULT_TTL);
            log::info!("Reading city data from {}", source.inner().data_dir().display());
            let cities = enabled_cities(cities)?;

            let summaries = report_profiles(&source, &cities, &profiles, horizon);
            if summaries.is_empty() {
                return Err("No city could be reported".into());
            }

            match format {
                OutputFormat::Text => {
                    let blocks: Vec<String> = summaries.iter().map(render_summary).collect();
                    print!("{}", blocks.join("\n"));
                }
                OutputFormat::Json => println!("{}", render_json(&summaries)?),
            }
        }
    }

    Ok(())
}
