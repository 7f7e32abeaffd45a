#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Pollutant record, vulnerability profile, and risk category types.
//!
//! This crate defines the shared data model for the air-health toolchain.
//! Record sources produce [`RawPollutantRecord`]s, the risk engine turns
//! them into [`PollutantRecord`]s and [`RiskAssessment`]s, and the
//! forecaster emits [`ForecastPoint`]s. Nothing in here performs I/O.

use std::num::NonZeroU32;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Population group whose sensitivity scales the risk score.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum VulnerabilityProfile {
    /// Healthy adults with no particular exposure
    #[default]
    General,
    /// Children, elderly, and people with respiratory or cardiac conditions
    Sensitive,
    /// People doing sustained outdoor exercise or work
    OutdoorExertion,
}

impl VulnerabilityProfile {
    /// Returns the score multiplier for this profile.
    #[must_use]
    pub const fn multiplier(self) -> f64 {
        match self {
            Self::General => 1.0,
            Self::Sensitive => 1.2,
            Self::OutdoorExertion => 1.5,
        }
    }

    /// Whether advisories for this profile should use the vulnerable
    /// wording (any profile whose multiplier exceeds 1.0).
    #[must_use]
    pub fn is_vulnerable(self) -> bool {
        self.multiplier() > 1.0
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::General, Self::Sensitive, Self::OutdoorExertion]
    }
}

/// Display color associated one-to-one with a [`RiskCategory`].
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ColorHint {
    Green,
    Yellow,
    Orange,
    Red,
    Purple,
}

/// Health risk category, ordered from least to most severe.
///
/// The score axis is partitioned with upper-inclusive boundaries:
/// `[0, 50]`, `(50, 100]`, `(100, 150]`, `(150, 200]`, `(200, inf)`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(ascii_case_insensitive)]
pub enum RiskCategory {
    /// Score in `[0, 50]`
    #[strum(serialize = "Low")]
    Low,
    /// Score in `(50, 100]`
    #[strum(serialize = "Moderate")]
    Moderate,
    /// Score in `(100, 150]`
    #[strum(serialize = "Unhealthy for Sensitive")]
    UnhealthyForSensitive,
    /// Score in `(150, 200]`
    #[strum(serialize = "Unhealthy")]
    Unhealthy,
    /// Score above 200
    #[strum(serialize = "Very Unhealthy")]
    VeryUnhealthy,
}

impl RiskCategory {
    /// Inclusive upper score bound of this tier, or `None` for the
    /// unbounded top tier.
    #[must_use]
    pub const fn upper_bound(self) -> Option<f64> {
        match self {
            Self::Low => Some(50.0),
            Self::Moderate => Some(100.0),
            Self::UnhealthyForSensitive => Some(150.0),
            Self::Unhealthy => Some(200.0),
            Self::VeryUnhealthy => None,
        }
    }

    /// Returns the display color for this category.
    #[must_use]
    pub const fn color_hint(self) -> ColorHint {
        match self {
            Self::Low => ColorHint::Green,
            Self::Moderate => ColorHint::Yellow,
            Self::UnhealthyForSensitive => ColorHint::Orange,
            Self::Unhealthy => ColorHint::Red,
            Self::VeryUnhealthy => ColorHint::Purple,
        }
    }

    /// Collapses this category into the three-tier display band.
    #[must_use]
    pub const fn band(self) -> RiskBand {
        match self {
            Self::Low => RiskBand::Low,
            Self::Moderate => RiskBand::Moderate,
            Self::UnhealthyForSensitive | Self::Unhealthy | Self::VeryUnhealthy => RiskBand::High,
        }
    }

    /// Returns all variants of this enum, least severe first.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Low,
            Self::Moderate,
            Self::UnhealthyForSensitive,
            Self::Unhealthy,
            Self::VeryUnhealthy,
        ]
    }
}

/// Coarse three-tier display band derived from a [`RiskCategory`].
///
/// Only used for presentation and advisories; it is never computed from a
/// separate formula.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(ascii_case_insensitive)]
pub enum RiskBand {
    Low,
    Moderate,
    High,
}

/// A pollutant reading as delivered by a record source, before validation.
///
/// Every pollutant field is optional here; normalization rejects records
/// with a missing pollutant rather than substituting zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPollutantRecord {
    /// Day this reading covers.
    pub date: NaiveDate,
    /// Fine particulate matter (µg/m³).
    pub pm25: Option<f64>,
    /// Coarse particulate matter (µg/m³).
    pub pm10: Option<f64>,
    /// Nitrogen dioxide (µg/m³).
    pub no2: Option<f64>,
    /// Carbon monoxide (µg/m³).
    pub co: Option<f64>,
    /// Air temperature (°C).
    pub temperature: Option<f64>,
    /// Wind speed (km/h).
    pub wind_speed: Option<f64>,
    /// Relative humidity (%).
    pub humidity: Option<f64>,
    /// Risk category label stored alongside the reading upstream, if any.
    pub risk_level: Option<String>,
}

/// A validated daily pollutant reading for one city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollutantRecord {
    /// Day this reading covers. Unique per city within a series.
    pub date: NaiveDate,
    /// Fine particulate matter (µg/m³).
    pub pm25: f64,
    /// Coarse particulate matter (µg/m³).
    pub pm10: f64,
    /// Nitrogen dioxide (µg/m³).
    pub no2: f64,
    /// Carbon monoxide (µg/m³).
    pub co: f64,
    /// Air temperature (°C).
    pub temperature: Option<f64>,
    /// Wind speed (km/h).
    pub wind_speed: Option<f64>,
    /// Relative humidity (%).
    pub humidity: Option<f64>,
}

impl PollutantRecord {
    /// Creates a record with the four required pollutants and no weather
    /// data.
    #[must_use]
    pub const fn new(date: NaiveDate, pm25: f64, pm10: f64, no2: f64, co: f64) -> Self {
        Self {
            date,
            pm25,
            pm10,
            no2,
            co,
            temperature: None,
            wind_speed: None,
            humidity: None,
        }
    }
}

/// Risk score and category derived from one [`PollutantRecord`] and one
/// [`VulnerabilityProfile`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    /// Day of the underlying record.
    pub date: NaiveDate,
    /// Non-negative score rounded to one decimal place.
    pub score: f64,
    /// Category the score falls into.
    pub category: RiskCategory,
    /// Display color for `category`.
    pub color_hint: ColorHint,
}

impl RiskAssessment {
    /// Returns the `(date, score)` pair used as forecaster input.
    #[must_use]
    pub const fn score_point(&self) -> ScorePoint {
        ScorePoint {
            date: self.date,
            score: self.score,
        }
    }
}

/// A dated score, the unit of history fed to the forecaster.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScorePoint {
    pub date: NaiveDate,
    pub score: f64,
}

/// One extrapolated day of a forecast.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPoint {
    /// Forecast day, strictly after the last observed day.
    pub date: NaiveDate,
    /// Raw extrapolated score. May be negative; never clamped here.
    pub predicted_score: f64,
}

impl ForecastPoint {
    /// Returns the prediction clamped to the valid score range for display.
    #[must_use]
    pub fn display_score(&self) -> f64 {
        self.predicted_score.max(0.0)
    }
}

/// Whether a forecast could be produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum ForecastStatus {
    /// The forecast holds exactly `horizon` points.
    Available,
    /// Too little history to fit a trend; the forecast is empty.
    #[serde(rename_all = "camelCase")]
    InsufficientHistory {
        /// Number of history points supplied.
        available: usize,
        /// Minimum number of points required.
        required: usize,
    },
    /// The horizon would run past the last representable calendar date;
    /// the forecast is empty.
    #[serde(rename_all = "camelCase")]
    OutOfDateRange {
        /// Last observed day.
        last_date: NaiveDate,
        /// Requested number of days.
        horizon: u32,
    },
}

/// Forecaster output: a status flag plus the extrapolated points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Forecast {
    #[serde(flatten)]
    pub status: ForecastStatus,
    pub points: Vec<ForecastPoint>,
}

impl Forecast {
    /// Returns `true` if a forecast was produced.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        matches!(self.status, ForecastStatus::Available)
    }
}

/// Number of days to extrapolate. Always at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct ForecastHorizon(NonZeroU32);

impl ForecastHorizon {
    /// Default horizon of one week.
    pub const DEFAULT_DAYS: u32 = 7;

    /// Creates a horizon from a day count.
    ///
    /// # Errors
    ///
    /// Returns an error if `days` is zero.
    pub fn new(days: u32) -> Result<Self, InvalidHorizonError> {
        NonZeroU32::new(days)
            .map(Self)
            .ok_or_else(|| InvalidHorizonError {
                value: days.to_string(),
            })
    }

    /// Returns the number of days in this horizon.
    #[must_use]
    pub const fn days(self) -> u32 {
        self.0.get()
    }
}

impl Default for ForecastHorizon {
    fn default() -> Self {
        Self(NonZeroU32::new(Self::DEFAULT_DAYS).unwrap_or(NonZeroU32::MIN))
    }
}

impl TryFrom<u32> for ForecastHorizon {
    type Error = InvalidHorizonError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ForecastHorizon> for u32 {
    fn from(value: ForecastHorizon) -> Self {
        value.days()
    }
}

impl std::str::FromStr for ForecastHorizon {
    type Err = InvalidHorizonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim().parse::<u32>().map_err(|_| InvalidHorizonError {
            value: s.to_string(),
        })?;
        Self::new(value)
    }
}

impl std::fmt::Display for ForecastHorizon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.days())
    }
}

/// Error returned when attempting to create a [`ForecastHorizon`] from an
/// invalid day count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidHorizonError {
    /// The rejected input, as given.
    pub value: String,
}

impl std::fmt::Display for InvalidHorizonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid forecast horizon {:?}: expected a positive number of days",
            self.value
        )
    }
}

impl std::error::Error for InvalidHorizonError {}
