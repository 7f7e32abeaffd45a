#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Health risk scoring, advisories, and short-term trend forecasting.
//!
//! Data flows one way: validated [`PollutantRecord`]s are scored into
//! [`RiskAssessment`]s, which feed either the [`advisory`] selector or the
//! [`forecast`] extrapolation. Every function here is pure; there is no
//! shared state, I/O, or caching.
//!
//! [`PollutantRecord`]: air_health_air_models::PollutantRecord
//! [`RiskAssessment`]: air_health_air_models::RiskAssessment

pub mod advisory;
pub mod forecast;
pub mod normalize;
pub mod scoring;
pub mod summary;

use chrono::NaiveDate;
use strum_macros::Display;

pub use advisory::{Advisory, AdvisorySeverity, advise, advise_label};
pub use forecast::{MAX_WINDOW_POINTS, MIN_HISTORY_POINTS, TrendLine, fit_trend, forecast};
pub use normalize::{normalize_series, validate_record};
pub use scoring::{classify, score, score_series, score_with_multiplier};
pub use summary::{CitySummary, summarize};

/// Which pollutant field failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum PollutantField {
    Pm25,
    Pm10,
    No2,
    Co,
}

/// Why a pollutant field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum InvalidReason {
    /// The field was absent from the source record.
    Missing,
    /// The value was below zero.
    Negative,
    /// The value was NaN or infinite.
    NonFinite,
}

/// Errors that can occur while scoring, advising, or normalizing.
#[derive(Debug, thiserror::Error)]
pub enum RiskError {
    /// A pollutant field was missing, negative, or non-finite.
    #[error("Invalid record for {date}: {field} is {reason}")]
    InvalidRecord {
        /// Day of the offending record.
        date: NaiveDate,
        /// Field that failed validation.
        field: PollutantField,
        /// What was wrong with it.
        reason: InvalidReason,
    },

    /// Records were not in strictly ascending date order.
    #[error("Unordered series: {date} does not follow {previous}")]
    UnorderedSeries {
        /// Date of the preceding record.
        previous: NaiveDate,
        /// Date that is a duplicate of, or earlier than, `previous`.
        date: NaiveDate,
    },

    /// A score multiplier was zero, negative, or non-finite.
    #[error("Invalid multiplier {value}: expected a positive finite number")]
    InvalidMultiplier {
        /// The rejected multiplier.
        value: f64,
    },

    /// A category label did not match any known risk tier or band.
    #[error("Unknown risk category: {label:?}")]
    UnknownCategory {
        /// The unrecognized label.
        label: String,
    },
}
