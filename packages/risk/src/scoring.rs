//! Weighted-normalized health risk score and category lookup.
//!
//! ```text
//! raw   = (pm25/60)*50 + (pm10/100)*30 + (no2/200)*15 + (co/10000)*5
//! score = round1(round1(raw) * multiplier)
//! ```
//!
//! Each divisor is the concentration at which that pollutant alone
//! contributes its full weight. The weights sum to 100.
//!
//! Invariants:
//! - The score is monotonically non-decreasing in every pollutant
//! - `score(r, m) == round1(score(r, 1.0) * m)` for any positive `m`
//! - Category boundaries are upper-inclusive (50.0 is Low, not Moderate)

use air_health_air_models::{
    ColorHint, PollutantRecord, RiskAssessment, RiskCategory, VulnerabilityProfile,
};

use crate::RiskError;
use crate::normalize::check_record;

/// PM2.5 concentration (µg/m³) that contributes the full PM2.5 weight.
pub const PM25_REFERENCE: f64 = 60.0;
/// PM10 concentration (µg/m³) that contributes the full PM10 weight.
pub const PM10_REFERENCE: f64 = 100.0;
/// NO2 concentration (µg/m³) that contributes the full NO2 weight.
pub const NO2_REFERENCE: f64 = 200.0;
/// CO concentration (µg/m³) that contributes the full CO weight.
pub const CO_REFERENCE: f64 = 10_000.0;

pub const PM25_WEIGHT: f64 = 50.0;
pub const PM10_WEIGHT: f64 = 30.0;
pub const NO2_WEIGHT: f64 = 15.0;
pub const CO_WEIGHT: f64 = 5.0;

/// Scores a record for the given vulnerability profile.
///
/// # Errors
///
/// Returns [`RiskError::InvalidRecord`] if any pollutant is negative or
/// non-finite.
pub fn score(
    record: &PollutantRecord,
    profile: VulnerabilityProfile,
) -> Result<RiskAssessment, RiskError> {
    score_with_multiplier(record, profile.multiplier())
}

/// Scores a record with an explicit multiplier.
///
/// # Errors
///
/// Returns [`RiskError::InvalidMultiplier`] if `multiplier` is not a
/// positive finite number, or [`RiskError::InvalidRecord`] if any pollutant
/// is negative or non-finite.
pub fn score_with_multiplier(
    record: &PollutantRecord,
    multiplier: f64,
) -> Result<RiskAssessment, RiskError> {
    if !multiplier.is_finite() || multiplier <= 0.0 {
        return Err(RiskError::InvalidMultiplier { value: multiplier });
    }
    check_record(record)?;

    let base = round_one_decimal(raw_score(record));
    let score = round_one_decimal((base * multiplier).min(f64::MAX));
    let (category, color_hint) = classify(score);

    Ok(RiskAssessment {
        date: record.date,
        score,
        category,
        color_hint,
    })
}

/// Scores every record of a normalized series, preserving order.
///
/// # Errors
///
/// Returns the first [`RiskError`] produced by [`score`].
pub fn score_series(
    records: &[PollutantRecord],
    profile: VulnerabilityProfile,
) -> Result<Vec<RiskAssessment>, RiskError> {
    records.iter().map(|r| score(r, profile)).collect()
}

/// Maps a score onto its risk category and display color.
///
/// Negative inputs (possible for extrapolated scores) classify as Low. NaN
/// falls through every bounded tier and classifies as Very Unhealthy.
#[must_use]
pub fn classify(score: f64) -> (RiskCategory, ColorHint) {
    let category = RiskCategory::all()
        .iter()
        .copied()
        .find(|c| c.upper_bound().is_none_or(|bound| score <= bound))
        .unwrap_or(RiskCategory::VeryUnhealthy);

    (category, category.color_hint())
}

/// Saturates at `f64::MAX` so extreme but finite readings stay finite.
fn raw_score(record: &PollutantRecord) -> f64 {
    let sum = (record.pm25 / PM25_REFERENCE) * PM25_WEIGHT
        + (record.pm10 / PM10_REFERENCE) * PM10_WEIGHT
        + (record.no2 / NO2_REFERENCE) * NO2_WEIGHT
        + (record.co / CO_REFERENCE) * CO_WEIGHT;
    sum.min(f64::MAX)
}

/// Above this magnitude every f64 is already a whole number.
const ROUNDING_LIMIT: f64 = 1e15;

fn round_one_decimal(value: f64) -> f64 {
    if value.abs() >= ROUNDING_LIMIT {
        return value;
    }
    (value * 10.0).round() / 10.0
}
