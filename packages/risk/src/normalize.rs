//! Record validation and series normalization.
//!
//! Sources deliver [`RawPollutantRecord`]s with optional pollutant fields.
//! Nothing here imputes values: a missing pollutant fails the record
//! outright, since a fabricated zero would understate the risk.

use air_health_air_models::{PollutantRecord, RawPollutantRecord};

use crate::{InvalidReason, PollutantField, RiskError};

/// Validates a raw record and converts it into a [`PollutantRecord`].
///
/// Weather fields are carried through only when finite; they never affect
/// the score, so a bad weather value is dropped instead of failing the
/// record.
///
/// # Errors
///
/// Returns [`RiskError::InvalidRecord`] if any of the four pollutant fields
/// is missing, negative, or non-finite.
pub fn validate_record(raw: &RawPollutantRecord) -> Result<PollutantRecord, RiskError> {
    let required = |field: PollutantField, value: Option<f64>| -> Result<f64, RiskError> {
        let value = value.ok_or(RiskError::InvalidRecord {
            date: raw.date,
            field,
            reason: InvalidReason::Missing,
        })?;
        check_pollutant(raw.date, field, value)?;
        Ok(value)
    };

    Ok(PollutantRecord {
        date: raw.date,
        pm25: required(PollutantField::Pm25, raw.pm25)?,
        pm10: required(PollutantField::Pm10, raw.pm10)?,
        no2: required(PollutantField::No2, raw.no2)?,
        co: required(PollutantField::Co, raw.co)?,
        temperature: raw.temperature.filter(|v| v.is_finite()),
        wind_speed: raw.wind_speed.filter(|v| v.is_finite()),
        humidity: raw.humidity.filter(|v| v.is_finite()),
    })
}

/// Validates every record of a series and checks that dates are strictly
/// ascending.
///
/// # Errors
///
/// Returns [`RiskError::InvalidRecord`] for the first invalid record, or
/// [`RiskError::UnorderedSeries`] if a date repeats or goes backwards.
pub fn normalize_series(raw: &[RawPollutantRecord]) -> Result<Vec<PollutantRecord>, RiskError> {
    let mut records: Vec<PollutantRecord> = Vec::with_capacity(raw.len());

    for record in raw {
        if let Some(previous) = records.last()
            && record.date <= previous.date
        {
            return Err(RiskError::UnorderedSeries {
                previous: previous.date,
                date: record.date,
            });
        }
        records.push(validate_record(record)?);
    }

    log::debug!("Normalized {} record(s)", records.len());

    Ok(records)
}

/// Checks that every pollutant of an already-built record is usable.
///
/// # Errors
///
/// Returns [`RiskError::InvalidRecord`] for the first negative or
/// non-finite pollutant.
pub fn check_record(record: &PollutantRecord) -> Result<(), RiskError> {
    check_pollutant(record.date, PollutantField::Pm25, record.pm25)?;
    check_pollutant(record.date, PollutantField::Pm10, record.pm10)?;
    check_pollutant(record.date, PollutantField::No2, record.no2)?;
    check_pollutant(record.date, PollutantField::Co, record.co)
}

fn check_pollutant(
    date: chrono::NaiveDate,
    field: PollutantField,
    value: f64,
) -> Result<(), RiskError> {
    let reason = if !value.is_finite() {
        InvalidReason::NonFinite
    } else if value < 0.0 {
        InvalidReason::Negative
    } else {
        return Ok(());
    };

    Err(RiskError::InvalidRecord {
        date,
        field,
        reason,
    })
}
