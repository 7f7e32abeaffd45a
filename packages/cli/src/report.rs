//! Per-city report pipeline: load, normalize, score, summarize.

use air_health_air_models::{
    ForecastHorizon, PollutantRecord, RawPollutantRecord, VulnerabilityProfile,
};
use air_health_risk::{CitySummary, RiskError, advise_label, normalize_series, score, summarize};
use air_health_source::city_def::CityDefinition;
use air_health_source::{RecordSource, SourceError};

/// Errors that can occur while building one city's report.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// Loading the city's records failed.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// The records could not be normalized or scored.
    #[error(transparent)]
    Risk(#[from] RiskError),
}

/// Settings shared by every city in a report run.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportOptions {
    pub profile: VulnerabilityProfile,
    pub horizon: ForecastHorizon,
}

/// Builds the summary for a single city.
///
/// # Errors
///
/// Returns [`ReportError`] if the city's records cannot be loaded, fail
/// validation, are out of order, or carry an unrecognized `risk_level`.
pub fn report_city(
    source: &dyn RecordSource,
    city: &CityDefinition,
    options: ReportOptions,
) -> Result<CitySummary, ReportError> {
    let raw = source.load(city)?;
    let records = normalize_series(&raw)?;

    let mismatches = check_reported_levels(&raw, &records)?;
    if mismatches > 0 {
        log::warn!(
            "[{}] {mismatches} stored risk level(s) disagree with the recomputed band",
            city.id
        );
    }

    Ok(summarize(&city.name, &records, options.profile, options.horizon)?)
}

/// Compares stored `risk_level` labels with the band recomputed for the
/// general population, returning how many disagree.
///
/// `raw` and `records` must be the same series, index for index.
fn check_reported_levels(
    raw: &[RawPollutantRecord],
    records: &[PollutantRecord],
) -> Result<usize, RiskError> {
    let profile = VulnerabilityProfile::General;
    let mut mismatches = 0;

    for (raw, record) in raw.iter().zip(records) {
        let Some(label) = raw.risk_level.as_deref() else {
            continue;
        };
        let reported = advise_label(label, profile)?.band;
        let computed = score(record, profile)?.category.band();
        if reported != computed {
            log::debug!("{}: stored {reported}, recomputed {computed}", record.date);
            mismatches += 1;
        }
    }

    Ok(mismatches)
}

/// Builds summaries for every city, skipping (and logging) cities that
/// fail so one bad feed does not take down the whole report.
pub fn report_all(
    source: &dyn RecordSource,
    cities: &[CityDefinition],
    options: ReportOptions,
) -> Vec<CitySummary> {
    log::info!(
        "Reporting {} city(ies) for profile {} with a {}-day horizon",
        cities.len(),
        options.profile,
        options.horizon
    );

    cities
        .iter()
        .filter_map(|city| match report_city(source, city, options) {
            Ok(summary) => Some(summary),
            Err(e) => {
                log::error!("Failed to report {}: {e}", city.id);
                None
            }
        })
        .collect()
}

/// Runs [`report_all`] once per profile, in the order given.
///
/// Each profile reloads every city through `source`, so wrapping it in a
/// [`air_health_source::cache::CachedSource`] serves the later profiles
/// from memory.
pub fn report_profiles(
    source: &dyn RecordSource,
    cities: &[CityDefinition],
    profiles: &[VulnerabilityProfile],
    horizon: ForecastHorizon,
) -> Vec<CitySummary> {
    profiles
        .iter()
        .flat_map(|&profile| report_all(source, cities, ReportOptions { profile, horizon }))
        .collect()
}
