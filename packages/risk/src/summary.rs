//! Per-city dashboard summary.
//!
//! Bundles everything the presentation layer shows for one city: average
//! PM2.5 and risk score, dominant risk band, the scored history, the latest
//! assessment with its advisory, and the trend forecast.

use std::collections::BTreeMap;

use air_health_air_models::{
    Forecast, ForecastHorizon, PollutantRecord, RiskAssessment, RiskBand, ScorePoint,
    VulnerabilityProfile,
};
use serde::Serialize;

use crate::RiskError;
use crate::advisory::{Advisory, advise};
use crate::forecast::forecast;
use crate::scoring::score_series;

/// Computed dashboard data for one city.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CitySummary {
    /// Display name of the city.
    pub city: String,
    /// Profile the scores were computed for.
    pub profile: VulnerabilityProfile,
    /// Mean PM2.5 over the series, rounded to one decimal.
    pub average_pm25: Option<f64>,
    /// Mean risk score over the series, rounded to one decimal.
    pub average_score: Option<f64>,
    /// Most frequent coarse band. Ties go to the more severe band.
    pub dominant_band: Option<RiskBand>,
    /// Scored history in date order.
    pub assessments: Vec<RiskAssessment>,
    /// Most recent assessment.
    pub latest: Option<RiskAssessment>,
    /// Advisory for the most recent assessment.
    pub advisory: Option<Advisory>,
    /// Trend forecast over the scored history.
    pub forecast: Forecast,
}

/// Scores a normalized series and assembles its [`CitySummary`].
///
/// # Errors
///
/// Returns the first [`RiskError`] produced while scoring.
pub fn summarize(
    city: &str,
    records: &[PollutantRecord],
    profile: VulnerabilityProfile,
    horizon: ForecastHorizon,
) -> Result<CitySummary, RiskError> {
    let assessments = score_series(records, profile)?;
    let history: Vec<ScorePoint> = assessments.iter().map(RiskAssessment::score_point).collect();
    let forecast = forecast(&history, horizon);

    let latest = assessments.last().cloned();
    let advisory = latest.as_ref().map(|a| advise(a.category, profile));

    log::info!(
        "[{city}] {} assessment(s), forecast {}",
        assessments.len(),
        if forecast.is_available() {
            "available"
        } else {
            "unavailable"
        }
    );

    Ok(CitySummary {
        city: city.to_string(),
        profile,
        average_pm25: mean(records.iter().map(|r| r.pm25)),
        average_score: mean(assessments.iter().map(|a| a.score)),
        dominant_band: dominant_band(&assessments),
        latest,
        advisory,
        assessments,
        forecast,
    })
}

#[allow(clippy::cast_precision_loss)]
fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        return None;
    }
    Some(((sum / count as f64) * 10.0).round() / 10.0)
}

fn dominant_band(assessments: &[RiskAssessment]) -> Option<RiskBand> {
    let mut counts: BTreeMap<RiskBand, usize> = BTreeMap::new();
    for a in assessments {
        *counts.entry(a.category.band()).or_default() += 1;
    }

    // BTreeMap iterates least severe first, so `max_by_key` keeps the last
    // (most severe) of equally frequent bands.
    counts
        .into_iter()
        .max_by_key(|(_, count)| *count)
        .map(|(band, _)| band)
}

#[cfg(test)]
mod tests {
    use air_health_air_models::{ForecastStatus, RiskCategory};
    use chrono::{Days, NaiveDate};

    use super::*;

    fn series(readings: &[(f64, f64, f64, f64)]) -> Vec<PollutantRecord> {
        let start = NaiveDate::from_ymd_opt(2024, 10, 1).unwrap();
        readings
            .iter()
            .enumerate()
            .map(|(i, (pm25, pm10, no2, co))| {
                PollutantRecord::new(start + Days::new(i as u64), *pm25, *pm10, *no2, *co)
            })
            .collect()
    }

    #[test]
    fn summarizes_city_metrics() {
        let records = series(&[
            (30.0, 50.0, 40.0, 2000.0),
            (36.0, 60.0, 40.0, 2000.0),
            (60.0, 100.0, 100.0, 5000.0),
            (24.0, 40.0, 20.0, 1000.0),
            (30.0, 50.0, 40.0, 2000.0),
        ]);
        let summary = summarize(
            "Helsinki",
            &records,
            VulnerabilityProfile::General,
            ForecastHorizon::default(),
        )
        .unwrap();

        assert_eq!(summary.city, "Helsinki");
        assert_eq!(summary.assessments.len(), 5);
        assert_eq!(summary.average_pm25, Some(36.0));
        assert_eq!(summary.dominant_band, Some(RiskBand::Low));
        let latest = summary.latest.as_ref().unwrap();
        assert_eq!(latest.date, records[4].date);
        assert_eq!(latest.category, RiskCategory::Low);
        assert_eq!(summary.advisory.unwrap().band, RiskBand::Low);
        assert!(summary.forecast.is_available());
        assert_eq!(summary.forecast.points.len(), 7);
    }

    #[test]
    fn empty_series_has_no_metrics() {
        let summary = summarize(
            "Nowhere",
            &[],
            VulnerabilityProfile::Sensitive,
            ForecastHorizon::default(),
        )
        .unwrap();
        assert!(summary.average_pm25.is_none());
        assert!(summary.average_score.is_none());
        assert!(summary.dominant_band.is_none());
        assert!(summary.latest.is_none());
        assert!(summary.advisory.is_none());
        assert_eq!(
            summary.forecast.status,
            ForecastStatus::InsufficientHistory {
                available: 0,
                required: 5
            }
        );
    }

    #[test]
    fn dominant_band_ties_go_to_more_severe() {
        let records = series(&[
            (30.0, 50.0, 40.0, 2000.0),
            (150.0, 200.0, 200.0, 10_000.0),
        ]);
        let summary = summarize(
            "Delhi",
            &records,
            VulnerabilityProfile::General,
            ForecastHorizon::default(),
        )
        .unwrap();
        assert_eq!(summary.dominant_band, Some(RiskBand::High));
    }

    #[test]
    fn advisory_follows_profile() {
        let records = series(&[(30.0, 50.0, 40.0, 2000.0)]);
        let general = summarize("A", &records, VulnerabilityProfile::General, ForecastHorizon::default())
            .unwrap();
        let outdoor = summarize(
            "A",
            &records,
            VulnerabilityProfile::OutdoorExertion,
            ForecastHorizon::default(),
        )
        .unwrap();
        assert_eq!(general.advisory.unwrap().band, RiskBand::Low);
        assert_eq!(outdoor.advisory.unwrap().band, RiskBand::Moderate);
    }
}
