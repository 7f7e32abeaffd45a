//! Canned health advisories keyed by risk band and vulnerability.
//!
//! Three bands (Low, Moderate, High-and-above) times two wordings (general
//! public vs. any profile with a multiplier above 1.0).

use air_health_air_models::{RiskBand, RiskCategory, VulnerabilityProfile};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display};

use crate::RiskError;

/// Display severity of an advisory banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AdvisorySeverity {
    Success,
    Warning,
    Error,
}

/// A human-readable recommendation for one band and audience.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Advisory {
    /// Coarse band the advisory was selected for.
    pub band: RiskBand,
    /// How the presentation layer should style it.
    pub severity: AdvisorySeverity,
    /// Recommendation text.
    pub message: &'static str,
}

/// Selects the advisory for a risk category and vulnerability profile.
#[must_use]
pub fn advise(category: RiskCategory, profile: VulnerabilityProfile) -> Advisory {
    advise_band(category.band(), profile)
}

/// Selects the advisory for a category label as stored by upstream data.
///
/// Accepts any [`RiskCategory`] label (e.g. `"Unhealthy for Sensitive"`)
/// or a coarse [`RiskBand`] label (`"Low"`, `"Moderate"`, `"High"`),
/// case-insensitively.
///
/// # Errors
///
/// Returns [`RiskError::UnknownCategory`] if the label matches neither.
pub fn advise_label(label: &str, profile: VulnerabilityProfile) -> Result<Advisory, RiskError> {
    let trimmed = label.trim();

    let band = trimmed
        .parse::<RiskCategory>()
        .map(RiskCategory::band)
        .or_else(|_| trimmed.parse::<RiskBand>())
        .map_err(|_| {
            log::warn!("Unrecognized risk category label {label:?}");
            RiskError::UnknownCategory {
                label: label.to_string(),
            }
        })?;

    Ok(advise_band(band, profile))
}

fn advise_band(band: RiskBand, profile: VulnerabilityProfile) -> Advisory {
    let vulnerable = profile.is_vulnerable();

    let (severity, message) = match (band, vulnerable) {
        (RiskBand::Low, false) => (
            AdvisorySeverity::Success,
            "Low risk: Safe for outdoor activities.",
        ),
        (RiskBand::Low, true) => (
            AdvisorySeverity::Success,
            "Low risk: Outdoor activity is fine. Keep any prescribed inhaler or medication at hand.",
        ),
        (RiskBand::Moderate, false) => (
            AdvisorySeverity::Warning,
            "Moderate risk: Limit prolonged outdoor exposure.",
        ),
        (RiskBand::Moderate, true) => (
            AdvisorySeverity::Warning,
            "Moderate risk: Reduce prolonged or heavy outdoor exertion and watch for coughing or shortness of breath.",
        ),
        (RiskBand::High, false) => (
            AdvisorySeverity::Error,
            "High risk: Avoid outdoor activity. Vulnerable groups at risk.",
        ),
        (RiskBand::High, true) => (
            AdvisorySeverity::Error,
            "High risk: Stay indoors with windows closed and postpone exercise. Seek medical advice if symptoms appear.",
        ),
    };

    Advisory {
        band,
        severity,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn general_wording_matches_dashboard_banners() {
        let general = VulnerabilityProfile::General;
        assert_eq!(
            advise(RiskCategory::Low, general).message,
            "Low risk: Safe for outdoor activities."
        );
        assert_eq!(
            advise(RiskCategory::Moderate, general).message,
            "Moderate risk: Limit prolonged outdoor exposure."
        );
        assert_eq!(
            advise(RiskCategory::Unhealthy, general).message,
            "High risk: Avoid outdoor activity. Vulnerable groups at risk."
        );
    }

    #[test]
    fn every_upper_tier_shares_the_high_advisory() {
        for profile in VulnerabilityProfile::all() {
            let high = advise(RiskCategory::UnhealthyForSensitive, *profile);
            assert_eq!(high.band, RiskBand::High);
            assert_eq!(high.severity, AdvisorySeverity::Error);
            assert_eq!(advise(RiskCategory::Unhealthy, *profile), high);
            assert_eq!(advise(RiskCategory::VeryUnhealthy, *profile), high);
        }
    }

    #[test]
    fn vulnerable_profiles_get_distinct_wording() {
        for category in RiskCategory::all() {
            let general = advise(*category, VulnerabilityProfile::General);
            let sensitive = advise(*category, VulnerabilityProfile::Sensitive);
            let outdoor = advise(*category, VulnerabilityProfile::OutdoorExertion);
            assert_ne!(general.message, sensitive.message);
            assert_eq!(sensitive, outdoor);
            assert_eq!(general.severity, sensitive.severity);
        }
    }

    #[test]
    fn severity_escalates_with_band() {
        let profile = VulnerabilityProfile::General;
        assert_eq!(advise(RiskCategory::Low, profile).severity, AdvisorySeverity::Success);
        assert_eq!(
            advise(RiskCategory::Moderate, profile).severity,
            AdvisorySeverity::Warning
        );
        assert_eq!(
            advise(RiskCategory::VeryUnhealthy, profile).severity,
            AdvisorySeverity::Error
        );
    }

    #[test]
    fn advises_from_category_and_band_labels() {
        let profile = VulnerabilityProfile::General;
        assert_eq!(advise_label("High", profile).unwrap().band, RiskBand::High);
        assert_eq!(advise_label("moderate", profile).unwrap().band, RiskBand::Moderate);
        assert_eq!(
            advise_label(" Unhealthy for Sensitive ", profile).unwrap().band,
            RiskBand::High
        );
        assert_eq!(advise_label("Very Unhealthy", profile).unwrap().band, RiskBand::High);
    }

    #[test]
    fn unknown_label_is_surfaced() {
        let err = advise_label("Hazardous", VulnerabilityProfile::General).unwrap_err();
        assert!(matches!(err, RiskError::UnknownCategory { label } if label == "Hazardous"));
        assert!(advise_label("", VulnerabilityProfile::Sensitive).is_err());
    }
}
