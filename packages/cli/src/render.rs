//! Text and JSON rendering of report output.

use std::fmt::Write as _;

use air_health_air_models::{ForecastStatus, RiskAssessment};
use air_health_risk::{Advisory, CitySummary};
use air_health_source::city_def::CityDefinition;
use serde::Serialize;

/// Output format for report and score commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Serializes any report value as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`serde_json::Error`] if serialization fails.
pub fn render_json<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

/// Renders the configured cities as an aligned table.
#[must_use]
pub fn render_cities(cities: &[CityDefinition]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<12} {:<12} {:<8} DATA FILE", "ID", "NAME", "COUNTRY");
    let _ = writeln!(out, "{}", "-".repeat(56));
    for city in cities {
        let _ = writeln!(
            out,
            "{:<12} {:<12} {:<8} {}",
            city.id, city.name, city.country, city.data_file
        );
    }
    out
}

/// Renders a single assessment with its advisory.
#[must_use]
pub fn render_assessment(assessment: &RiskAssessment, advisory: &Advisory) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Score:     {:.1} ({}, {})",
        assessment.score, assessment.category, assessment.color_hint
    );
    let _ = writeln!(out, "Advisory:  [{}] {}", advisory.severity, advisory.message);
    out
}

/// Renders one city summary as a text block.
///
/// Forecast values are clamped at zero for display; the JSON output keeps
/// the raw predictions.
#[must_use]
pub fn render_summary(summary: &CitySummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} (profile: {})", summary.city, summary.profile);
    let _ = writeln!(out, "  Avg PM2.5:        {}", or_dash(summary.average_pm25));
    let _ = writeln!(out, "  Avg health risk:  {}", or_dash(summary.average_score));
    let _ = writeln!(
        out,
        "  Dominant risk:    {}",
        summary
            .dominant_band
            .map_or_else(|| "-".to_string(), |b| b.to_string())
    );

    match &summary.latest {
        Some(latest) => {
            let _ = writeln!(
                out,
                "  Latest:           {}  {:.1}  {} ({})",
                latest.date, latest.score, latest.category, latest.color_hint
            );
        }
        None => {
            let _ = writeln!(out, "  Latest:           no data");
        }
    }

    if let Some(advisory) = &summary.advisory {
        let _ = writeln!(
            out,
            "  Advisory:         [{}] {}",
            advisory.severity, advisory.message
        );
    }

    match summary.forecast.status {
        ForecastStatus::Available => {
            let _ = writeln!(out, "  Forecast:");
            for point in &summary.forecast.points {
                let _ = writeln!(out, "    {}  {:.1}", point.date, point.display_score());
            }
        }
        ForecastStatus::InsufficientHistory {
            available,
            required,
        } => {
            let _ = writeln!(
                out,
                "  Forecast:         unavailable ({available} of {required} required days)"
            );
        }
        ForecastStatus::OutOfDateRange { last_date, horizon } => {
            let _ = writeln!(
                out,
                "  Forecast:         unavailable ({horizon} days past {last_date} is out of range)"
            );
        }
    }

    out
}

fn or_dash(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.1}"))
}
