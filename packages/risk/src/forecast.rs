//! Short-horizon trend extrapolation over recent risk scores.
//!
//! Fits an ordinary least-squares line over the trailing window of scores,
//! indexed by position rather than elapsed time so that irregular sampling
//! gaps do not skew the slope, and extends it one day at a time past the
//! last observed date.
//!
//! Predictions are not clamped. A falling trend can go negative and a
//! rising one is unbounded; [`ForecastPoint::display_score`] is the
//! explicit place to clamp for display.

use air_health_air_models::{
    Forecast, ForecastHorizon, ForecastPoint, ForecastStatus, ScorePoint,
};
use chrono::Days;
use serde::{Deserialize, Serialize};

/// Fewer history points than this yields no forecast.
pub const MIN_HISTORY_POINTS: usize = 5;

/// Maximum number of trailing points used for the fit.
pub const MAX_WINDOW_POINTS: usize = 14;

/// A fitted line `score = slope * index + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendLine {
    pub slope: f64,
    pub intercept: f64,
}

impl TrendLine {
    /// Evaluates the line at a positional index.
    #[must_use]
    pub fn at(&self, index: f64) -> f64 {
        self.slope.mul_add(index, self.intercept)
    }
}

/// Fits a least-squares line over `scores` indexed `0..n`.
///
/// Returns `None` for fewer than two points, where the slope is undefined.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn fit_trend(scores: &[f64]) -> Option<TrendLine> {
    if scores.len() < 2 {
        return None;
    }

    let n = scores.len() as f64;
    let mean_x = (n - 1.0) / 2.0;
    let mean_y = scores.iter().sum::<f64>() / n;

    let mut covariance = 0.0;
    let mut variance = 0.0;
    for (i, y) in scores.iter().enumerate() {
        let dx = i as f64 - mean_x;
        covariance += dx * (y - mean_y);
        variance += dx * dx;
    }

    let slope = covariance / variance;
    Some(TrendLine {
        slope,
        intercept: slope.mul_add(-mean_x, mean_y),
    })
}

/// Extrapolates `horizon` days past the end of `history`.
///
/// `history` must be in strictly ascending date order. With fewer than
/// [`MIN_HISTORY_POINTS`] points the result is empty and flagged
/// [`ForecastStatus::InsufficientHistory`]. If the last forecast day would
/// fall past [`chrono::NaiveDate::MAX`] the result is empty and flagged
/// [`ForecastStatus::OutOfDateRange`]. Otherwise it holds exactly `horizon`
/// points dated on consecutive days starting the day after the last history
/// point.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn forecast(history: &[ScorePoint], horizon: ForecastHorizon) -> Forecast {
    let insufficient = || Forecast {
        status: ForecastStatus::InsufficientHistory {
            available: history.len(),
            required: MIN_HISTORY_POINTS,
        },
        points: vec![],
    };

    let Some(last) = history.last() else {
        return insufficient();
    };
    if history.len() < MIN_HISTORY_POINTS {
        log::debug!(
            "Skipping forecast: {} point(s), need {MIN_HISTORY_POINTS}",
            history.len()
        );
        return insufficient();
    }

    if last
        .date
        .checked_add_days(Days::new(u64::from(horizon.days())))
        .is_none()
    {
        log::warn!(
            "Skipping forecast: {horizon} day(s) past {} is out of the calendar range",
            last.date
        );
        return Forecast {
            status: ForecastStatus::OutOfDateRange {
                last_date: last.date,
                horizon: horizon.days(),
            },
            points: vec![],
        };
    }

    let window = &history[history.len().saturating_sub(MAX_WINDOW_POINTS)..];
    let scores: Vec<f64> = window.iter().map(|p| p.score).collect();
    let Some(trend) = fit_trend(&scores) else {
        return insufficient();
    };

    log::debug!(
        "Fitted trend over {} point(s): slope={:.3} intercept={:.3}",
        window.len(),
        trend.slope,
        trend.intercept
    );

    let start = window.len() as f64;
    let points: Vec<ForecastPoint> = last
        .date
        .iter_days()
        .skip(1)
        .take(horizon.days() as usize)
        .enumerate()
        .map(|(step, date)| ForecastPoint {
            date,
            predicted_score: trend.at(start + step as f64),
        })
        .collect();

    Forecast {
        status: ForecastStatus::Available,
        points,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Days, NaiveDate};

    use super::*;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 9, 20).unwrap()
    }

    fn history(scores: &[f64]) -> Vec<ScorePoint> {
        scores
            .iter()
            .enumerate()
            .map(|(i, score)| ScorePoint {
                date: start() + Days::new(i as u64),
                score: *score,
            })
            .collect()
    }

    fn line(n: usize, slope: f64, intercept: f64) -> Vec<f64> {
        (0..n).map(|i| slope * i as f64 + intercept).collect()
    }

    fn horizon(days: u32) -> ForecastHorizon {
        ForecastHorizon::new(days).unwrap()
    }

    #[test]
    fn four_points_yield_no_forecast() {
        let result = forecast(&history(&[10.0, 12.0, 14.0, 16.0]), horizon(7));
        assert!(result.points.is_empty());
        assert_eq!(
            result.status,
            ForecastStatus::InsufficientHistory {
                available: 4,
                required: MIN_HISTORY_POINTS
            }
        );
        assert!(!result.is_available());
    }

    #[test]
    fn short_history_is_empty_for_any_horizon() {
        for n in 0..MIN_HISTORY_POINTS {
            for days in [1, 7, 30] {
                let result = forecast(&history(&line(n, 1.0, 5.0)), horizon(days));
                assert!(result.points.is_empty());
            }
        }
    }

    #[test]
    fn recovers_perfect_line() {
        let result = forecast(&history(&line(14, 2.0, 10.0)), horizon(7));
        assert!(result.is_available());
        assert_eq!(result.points.len(), 7);
        for (step, point) in result.points.iter().enumerate() {
            let expected = 2.0 * (14 + step) as f64 + 10.0;
            assert!(
                (point.predicted_score - expected).abs() < 1e-9,
                "step {step}: {} != {expected}",
                point.predicted_score
            );
        }
    }

    #[test]
    fn dates_are_contiguous_after_last_observation() {
        let h = history(&line(9, 0.5, 40.0));
        let last = h.last().unwrap().date;
        let result = forecast(&h, horizon(10));
        assert_eq!(result.points.len(), 10);
        for (step, point) in result.points.iter().enumerate() {
            assert_eq!(point.date, last + Days::new(step as u64 + 1));
        }
    }

    #[test]
    fn minimum_history_produces_full_horizon() {
        let result = forecast(&history(&[20.0, 25.0, 22.0, 30.0, 28.0]), horizon(3));
        assert!(result.is_available());
        assert_eq!(result.points.len(), 3);
    }

    #[test]
    fn only_trailing_window_is_fitted() {
        let mut scores = vec![500.0, -80.0, 300.0, 0.0, 999.0, 42.0];
        scores.extend(line(MAX_WINDOW_POINTS, 2.0, 10.0));
        let result = forecast(&history(&scores), horizon(2));
        assert!((result.points[0].predicted_score - 38.0).abs() < 1e-9);
        assert!((result.points[1].predicted_score - 40.0).abs() < 1e-9);
    }

    #[test]
    fn uses_position_not_elapsed_time() {
        let mut h = history(&line(6, 3.0, 20.0));
        // Shift the last point a week later; the fit should not change.
        let last = h.last_mut().unwrap();
        last.date = last.date + Days::new(7);
        let result = forecast(&h, horizon(1));
        assert!((result.points[0].predicted_score - 38.0).abs() < 1e-9);
        assert_eq!(result.points[0].date, h[5].date + Days::new(1));
    }

    #[test]
    fn falling_trend_is_not_clamped() {
        let result = forecast(&history(&line(6, -10.0, 40.0)), horizon(4));
        let last = result.points.last().unwrap();
        assert!(last.predicted_score < 0.0);
        assert!(last.display_score().abs() < f64::EPSILON);
    }

    #[test]
    fn flat_history_forecasts_flat() {
        let result = forecast(&history(&[55.0; 8]), horizon(5));
        for point in &result.points {
            assert!((point.predicted_score - 55.0).abs() < 1e-9);
        }
    }

    #[test]
    fn horizon_past_last_calendar_day_is_out_of_range() {
        let h: Vec<ScorePoint> = (0..6u64)
            .rev()
            .map(|back| ScorePoint {
                date: NaiveDate::MAX - Days::new(back),
                score: 40.0,
            })
            .collect();

        let result = forecast(&h, horizon(7));
        assert!(!result.is_available());
        assert!(result.points.is_empty());
        assert_eq!(
            result.status,
            ForecastStatus::OutOfDateRange {
                last_date: NaiveDate::MAX,
                horizon: 7,
            }
        );
    }

    #[test]
    fn horizon_ending_on_last_calendar_day_is_available() {
        let h: Vec<ScorePoint> = (3..9u64)
            .rev()
            .map(|back| ScorePoint {
                date: NaiveDate::MAX - Days::new(back),
                score: 40.0,
            })
            .collect();

        let result = forecast(&h, horizon(3));
        assert!(result.is_available());
        assert_eq!(result.points.len(), 3);
        assert_eq!(result.points[2].date, NaiveDate::MAX);
    }

    #[test]
    fn fit_trend_matches_normal_equations() {
        let trend = fit_trend(&[1.0, 3.0, 2.0, 5.0, 4.0]).unwrap();
        // x̄ = 2, ȳ = 3, Sxy = 8, Sxx = 10
        assert!((trend.slope - 0.8).abs() < 1e-12);
        assert!((trend.intercept - 1.4).abs() < 1e-12);
        assert!(fit_trend(&[1.0]).is_none());
        assert!(fit_trend(&[]).is_none());
    }
}
