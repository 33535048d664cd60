//! Reflection metrics — how consistently the daily routine is being kept.

use chrono::{Duration, NaiveDate};
use journal_core::DailyScore;
use serde::{Deserialize, Serialize};

/// Length of the consistency window, in days.
pub const CONSISTENCY_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReflectionMetrics {
    /// Number of saved insights.
    pub days_tracked: usize,
    /// Mean checklist percentage over days that have a checklist.
    pub avg_daily_score: f64,
    /// Scored days in the last seven calendar days (today included) as a
    /// percentage of seven. At most 100 for one score per date.
    pub consistency_score: f64,
}

impl ReflectionMetrics {
    /// `today` is passed in so the computation stays pure.
    pub fn compute(insight_count: usize, scores: &[DailyScore], today: NaiveDate) -> Self {
        let scored: Vec<f64> = scores
            .iter()
            .filter(|day| day.has_checklist())
            .map(DailyScore::percentage)
            .collect();
        let avg_daily_score = if scored.is_empty() {
            0.0
        } else {
            scored.iter().sum::<f64>() / scored.len() as f64
        };

        let cutoff = today - Duration::days(CONSISTENCY_WINDOW_DAYS - 1);
        let recent = scores
            .iter()
            .filter(|day| day.score_date >= cutoff && day.score_date <= today)
            .count();
        let consistency_score = recent as f64 / CONSISTENCY_WINDOW_DAYS as f64 * 100.0;

        Self {
            days_tracked: insight_count,
            avg_daily_score,
            consistency_score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn day(date: NaiveDate, checked: usize, total: usize) -> DailyScore {
        let scores: BTreeMap<String, bool> =
            (0..total).map(|i| (format!("item{i}"), i < checked)).collect();
        DailyScore {
            score_date: date,
            scores,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn empty_history_is_zero() {
        let m = ReflectionMetrics::compute(0, &[], date(2024, 6, 10));
        assert_eq!(m, ReflectionMetrics::default());
    }

    #[test]
    fn average_skips_days_without_a_checklist() {
        let today = date(2024, 6, 10);
        let scores = [
            day(date(2024, 6, 8), 6, 6),
            day(date(2024, 6, 9), 3, 6),
            day(date(2024, 6, 10), 0, 0),
        ];
        let m = ReflectionMetrics::compute(4, &scores, today);
        assert_eq!(m.days_tracked, 4);
        assert!((m.avg_daily_score - 75.0).abs() < 1e-10);
    }

    #[test]
    fn consistency_counts_the_last_week_including_empty_days() {
        let today = date(2024, 6, 10);
        let scores = [
            day(date(2024, 5, 20), 6, 6),
            day(date(2024, 6, 3), 1, 6),
            day(date(2024, 6, 4), 1, 6),
            day(date(2024, 6, 9), 0, 0),
        ];
        let m = ReflectionMetrics::compute(0, &scores, today);
        // 06-04 (oldest day in the window) and 06-09 are inside; 06-03 is a week old.
        assert!((m.consistency_score - 2.0 / 7.0 * 100.0).abs() < 1e-10);
    }

    #[test]
    fn consistency_never_exceeds_one_hundred() {
        let today = date(2024, 6, 10);
        let scores: Vec<DailyScore> = (0..8)
            .map(|back| day(today - Duration::days(back), 6, 6))
            .collect();
        let m = ReflectionMetrics::compute(0, &scores, today);
        assert!((m.consistency_score - 100.0).abs() < 1e-10);
    }

    #[test]
    fn future_dated_scores_are_outside_the_window() {
        let today = date(2024, 6, 10);
        let scores = [day(date(2024, 6, 11), 6, 6), day(today, 6, 6)];
        let m = ReflectionMetrics::compute(0, &scores, today);
        assert!((m.consistency_score - 100.0 / 7.0).abs() < 1e-10);
    }

    #[test]
    fn full_week_is_one_hundred() {
        let today = date(2024, 6, 10);
        let scores: Vec<DailyScore> = (0..7)
            .map(|back| day(today - Duration::days(back), 3, 6))
            .collect();
        let m = ReflectionMetrics::compute(0, &scores, today);
        assert!((m.consistency_score - 100.0).abs() < 1e-10);
        assert!((m.avg_daily_score - 50.0).abs() < 1e-10);
    }
}
