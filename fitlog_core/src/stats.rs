//! Stats derivation engine.
//!
//! This module implements the dashboard derivation logic:
//! - Current streak over distinct calendar days
//! - Goal progress, calorie/duration totals and exercise split
//! - Weight trend and BMI classification
//! - Trailing activity heatmap and badge unlocks
//!
//! `derive` is a pure function of the complete record collection and the
//! current instant; it is recomputed wholesale after every fetch, insert or
//! delete and never caches anything. All "same calendar day" comparisons
//! happen in the timezone of the `now` value handed in by the caller (the
//! CLI passes local time, tests pass fixed UTC instants).

use crate::badges::{self, BadgeInputs};
use crate::config::StatsConfig;
use crate::types::{
    BmiClass, BmiReading, ExerciseKind, HeatmapDay, LogRecord, StatsSnapshot, WeightPoint,
};
use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};
use std::collections::HashSet;

/// Derive the full stats snapshot from the record collection.
///
/// Pure and total: any input shape (including an empty collection) yields a
/// neutral snapshot rather than an error.
pub fn derive<Tz: TimeZone>(
    logs: &[LogRecord],
    now: DateTime<Tz>,
    cfg: &StatsConfig,
) -> StatsSnapshot {
    let total_days = logs.len();
    let progress_percent =
        ((total_days as f64 / cfg.goal_days as f64) * 100.0).min(100.0);
    let total_calories: u64 = logs.iter().map(|l| u64::from(l.calories)).sum();
    let total_duration_minutes: u64 =
        logs.iter().map(|l| u64::from(l.duration_minutes)).sum();
    let current_streak = current_streak(logs, &now);
    let weight_history = weight_history(logs, &now);
    let cardio_count = logs
        .iter()
        .filter(|l| l.kind == ExerciseKind::Cardio)
        .count();
    let strength_count = logs
        .iter()
        .filter(|l| l.kind == ExerciseKind::Strength)
        .count();

    let badges = badges::evaluate(
        &cfg.thresholds,
        BadgeInputs {
            total_days,
            current_streak,
            total_calories,
            strength_count,
        },
    );
    let heatmap = heatmap(logs, &now, cfg.heatmap_window_days);

    StatsSnapshot {
        total_days,
        goal_days: cfg.goal_days,
        progress_percent,
        total_calories,
        total_duration_minutes,
        current_streak,
        weight_history,
        cardio_count,
        strength_count,
        badges,
        heatmap,
    }
}

/// Calendar date of a record in the caller's timezone
fn local_date<Tz: TimeZone>(ts: DateTime<Utc>, now: &DateTime<Tz>) -> NaiveDate {
    ts.with_timezone(&now.timezone()).date_naive()
}

/// Count consecutive active days ending today or yesterday.
///
/// Today not yet logged does not break an existing streak: the cursor steps
/// back one day before counting begins. The walk is bounded by the distinct
/// day count plus the initial adjustment.
fn current_streak<Tz: TimeZone>(logs: &[LogRecord], now: &DateTime<Tz>) -> u32 {
    if logs.is_empty() {
        return 0;
    }

    let active: HashSet<NaiveDate> = logs.iter().map(|l| local_date(l.date, now)).collect();
    let today = now.date_naive();

    let mut cursor = if active.contains(&today) {
        Some(today)
    } else {
        today.pred_opt()
    };

    let mut streak = 0;
    for _ in 0..=active.len() {
        match cursor {
            Some(day) if active.contains(&day) => {
                streak += 1;
                cursor = day.pred_opt();
            }
            _ => break,
        }
    }
    streak
}

/// Weight trend, oldest first regardless of input order
fn weight_history<Tz: TimeZone>(logs: &[LogRecord], now: &DateTime<Tz>) -> Vec<WeightPoint> {
    let mut dated: Vec<(DateTime<Utc>, WeightPoint)> = logs
        .iter()
        .filter_map(|l| {
            l.weight_kg.map(|weight_kg| {
                let local = l.date.with_timezone(&now.timezone());
                (
                    l.date,
                    WeightPoint {
                        date_label: format!("{}/{}", local.month(), local.day()),
                        weight_kg,
                    },
                )
            })
        })
        .collect();

    dated.sort_by_key(|(date, _)| *date);
    dated.into_iter().map(|(_, point)| point).collect()
}

/// Trailing activity window, oldest first, today last.
///
/// Each day is an existence check against the record dates, not a count.
fn heatmap<Tz: TimeZone>(
    logs: &[LogRecord],
    now: &DateTime<Tz>,
    window_days: u32,
) -> Vec<HeatmapDay> {
    let active: HashSet<NaiveDate> = logs.iter().map(|l| local_date(l.date, now)).collect();
    let today = now.date_naive();

    (0..window_days)
        .rev()
        .map(|back| {
            let date = today - Duration::days(i64::from(back));
            HeatmapDay {
                active: active.contains(&date),
                date,
            }
        })
        .collect()
}

/// Compute a BMI reading from the most recent recorded weight and a
/// free-text height in centimeters.
///
/// No recorded weight, or an unparseable or non-positive height, degrades
/// to the neutral Unknown reading.
pub fn bmi_reading(snapshot: &StatsSnapshot, height_cm: &str) -> BmiReading {
    let weight_kg = match snapshot.weight_history.last() {
        Some(point) => point.weight_kg,
        None => return BmiReading::unknown(),
    };

    let height_cm: f64 = match height_cm.trim().parse() {
        Ok(h) if h > 0.0 => h,
        _ => return BmiReading::unknown(),
    };

    let height_m = height_cm / 100.0;
    let value = (weight_kg / (height_m * height_m) * 10.0).round() / 10.0;

    BmiReading {
        value,
        class: BmiClass::classify(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 6, 12, 0, 0).unwrap()
    }

    fn record(days_ago: i64, kind: ExerciseKind, calories: u32, weight: Option<f64>) -> LogRecord {
        LogRecord {
            id: Uuid::new_v4(),
            user_id: "myself".into(),
            date: fixed_now() - Duration::days(days_ago),
            duration_minutes: 30,
            kind,
            calories,
            weight_kg: weight,
            checked_in: true,
        }
    }

    fn cardio(days_ago: i64) -> LogRecord {
        record(days_ago, ExerciseKind::Cardio, 0, None)
    }

    fn derive_default(logs: &[LogRecord]) -> StatsSnapshot {
        derive(logs, fixed_now(), &StatsConfig::default())
    }

    #[test]
    fn test_empty_collection_yields_neutral_snapshot() {
        let snapshot = derive_default(&[]);

        assert_eq!(snapshot.total_days, 0);
        assert_eq!(snapshot.progress_percent, 0.0);
        assert_eq!(snapshot.total_calories, 0);
        assert_eq!(snapshot.total_duration_minutes, 0);
        assert_eq!(snapshot.current_streak, 0);
        assert!(snapshot.weight_history.is_empty());
        assert_eq!(snapshot.heatmap.len(), 28);
        assert!(snapshot.heatmap.iter().all(|d| !d.active));
        assert!(snapshot.badges.iter().all(|b| !b.unlocked));
    }

    #[test]
    fn test_streak_today_and_yesterday() {
        let logs = vec![cardio(0), cardio(1)];
        assert_eq!(derive_default(&logs).current_streak, 2);
    }

    #[test]
    fn test_streak_survives_unlogged_today() {
        // Yesterday and the day before, nothing yet today
        let logs = vec![cardio(1), cardio(2)];
        assert_eq!(derive_default(&logs).current_streak, 2);
    }

    #[test]
    fn test_streak_broken_by_gap_at_yesterday() {
        // Only a record two days ago: neither today nor yesterday is active
        let logs = vec![cardio(2)];
        assert_eq!(derive_default(&logs).current_streak, 0);
    }

    #[test]
    fn test_streak_counts_only_contiguous_run() {
        // Gap at yesterday cuts off the older run
        let logs = vec![cardio(0), cardio(2), cardio(3)];
        assert_eq!(derive_default(&logs).current_streak, 1);
    }

    #[test]
    fn test_streak_dedups_same_day_records() {
        let logs = vec![cardio(0), cardio(0), cardio(1)];
        assert_eq!(derive_default(&logs).current_streak, 2);
    }

    #[test]
    fn test_total_days_is_raw_record_count() {
        // Two check-ins on the same day both count toward the goal
        let logs = vec![cardio(0), cardio(0)];
        assert_eq!(derive_default(&logs).total_days, 2);
    }

    #[test]
    fn test_progress_clamps_at_hundred() {
        let logs: Vec<LogRecord> = (0..120).map(|_| cardio(0)).collect();
        let snapshot = derive_default(&logs);
        assert_eq!(snapshot.progress_percent, 100.0);
        assert_eq!(snapshot.remaining_days(), 0);
    }

    #[test]
    fn test_progress_in_range_for_any_count() {
        for n in [0usize, 1, 50, 99, 100, 250] {
            let logs: Vec<LogRecord> = (0..n).map(|_| cardio(0)).collect();
            let p = derive_default(&logs).progress_percent;
            assert!((0.0..=100.0).contains(&p), "progress {} out of range", p);
        }
    }

    #[test]
    fn test_weight_history_chronological_regardless_of_input_order() {
        let logs = vec![
            record(0, ExerciseKind::Cardio, 0, Some(70.0)),
            record(5, ExerciseKind::Cardio, 0, Some(73.0)),
            record(2, ExerciseKind::Cardio, 0, Some(71.5)),
            cardio(1), // no weight, filtered out
        ];
        let history = derive_default(&logs).weight_history;

        let weights: Vec<f64> = history.iter().map(|p| p.weight_kg).collect();
        assert_eq!(weights, vec![73.0, 71.5, 70.0]);
    }

    #[test]
    fn test_weight_labels_are_numeric_month_day() {
        let logs = vec![record(0, ExerciseKind::Cardio, 0, Some(70.0))];
        let history = derive_default(&logs).weight_history;
        assert_eq!(history[0].date_label, "8/6");
    }

    #[test]
    fn test_exercise_split_counts() {
        let logs = vec![
            cardio(0),
            cardio(1),
            record(2, ExerciseKind::Strength, 0, None),
        ];
        let snapshot = derive_default(&logs);
        assert_eq!(snapshot.cardio_count, 2);
        assert_eq!(snapshot.strength_count, 1);
    }

    #[test]
    fn test_heatmap_window_shape() {
        let logs = vec![cardio(0), cardio(3), cardio(40)];
        let snapshot = derive_default(&logs);

        assert_eq!(snapshot.heatmap.len(), 28);
        // Oldest first, today last
        let today = fixed_now().date_naive();
        assert_eq!(snapshot.heatmap[0].date, today - Duration::days(27));
        assert_eq!(snapshot.heatmap[27].date, today);
        assert!(snapshot.heatmap[27].active);
        assert!(snapshot.heatmap[24].active); // 3 days ago
        assert!(!snapshot.heatmap[26].active);
        // The 40-day-old record falls outside the window
        assert_eq!(snapshot.heatmap.iter().filter(|d| d.active).count(), 2);
    }

    #[test]
    fn test_three_day_scenario_badges() {
        // 1000 kcal on each of today, yesterday and the day before
        let logs = vec![
            record(0, ExerciseKind::Cardio, 1000, None),
            record(1, ExerciseKind::Cardio, 1000, None),
            record(2, ExerciseKind::Cardio, 1000, None),
        ];
        let snapshot = derive_default(&logs);

        assert_eq!(snapshot.total_calories, 3000);
        assert_eq!(snapshot.current_streak, 3);

        let by_id = |id: u32| snapshot.badges.iter().find(|b| b.id == id).unwrap();
        assert!(by_id(1).unlocked);
        assert!(by_id(3).unlocked, "3-day streak unlocks badge 3");
        assert!(!by_id(4).unlocked, "exactly 3000 kcal stays locked");
    }

    #[test]
    fn test_custom_goal_and_window() {
        let cfg = StatsConfig {
            goal_days: 10,
            heatmap_window_days: 7,
            ..Default::default()
        };
        let logs = vec![cardio(0), cardio(1)];
        let snapshot = derive(&logs, fixed_now(), &cfg);

        assert_eq!(snapshot.progress_percent, 20.0);
        assert_eq!(snapshot.heatmap.len(), 7);
    }

    #[test]
    fn test_bmi_unknown_without_weight() {
        let snapshot = derive_default(&[cardio(0)]);
        let reading = bmi_reading(&snapshot, "175");
        assert_eq!(reading, BmiReading::unknown());
        assert_eq!(reading.value, 0.0);
    }

    #[test]
    fn test_bmi_unknown_for_bad_height() {
        let snapshot = derive_default(&[record(0, ExerciseKind::Cardio, 0, Some(70.0))]);
        for height in ["", "abc", "0", "-175"] {
            assert_eq!(bmi_reading(&snapshot, height).class, BmiClass::Unknown);
        }
    }

    #[test]
    fn test_bmi_uses_most_recent_weight() {
        let logs = vec![
            record(0, ExerciseKind::Cardio, 0, Some(80.0)),
            record(10, ExerciseKind::Cardio, 0, Some(70.0)),
        ];
        let snapshot = derive_default(&logs);
        let reading = bmi_reading(&snapshot, "200");
        assert_eq!(reading.value, 20.0);
        assert_eq!(reading.class, BmiClass::Normal);
    }

    #[test]
    fn test_bmi_rounds_to_one_decimal() {
        let snapshot = derive_default(&[record(0, ExerciseKind::Cardio, 0, Some(70.25))]);
        let reading = bmi_reading(&snapshot, "175");
        // 70.25 / 1.75^2 = 22.938... -> 22.9
        assert_eq!(reading.value, 22.9);
        assert_eq!(reading.class, BmiClass::Normal);
    }

    #[test]
    fn test_bmi_band_boundaries() {
        // 2 m tall makes the divisor exactly 4
        let at_weight = |kg: f64| {
            let snapshot = derive_default(&[record(0, ExerciseKind::Cardio, 0, Some(kg))]);
            bmi_reading(&snapshot, "200")
        };

        assert_eq!(at_weight(70.0).class, BmiClass::Underweight); // 17.5
        assert_eq!(at_weight(74.0).class, BmiClass::Normal); // exactly 18.5
        assert_eq!(at_weight(95.6).class, BmiClass::Normal); // 23.9
        assert_eq!(at_weight(96.0).class, BmiClass::Overweight); // exactly 24.0
        assert_eq!(at_weight(111.6).class, BmiClass::Overweight); // 27.9
        assert_eq!(at_weight(112.0).class, BmiClass::Obese); // exactly 28.0
    }
}
