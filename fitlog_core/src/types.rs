//! Core domain types for the Fitlog check-in tracker.
//!
//! This module defines the fundamental types used throughout the system:
//! - Log records as stored in the fitness_logs table
//! - The derived stats snapshot and its parts
//! - Badges and BMI classification

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Log Records
// ============================================================================

/// Kind of exercise performed in a session
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseKind {
    Cardio,
    Strength,
}

impl ExerciseKind {
    /// Human-readable session label
    pub fn label(&self) -> &'static str {
        match self {
            ExerciseKind::Cardio => "Cardio Session",
            ExerciseKind::Strength => "Strength Training",
        }
    }
}

/// A logged workout session (one daily check-in).
///
/// Field names follow the fitness_logs table columns so records serialize
/// directly to the wire format of the REST store.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LogRecord {
    pub id: Uuid,
    pub user_id: String,
    /// Session timestamp, the chronological ordering key
    pub date: DateTime<Utc>,
    /// Minutes of exercise, 0 when not recorded
    #[serde(rename = "duration", default)]
    pub duration_minutes: u32,
    #[serde(rename = "type")]
    pub kind: ExerciseKind,
    /// Kilocalories burned, 0 when not recorded
    #[serde(default)]
    pub calories: u32,
    /// Body weight on the day, absent when not recorded
    #[serde(rename = "weight", default)]
    pub weight_kg: Option<f64>,
    /// Always true for a created record; there are no partial check-ins
    pub checked_in: bool,
}

// ============================================================================
// Derived Stats
// ============================================================================

/// A single point on the weight trend, oldest first in the snapshot
#[derive(Clone, Debug, PartialEq)]
pub struct WeightPoint {
    /// Short numeric month/day label, e.g. "8/6"
    pub date_label: String,
    pub weight_kg: f64,
}

/// One cell of the trailing activity heatmap
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeatmapDay {
    pub date: NaiveDate,
    pub active: bool,
}

/// An achievement badge with its evaluated unlock state
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Badge {
    pub id: u32,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub unlocked: bool,
}

/// The full derived statistics snapshot.
///
/// Recomputed wholesale from the complete record collection after every
/// fetch, insert or delete; never persisted and never partially mutated.
#[derive(Clone, Debug)]
pub struct StatsSnapshot {
    /// Raw record count. Multiple check-ins on one calendar day each count;
    /// streak and heatmap dedup by date, this deliberately does not.
    pub total_days: usize,
    pub goal_days: u32,
    /// Completion percentage, clamped to [0, 100]
    pub progress_percent: f64,
    pub total_calories: u64,
    pub total_duration_minutes: u64,
    /// Consecutive active days ending today or yesterday
    pub current_streak: u32,
    /// Recorded weights in chronological order, oldest first
    pub weight_history: Vec<WeightPoint>,
    pub cardio_count: usize,
    pub strength_count: usize,
    pub badges: Vec<Badge>,
    /// Trailing window of calendar days, oldest first, newest (today) last
    pub heatmap: Vec<HeatmapDay>,
}

impl StatsSnapshot {
    /// Days still to go before the goal is reached
    pub fn remaining_days(&self) -> u32 {
        self.goal_days.saturating_sub(self.total_days as u32)
    }
}

// ============================================================================
// BMI
// ============================================================================

/// BMI classification bands
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BmiClass {
    Underweight,
    Normal,
    Overweight,
    Obese,
    /// No recorded weight, or an unusable height input
    Unknown,
}

impl BmiClass {
    /// Classify an already-rounded BMI value.
    ///
    /// Band edges are inclusive on the upper side: 24.0 is Overweight and
    /// 28.0 is Obese.
    pub fn classify(bmi: f64) -> Self {
        if bmi < 18.5 {
            BmiClass::Underweight
        } else if bmi < 24.0 {
            BmiClass::Normal
        } else if bmi < 28.0 {
            BmiClass::Overweight
        } else {
            BmiClass::Obese
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BmiClass::Underweight => "Underweight",
            BmiClass::Normal => "Normal",
            BmiClass::Overweight => "Overweight",
            BmiClass::Obese => "Obese",
            BmiClass::Unknown => "Unknown",
        }
    }
}

/// A computed BMI value with its classification
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BmiReading {
    /// BMI rounded to one decimal, 0.0 when unknown
    pub value: f64,
    pub class: BmiClass,
}

impl BmiReading {
    /// Neutral reading used when weight or height is unavailable
    pub fn unknown() -> Self {
        Self {
            value: 0.0,
            class: BmiClass::Unknown,
        }
    }
}
