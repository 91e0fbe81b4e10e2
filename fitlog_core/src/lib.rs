#![forbid(unsafe_code)]

//! Core domain model and business logic for the Fitlog check-in tracker.
//!
//! This crate provides:
//! - Domain types (log records, stats snapshots, badges)
//! - The stats derivation engine (streak, progress, heatmap, BMI)
//! - Badge catalog
//! - Log store clients (local JSONL, remote REST)
//! - Configuration

pub mod types;
pub mod error;
pub mod badges;
pub mod config;
pub mod logging;
pub mod store;
pub mod stats;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use badges::badge_catalog;
pub use config::Config;
pub use store::{open_store, JsonlStore, LogStore, RestStore};
pub use stats::{bmi_reading, derive};
