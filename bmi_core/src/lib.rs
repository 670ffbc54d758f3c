#![forbid(unsafe_code)]

//! Core domain model and business logic for the BMI tracker.
//!
//! This crate provides:
//! - Domain types (unit systems, categories, measurements)
//! - Input validation and unit conversion
//! - BMI engine (value, category, health risk, ideal weight, indicator)
//! - Persistence (key-value storage, bounded history, theme)
//! - Trend view and presentation payloads

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod units;
pub mod validation;
pub mod engine;
pub mod storage;
pub mod history;
pub mod theme;
pub mod trend;
pub mod report;
pub mod controller;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use validation::{validate, InputError, RawInput, ValidInput};
pub use engine::{compute, BmiResult, IdealWeightRange};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use history::{HistoryStore, MAX_HISTORY_ITEMS};
pub use theme::Theme;
pub use trend::TrendView;
pub use report::{Notice, ResultReport, Severity};
pub use controller::{Calculator, Submission};
