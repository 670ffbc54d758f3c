//! Bounded measurement history.
//!
//! The log is kept newest-first under a single key and rewritten in full on
//! every mutation, so the persisted snapshot always equals the post-mutation
//! state. Unreadable history degrades to an empty log instead of an error.

use crate::engine::classify_adult;
use crate::storage::KeyValueStore;
use crate::{Measurement, Result, UnitSystem};
use chrono::{Local, NaiveDate, TimeZone};
use serde::Deserialize;
use std::path::Path;
use tempfile::NamedTempFile;

/// Storage key of the serialized history log
pub const HISTORY_KEY: &str = "bmiHistory";

/// Storage key of the single-record snapshot written by older versions
pub const LEGACY_KEY: &str = "lastBmi";

pub const MAX_HISTORY_ITEMS: usize = 30;

/// Column order of the CSV export
const CSV_HEADER: [&str; 8] = ["id", "date", "time", "bmi", "category", "age", "gender", "unit"];

/// Measurement log persisted through a key-value store
pub struct HistoryStore<S> {
    store: S,
}

impl<S: KeyValueStore> HistoryStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Prepend a measurement, evict beyond the cap, and persist
    pub fn record(&mut self, measurement: Measurement) -> Result<()> {
        let mut log = self.list();
        log.insert(0, measurement);

        if log.len() > MAX_HISTORY_ITEMS {
            tracing::debug!("Evicting {} oldest measurements", log.len() - MAX_HISTORY_ITEMS);
            log.truncate(MAX_HISTORY_ITEMS);
        }

        self.save(&log)?;
        tracing::info!("Recorded measurement, history now holds {}", log.len());
        Ok(())
    }

    /// All measurements, newest first
    ///
    /// Missing, unreadable or corrupted history yields an empty log.
    pub fn list(&self) -> Vec<Measurement> {
        let contents = match self.store.get(HISTORY_KEY) {
            Ok(Some(c)) => c,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!("Unable to read history: {}. Using empty history.", e);
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<Measurement>>(&contents) {
            Ok(log) => log,
            Err(e) => {
                tracing::warn!("Failed to parse history: {}. Using empty history.", e);
                Vec::new()
            }
        }
    }

    /// The `n` most recent measurements
    pub fn recent(&self, n: usize) -> Vec<Measurement> {
        let mut log = self.list();
        log.truncate(n);
        log
    }

    /// Empty the log and drop its persisted snapshot
    pub fn clear(&mut self) -> Result<()> {
        self.store.remove(HISTORY_KEY)?;
        tracing::info!("Cleared measurement history");
        Ok(())
    }

    /// Seed an empty history from an old single-record snapshot
    ///
    /// Returns the imported measurement, if any. The legacy key is removed
    /// once the history holds the converted record; a snapshot that cannot
    /// be parsed is dropped.
    pub fn import_legacy(&mut self) -> Result<Option<Measurement>> {
        let contents = match self.store.get(LEGACY_KEY) {
            Ok(Some(c)) => c,
            Ok(None) => return Ok(None),
            Err(e) => {
                tracing::warn!("Unable to read legacy snapshot: {}", e);
                return Ok(None);
            }
        };

        if !self.list().is_empty() {
            tracing::debug!("History already populated, leaving legacy snapshot alone");
            return Ok(None);
        }

        let imported = match serde_json::from_str::<LegacySnapshot>(&contents) {
            Ok(snapshot) => Some(snapshot.into_measurement()),
            Err(e) => {
                tracing::warn!("Dropping unreadable legacy snapshot: {}", e);
                None
            }
        };

        if let Some(ref m) = imported {
            self.save(std::slice::from_ref(m))?;
            tracing::info!("Imported legacy measurement from {}", m.date);
        }
        self.store.remove(LEGACY_KEY)?;

        Ok(imported)
    }

    /// Write the whole log as CSV, newest first
    ///
    /// Returns the number of rows written.
    pub fn export_csv(&self, path: &Path) -> Result<usize> {
        let log = self.list();

        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent)?;
        let temp = NamedTempFile::new_in(parent)?;

        {
            let mut writer = csv::Writer::from_writer(temp.as_file());
            // serialize() only emits the header along with the first record
            if log.is_empty() {
                writer.write_record(CSV_HEADER)?;
            }
            for m in &log {
                writer.serialize(CsvRow::from(m))?;
            }
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.persist(path).map_err(|e| crate::Error::Io(e.error))?;

        tracing::info!("Exported {} measurements to {:?}", log.len(), path);
        Ok(log.len())
    }

    fn save(&mut self, log: &[Measurement]) -> Result<()> {
        let contents = serde_json::to_string(log)?;
        self.store.set(HISTORY_KEY, &contents)
    }
}

/// `{bmi, date}` record kept by the single-measurement variant
#[derive(Debug, Deserialize)]
struct LegacySnapshot {
    bmi: f64,
    date: String,
}

impl LegacySnapshot {
    fn into_measurement(self) -> Measurement {
        let midnight = NaiveDate::parse_from_str(&self.date, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .and_then(|dt| Local.from_local_datetime(&dt).earliest());

        let id = midnight.map(|t| t.timestamp_millis()).unwrap_or(0);

        Measurement {
            id,
            bmi: self.bmi,
            category: classify_adult(self.bmi),
            date: self.date,
            time: String::new(),
            age: None,
            gender: None,
            unit: UnitSystem::Metric,
        }
    }
}

/// A row in the CSV export
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    id: i64,
    date: String,
    time: String,
    bmi: f64,
    category: String,
    age: Option<u8>,
    gender: Option<String>,
    unit: String,
}

impl From<&Measurement> for CsvRow {
    fn from(m: &Measurement) -> Self {
        CsvRow {
            id: m.id,
            date: m.date.clone(),
            time: m.time.clone(),
            bmi: m.bmi,
            category: m.category.to_string(),
            age: m.age,
            gender: m.gender.map(|g| g.to_string()),
            unit: m.unit.to_string(),
        }
    }
}
