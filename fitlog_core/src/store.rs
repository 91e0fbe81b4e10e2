//! Log store clients.
//!
//! All persistence lives behind the `LogStore` trait; the stats engine only
//! ever sees the fully materialized collection a store returns. Two
//! backends:
//! - `JsonlStore`: append-only JSON Lines file with file locking (default)
//! - `RestStore`: thin client for a hosted PostgREST-style table
//!
//! Both uphold the ordering contract that `list` returns records newest
//! first.

use crate::config::{Config, StoreBackend, StoreConfig};
use crate::types::LogRecord;
use crate::{Error, Result};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Store seam for fetching and mutating log records.
///
/// The caller refetches the full collection after every mutation and
/// re-derives stats from it; stores never push partial updates.
pub trait LogStore {
    /// All records for the given identity, newest first
    fn list(&self, user_id: &str) -> Result<Vec<LogRecord>>;

    fn create(&mut self, record: &LogRecord) -> Result<()>;

    fn delete(&mut self, id: Uuid) -> Result<()>;
}

/// Open the configured store backend
pub fn open_store(config: &Config, data_dir: &Path) -> Box<dyn LogStore> {
    match config.store.backend {
        StoreBackend::Jsonl => {
            Box::new(JsonlStore::new(data_dir.join("fitness_logs.jsonl")))
        }
        StoreBackend::Rest => Box::new(RestStore::new(&config.store)),
    }
}

// ============================================================================
// JSONL backend
// ============================================================================

/// JSONL-based log store with file locking
pub struct JsonlStore {
    path: PathBuf,
}

impl JsonlStore {
    /// Create a new JSONL store for the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Ensure the parent directory exists
    fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    /// Read every record in the file, skipping unparseable lines
    fn read_all(&self) -> Result<Vec<LogRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)?;
        // Shared lock for reading
        file.lock_shared()?;

        let reader = BufReader::new(&file);
        let mut records = Vec::new();

        for (line_num, line_result) in reader.lines().enumerate() {
            let line = line_result?;
            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str::<LogRecord>(&line) {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::warn!("Failed to parse record at line {}: {}", line_num + 1, e);
                    // Continue reading, don't fail completely
                }
            }
        }

        file.unlock()?;
        tracing::debug!("Read {} records from {:?}", records.len(), self.path);
        Ok(records)
    }

    /// Atomically replace the file contents with the given records
    fn rewrite(&self, records: &[LogRecord]) -> Result<()> {
        self.ensure_parent_dir()?;

        let parent = self.path.parent().ok_or_else(|| {
            Error::Store(format!("store path {:?} has no parent", self.path))
        })?;

        // Write to a temp file in the same directory for atomic rename
        let temp = tempfile::NamedTempFile::new_in(parent)?;
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            for record in records {
                let line = serde_json::to_string(record)?;
                writer.write_all(line.as_bytes())?;
                writer.write_all(b"\n")?;
            }
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;
        temp.persist(&self.path).map_err(|e| Error::Io(e.error))?;
        Ok(())
    }
}

impl LogStore for JsonlStore {
    fn list(&self, user_id: &str) -> Result<Vec<LogRecord>> {
        let mut records: Vec<LogRecord> = self
            .read_all()?
            .into_iter()
            .filter(|r| r.user_id == user_id)
            .collect();

        // Newest first
        records.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(records)
    }

    fn create(&mut self, record: &LogRecord) -> Result<()> {
        self.ensure_parent_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        // Exclusive lock for the append
        file.lock_exclusive()?;

        let mut writer = std::io::BufWriter::new(&file);
        let line = serde_json::to_string(record)?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        file.unlock()?;

        tracing::debug!("Appended record {} to {:?}", record.id, self.path);
        Ok(())
    }

    fn delete(&mut self, id: Uuid) -> Result<()> {
        let records = self.read_all()?;
        let remaining: Vec<LogRecord> = records
            .iter()
            .filter(|r| r.id != id)
            .cloned()
            .collect();

        if remaining.len() == records.len() {
            return Err(Error::Store(format!("no record with id {}", id)));
        }

        self.rewrite(&remaining)?;
        tracing::debug!("Deleted record {} from {:?}", id, self.path);
        Ok(())
    }
}

// ============================================================================
// REST backend
// ============================================================================

/// Thin client for a PostgREST-style hosted table.
///
/// Records live in a single table, filtered by `user_id` and ordered by
/// `date` descending. Failures map to `Error::Store` with the response
/// status and body; callers surface them once and never retry.
pub struct RestStore {
    http: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
    table: String,
}

impl RestStore {
    /// Create a client from the store configuration
    pub fn new(cfg: &StoreConfig) -> Self {
        Self {
            http: reqwest::blocking::Client::new(),
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            api_key: cfg.api_key.clone(),
            table: cfg.table.clone(),
        }
    }

    pub(crate) fn endpoint(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }

    /// Map a non-2xx response to a store error with status and body
    fn check(
        &self,
        response: reqwest::blocking::Response,
    ) -> Result<reqwest::blocking::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().unwrap_or_default();
        Err(Error::Store(format!(
            "store returned {}: {}",
            status, body
        )))
    }
}

impl LogStore for RestStore {
    fn list(&self, user_id: &str) -> Result<Vec<LogRecord>> {
        let user_filter = format!("eq.{}", user_id);
        let response = self
            .http
            .get(self.endpoint())
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .query(&[
                ("select", "*"),
                ("user_id", user_filter.as_str()),
                ("order", "date.desc"),
            ])
            .send()?;

        let records = self.check(response)?.json::<Vec<LogRecord>>()?;
        tracing::debug!("Fetched {} records for {}", records.len(), user_id);
        Ok(records)
    }

    fn create(&mut self, record: &LogRecord) -> Result<()> {
        let response = self
            .http
            .post(self.endpoint())
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Prefer", "return=minimal")
            .json(&[record])
            .send()?;

        self.check(response)?;
        Ok(())
    }

    fn delete(&mut self, id: Uuid) -> Result<()> {
        let response = self
            .http
            .delete(self.endpoint())
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .query(&[("id", format!("eq.{}", id))])
            .send()?;

        self.check(response)?;
        Ok(())
    }
}
