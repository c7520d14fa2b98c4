//! User profile store: durable keyed records with per-user atomic updates.
//!
//! Records live in a sharded concurrent map, so updates for unrelated users
//! never serialize on a common lock. Every mutation rewrites the full store
//! file before returning: the snapshot is written to a temp file in the same
//! directory, locked, synced, then atomically renamed over the old file.

use crate::types::{CounterKind, DailyCounters, ProfilePatch, UserRecord};
use crate::{Error, Result};
use dashmap::DashMap;
use fs2::FileExt;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tempfile::NamedTempFile;

/// File-backed map from user identifier to [`UserRecord`]
pub struct ProfileStore {
    path: PathBuf,
    records: DashMap<String, UserRecord>,
    // Serializes whole-file rewrites; record mutations do not take this lock.
    io_lock: Mutex<()>,
}

impl ProfileStore {
    /// Open a store backed by the given file.
    ///
    /// A missing file is an empty store. A file that cannot be read or
    /// parsed logs a warning and starts empty rather than refusing to run.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let records = match load_records(&path) {
            Ok(map) => map,
            Err(e) => {
                tracing::warn!(
                    "Unable to load store file {:?}: {}. Starting empty.",
                    path,
                    e
                );
                DashMap::new()
            }
        };

        Ok(Self {
            path,
            records,
            io_lock: Mutex::new(()),
        })
    }

    /// Fetch a user's record. Absent means "no profile set"; never fails.
    pub fn get(&self, user_id: &str) -> Option<UserRecord> {
        self.records.get(user_id).map(|r| r.value().clone())
    }

    /// Merge the supplied fields into the user's record, creating it if
    /// absent. Unspecified fields keep their prior values. The merge is
    /// atomic per user and the full store is persisted before returning.
    pub fn upsert(&self, user_id: &str, patch: &ProfilePatch) -> Result<UserRecord> {
        let merged = {
            let mut entry = self.records.entry(user_id.to_string()).or_default();
            patch.apply_to(&mut entry);
            entry.value().clone()
        };
        self.persist()?;
        tracing::debug!("Upserted record for user {}", user_id);
        Ok(merged)
    }

    /// Add a positive delta to one of the user's daily counters, creating
    /// the record (and the counter at 0) if absent. Returns the new running
    /// total. A delta that is not a positive finite number is rejected with
    /// the stored counter untouched.
    pub fn increment_counter(
        &self,
        user_id: &str,
        counter: CounterKind,
        delta: f64,
    ) -> Result<f64> {
        if delta <= 0.0 || !delta.is_finite() {
            return Err(Error::invalid_input(format!(
                "{} delta must be a positive number, got {delta}",
                counter.field_name()
            )));
        }

        let total = {
            let mut entry = self.records.entry(user_id.to_string()).or_default();
            let slot = counter.get_mut(&mut entry.counters);
            *slot += delta;
            *slot
        };
        self.persist()?;
        tracing::debug!(
            "Incremented {} by {} for user {} (total {})",
            counter.field_name(),
            delta,
            user_id,
            total
        );
        Ok(total)
    }

    /// Daily rollover for one user: optionally replace the derived norms,
    /// then zero all three counters. One atomic record update; no other
    /// field is touched. No-op for an unknown user.
    pub fn apply_daily_reset(
        &self,
        user_id: &str,
        new_norms: Option<(f64, f64)>,
    ) -> Result<()> {
        let found = {
            match self.records.get_mut(user_id) {
                Some(mut record) => {
                    if let Some((water_norm_ml, calories_norm_kcal)) = new_norms {
                        record.water_norm_ml = Some(water_norm_ml);
                        record.calories_norm_kcal = Some(calories_norm_kcal);
                    }
                    record.counters = DailyCounters::default();
                    true
                }
                None => false,
            }
        };

        if found {
            self.persist()?;
        }
        Ok(())
    }

    /// Snapshot of the stored user identifiers, sorted
    pub fn user_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.records.iter().map(|e| e.key().clone()).collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Write the full store to disk: temp file, exclusive lock, fsync,
    /// atomic rename over the old file.
    fn persist(&self) -> Result<()> {
        let _io = self.io_lock.lock().unwrap_or_else(PoisonError::into_inner);

        // Stable key order keeps the file diffable between rewrites
        let snapshot: BTreeMap<String, UserRecord> = self
            .records
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect();

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let temp = NamedTempFile::new_in(self.path.parent().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::Other, "store path missing parent")
        })?)?;

        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string_pretty(&snapshot)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(&self.path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Persisted {} records to {:?}", snapshot.len(), self.path);
        Ok(())
    }
}

/// Read the store file under a shared lock
fn load_records(path: &Path) -> Result<DashMap<String, UserRecord>> {
    if !path.exists() {
        tracing::info!("No store file found at {:?}, starting empty", path);
        return Ok(DashMap::new());
    }

    let file = File::open(path)?;
    file.lock_shared()?;

    let mut contents = String::new();
    let mut reader = std::io::BufReader::new(&file);
    let read_result = reader.read_to_string(&mut contents);
    file.unlock()?;
    read_result?;

    let parsed: BTreeMap<String, UserRecord> = serde_json::from_str(&contents)?;
    tracing::debug!("Loaded {} records from {:?}", parsed.len(), path);
    Ok(parsed.into_iter().collect())
}
