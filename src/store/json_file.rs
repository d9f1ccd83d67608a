//! JSON-document store backend.
//!
//! Persists the sample log and user table as two JSON files in a data
//! directory, in the same document shape as the export format (camelCase
//! fields), so a store directory is directly inspectable. Writes go to a
//! temp file first and are renamed into place, so a crash never leaves a
//! half-written document. A process-wide mutex serializes the
//! read-modify-write cycle per store; this backend assumes a single writing
//! process.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use chrono::Utc;
use log::warn;
use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::error::{CollectError, CollectResult};
use crate::model::{NewSample, StoredSample, UserRecord};
use crate::store::SampleStore;

const DRAWINGS_FILE: &str = "drawings.json";
const USERS_FILE: &str = "users.json";

/// File-backed store rooted at one directory.
#[derive(Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    /// Opens (creating if needed) a store directory.
    pub fn open(dir: impl Into<PathBuf>) -> CollectResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| {
            CollectError::Persistence(format!(
                "failed to create store directory {}: {}",
                dir.display(),
                e
            ))
        })?;
        Ok(Self {
            dir,
            lock: Mutex::new(()),
        })
    }

    fn guard(&self) -> CollectResult<std::sync::MutexGuard<'_, ()>> {
        self.lock
            .lock()
            .map_err(|_| CollectError::Persistence("store lock poisoned".to_string()))
    }

    fn read_document<T: DeserializeOwned>(&self, name: &str) -> CollectResult<Option<T>> {
        let path = self.dir.join(name);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(CollectError::Persistence(format!(
                    "failed to read {}: {}",
                    path.display(),
                    e
                )));
            }
        };
        let value = serde_json::from_slice(&bytes).map_err(|e| {
            CollectError::Persistence(format!("failed to parse {}: {}", path.display(), e))
        })?;
        Ok(Some(value))
    }

    /// Writes a document to a temp file, then renames it into place.
    fn write_document<T: Serialize>(&self, name: &str, value: &T) -> CollectResult<()> {
        let path = self.dir.join(name);
        let tmp = self.dir.join(format!("{}.tmp", name));

        let json = serde_json::to_string_pretty(value)
            .map_err(|e| CollectError::Persistence(format!("failed to serialize {}: {}", name, e)))?;
        fs::write(&tmp, json).map_err(|e| {
            CollectError::Persistence(format!("failed to write {}: {}", tmp.display(), e))
        })?;
        fs::rename(&tmp, &path).map_err(|e| {
            CollectError::Persistence(format!("failed to replace {}: {}", path.display(), e))
        })?;
        Ok(())
    }

    /// Strict load for mutation paths: any malformed row is an error, so a
    /// rewrite can never silently drop data.
    fn load_samples_strict(&self) -> CollectResult<Vec<StoredSample>> {
        let samples: Vec<StoredSample> = self.read_document(DRAWINGS_FILE)?.unwrap_or_default();
        for sample in &samples {
            sample.validate().map_err(|e| {
                CollectError::Persistence(format!(
                    "malformed sample {} in {}: {}",
                    sample.id, DRAWINGS_FILE, e
                ))
            })?;
        }
        Ok(samples)
    }

    /// Lenient load for listing: malformed rows are skipped with a warning
    /// instead of poisoning the whole snapshot.
    fn load_samples_lenient(&self) -> CollectResult<Vec<StoredSample>> {
        let rows: Vec<serde_json::Value> = self.read_document(DRAWINGS_FILE)?.unwrap_or_default();

        let mut samples = Vec::with_capacity(rows.len());
        for (index, row) in rows.into_iter().enumerate() {
            match serde_json::from_value::<StoredSample>(row) {
                Ok(sample) => match sample.validate() {
                    Ok(()) => samples.push(sample),
                    Err(e) => warn!("skipping sample row {}: {}", index, e),
                },
                Err(e) => warn!("skipping unparseable sample row {}: {}", index, e),
            }
        }
        Ok(samples)
    }

    fn load_users(&self) -> CollectResult<HashMap<String, UserRecord>> {
        Ok(self.read_document(USERS_FILE)?.unwrap_or_default())
    }

    fn remove_if_present(&self, name: &str) -> CollectResult<()> {
        let path = self.dir.join(name);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CollectError::Persistence(format!(
                "failed to remove {}: {}",
                path.display(),
                e
            ))),
        }
    }
}

impl SampleStore for JsonFileStore {
    fn append(&self, sample: NewSample) -> CollectResult<StoredSample> {
        crate::model::validate_sample(&sample.username, sample.digit, &sample.pixels)?;

        let _guard = self.guard()?;
        let mut samples = self.load_samples_strict()?;

        let stored = StoredSample {
            id: Uuid::new_v4().to_string(),
            username: sample.username,
            digit: sample.digit,
            pixels: sample.pixels,
            captured_at: sample.captured_at,
        };
        samples.push(stored.clone());
        self.write_document(DRAWINGS_FILE, &samples)?;
        Ok(stored)
    }

    fn increment_or_create_user(&self, username: &str) -> CollectResult<UserRecord> {
        let _guard = self.guard()?;
        let mut users = self.load_users()?;

        let record = users.entry(username.to_string()).or_insert_with(|| UserRecord {
            contribution_count: 0,
            joined_at: Utc::now(),
        });
        record.contribution_count += 1;
        let record = record.clone();

        self.write_document(USERS_FILE, &users)?;
        Ok(record)
    }

    fn decrement_user(&self, username: &str) -> CollectResult<()> {
        let _guard = self.guard()?;
        let mut users = self.load_users()?;

        if let Some(record) = users.get_mut(username) {
            record.contribution_count = record.contribution_count.saturating_sub(1);
            self.write_document(USERS_FILE, &users)?;
        }
        Ok(())
    }

    fn list_samples(&self) -> CollectResult<Vec<StoredSample>> {
        let _guard = self.guard()?;
        self.load_samples_lenient()
    }

    fn list_users(&self) -> CollectResult<HashMap<String, UserRecord>> {
        let _guard = self.guard()?;
        self.load_users()
    }

    fn clear_all(&self) -> CollectResult<()> {
        let _guard = self.guard()?;
        self.remove_if_present(DRAWINGS_FILE)?;
        self.remove_if_present(USERS_FILE)?;
        Ok(())
    }

    fn reconcile(&self) -> CollectResult<()> {
        let _guard = self.guard()?;
        let samples = self.load_samples_lenient()?;
        let old_users = self.load_users()?;

        let mut users: HashMap<String, UserRecord> = HashMap::new();
        for sample in &samples {
            let record = users
                .entry(sample.username.clone())
                .or_insert_with(|| UserRecord {
                    contribution_count: 0,
                    joined_at: old_users
                        .get(&sample.username)
                        .map(|r| r.joined_at)
                        .unwrap_or(sample.captured_at),
                });
            record.contribution_count += 1;
            if !old_users.contains_key(&sample.username) && sample.captured_at < record.joined_at {
                record.joined_at = sample.captured_at;
            }
        }

        self.write_document(USERS_FILE, &users)
    }
}
