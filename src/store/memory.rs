//! In-process store backend.
//!
//! A single mutex guards both collections, which makes the two-row lifecycle
//! of a submission (counter upsert, sample append) trivially atomic per
//! process. Used as the test backend and for throwaway sessions.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::Utc;
use uuid::Uuid;

use crate::error::{CollectError, CollectResult};
use crate::model::{NewSample, StoredSample, UserRecord};
use crate::store::SampleStore;

#[derive(Debug, Default)]
struct Collections {
    samples: Vec<StoredSample>,
    users: HashMap<String, UserRecord>,
}

/// Mutex-guarded in-memory backend.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Collections>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> CollectResult<std::sync::MutexGuard<'_, Collections>> {
        self.inner
            .lock()
            .map_err(|_| CollectError::Persistence("store lock poisoned".to_string()))
    }
}

impl SampleStore for MemoryStore {
    fn append(&self, sample: NewSample) -> CollectResult<StoredSample> {
        crate::model::validate_sample(&sample.username, sample.digit, &sample.pixels)?;

        let stored = StoredSample {
            id: Uuid::new_v4().to_string(),
            username: sample.username,
            digit: sample.digit,
            pixels: sample.pixels,
            captured_at: sample.captured_at,
        };

        let mut inner = self.lock()?;
        inner.samples.push(stored.clone());
        Ok(stored)
    }

    fn increment_or_create_user(&self, username: &str) -> CollectResult<UserRecord> {
        let mut inner = self.lock()?;
        let record = inner
            .users
            .entry(username.to_string())
            .or_insert_with(|| UserRecord {
                contribution_count: 0,
                joined_at: Utc::now(),
            });
        record.contribution_count += 1;
        Ok(record.clone())
    }

    fn decrement_user(&self, username: &str) -> CollectResult<()> {
        let mut inner = self.lock()?;
        if let Some(record) = inner.users.get_mut(username) {
            record.contribution_count = record.contribution_count.saturating_sub(1);
        }
        Ok(())
    }

    fn list_samples(&self) -> CollectResult<Vec<StoredSample>> {
        Ok(self.lock()?.samples.clone())
    }

    fn list_users(&self) -> CollectResult<HashMap<String, UserRecord>> {
        Ok(self.lock()?.users.clone())
    }

    fn clear_all(&self) -> CollectResult<()> {
        let mut inner = self.lock()?;
        inner.samples.clear();
        inner.users.clear();
        Ok(())
    }

    fn reconcile(&self) -> CollectResult<()> {
        let mut inner = self.lock()?;

        let mut counts: HashMap<String, u64> = HashMap::new();
        let mut earliest: HashMap<String, chrono::DateTime<Utc>> = HashMap::new();
        for sample in &inner.samples {
            *counts.entry(sample.username.clone()).or_insert(0) += 1;
            earliest
                .entry(sample.username.clone())
                .and_modify(|t| {
                    if sample.captured_at < *t {
                        *t = sample.captured_at;
                    }
                })
                .or_insert(sample.captured_at);
        }

        let old_users = std::mem::take(&mut inner.users);
        inner.users = counts
            .into_iter()
            .map(|(username, count)| {
                let joined_at = old_users
                    .get(&username)
                    .map(|r| r.joined_at)
                    .unwrap_or_else(|| earliest[&username]);
                (
                    username,
                    UserRecord {
                        contribution_count: count,
                        joined_at,
                    },
                )
            })
            .collect();
        Ok(())
    }
}
