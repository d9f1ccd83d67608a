//! Durable persistence boundary for samples and contributor counters.
//!
//! The core only talks to the [`SampleStore`] trait. Two backends ship:
//! an in-process [`MemoryStore`] and a JSON-document [`JsonFileStore`].

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

use std::collections::HashMap;

use crate::error::CollectResult;
use crate::model::{NewSample, StoredSample, UserRecord};

/// Append-only sample log plus per-user counters.
///
/// `increment_or_create_user` must be atomic per username: two concurrent
/// submissions for the same name must never both read a stale counter and
/// write back the same value. Submissions for different usernames need no
/// coordination.
pub trait SampleStore {
    /// Appends a sample and returns it with its assigned id.
    ///
    /// Fails with [`crate::error::CollectError::Persistence`] on any I/O
    /// failure and must not partially persist.
    fn append(&self, sample: NewSample) -> CollectResult<StoredSample>;

    /// Atomically increments the counter for `username`, creating the record
    /// with count 1 and `joined_at = now` on first contact.
    fn increment_or_create_user(&self, username: &str) -> CollectResult<UserRecord>;

    /// Compensation hook: undoes one increment after a failed append.
    ///
    /// Saturates at zero; unknown usernames are a no-op.
    fn decrement_user(&self, username: &str) -> CollectResult<()>;

    /// Snapshot of the sample log. Order is unspecified; aggregation imposes
    /// its own.
    fn list_samples(&self) -> CollectResult<Vec<StoredSample>>;

    /// Snapshot of all user records, keyed by username.
    fn list_users(&self) -> CollectResult<HashMap<String, UserRecord>>;

    /// Administrative bulk delete of both collections. Irreversible.
    fn clear_all(&self) -> CollectResult<()>;

    /// Maintenance: recomputes every contribution counter from the sample
    /// log, repairing any drift. Records with no remaining samples are
    /// dropped; `joined_at` is preserved where a record already exists.
    fn reconcile(&self) -> CollectResult<()>;
}
