//! Core data types: collected samples and contributor records.
//!
//! Wire field names (`imageData`, `timestamp`, `count`, `joinedAt`) match the
//! export format consumed by downstream tooling, so the serde renames here are
//! part of the contract, not cosmetics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CollectError, CollectResult};

/// Pixels per canonical sample: 28 rows of 28 grayscale values.
pub const PIXEL_COUNT: usize = 784;

/// A labeled drawing as submitted, before the store assigns an id.
#[derive(Debug, Clone)]
pub struct NewSample {
    /// Contributor name, trimmed and non-empty
    pub username: String,
    /// The digit the contributor was prompted to draw (0-9)
    pub digit: u8,
    /// Row-major 28x28 grayscale, 0 = background, 255 = full ink
    pub pixels: Vec<u8>,
    /// Submission time
    pub captured_at: DateTime<Utc>,
}

/// A persisted drawing with its store-assigned id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredSample {
    /// Unique id, assigned at append time
    pub id: String,
    /// Contributor name
    pub username: String,
    /// The prompted digit (0-9)
    pub digit: u8,
    /// Row-major 28x28 grayscale, 0 = background, 255 = full ink
    #[serde(rename = "imageData")]
    pub pixels: Vec<u8>,
    /// Submission time
    #[serde(rename = "timestamp")]
    pub captured_at: DateTime<Utc>,
}

/// Per-contributor running state, keyed by username in the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    /// Number of successfully persisted samples for this username
    #[serde(rename = "count")]
    pub contribution_count: u64,
    /// Time of the first successful sample; never mutated afterwards
    #[serde(rename = "joinedAt")]
    pub joined_at: DateTime<Utc>,
}

/// Checks the sample invariants before any store mutation.
///
/// Rejects an empty (post-trim) username, a digit outside 0-9, and a pixel
/// buffer that is not exactly [`PIXEL_COUNT`] long. A wrong pixel count is a
/// capture defect, never a valid degenerate sample.
pub fn validate_sample(username: &str, digit: u8, pixels: &[u8]) -> CollectResult<()> {
    if username.trim().is_empty() {
        return Err(CollectError::Validation(
            "username must not be empty".to_string(),
        ));
    }
    if digit > 9 {
        return Err(CollectError::Validation(format!(
            "digit must be 0-9, got {}",
            digit
        )));
    }
    if pixels.len() != PIXEL_COUNT {
        return Err(CollectError::Validation(format!(
            "expected {} pixels, got {}",
            PIXEL_COUNT,
            pixels.len()
        )));
    }
    Ok(())
}

impl StoredSample {
    /// Validates the invariants on a sample read back from a store.
    ///
    /// Used at the deserialization boundary so that malformed rows are
    /// rejected instead of flowing into aggregation.
    pub fn validate(&self) -> CollectResult<()> {
        validate_sample(&self.username, self.digit, &self.pixels)
    }
}
