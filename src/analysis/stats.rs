//! Admin statistics over the sample log.

use std::collections::HashMap;

use serde::Serialize;

use crate::model::{StoredSample, UserRecord};

/// Summary figures for the admin dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct AdminStats {
    /// Total persisted samples
    pub total_samples: usize,
    /// Total distinct contributors
    pub total_users: usize,
    /// Samples per contributor, rounded to one decimal (0 with no users)
    pub avg_per_user: f64,
    /// Sample count per digit; all ten buckets always present
    pub digit_histogram: [u64; 10],
}

/// Computes totals, the per-digit histogram, and the per-user average.
///
/// The histogram is pre-seeded with all ten buckets so digits absent from
/// the log still report zero.
pub fn compute_admin_stats(
    samples: &[StoredSample],
    users: &HashMap<String, UserRecord>,
) -> AdminStats {
    let mut digit_histogram = [0u64; 10];
    for sample in samples {
        if let Some(bucket) = digit_histogram.get_mut(sample.digit as usize) {
            *bucket += 1;
        }
    }

    let total_samples = samples.len();
    let total_users = users.len();
    let avg_per_user = if total_users == 0 {
        0.0
    } else {
        (total_samples as f64 / total_users as f64 * 10.0).round() / 10.0
    };

    AdminStats {
        total_samples,
        total_users,
        avg_per_user,
        digit_histogram,
    }
}

/// Case-insensitive substring filter on usernames, preserving input order.
pub fn filter_by_username<'a>(
    samples: &'a [StoredSample],
    needle: &str,
) -> Vec<&'a StoredSample> {
    let needle = needle.to_lowercase();
    samples
        .iter()
        .filter(|sample| sample.username.to_lowercase().contains(&needle))
        .collect()
}
