//! Aggregation and export over a snapshot of the store.
//!
//! This module provides:
//! - Leaderboard ranking
//! - Admin statistics (totals, per-digit histogram, average per user)
//! - Username filtering for the admin table
//! - JSON/CSV export and the digit distribution chart

pub mod charts;
pub mod export;
pub mod leaderboard;
pub mod stats;

pub use leaderboard::{LeaderboardEntry, rank_leaderboard};
pub use stats::{AdminStats, compute_admin_stats, filter_by_username};

use anyhow::Result;
use chrono::Utc;
use log::info;
use std::path::{Path, PathBuf};

use crate::store::SampleStore;

/// Paths produced by a full export run.
#[derive(Debug, Clone)]
pub struct ExportPaths {
    /// JSON export document
    pub json: PathBuf,
    /// CSV export document
    pub csv: PathBuf,
}

/// Snapshots the store and writes both export formats.
///
/// File names carry a timestamp so repeated exports never overwrite each
/// other.
pub fn export_all(store: &dyn SampleStore, out_dir: &Path) -> Result<ExportPaths> {
    let samples = store.list_samples()?;
    let users = store.list_users()?;

    let now = Utc::now();
    let stamp = now.format("%Y%m%d_%H%M%S");
    let json_path = out_dir.join(format!("mnist-data-export-{}.json", stamp));
    let csv_path = out_dir.join(format!("mnist-data-export-{}.csv", stamp));

    export::write_export(&json_path, &export::to_json(&samples, &users, now)?)?;
    export::write_export(&csv_path, &export::to_csv(&samples))?;

    info!(
        "exported {} samples from {} users",
        samples.len(),
        users.len()
    );
    Ok(ExportPaths {
        json: json_path,
        csv: csv_path,
    })
}
