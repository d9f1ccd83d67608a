//! JSON and CSV export of the collected data.
//!
//! Both formats are consumed by downstream training scripts, so the shapes
//! are exact contracts: the JSON document reproduces the stored collections
//! verbatim under `drawings`/`users`, and the CSV joins the 784 pixel values
//! with `;` inside one quoted field. Files are written to a temp path and
//! renamed into place so a failed export never leaves a partial file.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::error::{CollectError, CollectResult};
use crate::model::{StoredSample, UserRecord};

/// CSV header row.
pub const CSV_HEADER: &str = "ID,Username,Digit,Timestamp,ImageData";

/// The JSON export document.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportDocument<'a> {
    drawings: &'a [StoredSample],
    users: &'a HashMap<String, UserRecord>,
    export_date: DateTime<Utc>,
    total_drawings: usize,
    total_users: usize,
}

/// Serializes the collections to the JSON exchange format.
pub fn to_json(
    samples: &[StoredSample],
    users: &HashMap<String, UserRecord>,
    export_date: DateTime<Utc>,
) -> CollectResult<String> {
    let document = ExportDocument {
        drawings: samples,
        users,
        export_date,
        total_drawings: samples.len(),
        total_users: users.len(),
    };
    serde_json::to_string_pretty(&document)
        .map_err(|e| CollectError::Export(format!("failed to serialize JSON export: {}", e)))
}

/// Serializes the sample log to the CSV exchange format.
///
/// Row IDs are 1-based indices in the input order; the log is not re-sorted.
pub fn to_csv(samples: &[StoredSample]) -> String {
    let mut csv = String::from(CSV_HEADER);
    csv.push('\n');

    for (index, sample) in samples.iter().enumerate() {
        let image_data: Vec<String> = sample.pixels.iter().map(|p| p.to_string()).collect();
        csv.push_str(&format!(
            "{},\"{}\",{},\"{}\",\"{}\"\n",
            index + 1,
            sample.username,
            sample.digit,
            sample
                .captured_at
                .to_rfc3339_opts(SecondsFormat::Millis, true),
            image_data.join(";"),
        ));
    }
    csv
}

/// Writes an export blob to disk without leaving partial files behind.
pub fn write_export(path: &Path, contents: &str) -> CollectResult<()> {
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, contents)
        .map_err(|e| CollectError::Export(format!("failed to write {}: {}", tmp.display(), e)))?;
    fs::rename(&tmp, path).map_err(|e| {
        CollectError::Export(format!("failed to finalize {}: {}", path.display(), e))
    })?;
    Ok(())
}
