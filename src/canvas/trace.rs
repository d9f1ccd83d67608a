//! Stroke trace files for headless capture.
//!
//! A trace is a JSON array of pointer events recorded at capture resolution.
//! Replaying one onto a [`StrokeSurface`] reproduces the drawing without a
//! browser attached.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::canvas::event::PointerEvent;
use crate::canvas::surface::StrokeSurface;

/// Loads a stroke trace from a JSON file.
pub fn load_trace(path: &Path) -> Result<Vec<PointerEvent>> {
    let file = File::open(path)
        .context(format!("Failed to open trace file: {}", path.display()))?;
    let events: Vec<PointerEvent> = serde_json::from_reader(BufReader::new(file))
        .context(format!("Failed to parse trace file: {}", path.display()))?;
    Ok(events)
}

/// Replays a recorded event sequence onto a surface.
pub fn replay(surface: &mut StrokeSurface, events: &[PointerEvent]) {
    for event in events {
        surface.handle_event(*event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_and_replay_trace() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"phase":"down","x":60.0,"y":60.0}},
                {{"phase":"move","x":220.0,"y":220.0}},
                {{"phase":"up","x":220.0,"y":220.0}}
            ]"#
        )
        .unwrap();

        let events = load_trace(file.path()).unwrap();
        assert_eq!(events.len(), 3);

        let mut surface = StrokeSurface::new();
        replay(&mut surface, &events);
        assert!(surface.has_ink());
    }

    #[test]
    fn test_missing_file_errors() {
        assert!(load_trace(Path::new("no/such/trace.json")).is_err());
    }

    #[test]
    fn test_malformed_trace_errors() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{not a trace}}").unwrap();
        assert!(load_trace(file.path()).is_err());
    }
}
