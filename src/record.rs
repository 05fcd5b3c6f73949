//! The intermediate capture record: a human-inspectable JSON file bridging
//! the capture and conversion phases.
//!
//! Format: a UTF-8 JSON array of `{"x": n, "y": n, "z": n}` records in
//! capture order, coordinates as double-precision decimals. This file is
//! the only state shared between the two phases.

use crate::source::types::PointSet;
use std::path::Path;

/// Errors for reading or writing the capture record.
#[derive(Debug)]
pub enum RecordError {
    /// The destination could not be created or written, or the input could
    /// not be read.
    Io(String),
    /// The record file is not a well-formed array of point records.
    Format(String),
}

impl std::fmt::Display for RecordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordError::Io(e) => write!(f, "record IO error: {e}"),
            RecordError::Format(e) => write!(f, "record format error: {e}"),
        }
    }
}

impl std::error::Error for RecordError {}

/// Write the capture record, replacing any existing file at `path`.
///
/// The content is staged to a temporary sibling and renamed into place, so
/// a failed write never leaves a truncated record behind. There is no
/// backup of a previously existing file.
pub fn write(points: &PointSet, path: &Path) -> Result<(), RecordError> {
    let json = serde_json::to_string_pretty(points)
        .map_err(|e| RecordError::Format(e.to_string()))?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| RecordError::Io(e.to_string()))?;
        }
    }

    let tmp = staging_path(path);
    std::fs::write(&tmp, json)
        .map_err(|e| RecordError::Io(format!("cannot write {tmp:?}: {e}")))?;
    std::fs::rename(&tmp, path)
        .map_err(|e| RecordError::Io(format!("cannot move record into {path:?}: {e}")))?;

    log::info!("wrote {} point records to {path:?}", points.len());
    Ok(())
}

/// Load a capture record written by [`write`].
pub fn load(path: &Path) -> Result<PointSet, RecordError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| RecordError::Io(format!("cannot read {path:?}: {e}")))?;
    let points: PointSet =
        serde_json::from_str(&content).map_err(|e| RecordError::Format(e.to_string()))?;

    log::info!("loaded {} point records from {path:?}", points.len());
    Ok(points)
}

fn staging_path(path: &Path) -> std::path::PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
