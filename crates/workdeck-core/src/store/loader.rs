//! Tolerant readers for the on-disk spec documents.
//!
//! Loaders distinguish three outcomes: `Ok(Some(_))` parsed data,
//! `Ok(None)` file or directory absent (an empty slice, not an error),
//! and `Err(_)` unreadable or unparseable content (callers keep the
//! previous slice and retry on the next trigger).

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::warn;

use crate::store::errors::StoreError;
use crate::store::types::{CheckpointDoc, CheckpointEntry, Epic, EpicsFile, WorkItem, WorkUnitsFile};

fn read_file(path: &Path) -> Result<Option<String>, StoreError> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(StoreError::ReadFailed {
            path: path.display().to_string(),
            source: e,
        }),
    }
}

fn parse_error(path: &Path, e: serde_json::Error) -> StoreError {
    StoreError::ParseFailed {
        path: path.display().to_string(),
        message: e.to_string(),
    }
}

/// Load `spec/work-units.json`. Absent file means no work units.
pub fn load_work_units(path: &Path) -> Result<Option<Vec<WorkItem>>, StoreError> {
    let Some(content) = read_file(path)? else {
        return Ok(None);
    };
    let file: WorkUnitsFile =
        serde_json::from_str(&content).map_err(|e| parse_error(path, e))?;
    Ok(Some(file.work_units))
}

/// Load `spec/epics.json`. Absent file means no epics.
pub fn load_epics(path: &Path) -> Result<Option<Vec<Epic>>, StoreError> {
    let Some(content) = read_file(path)? else {
        return Ok(None);
    };
    let file: EpicsFile = serde_json::from_str(&content).map_err(|e| parse_error(path, e))?;
    Ok(Some(file.epics))
}

/// Load every checkpoint index document under `dir`, keyed by work unit id.
///
/// Individual documents that fail to parse are skipped (the second tuple
/// element counts them); an absent directory is `Ok(None)`.
pub fn load_checkpoint_index(
    dir: &Path,
) -> Result<Option<(HashMap<String, Vec<CheckpointEntry>>, usize)>, StoreError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(StoreError::ReadFailed {
                path: dir.display().to_string(),
                source: e,
            });
        }
    };

    let mut index: HashMap<String, Vec<CheckpointEntry>> = HashMap::new();
    let mut skipped = 0usize;

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(
                    event = "core.store.checkpoint_entry_unreadable",
                    dir = %dir.display(),
                    error = %e
                );
                skipped += 1;
                continue;
            }
        };

        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
            continue;
        }

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                warn!(
                    event = "core.store.checkpoint_doc_unreadable",
                    path = %path.display(),
                    error = %e
                );
                skipped += 1;
                continue;
            }
        };

        match serde_json::from_str::<CheckpointDoc>(&content) {
            Ok(doc) => {
                index.insert(doc.work_unit_id, doc.checkpoints);
            }
            Err(e) => {
                warn!(
                    event = "core.store.checkpoint_doc_invalid",
                    path = %path.display(),
                    error = %e
                );
                skipped += 1;
            }
        }
    }

    Ok(Some((index, skipped)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_work_units_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_work_units(&dir.path().join("work-units.json")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_load_work_units_parses_documents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("work-units.json");
        fs::write(
            &path,
            r#"{"workUnits":[{"id":"WU-1","title":"Parser","status":"active"}]}"#,
        )
        .unwrap();

        let items = load_work_units(&path).unwrap().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "WU-1");
    }

    #[test]
    fn test_load_work_units_truncated_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("work-units.json");
        let mut file = fs::File::create(&path).unwrap();
        // Simulates reading mid-write: valid prefix, cut off
        file.write_all(br#"{"workUnits":[{"id":"WU-1","#).unwrap();
        drop(file);

        let result = load_work_units(&path);
        assert!(matches!(result, Err(StoreError::ParseFailed { .. })));
    }

    #[test]
    fn test_load_epics_missing_and_present() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("epics.json");
        assert!(load_epics(&path).unwrap().is_none());

        fs::write(&path, r#"{"epics":[{"id":"EP-1","title":"Sync core"}]}"#).unwrap();
        let epics = load_epics(&path).unwrap().unwrap();
        assert_eq!(epics.len(), 1);
        assert_eq!(epics[0].status, "");
    }

    #[test]
    fn test_load_checkpoint_index_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_checkpoint_index(&dir.path().join("checkpoints")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_load_checkpoint_index_skips_invalid_docs() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("WU-1.json"),
            r#"{"workUnitId":"WU-1","checkpoints":[{"name":"a"},{"name":"b"}]}"#,
        )
        .unwrap();
        fs::write(dir.path().join("WU-2.json"), "{ not json").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let (index, skipped) = load_checkpoint_index(dir.path()).unwrap().unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index.get("WU-1").map(|c| c.len()), Some(2));
        assert_eq!(skipped, 1);
    }
}
