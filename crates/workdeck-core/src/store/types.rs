//! Data carried by the dashboard state slices.
//!
//! The JSON documents on disk use camelCase keys (written by the spec
//! tooling); decoding tolerates unknown fields so older boards keep
//! working when the documents grow new keys.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a work unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WorkItemStatus {
    #[default]
    Todo,
    Active,
    Review,
    Done,
    /// Any status string this build does not know yet.
    #[serde(other)]
    Unknown,
}

/// One work unit from `spec/work-units.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkItem {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub status: WorkItemStatus,
    /// Owning epic id, if the work unit is grouped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub epic: Option<String>,
}

/// One epic from `spec/epics.json`.
///
/// The status is kept verbatim; the board renders whatever label the spec
/// tooling wrote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Epic {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub status: String,
}

/// One checkpoint entry inside a checkpoint index document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckpointEntry {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Stash reference backing this checkpoint, e.g. `stash@{0}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stash_ref: Option<String>,
}

/// Top-level shape of `spec/work-units.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkUnitsFile {
    #[serde(default)]
    pub work_units: Vec<WorkItem>,
}

/// Top-level shape of `spec/epics.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpicsFile {
    #[serde(default)]
    pub epics: Vec<Epic>,
}

/// Top-level shape of `.workdeck/checkpoints/<work-unit>.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckpointDoc {
    pub work_unit_id: String,
    #[serde(default)]
    pub checkpoints: Vec<CheckpointEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_work_item_decodes_camel_case() {
        let json = r#"{"id":"WU-1","title":"Parser","status":"active","epic":"EP-1"}"#;
        let item: WorkItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.id, "WU-1");
        assert_eq!(item.status, WorkItemStatus::Active);
        assert_eq!(item.epic.as_deref(), Some("EP-1"));
    }

    #[test]
    fn test_work_item_tolerates_unknown_fields_and_statuses() {
        let json = r#"{"id":"WU-2","title":"Codec","status":"paused","assignee":"sam"}"#;
        let item: WorkItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.status, WorkItemStatus::Unknown);
        assert!(item.epic.is_none());
    }

    #[test]
    fn test_work_item_status_defaults_to_todo() {
        let json = r#"{"id":"WU-3","title":"Docs"}"#;
        let item: WorkItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.status, WorkItemStatus::Todo);
    }

    #[test]
    fn test_checkpoint_doc_decodes() {
        let json = r#"{
            "workUnitId": "WU-1",
            "checkpoints": [
                {"name": "before-refactor", "stashRef": "stash@{0}"},
                {"name": "green-tests", "createdAt": "2026-08-01T10:00:00Z"}
            ]
        }"#;
        let doc: CheckpointDoc = serde_json::from_str(json).unwrap();
        assert_eq!(doc.work_unit_id, "WU-1");
        assert_eq!(doc.checkpoints.len(), 2);
        assert_eq!(doc.checkpoints[0].stash_ref.as_deref(), Some("stash@{0}"));
        assert!(doc.checkpoints[1].created_at.is_some());
    }

    #[test]
    fn test_empty_containers_default() {
        let file: WorkUnitsFile = serde_json::from_str("{}").unwrap();
        assert!(file.work_units.is_empty());
        let epics: EpicsFile = serde_json::from_str("{}").unwrap();
        assert!(epics.epics.is_empty());
    }
}
