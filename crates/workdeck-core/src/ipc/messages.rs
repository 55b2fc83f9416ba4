//! Wire format for refresh notifications.
//!
//! One JSON object per line over the board socket. Only the `type` tag is
//! required; unknown sibling fields are ignored so newer senders keep
//! working against older boards.

use serde::{Deserialize, Serialize};

use crate::sync::types::ReloadAction;

/// A refresh hint from a sibling CLI process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Notification {
    #[serde(rename = "work-items-changed")]
    WorkItemsChanged,
    #[serde(rename = "epics-changed")]
    EpicsChanged,
    #[serde(rename = "checkpoint-changed")]
    CheckpointChanged,
    #[serde(rename = "file-status-changed")]
    FileStatusChanged,
}

impl Notification {
    /// The reload actions this notification maps to.
    pub fn actions(&self) -> &'static [ReloadAction] {
        match self {
            Notification::WorkItemsChanged => &[ReloadAction::ReloadWorkItems],
            Notification::EpicsChanged => &[ReloadAction::ReloadEpics],
            Notification::CheckpointChanged => &[ReloadAction::ReloadCheckpoints],
            Notification::FileStatusChanged => &[ReloadAction::ReloadFileStatus],
        }
    }

    /// Wire tag for this notification.
    pub fn kind(&self) -> &'static str {
        match self {
            Notification::WorkItemsChanged => "work-items-changed",
            Notification::EpicsChanged => "epics-changed",
            Notification::CheckpointChanged => "checkpoint-changed",
            Notification::FileStatusChanged => "file-status-changed",
        }
    }

    /// Parse a CLI argument into a notification.
    ///
    /// Accepts both the short kind (`checkpoints`) and the full wire tag
    /// (`checkpoint-changed`).
    pub fn from_kind(kind: &str) -> Option<Self> {
        match kind {
            "work-items" | "work-items-changed" => Some(Notification::WorkItemsChanged),
            "epics" | "epics-changed" => Some(Notification::EpicsChanged),
            "checkpoints" | "checkpoint-changed" => Some(Notification::CheckpointChanged),
            "file-status" | "file-status-changed" => Some(Notification::FileStatusChanged),
            _ => None,
        }
    }
}
