use std::fmt;

/// Targeted reload of one dashboard state slice.
///
/// Each action maps to exactly one store method. Actions are idempotent
/// and independently debounced; firing one never touches another slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReloadAction {
    ReloadWorkItems,
    ReloadEpics,
    ReloadCheckpoints,
    ReloadFileStatus,
}

impl ReloadAction {
    pub const ALL: [ReloadAction; 4] = [
        ReloadAction::ReloadWorkItems,
        ReloadAction::ReloadEpics,
        ReloadAction::ReloadCheckpoints,
        ReloadAction::ReloadFileStatus,
    ];
}

impl fmt::Display for ReloadAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReloadAction::ReloadWorkItems => "work-items",
            ReloadAction::ReloadEpics => "epics",
            ReloadAction::ReloadCheckpoints => "checkpoints",
            ReloadAction::ReloadFileStatus => "file-status",
        };
        write!(f, "{name}")
    }
}
