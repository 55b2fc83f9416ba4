//! Watch target registry: the single source of truth for which paths feed
//! which reload actions.
//!
//! Resolution is pure (no I/O, no watcher state) so the mapping can be
//! tested as a table. The watcher adapter filters raw events through
//! [`WatchRegistry::resolve`] before anything reaches the router, which is
//! what keeps `<git-dir>/config` and `.git/objects/**` churn out of the
//! reload pipeline.

use std::path::{Path, PathBuf};

use crate::git::types::ProjectInfo;
use crate::sync::types::ReloadAction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchTargetKind {
    /// Exact-path match; the target is a single file.
    File,
    /// Containment match; any JSON document inside the directory counts.
    Directory,
}

#[derive(Debug, Clone)]
pub struct WatchTarget {
    pub path: PathBuf,
    pub kind: WatchTargetKind,
    pub actions: Vec<ReloadAction>,
}

impl WatchTarget {
    fn file(path: PathBuf, actions: Vec<ReloadAction>) -> Self {
        Self {
            path,
            kind: WatchTargetKind::File,
            actions,
        }
    }

    fn directory(path: PathBuf, actions: Vec<ReloadAction>) -> Self {
        Self {
            path,
            kind: WatchTargetKind::Directory,
            actions,
        }
    }

    /// Whether an event path is relevant to this target.
    pub fn matches(&self, event_path: &Path) -> bool {
        match self.kind {
            WatchTargetKind::File => event_path == self.path,
            WatchTargetKind::Directory => {
                if event_path == self.path {
                    // The directory itself appearing or changing
                    return true;
                }
                event_path.starts_with(&self.path)
                    && event_path.extension().and_then(|ext| ext.to_str()) == Some("json")
            }
        }
    }

    /// The directory whose events cover this target.
    ///
    /// File targets are observed through their parent directory so the
    /// watch survives atomic-rename saves (the inode changes, the name
    /// does not).
    pub fn watch_dir(&self) -> PathBuf {
        match self.kind {
            WatchTargetKind::File => self
                .path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| self.path.clone()),
            WatchTargetKind::Directory => self.path.clone(),
        }
    }

    /// Whether the path this target describes currently exists.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}

#[derive(Debug, Clone)]
pub struct WatchRegistry {
    targets: Vec<WatchTarget>,
}

impl WatchRegistry {
    /// Build the fixed target table for a project.
    ///
    /// | path | kind | actions |
    /// |---|---|---|
    /// | `<root>/spec/work-units.json` | file | work items |
    /// | `<root>/spec/epics.json` | file | epics |
    /// | `<common-dir>/refs/stash` | file | checkpoints |
    /// | `<root>/.workdeck/checkpoints/` | directory | checkpoints |
    /// | `<git-dir>/index` | file | file status |
    /// | `<git-dir>/HEAD` | file | file status, checkpoints |
    ///
    /// `<git-dir>/config` is deliberately absent: resolution for it is
    /// empty and nothing in the adapter emits for it.
    pub fn for_project(project: &ProjectInfo) -> Self {
        let targets = vec![
            WatchTarget::file(
                project.work_units_path(),
                vec![ReloadAction::ReloadWorkItems],
            ),
            WatchTarget::file(project.epics_path(), vec![ReloadAction::ReloadEpics]),
            WatchTarget::file(
                project.common_dir.join("refs").join("stash"),
                vec![ReloadAction::ReloadCheckpoints],
            ),
            WatchTarget::directory(
                project.checkpoints_dir(),
                vec![ReloadAction::ReloadCheckpoints],
            ),
            WatchTarget::file(
                project.git_dir.join("index"),
                vec![ReloadAction::ReloadFileStatus],
            ),
            WatchTarget::file(
                project.git_dir.join("HEAD"),
                vec![
                    ReloadAction::ReloadFileStatus,
                    ReloadAction::ReloadCheckpoints,
                ],
            ),
        ];

        Self { targets }
    }

    pub fn targets(&self) -> &[WatchTarget] {
        &self.targets
    }

    /// Map an event path to the actions it should trigger.
    ///
    /// Unmatched paths resolve to the empty set. Duplicate actions from
    /// overlapping targets are collapsed, order preserved.
    pub fn resolve(&self, path: &Path) -> Vec<ReloadAction> {
        let mut actions = Vec::new();
        for target in &self.targets {
            if target.matches(path) {
                for action in &target.actions {
                    if !actions.contains(action) {
                        actions.push(*action);
                    }
                }
            }
        }
        actions
    }
}
