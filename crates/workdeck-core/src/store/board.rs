//! The live dashboard store.
//!
//! `BoardStore` owns one slice per reload action. A reload builds the
//! complete replacement slice off the async path (blocking work runs
//! under `spawn_blocking`), then swaps it in under a short-lived lock, so
//! readers only ever observe a fully-consistent prior or new slice.
//! Reload failures keep the previous slice; the next trigger retries.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{PoisonError, RwLock};

use tracing::{info, warn};

use crate::git::handler as git_handler;
use crate::git::types::{FileStatusCounts, ProjectInfo};
use crate::store::loader;
use crate::store::types::{CheckpointEntry, Epic, WorkItem};

/// Reload seam between the sync router and the concrete store.
///
/// Every method is idempotent; the router guarantees calls for one action
/// never interleave. Implementations must not panic on bad input data.
pub trait StateStore: Send + Sync + 'static {
    fn reload_work_items(&self) -> impl Future<Output = ()> + Send;
    fn reload_epics(&self) -> impl Future<Output = ()> + Send;
    fn reload_checkpoints(&self) -> impl Future<Output = ()> + Send;
    fn reload_file_status(&self) -> impl Future<Output = ()> + Send;
}

pub struct BoardStore {
    project: ProjectInfo,
    work_items: RwLock<Vec<WorkItem>>,
    epics: RwLock<Vec<Epic>>,
    checkpoints: RwLock<HashMap<String, Vec<CheckpointEntry>>>,
    file_status: RwLock<FileStatusCounts>,
}

impl BoardStore {
    pub fn new(project: ProjectInfo) -> Self {
        Self {
            project,
            work_items: RwLock::new(Vec::new()),
            epics: RwLock::new(Vec::new()),
            checkpoints: RwLock::new(HashMap::new()),
            file_status: RwLock::new(FileStatusCounts::default()),
        }
    }

    pub fn project(&self) -> &ProjectInfo {
        &self.project
    }

    pub fn work_items(&self) -> Vec<WorkItem> {
        self.work_items
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn epics(&self) -> Vec<Epic> {
        self.epics
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn checkpoints(&self) -> HashMap<String, Vec<CheckpointEntry>> {
        self.checkpoints
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn checkpoint_count(&self, work_unit_id: &str) -> usize {
        self.checkpoints
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(work_unit_id)
            .map(|entries| entries.len())
            .unwrap_or(0)
    }

    pub fn file_status(&self) -> FileStatusCounts {
        self.file_status
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl StateStore for BoardStore {
    async fn reload_work_items(&self) {
        let path = self.project.work_units_path();
        let loaded = tokio::task::spawn_blocking(move || loader::load_work_units(&path)).await;

        match loaded {
            Ok(Ok(items)) => {
                let items = items.unwrap_or_default();
                let count = items.len();
                *self
                    .work_items
                    .write()
                    .unwrap_or_else(PoisonError::into_inner) = items;
                info!(event = "core.store.work_items_reloaded", count = count);
            }
            Ok(Err(e)) => {
                warn!(event = "core.store.work_items_reload_failed", error = %e);
            }
            Err(e) => {
                warn!(event = "core.store.work_items_reload_failed", error = %e);
            }
        }
    }

    async fn reload_epics(&self) {
        let path = self.project.epics_path();
        let loaded = tokio::task::spawn_blocking(move || loader::load_epics(&path)).await;

        match loaded {
            Ok(Ok(epics)) => {
                let epics = epics.unwrap_or_default();
                let count = epics.len();
                *self.epics.write().unwrap_or_else(PoisonError::into_inner) = epics;
                info!(event = "core.store.epics_reloaded", count = count);
            }
            Ok(Err(e)) => {
                warn!(event = "core.store.epics_reload_failed", error = %e);
            }
            Err(e) => {
                warn!(event = "core.store.epics_reload_failed", error = %e);
            }
        }
    }

    async fn reload_checkpoints(&self) {
        let dir = self.project.checkpoints_dir();
        let root = self.project.root.clone();
        let loaded = tokio::task::spawn_blocking(move || {
            let index = loader::load_checkpoint_index(&dir);
            let stash = git_handler::list_stash_checkpoints(&root);
            (index, stash)
        })
        .await;

        let (index_result, stash_result) = match loaded {
            Ok(results) => results,
            Err(e) => {
                warn!(event = "core.store.checkpoints_reload_failed", error = %e);
                return;
            }
        };

        // Stash-derived entries first; index documents win per work unit.
        let mut merged: HashMap<String, Vec<CheckpointEntry>> = HashMap::new();
        match stash_result {
            Ok(stash_checkpoints) => {
                for checkpoint in stash_checkpoints {
                    merged
                        .entry(checkpoint.work_unit_id)
                        .or_default()
                        .push(CheckpointEntry {
                            name: checkpoint.name,
                            created_at: None,
                            stash_ref: Some(format!("stash@{{{}}}", checkpoint.stash_index)),
                        });
                }
            }
            Err(e) => {
                warn!(event = "core.store.checkpoint_stash_scan_failed", error = %e);
            }
        }

        let skipped = match index_result {
            Ok(Some((index, skipped))) => {
                for (work_unit_id, entries) in index {
                    merged.insert(work_unit_id, entries);
                }
                skipped
            }
            Ok(None) => 0,
            Err(e) => {
                // Index unreadable: keep the previous slice rather than
                // publishing a stash-only view that may drop entries.
                warn!(event = "core.store.checkpoints_reload_failed", error = %e);
                return;
            }
        };

        let work_units = merged.len();
        *self
            .checkpoints
            .write()
            .unwrap_or_else(PoisonError::into_inner) = merged;
        info!(
            event = "core.store.checkpoints_reloaded",
            work_units = work_units,
            skipped_docs = skipped
        );
    }

    async fn reload_file_status(&self) {
        let root = self.project.root.clone();
        let loaded = tokio::task::spawn_blocking(move || git_handler::read_file_status(&root)).await;

        match loaded {
            Ok(Ok(counts)) => {
                info!(
                    event = "core.store.file_status_reloaded",
                    staged = counts.staged,
                    unstaged = counts.unstaged,
                    untracked = counts.untracked
                );
                *self
                    .file_status
                    .write()
                    .unwrap_or_else(PoisonError::into_inner) = counts;
            }
            Ok(Err(e)) => {
                warn!(event = "core.store.file_status_reload_failed", error = %e);
            }
            Err(e) => {
                warn!(event = "core.store.file_status_reload_failed", error = %e);
            }
        }
    }
}
