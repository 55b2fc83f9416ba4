use std::path::PathBuf;

/// A discovered project rooted at a git working directory.
///
/// `git_dir` is the gitdir serving this working directory (for linked
/// worktrees that is `.git/worktrees/<name>`), while `common_dir` is the
/// shared gitdir holding refs. `HEAD` and `index` live under `git_dir`;
/// `refs/stash` lives under `common_dir`.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectInfo {
    pub id: String,
    pub name: String,
    pub root: PathBuf,
    pub git_dir: PathBuf,
    pub common_dir: PathBuf,
}

impl ProjectInfo {
    pub fn new(
        id: String,
        name: String,
        root: PathBuf,
        git_dir: PathBuf,
        common_dir: PathBuf,
    ) -> Self {
        Self {
            id,
            name,
            root,
            git_dir,
            common_dir,
        }
    }

    pub fn spec_dir(&self) -> PathBuf {
        self.root.join("spec")
    }

    pub fn work_units_path(&self) -> PathBuf {
        self.spec_dir().join("work-units.json")
    }

    pub fn epics_path(&self) -> PathBuf {
        self.spec_dir().join("epics.json")
    }

    /// Checkpoint index directory, one JSON document per work unit.
    pub fn checkpoints_dir(&self) -> PathBuf {
        self.root.join(".workdeck").join("checkpoints")
    }
}

/// A checkpoint recovered from the stash reflog.
///
/// Stash entries carry structured messages of the form
/// `checkpoint(<work-unit-id>): <name>`; entries that don't parse are not
/// checkpoints and are skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct StashCheckpoint {
    pub work_unit_id: String,
    pub name: String,
    pub stash_index: usize,
}

/// Working-tree status counts for the dashboard's file panel.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FileStatusCounts {
    /// Current branch shorthand, `None` on an unborn branch.
    pub branch: Option<String>,
    pub staged: usize,
    pub unstaged: usize,
    pub untracked: usize,
}
