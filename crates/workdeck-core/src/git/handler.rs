use git2::{Repository, StatusOptions};
use std::path::Path;
use tracing::{debug, info};

use crate::git::{errors::GitError, operations, types::*};

// Helper function to reduce boilerplate
fn io_error(e: std::io::Error) -> GitError {
    GitError::IoError { source: e }
}

pub fn detect_project() -> Result<ProjectInfo, GitError> {
    let current_dir = std::env::current_dir().map_err(io_error)?;
    detect_project_at(&current_dir)
}

/// Detect the project containing `path`, resolving gitdir indirection.
///
/// Works from any directory inside the working tree, including linked
/// worktrees whose `.git` is a gitdir file.
pub fn detect_project_at(path: &Path) -> Result<ProjectInfo, GitError> {
    info!(event = "core.git.project.detect_started", path = %path.display());

    let repo = Repository::discover(path).map_err(|_| GitError::NotInRepository)?;

    let root = repo.workdir().ok_or_else(|| GitError::OperationFailed {
        message: "Repository has no working directory".to_string(),
    })?;

    // Canonical root so the id is stable across symlinked invocations
    let canonical_root = std::fs::canonicalize(root).unwrap_or_else(|_| root.to_path_buf());
    let project_id = operations::generate_project_id(&canonical_root);
    let project_name = operations::derive_project_name_from_path(&canonical_root);

    let project = ProjectInfo::new(
        project_id.clone(),
        project_name.clone(),
        canonical_root,
        repo.path().to_path_buf(),
        repo.commondir().to_path_buf(),
    );

    info!(
        event = "core.git.project.detect_completed",
        project_id = project_id,
        project_name = project_name,
        root = %project.root.display(),
        git_dir = %project.git_dir.display()
    );

    Ok(project)
}

/// Scan the stash for checkpoint entries.
///
/// Entries whose message does not carry the checkpoint form are skipped,
/// not errors.
pub fn list_stash_checkpoints(root: &Path) -> Result<Vec<StashCheckpoint>, GitError> {
    debug!(event = "core.git.checkpoints.scan_started", root = %root.display());

    let mut repo = Repository::open(root).map_err(|_| GitError::RepositoryNotFound {
        path: root.display().to_string(),
    })?;

    let mut checkpoints = Vec::new();
    repo.stash_foreach(|index, message, _oid| {
        if let Some((work_unit_id, name)) = operations::parse_checkpoint_message(message) {
            checkpoints.push(StashCheckpoint {
                work_unit_id,
                name,
                stash_index: index,
            });
        }
        true
    })?;

    debug!(
        event = "core.git.checkpoints.scan_completed",
        count = checkpoints.len()
    );

    Ok(checkpoints)
}

/// Read working-tree status counts for the dashboard file panel.
pub fn read_file_status(root: &Path) -> Result<FileStatusCounts, GitError> {
    debug!(event = "core.git.status.read_started", root = %root.display());

    let repo = Repository::open(root).map_err(|_| GitError::RepositoryNotFound {
        path: root.display().to_string(),
    })?;

    let branch = repo
        .head()
        .ok()
        .and_then(|head| head.shorthand().map(|s| s.to_string()));

    let mut opts = StatusOptions::new();
    opts.include_untracked(true)
        .recurse_untracked_dirs(false)
        .exclude_submodules(true);

    let statuses = repo.statuses(Some(&mut opts))?;

    let mut counts = FileStatusCounts {
        branch,
        ..Default::default()
    };
    for entry in statuses.iter() {
        let status = entry.status();
        if operations::is_staged(status) {
            counts.staged += 1;
        }
        if operations::is_unstaged(status) {
            counts.unstaged += 1;
        }
        if operations::is_untracked(status) {
            counts.untracked += 1;
        }
    }

    debug!(
        event = "core.git.status.read_completed",
        staged = counts.staged,
        unstaged = counts.unstaged,
        untracked = counts.untracked
    );

    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn init_repo(dir: &Path) -> Repository {
        let repo = Repository::init(dir).unwrap();
        {
            let mut config = repo.config().unwrap();
            config.set_str("user.name", "tester").unwrap();
            config.set_str("user.email", "tester@example.com").unwrap();
        }
        repo
    }

    fn commit_all(repo: &Repository, message: &str) {
        let mut index = repo.index().unwrap();
        index
            .add_all(["*"].iter(), git2::IndexAddOption::DEFAULT, None)
            .unwrap();
        index.write().unwrap();
        let tree_id = index.write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        let sig = repo.signature().unwrap();
        let parent = repo
            .head()
            .ok()
            .and_then(|h| h.target())
            .and_then(|oid| repo.find_commit(oid).ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();
        repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .unwrap();
    }

    #[test]
    fn test_detect_project_at_resolves_git_dir() {
        let dir = tempfile::tempdir().unwrap();
        init_repo(dir.path());

        let project = detect_project_at(dir.path()).unwrap();
        assert!(project.git_dir.ends_with(".git"));
        assert_eq!(project.git_dir, project.common_dir);
        assert!(!project.id.is_empty());
    }

    #[test]
    fn test_detect_project_at_outside_repo_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = detect_project_at(dir.path());
        assert!(matches!(result, Err(GitError::NotInRepository)));
    }

    #[test]
    fn test_list_stash_checkpoints_filters_structured_messages() {
        let dir = tempfile::tempdir().unwrap();
        let repo = init_repo(dir.path());
        fs::write(dir.path().join("a.txt"), "one\n").unwrap();
        commit_all(&repo, "initial");

        // A checkpoint stash and a plain stash
        fs::write(dir.path().join("a.txt"), "two\n").unwrap();
        let sig = repo.signature().unwrap();
        let mut repo = Repository::open(dir.path()).unwrap();
        repo.stash_save(&sig, "checkpoint(WU-1): before-refactor", None)
            .unwrap();
        fs::write(dir.path().join("a.txt"), "three\n").unwrap();
        repo.stash_save(&sig, "quick save", None).unwrap();

        let checkpoints = list_stash_checkpoints(dir.path()).unwrap();
        assert_eq!(checkpoints.len(), 1);
        assert_eq!(checkpoints[0].work_unit_id, "WU-1");
        assert_eq!(checkpoints[0].name, "before-refactor");
    }

    #[test]
    fn test_read_file_status_counts() {
        let dir = tempfile::tempdir().unwrap();
        let repo = init_repo(dir.path());
        fs::write(dir.path().join("tracked.txt"), "one\n").unwrap();
        commit_all(&repo, "initial");

        fs::write(dir.path().join("tracked.txt"), "two\n").unwrap();
        fs::write(dir.path().join("new.txt"), "fresh\n").unwrap();

        let counts = read_file_status(dir.path()).unwrap();
        assert_eq!(counts.unstaged, 1);
        assert_eq!(counts.untracked, 1);
        assert_eq!(counts.staged, 0);
        assert!(counts.branch.is_some());
    }
}
