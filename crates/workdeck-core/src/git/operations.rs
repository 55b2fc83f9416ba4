use std::path::Path;
use std::sync::OnceLock;

use git2::Status;
use regex::Regex;

pub fn derive_project_name_from_path(repo_path: &Path) -> String {
    repo_path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("unknown")
        .to_string()
}

pub fn generate_project_id(repo_path: &Path) -> String {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let mut hasher = DefaultHasher::new();
    repo_path.hash(&mut hasher);
    format!("{:x}", hasher.finish())
}

/// Pattern for checkpoint stash messages.
///
/// `git stash push -m` prefixes the user message with `On <branch>: `, so
/// both the bare and the prefixed form are accepted.
fn checkpoint_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?:On [^:]+: )?checkpoint\(([A-Za-z][A-Za-z0-9]*-\d+)\): (.+)$")
            .expect("Invalid checkpoint pattern")
    })
}

/// Parse a stash message into `(work_unit_id, checkpoint_name)`.
///
/// Returns `None` for stash entries that are not checkpoints (plain WIP
/// stashes, foreign messages).
pub fn parse_checkpoint_message(message: &str) -> Option<(String, String)> {
    let captures = checkpoint_pattern().captures(message.trim())?;
    let work_unit_id = captures.get(1)?.as_str().to_string();
    let name = captures.get(2)?.as_str().trim().to_string();
    Some((work_unit_id, name))
}

/// Whether a status entry counts as staged (index-side) change.
pub fn is_staged(status: Status) -> bool {
    status.intersects(
        Status::INDEX_NEW
            | Status::INDEX_MODIFIED
            | Status::INDEX_DELETED
            | Status::INDEX_RENAMED
            | Status::INDEX_TYPECHANGE,
    )
}

/// Whether a status entry counts as unstaged (worktree-side) change to a
/// tracked file.
pub fn is_unstaged(status: Status) -> bool {
    status.intersects(
        Status::WT_MODIFIED | Status::WT_DELETED | Status::WT_RENAMED | Status::WT_TYPECHANGE,
    )
}

/// Whether a status entry is an untracked file.
pub fn is_untracked(status: Status) -> bool {
    status.contains(Status::WT_NEW)
}
