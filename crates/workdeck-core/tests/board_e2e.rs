//! End-to-end tests over a real repository and the real board store.
//!
//! These cover the full path a running board exercises: documents and git
//! state on disk, `BoardStore` reloads, live watchers, and the notification
//! socket, with no fakes in between.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use workdeck_core::git_ops;
use workdeck_core::ipc::{self, Notification};
use workdeck_core::store::{BoardStore, StateStore};
use workdeck_core::sync::{SyncManager, SyncOptions};

const DEBOUNCE: Duration = Duration::from_millis(50);

fn init_repo(dir: &Path) -> git2::Repository {
    let repo = git2::Repository::init(dir).unwrap();
    {
        let mut config = repo.config().unwrap();
        config.set_str("user.name", "tester").unwrap();
        config.set_str("user.email", "tester@example.com").unwrap();
    }
    repo
}

fn commit_all(repo: &git2::Repository, message: &str) {
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
    let parents: Vec<_> = parent.iter().collect();
    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
        .unwrap();
}

async fn wait_until<F: Fn() -> bool>(what: &str, check: F) {
    tokio::time::timeout(Duration::from_secs(3), async {
        while !check() {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await
    .unwrap_or_else(|_| panic!("timed out waiting for {what}"));
}

fn options() -> SyncOptions {
    SyncOptions {
        debounce: DEBOUNCE,
        socket_path: None,
    }
}

#[tokio::test]
async fn test_checkpoint_edit_reaches_the_store() {
    let dir = tempfile::tempdir().unwrap();
    let repo = init_repo(dir.path());

    let checkpoints_dir = dir.path().join(".workdeck").join("checkpoints");
    std::fs::create_dir_all(&checkpoints_dir).unwrap();
    std::fs::write(
        checkpoints_dir.join("WU-1.json"),
        r#"{"workUnitId":"WU-1","checkpoints":[{"name":"before-refactor","stashRef":"stash@{0}"}]}"#,
    )
    .unwrap();
    std::fs::write(dir.path().join("README.md"), "# test\n").unwrap();
    commit_all(&repo, "init");

    let project = git_ops::detect_project_at(dir.path()).unwrap();
    let store = Arc::new(BoardStore::new(project.clone()));
    store.reload_checkpoints().await;
    assert_eq!(store.checkpoint_count("WU-1"), 1);

    let mut manager = SyncManager::new(Arc::clone(&store), project.clone(), options());
    manager.start();
    tokio::time::sleep(Duration::from_millis(100)).await;

    std::fs::write(
        project.checkpoints_dir().join("WU-1.json"),
        r#"{"workUnitId":"WU-1","checkpoints":[
            {"name":"before-refactor","stashRef":"stash@{0}"},
            {"name":"green-tests","stashRef":"stash@{1}"}
        ]}"#,
    )
    .unwrap();

    wait_until("checkpoint count to reach 2", || {
        store.checkpoint_count("WU-1") == 2
    })
    .await;

    manager.stop();
}

#[tokio::test]
async fn test_atomic_save_of_work_units_updates_the_slice() {
    let dir = tempfile::tempdir().unwrap();
    let repo = init_repo(dir.path());

    let spec_dir = dir.path().join("spec");
    std::fs::create_dir_all(&spec_dir).unwrap();
    std::fs::write(
        spec_dir.join("work-units.json"),
        r#"{"workUnits":[{"id":"WU-1","title":"First","status":"todo"}]}"#,
    )
    .unwrap();
    commit_all(&repo, "init");

    let project = git_ops::detect_project_at(dir.path()).unwrap();
    let store = Arc::new(BoardStore::new(project.clone()));
    store.reload_work_items().await;
    assert_eq!(store.work_items().len(), 1);

    let mut manager = SyncManager::new(Arc::clone(&store), project.clone(), options());
    manager.start();
    tokio::time::sleep(Duration::from_millis(100)).await;

    // Editors save via temp file plus rename; the rename must count
    let tmp = project.spec_dir().join("work-units.json.tmp");
    std::fs::write(
        &tmp,
        r#"{"workUnits":[
            {"id":"WU-1","title":"First","status":"active"},
            {"id":"WU-2","title":"Second","status":"todo"}
        ]}"#,
    )
    .unwrap();
    std::fs::rename(&tmp, project.work_units_path()).unwrap();

    wait_until("work units to reach 2", || store.work_items().len() == 2).await;
    assert!(store.work_items().iter().any(|item| item.title == "Second"));

    manager.stop();
}

#[tokio::test]
async fn test_notify_refreshes_file_status_over_socket() {
    let dir = tempfile::tempdir().unwrap();
    let repo = init_repo(dir.path());
    std::fs::write(dir.path().join("README.md"), "# test\n").unwrap();
    commit_all(&repo, "init");

    // Socket lives outside the worktree so it never shows up as untracked
    let socket_dir = tempfile::tempdir().unwrap();
    let socket_path = socket_dir.path().join("board-e2e.sock");

    let project = git_ops::detect_project_at(dir.path()).unwrap();
    let store = Arc::new(BoardStore::new(project.clone()));
    store.reload_file_status().await;
    assert_eq!(store.file_status().untracked, 0);

    let mut manager = SyncManager::new(
        Arc::clone(&store),
        project.clone(),
        SyncOptions {
            debounce: DEBOUNCE,
            socket_path: Some(socket_path.clone()),
        },
    );
    manager.start();
    tokio::time::sleep(Duration::from_millis(100)).await;

    // Plain worktree edits are invisible to the watchers on purpose;
    // nothing under .git changes until the file is staged.
    std::fs::write(dir.path().join("notes.txt"), "scratch\n").unwrap();
    tokio::time::sleep(DEBOUNCE * 4).await;
    assert_eq!(store.file_status().untracked, 0);

    // An external tool nudges the board instead
    let path = socket_path.clone();
    tokio::task::spawn_blocking(move || {
        ipc::try_send_notification(&path, &Notification::FileStatusChanged)
    })
    .await
    .unwrap()
    .unwrap();

    wait_until("untracked count to reach 1", || {
        store.file_status().untracked == 1
    })
    .await;

    manager.stop();
}
