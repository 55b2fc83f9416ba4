//! Debounce/coalescing router.
//!
//! One worker task per [`ReloadAction`] drives a [`CoalesceMachine`]
//! against the store. Workers are fully independent: a slow file-status
//! reload never delays a work-items reload. Triggers arrive over
//! unbounded channels from both the watcher adapter and the IPC server,
//! which is what gives the two sources one shared coalescing state per
//! action.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::store::StateStore;
use crate::sync::coalesce::{CoalesceMachine, Effect};
use crate::sync::types::ReloadAction;

/// Cloneable trigger facade handed to the watcher adapter, the IPC
/// server, and the fallback poll.
#[derive(Debug, Clone)]
pub struct RouterHandle {
    triggers: HashMap<ReloadAction, mpsc::UnboundedSender<()>>,
}

impl RouterHandle {
    /// Record one observed change for `action`.
    ///
    /// Never blocks. A send after shutdown is a no-op.
    pub fn trigger(&self, action: ReloadAction) {
        if let Some(tx) = self.triggers.get(&action) {
            if tx.send(()).is_err() {
                debug!(event = "core.sync.trigger_after_shutdown", action = %action);
            }
        }
    }

    pub fn trigger_all(&self) {
        for action in ReloadAction::ALL {
            self.trigger(action);
        }
    }
}

pub struct ReloadRouter {
    handle: RouterHandle,
    workers: Vec<JoinHandle<()>>,
}

impl ReloadRouter {
    /// Spawn one worker per action.
    ///
    /// Workers stop when `shutdown` is cancelled; in-flight reloads are
    /// abandoned, not awaited.
    pub fn start<S: StateStore>(
        store: Arc<S>,
        quiet_period: Duration,
        shutdown: CancellationToken,
    ) -> Self {
        let mut triggers = HashMap::new();
        let mut workers = Vec::new();

        for action in ReloadAction::ALL {
            let (tx, rx) = mpsc::unbounded_channel();
            triggers.insert(action, tx);
            workers.push(tokio::spawn(run_action_worker(
                action,
                rx,
                store.clone(),
                quiet_period,
                shutdown.clone(),
            )));
        }

        Self {
            handle: RouterHandle { triggers },
            workers,
        }
    }

    pub fn handle(&self) -> RouterHandle {
        self.handle.clone()
    }

    /// Tear the workers down without waiting on them.
    pub fn abort(self) {
        for worker in self.workers {
            worker.abort();
        }
    }
}

/// Drive one action's coalescing machine.
///
/// The timer deadline is owned here; the machine only decides. While a
/// reload runs, triggers keep being consumed so the dirty flag is set the
/// moment a change lands mid-flight.
async fn run_action_worker<S: StateStore>(
    action: ReloadAction,
    mut triggers: mpsc::UnboundedReceiver<()>,
    store: Arc<S>,
    quiet_period: Duration,
    shutdown: CancellationToken,
) {
    let mut machine = CoalesceMachine::new();
    let mut deadline: Option<Instant> = None;

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            received = triggers.recv() => {
                let Some(()) = received else { break };
                if machine.on_trigger() == Effect::StartTimer {
                    deadline = Some(Instant::now() + quiet_period);
                    debug!(event = "core.sync.debounce_started", action = %action);
                }
            }
            _ = sleep_until(deadline), if deadline.is_some() => {
                deadline = None;
                if machine.on_timer_elapsed() == Effect::BeginReload {
                    run_reload(action, &mut machine, &mut triggers, store.as_ref(), &shutdown)
                        .await;
                    if machine.on_reload_finished() == Effect::StartTimer {
                        deadline = Some(Instant::now() + quiet_period);
                        debug!(event = "core.sync.debounce_rearmed", action = %action);
                    }
                }
            }
        }
    }
}

/// Await the store reload while keeping the trigger channel drained.
async fn run_reload<S: StateStore>(
    action: ReloadAction,
    machine: &mut CoalesceMachine,
    triggers: &mut mpsc::UnboundedReceiver<()>,
    store: &S,
    shutdown: &CancellationToken,
) {
    debug!(event = "core.sync.reload_started", action = %action);
    let started = Instant::now();

    let reload = dispatch_reload(store, action);
    tokio::pin!(reload);
    let mut channel_open = true;

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => return,
            _ = &mut reload => break,
            received = triggers.recv(), if channel_open => {
                match received {
                    Some(()) => {
                        machine.on_trigger();
                    }
                    None => channel_open = false,
                }
            }
        }
    }

    debug!(
        event = "core.sync.reload_completed",
        action = %action,
        duration_ms = started.elapsed().as_millis() as u64
    );
}

async fn dispatch_reload<S: StateStore>(store: &S, action: ReloadAction) {
    match action {
        ReloadAction::ReloadWorkItems => store.reload_work_items().await,
        ReloadAction::ReloadEpics => store.reload_epics().await,
        ReloadAction::ReloadCheckpoints => store.reload_checkpoints().await,
        ReloadAction::ReloadFileStatus => store.reload_file_status().await,
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        // Disabled by the select guard; never completes
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counting store with a configurable per-call delay.
    struct CountingStore {
        delay: Duration,
        counts: [AtomicUsize; 4],
    }

    impl CountingStore {
        fn new(delay: Duration) -> Self {
            Self {
                delay,
                counts: Default::default(),
            }
        }

        fn slot(&self, action: ReloadAction) -> &AtomicUsize {
            let index = ReloadAction::ALL
                .iter()
                .position(|a| *a == action)
                .unwrap();
            &self.counts[index]
        }

        fn count(&self, action: ReloadAction) -> usize {
            self.slot(action).load(Ordering::SeqCst)
        }

        async fn record(&self, action: ReloadAction) {
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.slot(action).fetch_add(1, Ordering::SeqCst);
        }
    }

    impl StateStore for CountingStore {
        async fn reload_work_items(&self) {
            self.record(ReloadAction::ReloadWorkItems).await
        }
        async fn reload_epics(&self) {
            self.record(ReloadAction::ReloadEpics).await
        }
        async fn reload_checkpoints(&self) {
            self.record(ReloadAction::ReloadCheckpoints).await
        }
        async fn reload_file_status(&self) {
            self.record(ReloadAction::ReloadFileStatus).await
        }
    }

    const QUIET: Duration = Duration::from_millis(40);

    fn started_router(store: &Arc<CountingStore>) -> (ReloadRouter, CancellationToken) {
        let shutdown = CancellationToken::new();
        let router = ReloadRouter::start(store.clone(), QUIET, shutdown.clone());
        (router, shutdown)
    }

    #[tokio::test]
    async fn test_burst_of_triggers_coalesces_to_one_reload() {
        let store = Arc::new(CountingStore::new(Duration::ZERO));
        let (router, shutdown) = started_router(&store);
        let handle = router.handle();

        for _ in 0..10 {
            handle.trigger(ReloadAction::ReloadWorkItems);
        }
        tokio::time::sleep(QUIET * 3).await;

        assert_eq!(store.count(ReloadAction::ReloadWorkItems), 1);
        shutdown.cancel();
        router.abort();
    }

    #[tokio::test]
    async fn test_trigger_during_flight_runs_exactly_one_more_reload() {
        let store = Arc::new(CountingStore::new(Duration::from_millis(80)));
        let (router, shutdown) = started_router(&store);
        let handle = router.handle();

        handle.trigger(ReloadAction::ReloadEpics);
        // Land inside the reload window (after the quiet period elapsed)
        tokio::time::sleep(QUIET + Duration::from_millis(20)).await;
        handle.trigger(ReloadAction::ReloadEpics);
        handle.trigger(ReloadAction::ReloadEpics);

        // First reload (80ms) + re-armed quiet period + second reload
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(store.count(ReloadAction::ReloadEpics), 2);

        shutdown.cancel();
        router.abort();
    }

    #[tokio::test]
    async fn test_actions_do_not_block_each_other() {
        let store = Arc::new(CountingStore::new(Duration::from_millis(150)));
        let (router, shutdown) = started_router(&store);
        let handle = router.handle();

        handle.trigger(ReloadAction::ReloadFileStatus);
        handle.trigger(ReloadAction::ReloadWorkItems);

        // Both quiet periods elapse together; the slow file-status reload
        // must not delay the work-items reload past its own window.
        tokio::time::sleep(QUIET + Duration::from_millis(30)).await;
        assert_eq!(store.count(ReloadAction::ReloadWorkItems), 0);
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(store.count(ReloadAction::ReloadWorkItems), 1);
        assert_eq!(store.count(ReloadAction::ReloadFileStatus), 1);

        shutdown.cancel();
        router.abort();
    }

    #[tokio::test]
    async fn test_trigger_after_shutdown_is_a_noop() {
        let store = Arc::new(CountingStore::new(Duration::ZERO));
        let (router, shutdown) = started_router(&store);
        let handle = router.handle();

        shutdown.cancel();
        router.abort();
        tokio::time::sleep(Duration::from_millis(20)).await;

        handle.trigger(ReloadAction::ReloadWorkItems);
        tokio::time::sleep(QUIET * 2).await;
        assert_eq!(store.count(ReloadAction::ReloadWorkItems), 0);
    }

    #[tokio::test]
    async fn test_trigger_all_reaches_every_worker() {
        let store = Arc::new(CountingStore::new(Duration::ZERO));
        let (router, shutdown) = started_router(&store);

        router.handle().trigger_all();
        tokio::time::sleep(QUIET * 3).await;

        for action in ReloadAction::ALL {
            assert_eq!(store.count(action), 1, "action {action} did not fire");
        }

        shutdown.cancel();
        router.abort();
    }
}
