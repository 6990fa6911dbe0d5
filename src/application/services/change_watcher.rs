use crate::domain::entities::DEFAULT_POLL_INTERVAL_SECS;
use crate::domain::repositories::RepoRepository;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS);

/// Detects out-of-band edits to the repository set.
///
/// A background task periodically fingerprints the current set via the
/// backend and publishes an incremented change counter whenever the
/// fingerprint differs from the last observed one. Subscribers re-fetch the
/// full listing on every counter move. Each fingerprint request is awaited
/// before the next tick fires, so slow commands coalesce instead of piling
/// up.
pub struct ChangeWatcher {
    task: JoinHandle<()>,
    rx: watch::Receiver<u64>,
}

impl ChangeWatcher {
    pub fn spawn(repository: Arc<dyn RepoRepository>, interval: Duration) -> Self {
        let (tx, rx) = watch::channel(0u64);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            // Starts empty so the first successful poll publishes a change
            // and triggers the initial fetch.
            let mut last_fingerprint = String::new();
            let mut changes = 0u64;

            loop {
                ticker.tick().await;

                match repository.get_repos_hash().await {
                    Ok(fingerprint) => {
                        if fingerprint != last_fingerprint {
                            last_fingerprint = fingerprint;
                            changes += 1;
                            tracing::debug!("repository set changed ({changes})");
                            let _ = tx.send(changes);
                        }
                    }
                    // A failed poll is skipped; the next tick reconciles.
                    Err(e) => tracing::debug!("fingerprint poll failed: {e}"),
                }
            }
        });

        Self { task, rx }
    }

    /// A receiver that resolves whenever the change counter moves.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.rx.clone()
    }

    /// Current value of the change counter.
    pub fn changes(&self) -> u64 {
        *self.rx.borrow()
    }

    /// Stop polling. No fingerprint comparison happens afterwards.
    pub fn stop(&self) {
        self.task.abort();
    }
}

impl Drop for ChangeWatcher {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{ErrorMessage, RefreshError, Repository};
    use crate::domain::errors::BackendError;
    use crate::domain::repositories::{RefreshHandle, RepoRepository};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Serves a scripted sequence of fingerprints, repeating the last one
    /// once exhausted. Only `get_repos_hash` is reachable from the watcher.
    struct ScriptedFingerprints {
        script: Mutex<VecDeque<Result<String, ()>>>,
        last: Mutex<String>,
        polls: AtomicUsize,
    }

    impl ScriptedFingerprints {
        fn new(script: Vec<Result<&str, ()>>) -> Self {
            Self {
                script: Mutex::new(
                    script
                        .into_iter()
                        .map(|r| r.map(str::to_string))
                        .collect(),
                ),
                last: Mutex::new(String::new()),
                polls: AtomicUsize::new(0),
            }
        }

        fn poll_count(&self) -> usize {
            self.polls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RepoRepository for ScriptedFingerprints {
        async fn get_repos(&self) -> Result<Vec<Repository>, BackendError> {
            unimplemented!()
        }

        async fn get_repos_hash(&self) -> Result<String, BackendError> {
            self.polls.fetch_add(1, Ordering::SeqCst);

            match self.script.lock().unwrap().pop_front() {
                Some(Ok(hash)) => {
                    *self.last.lock().unwrap() = hash.clone();
                    Ok(hash)
                }
                Some(Err(())) => Err(BackendError::Internal("poll failed".to_string())),
                None => Ok(self.last.lock().unwrap().clone()),
            }
        }

        async fn add_repo(&self, _repo: &Repository) -> Result<(), BackendError> {
            unimplemented!()
        }

        async fn modify_repo(&self, _repo: &Repository) -> Result<(), BackendError> {
            unimplemented!()
        }

        async fn delete_repo(&self, _repo: &Repository) -> Result<(), BackendError> {
            unimplemented!()
        }

        fn refresh_repos(&self, _repo: Option<&Repository>, _import_keys: bool) -> RefreshHandle {
            unimplemented!()
        }

        fn parse_error(&self, _diagnostic: &str) -> RefreshError {
            unimplemented!()
        }

        fn error_message(&self, _error: &RefreshError) -> ErrorMessage {
            unimplemented!()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn increments_once_per_observed_difference() {
        let backend = Arc::new(ScriptedFingerprints::new(vec![
            Ok("a"),
            Ok("a"),
            Ok("b"),
            Ok("b"),
            Ok("c"),
        ]));
        let watcher = ChangeWatcher::spawn(backend, Duration::from_millis(10));

        tokio::time::sleep(Duration::from_millis(200)).await;

        // Empty -> a, a -> b, b -> c.
        assert_eq!(watcher.changes(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn stable_fingerprint_does_not_increment() {
        let backend = Arc::new(ScriptedFingerprints::new(vec![Ok("same")]));
        let watcher = ChangeWatcher::spawn(Arc::clone(&backend) as _, Duration::from_millis(10));

        tokio::time::sleep(Duration::from_millis(200)).await;

        assert!(backend.poll_count() > 2);
        assert_eq!(watcher.changes(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_polls_are_skipped() {
        let backend = Arc::new(ScriptedFingerprints::new(vec![Err(()), Err(()), Ok("a")]));
        let watcher = ChangeWatcher::spawn(backend, Duration::from_millis(10));

        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(watcher.changes(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_halts_polling() {
        let backend = Arc::new(ScriptedFingerprints::new(vec![Ok("a")]));
        let watcher = ChangeWatcher::spawn(Arc::clone(&backend) as _, Duration::from_millis(10));

        tokio::time::sleep(Duration::from_millis(50)).await;
        watcher.stop();
        tokio::time::sleep(Duration::from_millis(1)).await;

        let polls_at_stop = backend.poll_count();
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(backend.poll_count(), polls_at_stop);
    }

    #[tokio::test(start_paused = true)]
    async fn subscriber_sees_counter_move() {
        let backend = Arc::new(ScriptedFingerprints::new(vec![Ok("a")]));
        let watcher = ChangeWatcher::spawn(backend, Duration::from_millis(10));
        let mut rx = watcher.subscribe();

        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), 1);
    }
}
