//! Single-flight table: collapses concurrent identical computations into one.
//!
//! The first caller for a key becomes the leader and computes; concurrent
//! callers for the same key await the leader's broadcast instead of
//! recomputing. The table entry is cleared on completion, success or failure
//! (and, via the entry guard, when the leader's future is dropped), so a
//! later request starts a fresh flight.

use std::collections::HashMap;
use std::future::Future;

use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::debug;

pub struct SingleFlight<T: Clone> {
    inflight: Mutex<HashMap<String, watch::Receiver<Option<T>>>>,
}

enum Role<T> {
    Leader(watch::Sender<Option<T>>),
    Follower(watch::Receiver<Option<T>>),
}

/// Removes the flight entry even when the leader is cancelled mid-compute.
struct FlightGuard<'a, T: Clone> {
    flights: &'a SingleFlight<T>,
    key: String,
}

impl<T: Clone> Drop for FlightGuard<'_, T> {
    fn drop(&mut self) {
        self.flights.inflight.lock().remove(&self.key);
    }
}

impl<T: Clone> SingleFlight<T> {
    pub fn new() -> Self {
        Self {
            inflight: Mutex::new(HashMap::new()),
        }
    }

    /// Number of flights currently in progress.
    pub fn in_progress(&self) -> usize {
        self.inflight.lock().len()
    }

    /// Runs `compute` for `key`, deduplicating against concurrent callers.
    pub async fn run<F, Fut>(&self, key: &str, compute: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let role = {
            let mut inflight = self.inflight.lock();
            if let Some(rx) = inflight.get(key) {
                Role::Follower(rx.clone())
            } else {
                let (tx, rx) = watch::channel(None);
                inflight.insert(key.to_string(), rx);
                Role::Leader(tx)
            }
        };

        match role {
            Role::Leader(tx) => {
                let guard = FlightGuard {
                    flights: self,
                    key: key.to_string(),
                };
                let outcome = compute().await;
                drop(guard);
                let _ = tx.send(Some(outcome.clone()));
                outcome
            }
            Role::Follower(mut rx) => {
                debug!(key, "Joining in-flight computation");
                loop {
                    if let Some(outcome) = rx.borrow_and_update().as_ref() {
                        return outcome.clone();
                    }
                    if rx.changed().await.is_err() {
                        break;
                    }
                }
                // The leader vanished without broadcasting (cancelled).
                // Compute directly rather than deadlock.
                compute().await
            }
        }
    }
}

impl<T: Clone> Default for SingleFlight<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> std::fmt::Debug for SingleFlight<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SingleFlight")
            .field("in_progress", &self.in_progress())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn test_single_caller_computes() {
        let flights: SingleFlight<u32> = SingleFlight::new();
        let result = flights.run("key", || async { 7 }).await;
        assert_eq!(result, 7);
        assert_eq!(flights.in_progress(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_computation() {
        let flights: Arc<SingleFlight<u32>> = Arc::new(SingleFlight::new());
        let computations = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let flights = Arc::clone(&flights);
            let computations = Arc::clone(&computations);
            handles.push(tokio::spawn(async move {
                flights
                    .run("shared", move || async move {
                        computations.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(40)).await;
                        42u32
                    })
                    .await
            }));
        }

        for handle in handles {
            assert_eq!(handle.await.unwrap(), 42);
        }
        assert_eq!(computations.load(Ordering::SeqCst), 1);
        assert_eq!(flights.in_progress(), 0);
    }

    #[tokio::test]
    async fn test_distinct_keys_compute_independently() {
        let flights: Arc<SingleFlight<u32>> = Arc::new(SingleFlight::new());
        let computations = Arc::new(AtomicUsize::new(0));

        let run = |key: &'static str| {
            let flights = Arc::clone(&flights);
            let computations = Arc::clone(&computations);
            tokio::spawn(async move {
                flights
                    .run(key, move || async move {
                        computations.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(20)).await;
                        1u32
                    })
                    .await
            })
        };

        let (a, b) = tokio::join!(run("first"), run("second"));
        a.unwrap();
        b.unwrap();
        assert_eq!(computations.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_entry_cleared_after_failure_outcome() {
        let flights: SingleFlight<Result<u32, String>> = SingleFlight::new();
        let failed = flights
            .run("key", || async { Err("boom".to_string()) })
            .await;
        assert!(failed.is_err());
        assert_eq!(flights.in_progress(), 0);

        // A later request starts a fresh flight and can succeed.
        let ok = flights.run("key", || async { Ok(5) }).await;
        assert_eq!(ok, Ok(5));
    }

    #[tokio::test]
    async fn test_cancelled_leader_does_not_wedge_the_table() {
        let flights: Arc<SingleFlight<u32>> = Arc::new(SingleFlight::new());

        let leader = {
            let flights = Arc::clone(&flights);
            tokio::spawn(async move {
                flights
                    .run("key", || async {
                        tokio::time::sleep(Duration::from_secs(60)).await;
                        1u32
                    })
                    .await
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        leader.abort();
        let _ = leader.await;

        // The guard cleared the entry; a new caller computes normally.
        let result = flights.run("key", || async { 9u32 }).await;
        assert_eq!(result, 9);
        assert_eq!(flights.in_progress(), 0);
    }
}
