//! Request coalescing: at most one in-flight fetch per key.
//!
//! The first caller for a key spawns the fetch; later callers for the same key
//! wait on the same outcome. The fetch runs on its own task, so a caller that
//! stops waiting does not cancel it and the result still lands in whatever
//! cache the fetch writes to.

use crate::api::Error;
use parking_lot::Mutex;
use std::{collections::HashMap, future::Future, hash::Hash, sync::Arc};
use tokio::sync::watch;
use tracing::trace;

type Outcome<V> = Option<Result<V, Error>>;

pub struct InFlight<K, V> {
    pending: Arc<Mutex<HashMap<K, watch::Receiver<Outcome<V>>>>>,
}

impl<K, V> Clone for InFlight<K, V> {
    fn clone(&self) -> Self {
        Self {
            pending: Arc::clone(&self.pending),
        }
    }
}

impl<K, V> Default for InFlight<K, V> {
    fn default() -> Self {
        Self {
            pending: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl<K, V> InFlight<K, V>
where
    K: Eq + Hash + Clone + std::fmt::Debug + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Joins the in-flight fetch for `key`, or starts one with `fetch`.
    ///
    /// # Errors
    /// Returns the fetch's error, or `Error::Network` if the fetch task died
    /// before producing a result.
    pub async fn run<F, Fut>(&self, key: K, fetch: F) -> Result<V, Error>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, Error>> + Send + 'static,
    {
        let mut rx = {
            let mut pending = self.pending.lock();
            if let Some(rx) = pending.get(&key) {
                trace!(?key, "joining in-flight request");
                rx.clone()
            } else {
                let (tx, rx) = watch::channel(None);
                pending.insert(key.clone(), rx.clone());

                let task = fetch();
                let pending_map = Arc::clone(&self.pending);
                tokio::spawn(async move {
                    let outcome = task.await;
                    // unregister first: a caller arriving after this starts a
                    // fresh fetch, earlier joiners hold their own receivers
                    pending_map.lock().remove(&key);
                    let _ = tx.send(Some(outcome));
                });
                rx
            }
        };

        let outcome = match rx.wait_for(Option::is_some).await {
            Ok(outcome) => outcome.clone(),
            Err(_) => None,
        };

        outcome.unwrap_or_else(|| {
            Err(Error::Network(
                "request was dropped before completing".to_string(),
            ))
        })
    }

    #[must_use]
    pub fn is_pending(&self, key: &K) -> bool {
        self.pending.lock().contains_key(key)
    }

    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.lock().len()
    }
}

impl<K, V> std::fmt::Debug for InFlight<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InFlight")
            .field("pending", &self.pending.lock().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn concurrent_callers_share_one_fetch() {
        let in_flight: InFlight<&'static str, u32> = InFlight::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let make = || {
            let calls = Arc::clone(&calls);
            move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(30)).await;
                Ok(42)
            }
        };

        let (a, b, c) = tokio::join!(
            in_flight.run("menu", make()),
            in_flight.run("menu", make()),
            in_flight.run("menu", make()),
        );

        assert_eq!((a, b, c), (Ok(42), Ok(42), Ok(42)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(in_flight.pending_count(), 0);
    }

    #[tokio::test]
    async fn distinct_keys_fetch_independently() {
        let in_flight: InFlight<u8, u8> = InFlight::new();
        let (a, b) = tokio::join!(
            in_flight.run(1, || async { Ok(1) }),
            in_flight.run(2, || async { Ok(2) }),
        );
        assert_eq!((a, b), (Ok(1), Ok(2)));
    }

    #[tokio::test]
    async fn errors_are_shared_and_not_retained() {
        let in_flight: InFlight<u8, u8> = InFlight::new();
        let failed = in_flight
            .run(1, || async { Err(Error::Network("down".to_string())) })
            .await;
        assert_eq!(failed, Err(Error::Network("down".to_string())));
        assert!(!in_flight.is_pending(&1));

        let retried = in_flight.run(1, || async { Ok(9) }).await;
        assert_eq!(retried, Ok(9));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn retry_after_failure_never_joins_the_failed_fetch() {
        let in_flight: InFlight<u8, u8> = InFlight::new();
        for attempt in 0..50_u8 {
            let failed = in_flight
                .run(1, || async { Err(Error::Network("down".to_string())) })
                .await;
            assert!(failed.is_err());

            let retried = in_flight.run(1, move || async move { Ok(attempt) }).await;
            assert_eq!(retried, Ok(attempt));
        }
    }

    #[tokio::test]
    async fn dropped_caller_does_not_cancel_fetch() {
        let in_flight: InFlight<u8, u8> = InFlight::new();
        let finished = Arc::new(AtomicUsize::new(0));
        let flag = Arc::clone(&finished);

        let abandoned = in_flight.run(1, move || async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            flag.fetch_add(1, Ordering::SeqCst);
            Ok(1)
        });
        let _ = tokio::time::timeout(Duration::from_millis(1), abandoned).await;

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(finished.load(Ordering::SeqCst), 1);
    }
}
