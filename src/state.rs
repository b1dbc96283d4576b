//! Observable value holder.
//!
//! A `StateCell` keeps the latest value, replays it to every new subscriber and
//! delivers later values to all listeners in publish order. Values are stored
//! behind `Arc` and replaced wholesale, so a reader never sees a half-updated
//! snapshot. Async consumers can also await a predicate through `wait_for`;
//! they wake only after every listener has seen the value.
//!
//! Listeners run synchronously on the publishing thread. They may subscribe to
//! or publish into the same cell; a nested publish supersedes the outer one, so
//! listeners the outer delivery had not reached yet only see the newer value.

use parking_lot::{Mutex, ReentrantMutex};
use std::{collections::BTreeMap, sync::Arc};
use tokio::sync::watch;

type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Listeners<T> {
    next_id: u64,
    entries: BTreeMap<u64, Listener<T>>,
}

struct Latest<T> {
    version: u64,
    value: Arc<T>,
}

pub struct StateCell<T> {
    listeners: Arc<Mutex<Listeners<T>>>,
    // one delivering thread at a time; the same thread may re-enter
    delivery: ReentrantMutex<()>,
    latest: Mutex<Latest<T>>,
    // updated once listeners ran, so `wait_for` never overtakes them
    settled: watch::Sender<Arc<T>>,
}

impl<T: Send + Sync + 'static> StateCell<T> {
    #[must_use]
    pub fn new(initial: T) -> Arc<Self> {
        let initial = Arc::new(initial);
        let (settled, _) = watch::channel(Arc::clone(&initial));
        Arc::new(Self {
            listeners: Arc::new(Mutex::new(Listeners {
                next_id: 0,
                entries: BTreeMap::new(),
            })),
            delivery: ReentrantMutex::new(()),
            latest: Mutex::new(Latest {
                version: 0,
                value: initial,
            }),
            settled,
        })
    }

    #[must_use]
    pub fn current(&self) -> Arc<T> {
        Arc::clone(&self.latest.lock().value)
    }

    fn version(&self) -> u64 {
        self.latest.lock().version
    }

    /// Replaces the value and notifies every listener.
    pub fn publish(&self, value: T) {
        let _delivery = self.delivery.lock();
        let value = Arc::new(value);
        let version = {
            let mut latest = self.latest.lock();
            latest.version += 1;
            latest.value = Arc::clone(&value);
            latest.version
        };

        let listeners: Vec<Listener<T>> = self.listeners.lock().entries.values().cloned().collect();
        for listener in listeners {
            if self.version() != version {
                // a listener published a newer value, which has been delivered in full
                return;
            }
            listener(&value);
        }

        if self.version() == version {
            self.settled.send_replace(value);
        }
    }

    /// Registers `listener`, immediately replaying the current value to it.
    pub fn subscribe(&self, listener: impl Fn(&T) + Send + Sync + 'static) -> Subscription {
        let _delivery = self.delivery.lock();
        let listener: Listener<T> = Arc::new(listener);

        let id = {
            let mut listeners = self.listeners.lock();
            let id = listeners.next_id;
            listeners.next_id += 1;
            listeners.entries.insert(id, Arc::clone(&listener));
            id
        };

        listener(&self.current());

        let weak = Arc::downgrade(&self.listeners);
        Subscription::new(move || {
            if let Some(listeners) = weak.upgrade() {
                listeners.lock().entries.remove(&id);
            }
        })
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.listeners.lock().entries.len()
    }

    /// Resolves with the first delivered value (current or future) matching
    /// `predicate`.
    pub async fn wait_for(&self, mut predicate: impl FnMut(&T) -> bool) -> Arc<T> {
        let mut rx = self.settled.subscribe();
        let value = match rx.wait_for(|value| predicate(value)).await {
            Ok(value) => Arc::clone(&value),
            // the sender lives in `self`, so this only happens while tearing down
            Err(_) => self.current(),
        };
        value
    }
}

impl<T> std::fmt::Debug for StateCell<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateCell")
            .field("listeners", &self.listeners.lock().entries.len())
            .finish_non_exhaustive()
    }
}

/// Unsubscribe token returned by [`StateCell::subscribe`]; dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    fn new(release: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    pub fn unsubscribe(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}
