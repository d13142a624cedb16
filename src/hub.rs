//! In-process fan-out hub
//!
//! `FanoutHub` delivers one value to every registered listener,
//! synchronously, on the caller's thread. It knows nothing about
//! serialization; `SerializingChannel` uses it to share one parsed payload
//! between all typed subscribers.

use crate::subscription::Subscription;
use crate::types::HubConfig;
use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Inner<T> {
    /// listener id → callback, ordered by registration
    listeners: RwLock<BTreeMap<u64, Callback<T>>>,
    next_id: AtomicU64,
    config: HubConfig,
}

impl<T> Inner<T> {
    fn is_registered(&self, id: u64) -> bool {
        self.listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&id)
    }

    fn remove(&self, id: u64) {
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id);
    }
}

/// Multi-listener broadcaster for values of type `T`
///
/// Cloning a hub yields another handle to the same listener set.
pub struct FanoutHub<T> {
    inner: Arc<Inner<T>>,
}

impl<T: 'static> FanoutHub<T> {
    /// Create a hub with default settings
    pub fn new() -> Self {
        Self::with_config(HubConfig::default())
    }

    /// Create a hub with explicit settings
    pub fn with_config(config: HubConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                listeners: RwLock::new(BTreeMap::new()),
                next_id: AtomicU64::new(1),
                config,
            }),
        }
    }

    /// Register a listener for all future broadcasts
    ///
    /// The returned subscription removes the listener when cancelled or
    /// dropped. It only holds a weak reference, so it never keeps the hub
    /// alive.
    pub fn register<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner
            .listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, Arc::new(callback));

        let hub = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = hub.upgrade() {
                inner.remove(id);
            }
        })
    }

    /// Deliver `value` to every registered listener in registration order
    ///
    /// Listeners run without the hub lock held, so they may register,
    /// cancel, or broadcast themselves. A listener cancelled while the
    /// broadcast is running is skipped if it has not been reached yet.
    /// Returns the number of listeners invoked.
    pub fn broadcast(&self, value: &T) -> usize {
        let snapshot: Vec<(u64, Callback<T>)> = self
            .inner
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(id, cb)| (*id, cb.clone()))
            .collect();

        let mut delivered = 0;
        for (id, callback) in snapshot {
            if !self.inner.is_registered(id) {
                continue;
            }
            delivered += 1;

            if !self.inner.config.isolate_panics {
                callback(value);
                continue;
            }

            if let Err(panic) = catch_unwind(AssertUnwindSafe(|| callback(value))) {
                tracing::warn!(
                    listener = id,
                    panic = %panic_message(panic.as_ref()),
                    "Listener panicked during broadcast"
                );
            }
        }

        delivered
    }

    /// Number of registered listeners
    pub fn len(&self) -> usize {
        self.inner
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// True when no listener is registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: 'static> Default for FanoutHub<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for FanoutHub<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> fmt::Debug for FanoutHub<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let listeners = self
            .inner
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len();
        f.debug_struct("FanoutHub")
            .field("listeners", &listeners)
            .field("config", &self.inner.config)
            .finish()
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(s) = panic.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}
