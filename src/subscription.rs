//! Disposable subscription handles
//!
//! Every registration with a `FanoutHub`, a `Transport`, or a
//! `SerializingChannel` hands back a `Subscription`. Cancelling it, or
//! simply dropping it, unregisters the listener exactly once.

use std::fmt;
use std::sync::{Mutex, PoisonError};

type Release = Box<dyn FnOnce() + Send>;

/// Handle controlling the lifetime of one listener registration
///
/// The release action runs at most once, whether triggered by `cancel()`
/// from any number of threads or by `Drop`.
#[must_use = "dropping a Subscription immediately unregisters its listener"]
pub struct Subscription {
    release: Mutex<Option<Release>>,
}

impl Subscription {
    /// Create a subscription that runs `release` when cancelled
    pub fn new(release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            release: Mutex::new(Some(Box::new(release))),
        }
    }

    /// A subscription with nothing to release
    pub fn noop() -> Self {
        Self {
            release: Mutex::new(None),
        }
    }

    /// Unregister the listener. Repeated calls are no-ops.
    pub fn cancel(&self) {
        let release = self
            .release
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if let Some(release) = release {
            release();
        }
    }

    /// Whether the release action is still pending
    pub fn is_active(&self) -> bool {
        self.release
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Give up the handle without unregistering
    ///
    /// The listener then stays registered for as long as whatever it was
    /// registered with.
    pub fn detach(self) {
        self.release
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting() -> (Subscription, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        let sub = Subscription::new(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });
        (sub, count)
    }

    #[test]
    fn test_cancel_runs_release_once() {
        let (sub, count) = counting();
        assert!(sub.is_active());

        sub.cancel();
        sub.cancel();
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(!sub.is_active());

        drop(sub);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_drop_cancels() {
        let (sub, count) = counting();
        drop(sub);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_detach_skips_release() {
        let (sub, count) = counting();
        sub.detach();
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_noop_is_inactive() {
        let sub = Subscription::noop();
        assert!(!sub.is_active());
        sub.cancel();
    }

    #[test]
    fn test_concurrent_cancel_releases_once() {
        let (sub, count) = counting();
        let sub = Arc::new(sub);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let sub = sub.clone();
                std::thread::spawn(move || sub.cancel())
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_debug_reports_state() {
        let sub = Subscription::noop();
        assert_eq!(format!("{:?}", sub), "Subscription { active: false }");
    }
}
