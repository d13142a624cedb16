//! In-memory transport for testing and single-process use
//!
//! Payloads are delivered synchronously to every listener on the
//! publishing thread. Nothing is persisted.

use super::{Listener, Transport};
use crate::hub::FanoutHub;
use crate::subscription::Subscription;
use crate::types::HubConfig;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// In-process transport backed by a `FanoutHub`
pub struct MemoryTransport<P> {
    hub: FanoutHub<P>,
    published: AtomicU64,
}

impl<P: Send + Sync + 'static> MemoryTransport<P> {
    /// Create a new in-memory transport
    pub fn new() -> Self {
        Self::with_config(HubConfig::default())
    }

    /// Create a new in-memory transport with explicit hub settings
    pub fn with_config(config: HubConfig) -> Self {
        Self {
            hub: FanoutHub::with_config(config),
            published: AtomicU64::new(0),
        }
    }

    /// Number of registered listeners
    pub fn listener_count(&self) -> usize {
        self.hub.len()
    }

    /// Total payloads published since creation
    pub fn published(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }
}

impl<P: Send + Sync + 'static> Default for MemoryTransport<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Send + Sync + 'static> Transport for MemoryTransport<P> {
    type Payload = P;

    fn publish(&self, payload: P) {
        let sequence = self.published.fetch_add(1, Ordering::Relaxed) + 1;
        let delivered = self.hub.broadcast(&payload);
        tracing::trace!(sequence, delivered, "Memory transport delivered payload");
    }

    fn subscribe(&self, listener: Listener<P>) -> Subscription {
        self.hub.register(move |payload: &P| listener(payload))
    }

    fn name(&self) -> &str {
        "memory"
    }
}

impl<P> fmt::Debug for MemoryTransport<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryTransport")
            .field("hub", &self.hub)
            .field("published", &self.published.load(Ordering::Relaxed))
            .finish()
    }
}
