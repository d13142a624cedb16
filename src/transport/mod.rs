//! Raw transport trait — the untyped layer beneath a channel
//!
//! A transport moves opaque payloads of one concrete type to every
//! listener registered with it. Delivery ordering, durability, and
//! threading are whatever the implementation provides; `SerializingChannel`
//! only relies on `publish` and `subscribe`.

use crate::subscription::Subscription;
use std::sync::Arc;

pub mod memory;

/// Listener invoked with every payload a transport delivers
pub type Listener<P> = Arc<dyn Fn(&P) + Send + Sync>;

/// Core trait for raw-payload transports
///
/// Implementations may invoke listeners from any thread, including
/// concurrently; listeners are `Send + Sync` for that reason.
pub trait Transport: Send + Sync {
    /// Wire-level unit moved by this transport
    type Payload: Send + Sync + 'static;

    /// Deliver a payload to all current listeners (fire-and-forget)
    fn publish(&self, payload: Self::Payload);

    /// Register a listener for incoming payloads
    ///
    /// The listener stays registered until the returned subscription is
    /// cancelled or dropped.
    fn subscribe(&self, listener: Listener<Self::Payload>) -> Subscription;

    /// Transport name used in log fields (e.g., "memory")
    fn name(&self) -> &str {
        "transport"
    }
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    type Payload = T::Payload;

    fn publish(&self, payload: Self::Payload) {
        (**self).publish(payload)
    }

    fn subscribe(&self, listener: Listener<Self::Payload>) -> Subscription {
        (**self).subscribe(listener)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
