//! Async stream view of a typed subscription

use crate::subscription::Subscription;
use futures::Stream;
use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio_stream::wrappers::UnboundedReceiverStream;

/// Stream of decoded events of type `V`
///
/// Returned by `SerializingChannel::subscribe_stream`. Events are buffered
/// without bound until polled. Dropping the stream unregisters it; after
/// `cancel()` the stream yields what is already buffered and then ends.
pub struct EventStream<V> {
    events: UnboundedReceiverStream<V>,
    subscription: Subscription,
}

impl<V> EventStream<V> {
    pub(crate) fn new(
        receiver: tokio::sync::mpsc::UnboundedReceiver<V>,
        subscription: Subscription,
    ) -> Self {
        Self {
            events: UnboundedReceiverStream::new(receiver),
            subscription,
        }
    }

    /// Stop receiving new events
    pub fn cancel(&self) {
        self.subscription.cancel();
    }

    /// Whether the stream is still registered with its channel
    pub fn is_active(&self) -> bool {
        self.subscription.is_active()
    }
}

impl<V> Stream for EventStream<V> {
    type Item = V;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<V>> {
        Pin::new(&mut self.get_mut().events).poll_next(cx)
    }
}

impl<V> fmt::Debug for EventStream<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("subscription", &self.subscription)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    fn assert_unpin<T: Unpin>() {}

    #[test]
    fn test_event_stream_is_unpin() {
        assert_unpin::<EventStream<String>>();
    }

    #[tokio::test]
    async fn test_next_without_pinning() {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        let mut stream = EventStream::new(rx, Subscription::noop());
        tx.send(7u32).unwrap();
        drop(tx);

        assert_eq!(stream.next().await, Some(7));
        assert_eq!(stream.next().await, None);
    }
}
