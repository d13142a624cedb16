//! Serializing channel — typed publish/subscribe over a raw transport
//!
//! `SerializingChannel` owns one encoder, one decoder, and one fan-out hub,
//! and holds a single listener registration with its transport for its
//! whole lifetime. Every incoming payload is parsed once and shared with
//! all subscribers; each subscriber then decodes that parsed form as the
//! type it asked for.
//!
//! Failures are silent: a value that fails to encode is not published, and
//! a payload that does not decode as a subscriber's type is skipped for that
//! subscriber. A transport usually carries many event types, so "not my
//! type" is the normal case. Register a failure hook to observe drops.

use crate::codec::{Decoder, Encoder, JsonCodec};
use crate::error::{ChannelError, Result};
use crate::hub::FanoutHub;
use crate::stream::EventStream;
use crate::subscription::Subscription;
use crate::transport::Transport;
use crate::types::ChannelConfig;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

/// Callback observing encode and decode failures the channel drops
pub type FailureHook = Arc<dyn Fn(&ChannelError) + Send + Sync>;

/// Shared by the channel, its upstream listener, and every subscriber
struct Diagnostics {
    channel: String,
    hook: RwLock<Option<FailureHook>>,
}

impl Diagnostics {
    fn dropped(&self, error: ChannelError) {
        let hook = self
            .hook
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(hook) = hook {
            hook(&error);
        }
    }
}

/// Typed channel over a transport of payload type `P`
///
/// `E` encodes outgoing events into `P`; `D` decodes incoming `P`s. The
/// event type is chosen per call, not fixed at construction.
pub struct SerializingChannel<P, E, D: Decoder<P>> {
    publish_fn: Box<dyn Fn(P) + Send + Sync>,
    encoder: E,
    decoder: Arc<D>,
    hub: FanoutHub<D::Parsed>,
    diagnostics: Arc<Diagnostics>,

    /// Registration with the transport, released when the channel drops
    upstream: Subscription,
}

impl<P, E, D> SerializingChannel<P, E, D>
where
    P: Send + Sync + 'static,
    E: Encoder<P>,
    D: Decoder<P> + 'static,
{
    /// Create a channel over `transport` with default settings
    pub fn new<T>(transport: T, encoder: E, decoder: D) -> Self
    where
        T: Transport<Payload = P> + 'static,
    {
        Self::build(transport, encoder, decoder, ChannelConfig::default())
    }

    /// Create a channel over `transport` with explicit settings
    pub fn with_config<T>(
        transport: T,
        encoder: E,
        decoder: D,
        config: ChannelConfig,
    ) -> Result<Self>
    where
        T: Transport<Payload = P> + 'static,
    {
        config.validate()?;
        Ok(Self::build(transport, encoder, decoder, config))
    }

    fn build<T>(transport: T, encoder: E, decoder: D, config: ChannelConfig) -> Self
    where
        T: Transport<Payload = P> + 'static,
    {
        let decoder = Arc::new(decoder);
        let hub = FanoutHub::with_config(config.hub);
        let diagnostics = Arc::new(Diagnostics {
            channel: config.name,
            hook: RwLock::new(None),
        });

        let upstream = {
            let decoder = decoder.clone();
            let hub = hub.clone();
            let diagnostics = diagnostics.clone();
            transport.subscribe(Arc::new(move |payload: &P| match decoder.parse(payload) {
                Ok(parsed) => {
                    hub.broadcast(&parsed);
                }
                Err(e) => diagnostics.dropped(e),
            }))
        };

        tracing::debug!(
            channel = %diagnostics.channel,
            transport = transport.name(),
            "Serializing channel created"
        );

        Self {
            publish_fn: Box::new(move |payload| transport.publish(payload)),
            encoder,
            decoder,
            hub,
            diagnostics,
            upstream,
        }
    }

    /// Encode `event` and hand it to the transport
    ///
    /// Fire-and-forget: an encode failure is dropped silently (and reported
    /// to the failure hook, if any).
    pub fn publish<V: Serialize + ?Sized>(&self, event: &V) {
        if let Err(e) = self.try_publish(event) {
            self.diagnostics.dropped(e);
        }
    }

    /// Like `publish`, but returns the encode failure to the caller
    ///
    /// `Ok` only means the payload was handed to the transport, not that
    /// anyone received it.
    pub fn try_publish<V: Serialize + ?Sized>(&self, event: &V) -> Result<()> {
        let payload = self.encoder.encode(event)?;
        (self.publish_fn)(payload);
        Ok(())
    }

    /// Call `handler` with every incoming event that decodes as `V`
    ///
    /// Payloads that do not decode as `V` are skipped for this handler
    /// only. The handler stays registered until the returned subscription
    /// is cancelled or dropped.
    pub fn subscribe<V, F>(&self, handler: F) -> Subscription
    where
        V: DeserializeOwned + 'static,
        F: Fn(V) + Send + Sync + 'static,
    {
        let decoder = self.decoder.clone();
        let diagnostics = self.diagnostics.clone();
        self.hub
            .register(move |parsed: &D::Parsed| match decoder.decode::<V>(parsed) {
                Ok(event) => handler(event),
                Err(e) => diagnostics.dropped(e),
            })
    }

    /// Receive every incoming event that decodes as `V` as an async stream
    pub fn subscribe_stream<V>(&self) -> EventStream<V>
    where
        V: DeserializeOwned + Send + 'static,
    {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        let subscription = self.subscribe(move |event: V| {
            // Receiver gone means the stream was dropped and is unregistering
            let _ = tx.send(event);
        });
        EventStream::new(rx, subscription)
    }

    /// Observe every failure the channel would otherwise drop silently
    ///
    /// Replaces any previously set hook. This includes the normal case of
    /// a payload not matching a subscriber's type, once per subscriber.
    pub fn on_failure<F>(&self, hook: F)
    where
        F: Fn(&ChannelError) + Send + Sync + 'static,
    {
        *self
            .diagnostics
            .hook
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(hook));
    }

    /// Remove the failure hook
    pub fn clear_failure_hook(&self) {
        *self
            .diagnostics
            .hook
            .write()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Number of live subscribers
    pub fn subscriber_count(&self) -> usize {
        self.hub.len()
    }

    /// Channel name used in log fields
    pub fn name(&self) -> &str {
        &self.diagnostics.channel
    }
}

impl<P, E, D: Decoder<P>> Drop for SerializingChannel<P, E, D> {
    fn drop(&mut self) {
        self.upstream.cancel();
        tracing::debug!(channel = %self.diagnostics.channel, "Serializing channel closed");
    }
}

impl<P, E, D: Decoder<P>> fmt::Debug for SerializingChannel<P, E, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerializingChannel")
            .field("name", &self.diagnostics.channel)
            .field("hub", &self.hub)
            .field("upstream", &self.upstream)
            .finish()
    }
}

/// Channel using JSON for both directions
pub type JsonChannel<P> = SerializingChannel<P, JsonCodec, JsonCodec>;

/// Create a JSON channel over `transport`
pub fn json_channel<T>(transport: T) -> JsonChannel<T::Payload>
where
    T: Transport + 'static,
    JsonCodec: Encoder<T::Payload> + Decoder<T::Payload>,
{
    SerializingChannel::new(transport, JsonCodec::new(), JsonCodec::new())
}
