//! # a3s-channel
//!
//! Typed publish/subscribe over any raw-payload transport for the A3S ecosystem.
//!
//! ## Overview
//!
//! `a3s-channel` lets application code publish and subscribe to strongly-typed
//! events while the transport underneath only moves opaque payloads (bytes,
//! strings, JSON values, ...). A `SerializingChannel` encodes outgoing events,
//! parses each incoming payload once, and fans it out to every subscriber, each
//! of which decodes it as the type it asked for.
//!
//! ## Quick Start
//!
//! ```rust
//! use a3s_channel::{json_channel, MemoryTransport};
//! use bytes::Bytes;
//! use serde::{Deserialize, Serialize};
//! use std::sync::Arc;
//!
//! #[derive(Debug, Serialize, Deserialize)]
//! struct RateChanged {
//!     pair: String,
//!     rate: f64,
//! }
//!
//! let transport = Arc::new(MemoryTransport::<Bytes>::new());
//! let channel = json_channel(transport);
//!
//! let _subscription = channel.subscribe(|event: RateChanged| {
//!     println!("{} is now {}", event.pair, event.rate);
//! });
//!
//! channel.publish(&RateChanged {
//!     pair: "USD/CNY".to_string(),
//!     rate: 7.3521,
//! });
//! ```
//!
//! ## Failure policy
//!
//! One transport usually carries many event types, so a payload that does not
//! decode as a subscriber's type is skipped for that subscriber without error.
//! Values that fail to encode are not published. `try_publish` and
//! `SerializingChannel::on_failure` make those drops observable.
//!
//! ## Architecture
//!
//! - **Transport** trait — raw payload transport the channel sits on
//! - **Encoder / Decoder** traits — codec strategy (`JsonCodec` built in)
//! - **FanoutHub** — synchronous in-process broadcaster
//! - **SerializingChannel** — typed publish/subscribe over a transport
//! - **Subscription** — disposable registration handle

pub mod channel;
pub mod codec;
pub mod error;
pub mod hub;
pub mod stream;
pub mod subscription;
pub mod transport;
pub mod types;

// Re-export core types
pub use channel::{json_channel, FailureHook, JsonChannel, SerializingChannel};
pub use codec::{Decoder, Encoder, JsonCodec};
pub use error::{ChannelError, Result};
pub use hub::FanoutHub;
pub use stream::EventStream;
pub use subscription::Subscription;
pub use transport::{Listener, Transport};
pub use types::{ChannelConfig, HubConfig};

// Re-export transports for convenience
pub use transport::memory::MemoryTransport;
