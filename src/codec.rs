//! Encode/decode strategies between typed events and raw payloads
//!
//! Decoding happens in two stages. `Decoder::parse` runs once per
//! incoming payload and produces a shared parsed form; `Decoder::decode`
//! then interprets that parsed form as whatever type a subscriber asked
//! for. A channel therefore never needs to know up front which event types
//! its subscribers will request.
//!
//! For text and byte payloads the parsed form is the validated JSON text
//! itself (`RawValue`), so numbers keep their exact digits until a
//! subscriber's type reads them. `i128`/`u128` values outside the 64-bit
//! range survive the round-trip.

use crate::error::{ChannelError, Result};
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

/// Turns encodable values into payloads of type `P`
pub trait Encoder<P>: Send + Sync {
    /// Encode `value`, failing with `ChannelError::Encode`
    fn encode<V: Serialize + ?Sized>(&self, value: &V) -> Result<P>;
}

/// Turns payloads of type `P` back into typed values
pub trait Decoder<P>: Send + Sync {
    /// Parsed form shared between all subscribers of one payload
    type Parsed: Send + Sync + 'static;

    /// Shared stage: check the payload is well-formed and parse it once
    fn parse(&self, payload: &P) -> Result<Self::Parsed>;

    /// Per-subscriber stage: interpret the parsed form as `V`
    fn decode<V: DeserializeOwned>(&self, parsed: &Self::Parsed) -> Result<V>;

    /// Both stages in one call
    fn decode_payload<V: DeserializeOwned>(&self, payload: &P) -> Result<V> {
        let parsed = self.parse(payload)?;
        self.decode(&parsed)
    }
}

/// JSON codec
///
/// Works with `Bytes`, `Vec<u8>`, `String`, and `serde_json::Value`
/// payloads. Text and byte payloads parse to a boxed `RawValue`; a
/// `serde_json::Value` payload is already parsed and is shared as is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonCodec {
    /// Emit indented JSON for text and byte payloads
    #[serde(default)]
    pub pretty: bool,
}

impl JsonCodec {
    /// Compact JSON codec
    pub fn new() -> Self {
        Self::default()
    }

    /// Indented JSON codec, for human-readable payloads
    pub fn pretty() -> Self {
        Self { pretty: true }
    }

    fn to_vec<V: Serialize + ?Sized>(&self, value: &V) -> Result<Vec<u8>> {
        let encoded = if self.pretty {
            serde_json::to_vec_pretty(value)
        } else {
            serde_json::to_vec(value)
        };
        encoded.map_err(|e| ChannelError::encode::<V>(e))
    }
}

fn from_raw<V: DeserializeOwned>(parsed: &RawValue) -> Result<V> {
    serde_json::from_str(parsed.get()).map_err(|e| ChannelError::decode::<V>(e))
}

impl Encoder<Vec<u8>> for JsonCodec {
    fn encode<V: Serialize + ?Sized>(&self, value: &V) -> Result<Vec<u8>> {
        self.to_vec(value)
    }
}

impl Decoder<Vec<u8>> for JsonCodec {
    type Parsed = Box<RawValue>;

    fn parse(&self, payload: &Vec<u8>) -> Result<Box<RawValue>> {
        serde_json::from_slice(payload).map_err(ChannelError::malformed)
    }

    fn decode<V: DeserializeOwned>(&self, parsed: &Box<RawValue>) -> Result<V> {
        from_raw(parsed)
    }
}

impl Encoder<Bytes> for JsonCodec {
    fn encode<V: Serialize + ?Sized>(&self, value: &V) -> Result<Bytes> {
        self.to_vec(value).map(Bytes::from)
    }
}

impl Decoder<Bytes> for JsonCodec {
    type Parsed = Box<RawValue>;

    fn parse(&self, payload: &Bytes) -> Result<Box<RawValue>> {
        serde_json::from_slice(payload).map_err(ChannelError::malformed)
    }

    fn decode<V: DeserializeOwned>(&self, parsed: &Box<RawValue>) -> Result<V> {
        from_raw(parsed)
    }
}

impl Encoder<String> for JsonCodec {
    fn encode<V: Serialize + ?Sized>(&self, value: &V) -> Result<String> {
        let encoded = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        encoded.map_err(|e| ChannelError::encode::<V>(e))
    }
}

impl Decoder<String> for JsonCodec {
    type Parsed = Box<RawValue>;

    fn parse(&self, payload: &String) -> Result<Box<RawValue>> {
        serde_json::from_str(payload).map_err(ChannelError::malformed)
    }

    fn decode<V: DeserializeOwned>(&self, parsed: &Box<RawValue>) -> Result<V> {
        from_raw(parsed)
    }
}

impl Encoder<serde_json::Value> for JsonCodec {
    fn encode<V: Serialize + ?Sized>(&self, value: &V) -> Result<serde_json::Value> {
        serde_json::to_value(value).map_err(|e| ChannelError::encode::<V>(e))
    }
}

impl Decoder<serde_json::Value> for JsonCodec {
    type Parsed = serde_json::Value;

    fn parse(&self, payload: &serde_json::Value) -> Result<serde_json::Value> {
        Ok(payload.clone())
    }

    fn decode<V: DeserializeOwned>(&self, parsed: &serde_json::Value) -> Result<V> {
        V::deserialize(parsed).map_err(|e| ChannelError::decode::<V>(e))
    }
}
