//! Error types for a3s-channel

use thiserror::Error;

/// Errors that can occur while bridging typed events over a raw transport
///
/// `SerializingChannel::publish` and `SerializingChannel::subscribe` never
/// return these; they are only observable through `try_publish`, the codec
/// traits themselves, or a channel's failure hook.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// A value could not be represented as a payload
    #[error("Failed to encode '{event_type}': {reason}")]
    Encode {
        event_type: String,
        reason: String,
    },

    /// A payload could not be interpreted as the requested type
    #[error("Failed to decode '{event_type}': {reason}")]
    Decode {
        event_type: String,
        reason: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ChannelError {
    /// Build an encode error for value type `V`
    pub fn encode<V: ?Sized>(reason: impl std::fmt::Display) -> Self {
        Self::Encode {
            event_type: std::any::type_name::<V>().to_string(),
            reason: reason.to_string(),
        }
    }

    /// Build a decode error for target type `V`
    pub fn decode<V: ?Sized>(reason: impl std::fmt::Display) -> Self {
        Self::Decode {
            event_type: std::any::type_name::<V>().to_string(),
            reason: reason.to_string(),
        }
    }

    /// Build a decode error for the shared parse stage, before any type is known
    pub fn malformed(reason: impl std::fmt::Display) -> Self {
        Self::Decode {
            event_type: "payload".to_string(),
            reason: reason.to_string(),
        }
    }

    /// True for `Encode` failures
    pub fn is_encode(&self) -> bool {
        matches!(self, Self::Encode { .. })
    }

    /// True for `Decode` failures, including malformed payloads
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }
}

/// Result type alias for channel operations
pub type Result<T> = std::result::Result<T, ChannelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_error_names_type() {
        let err = ChannelError::encode::<u32>("boom");
        assert!(err.is_encode());
        assert!(!err.is_decode());
        assert_eq!(err.to_string(), "Failed to encode 'u32': boom");
    }

    #[test]
    fn test_malformed_payload_is_decode_error() {
        let err = ChannelError::malformed("expected value at line 1 column 1");
        assert!(err.is_decode());
        assert!(err.to_string().starts_with("Failed to decode 'payload'"));
    }

    #[test]
    fn test_serde_json_failures_map_to_typed_variants() {
        let raw = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = ChannelError::malformed(&raw);
        assert!(err.is_decode());
        assert!(err.to_string().ends_with(&raw.to_string()));

        let err = ChannelError::decode::<u8>(raw);
        match err {
            ChannelError::Decode { event_type, .. } => assert_eq!(event_type, "u8"),
            ChannelError::Encode { .. } | ChannelError::Config(_) => {
                panic!("expected a decode error")
            }
        }
    }
}
