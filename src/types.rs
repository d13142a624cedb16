//! Configuration types for hubs and channels
//!
//! All types use camelCase JSON serialization so they can be embedded in
//! larger service configs.

use crate::error::{ChannelError, Result};
use serde::{Deserialize, Serialize};

/// Fan-out hub configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HubConfig {
    /// Catch listener panics so one faulty listener cannot starve the rest
    ///
    /// When disabled, a panic unwinds out of `broadcast` and the remaining
    /// listeners for that value are skipped.
    #[serde(default = "default_true")]
    pub isolate_panics: bool,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            isolate_panics: true,
        }
    }
}

/// Serializing channel configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelConfig {
    /// Channel name used in log fields (chan-<uuid> when not set)
    #[serde(default = "default_name")]
    pub name: String,

    /// Settings for the channel's subscriber hub
    #[serde(default)]
    pub hub: HubConfig,
}

impl ChannelConfig {
    /// Config with an explicit channel name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Check the config before a channel is built from it
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ChannelError::Config(
                "Channel name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            hub: HubConfig::default(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_name() -> String {
    format!("chan-{}", uuid::Uuid::new_v4())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_config_default() {
        let config = ChannelConfig::default();
        assert!(config.name.starts_with("chan-"));
        assert!(config.hub.isolate_panics);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_names_are_unique() {
        assert_ne!(ChannelConfig::default().name, ChannelConfig::default().name);
    }

    #[test]
    fn test_channel_config_named() {
        let config = ChannelConfig::named("orders");
        assert_eq!(config.name, "orders");
    }

    #[test]
    fn test_validate_rejects_blank_name() {
        let err = ChannelConfig::named("  ").validate().unwrap_err();
        assert!(matches!(err, ChannelError::Config(_)));
    }

    #[test]
    fn test_channel_config_serialization() {
        let config = ChannelConfig {
            name: "orders".to_string(),
            hub: HubConfig {
                isolate_panics: false,
            },
        };

        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"name\":\"orders\""));
        assert!(json.contains("\"isolatePanics\":false"));

        let parsed: ChannelConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_channel_config_missing_fields_use_defaults() {
        let parsed: ChannelConfig = serde_json::from_str("{}").unwrap();
        assert!(parsed.name.starts_with("chan-"));
        assert!(parsed.hub.isolate_panics);

        let parsed: ChannelConfig = serde_json::from_str(r#"{"hub": {}}"#).unwrap();
        assert!(parsed.hub.isolate_panics);
    }
}
