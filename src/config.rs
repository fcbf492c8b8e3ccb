//! Client configuration.
//!
//! Every field has a default, so a stored override only needs the keys it changes.

use serde::{Deserialize, Serialize};
use tracing::warn;
use url::Url;

use crate::error::ConfigError;

/// `localStorage` key holding a JSON override in the browser build.
pub const STORAGE_KEY: &str = "cta_optimizer.config";

/// What revert writes back into the suggestion field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevertMode {
    /// Restore the text the analysis delivered and undo any accept.
    #[default]
    Pristine,
    /// Restore whatever the CTA currently holds, which after an accept is
    /// the accepted text. Leaves the collection untouched.
    LastAccepted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub default_max_pages: u32,
    pub max_pages_limit: u32,
    pub default_scan_depth: u32,
    pub max_scan_depth: u32,
    pub max_text_chars: usize,
    pub max_upload_bytes: usize,
    pub history_display_limit: usize,
    pub history_preview_chars: usize,
    pub notice_timeout_ms: u32,
    pub revert_mode: RevertMode,
    pub log_filter: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5005".to_string(),
            default_max_pages: 5,
            max_pages_limit: 20,
            default_scan_depth: 2,
            max_scan_depth: 3,
            max_text_chars: 10_000,
            max_upload_bytes: 16 * 1024 * 1024,
            history_display_limit: 5,
            history_preview_chars: 50,
            notice_timeout_ms: 3000,
            revert_mode: RevertMode::default(),
            log_filter: "info".to_string(),
        }
    }
}

impl ClientConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply a stored override on top of `base`, keeping `base` if the override is unusable.
    pub fn from_json_or(json: Option<&str>, base: Self) -> Self {
        let Some(raw) = json else {
            return base;
        };
        match Self::overlay(raw, &base) {
            Ok(config) => config,
            Err(e) => {
                warn!("Ignoring stored config: {}", e);
                base
            }
        }
    }

    fn overlay(raw: &str, base: &Self) -> Result<Self, ConfigError> {
        let mut merged = serde_json::to_value(base)?;
        let patch: serde_json::Value = serde_json::from_str(raw)?;
        match (merged.as_object_mut(), patch) {
            (Some(target), serde_json::Value::Object(fields)) => {
                for (key, value) in fields {
                    target.insert(key, value);
                }
            }
            _ => {
                return Err(ConfigError::Invalid {
                    field: "config",
                    reason: "expected a JSON object".to_string(),
                })
            }
        }
        let config: Self = serde_json::from_value(merged)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        Url::parse(&self.api_base_url).map_err(|e| ConfigError::Invalid {
            field: "api_base_url",
            reason: e.to_string(),
        })?;

        let limits: [(&'static str, usize); 5] = [
            ("max_pages_limit", self.max_pages_limit as usize),
            ("max_scan_depth", self.max_scan_depth as usize),
            ("max_text_chars", self.max_text_chars),
            ("max_upload_bytes", self.max_upload_bytes),
            ("history_display_limit", self.history_display_limit),
        ];
        for (field, value) in limits {
            if value == 0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must be greater than zero".to_string(),
                });
            }
        }

        if self.default_max_pages == 0 || self.default_max_pages > self.max_pages_limit {
            return Err(ConfigError::Invalid {
                field: "default_max_pages",
                reason: format!("must be between 1 and {}", self.max_pages_limit),
            });
        }
        if self.default_scan_depth == 0 || self.default_scan_depth > self.max_scan_depth {
            return Err(ConfigError::Invalid {
                field: "default_scan_depth",
                reason: format!("must be between 1 and {}", self.max_scan_depth),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ClientConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.history_display_limit, 5);
        assert_eq!(config.revert_mode, RevertMode::Pristine);
    }

    #[test]
    fn test_partial_override() {
        let config = ClientConfig::from_json(
            r#"{"api_base_url":"https://cta.example.com","revert_mode":"last_accepted"}"#,
        )
        .unwrap();
        assert_eq!(config.api_base_url, "https://cta.example.com");
        assert_eq!(config.revert_mode, RevertMode::LastAccepted);
        assert_eq!(config.default_max_pages, 5);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            ClientConfig::from_json(r#"{"api_base_url":"nope"}"#),
            Err(ConfigError::Invalid { field: "api_base_url", .. })
        ));
        assert!(matches!(
            ClientConfig::from_json(r#"{"history_display_limit":0}"#),
            Err(ConfigError::Invalid { field: "history_display_limit", .. })
        ));
        assert!(matches!(
            ClientConfig::from_json(r#"{"default_max_pages":50}"#),
            Err(ConfigError::Invalid { field: "default_max_pages", .. })
        ));
        assert!(matches!(
            ClientConfig::from_json("{not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_from_json_or_falls_back() {
        let fallback = ClientConfig {
            api_base_url: "https://origin.example".into(),
            ..ClientConfig::default()
        };
        let config = ClientConfig::from_json_or(Some("garbage"), fallback.clone());
        assert_eq!(config, fallback);
        let config = ClientConfig::from_json_or(None, fallback.clone());
        assert_eq!(config, fallback);
        let config = ClientConfig::from_json_or(Some("[1, 2]"), fallback.clone());
        assert_eq!(config, fallback);
    }

    #[test]
    fn test_override_keeps_unset_base_fields() {
        let base = ClientConfig {
            api_base_url: "https://origin.example".into(),
            ..ClientConfig::default()
        };
        let config = ClientConfig::from_json_or(Some(r#"{"notice_timeout_ms":5000}"#), base);
        assert_eq!(config.api_base_url, "https://origin.example");
        assert_eq!(config.notice_timeout_ms, 5000);
    }
}
