//! Toaster configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{Result, ToastError};
use crate::state::DEFAULT_TOAST_LIMIT;
use crate::toast::DurationDefaults;

/// Default grace interval between dismissing a toast and deleting it.
pub const DEFAULT_REMOVE_DELAY_MS: u64 = 1_000;

/// Settings for a [`Toaster`](crate::Toaster) and its store.
///
/// Every field has a default, so a partial JSON document is enough:
///
/// ```
/// use toastkit_core::ToasterConfig;
///
/// let config = ToasterConfig::from_json_str(r#"{ "toast_limit": 5 }"#).unwrap();
/// assert_eq!(config.toast_limit, 5);
/// assert_eq!(config.remove_delay_ms, 1_000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToasterConfig {
    /// Maximum toasts kept; inserting past it drops the oldest.
    pub toast_limit: usize,
    /// Grace interval after dismissal before the record is removed.
    /// `0` disables scheduled removal.
    pub remove_delay_ms: u64,
    /// Per-type auto-dismiss durations.
    pub durations: DurationDefaults,
}

impl Default for ToasterConfig {
    fn default() -> Self {
        Self {
            toast_limit: DEFAULT_TOAST_LIMIT,
            remove_delay_ms: DEFAULT_REMOVE_DELAY_MS,
            durations: DurationDefaults::default(),
        }
    }
}

impl ToasterConfig {
    /// Parse and validate a JSON config document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.toast_limit == 0 {
            return Err(ToastError::InvalidConfig(
                "toast_limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn remove_delay(&self) -> Option<Duration> {
        (self.remove_delay_ms > 0).then(|| Duration::from_millis(self.remove_delay_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = ToasterConfig::from_json_str("{}").unwrap();
        assert_eq!(config, ToasterConfig::default());
        assert_eq!(config.remove_delay(), Some(Duration::from_millis(1_000)));
    }

    #[test]
    fn partial_durations_keep_other_defaults() {
        let config =
            ToasterConfig::from_json_str(r#"{ "durations": { "success": 500 } }"#).unwrap();

        assert_eq!(config.durations.success, 500);
        assert_eq!(config.durations.loading, 30_000);
    }

    #[test]
    fn zero_limit_is_rejected() {
        let err = ToasterConfig::from_json_str(r#"{ "toast_limit": 0 }"#).unwrap_err();
        assert!(matches!(err, ToastError::InvalidConfig(_)));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = ToasterConfig::from_json_str("{ toast_limit").unwrap_err();
        assert!(matches!(err, ToastError::ConfigParse(_)));
    }

    #[test]
    fn zero_remove_delay_disables_removal() {
        let config = ToasterConfig {
            remove_delay_ms: 0,
            ..ToasterConfig::default()
        };
        assert!(config.remove_delay().is_none());
    }
}
