//! Cloud sync availability.
//!
//! There is no sync backend. This only decides whether the toggle in the
//! record could take effect given the configured credentials.

use crate::config::SyncConfig;
use crate::profile::ProfileRecord;

/// Whether sync could run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    /// The user or the configuration has sync switched off.
    Disabled,
    /// Sync is wanted but no endpoint or key is configured.
    MissingCredentials,
    /// Sync is wanted and credentials are present.
    Ready,
}

impl std::fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Disabled => write!(f, "disabled"),
            Self::MissingCredentials => write!(f, "missing credentials"),
            Self::Ready => write!(f, "ready"),
        }
    }
}

/// Evaluate sync availability for a record.
#[must_use]
pub fn status(record: &ProfileRecord, config: &SyncConfig) -> SyncStatus {
    if !(record.sync_enabled && config.enabled) {
        return SyncStatus::Disabled;
    }
    let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
    if present(&config.endpoint) && present(&config.api_key) {
        SyncStatus::Ready
    } else {
        SyncStatus::MissingCredentials
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enabled_record() -> ProfileRecord {
        ProfileRecord {
            sync_enabled: true,
            ..ProfileRecord::default()
        }
    }

    #[test]
    fn test_disabled_by_default() {
        assert_eq!(
            status(&ProfileRecord::default(), &SyncConfig::default()),
            SyncStatus::Disabled
        );
    }

    #[test]
    fn test_record_toggle_alone_is_not_enough() {
        assert_eq!(
            status(&enabled_record(), &SyncConfig::default()),
            SyncStatus::Disabled
        );
    }

    #[test]
    fn test_missing_credentials() {
        let config = SyncConfig {
            enabled: true,
            endpoint: Some("https://sync.example.test".to_string()),
            api_key: Some("   ".to_string()),
        };
        assert_eq!(
            status(&enabled_record(), &config),
            SyncStatus::MissingCredentials
        );
    }

    #[test]
    fn test_ready() {
        let config = SyncConfig {
            enabled: true,
            endpoint: Some("https://sync.example.test".to_string()),
            api_key: Some("key".to_string()),
        };
        assert_eq!(status(&enabled_record(), &config), SyncStatus::Ready);
        assert_eq!(SyncStatus::Ready.to_string(), "ready");
    }
}
