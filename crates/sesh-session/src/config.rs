//! Configuration for the session bridge.

use std::time::Duration;

use sesh_config::{DEFAULT_EXPIRES_SECS, DecodePolicy, SessionConfig};

/// Configuration for the session bridge.
#[derive(Debug, Clone, PartialEq)]
pub struct BridgeConfig {
    /// Expiration for new session entries when the caller has none to offer.
    pub default_expires: Duration,

    /// What to do with a snapshot that cannot be decoded.
    ///
    /// [`DecodePolicy::Lenient`] (the default) treats the session as empty,
    /// which discards its stored data on the next write.
    pub decode_policy: DecodePolicy,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            default_expires: Duration::from_secs(DEFAULT_EXPIRES_SECS),
            decode_policy: DecodePolicy::Lenient,
        }
    }
}

impl BridgeConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default expiration.
    pub fn with_default_expires(mut self, expires: Duration) -> Self {
        self.default_expires = expires;
        self
    }

    /// Set the decode policy.
    pub fn with_decode_policy(mut self, policy: DecodePolicy) -> Self {
        self.decode_policy = policy;
        self
    }

    /// Report corrupt snapshots instead of dropping them.
    pub fn strict(self) -> Self {
        self.with_decode_policy(DecodePolicy::Strict)
    }
}

impl From<&SessionConfig> for BridgeConfig {
    fn from(config: &SessionConfig) -> Self {
        Self {
            default_expires: config.default_expires(),
            decode_policy: config.decode_policy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BridgeConfig::new();
        assert_eq!(config.default_expires, Duration::from_secs(1800));
        assert_eq!(config.decode_policy, DecodePolicy::Lenient);
    }

    #[test]
    fn test_from_session_config() {
        let session = SessionConfig {
            default_expires_secs: 90,
            decode_policy: DecodePolicy::Strict,
        };
        let config = BridgeConfig::from(&session);
        let expected = BridgeConfig::new()
            .with_default_expires(Duration::from_secs(90))
            .strict();
        assert_eq!(config, expected);
    }
}
