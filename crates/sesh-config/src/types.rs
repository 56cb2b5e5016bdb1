//! Configuration types mapping to the TOML schema.
//!
//! Top-level config:
//! ```toml
//! [redis]      # connection to the TTL store
//! [session]    # session bridge behavior
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Default Redis URL.
pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";

/// Default connect timeout in seconds.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default session expiration used by `acquire` for new sessions (30 minutes).
pub const DEFAULT_EXPIRES_SECS: u64 = 30 * 60;

// ─────────────────────────────────────────────────────────────────────────────
// Top-level Config
// ─────────────────────────────────────────────────────────────────────────────

/// Root configuration structure.
///
/// All sections are optional so that partial configs (e.g., project-local
/// overrides) can be loaded and merged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeshConfig {
    /// Redis connection settings.
    pub redis: Option<RedisConfig>,

    /// Session bridge settings.
    pub session: Option<SessionConfig>,
}

impl SeshConfig {
    /// Create an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Merge another config on top of this one (other takes priority).
    pub fn merge(&mut self, other: SeshConfig) {
        if other.redis.is_some() {
            self.redis = other.redis;
        }
        if other.session.is_some() {
            self.session = other.session;
        }
    }

    /// Redis settings, falling back to defaults.
    pub fn redis(&self) -> RedisConfig {
        self.redis.clone().unwrap_or_default()
    }

    /// Session settings, falling back to defaults.
    pub fn session(&self) -> SessionConfig {
        self.session.clone().unwrap_or_default()
    }

    /// Check values that parse but cannot be used.
    pub fn validate(&self) -> Result<()> {
        if let Some(ref redis) = self.redis {
            redis.validate()?;
        }
        if let Some(ref session) = self.session {
            session.validate()?;
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Redis Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Connection settings for the Redis TTL store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedisConfig {
    /// Connection URL (`redis://`, `rediss://` or `redis+unix://`).
    pub url: String,
    /// ACL username. Overrides any username in the URL.
    pub username: Option<String>,
    /// Password. Overrides any password in the URL.
    pub password: Option<String>,
    /// Logical database index. Overrides any database in the URL.
    pub database: Option<i64>,
    /// Prefix prepended to every session id to form the Redis key.
    pub prefix: String,
    /// Timeout for establishing the connection.
    pub connect_timeout_secs: u64,
    /// Socket read timeout. `None` blocks indefinitely.
    pub read_timeout_secs: Option<u64>,
    /// Socket write timeout. `None` blocks indefinitely.
    pub write_timeout_secs: Option<u64>,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_REDIS_URL.to_string(),
            username: None,
            password: None,
            database: None,
            prefix: String::new(),
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            read_timeout_secs: None,
            write_timeout_secs: None,
        }
    }
}

impl RedisConfig {
    /// Create a config for the given URL with default settings.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Set the key prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Set the password.
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Set the database index.
    pub fn with_database(mut self, database: i64) -> Self {
        self.database = Some(database);
        self
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn read_timeout(&self) -> Option<Duration> {
        self.read_timeout_secs.map(Duration::from_secs)
    }

    pub fn write_timeout(&self) -> Option<Duration> {
        self.write_timeout_secs.map(Duration::from_secs)
    }

    /// Whether a password is stored in the config file itself.
    pub fn has_plaintext_password(&self) -> bool {
        self.password.as_deref().is_some_and(|p| !p.is_empty())
    }

    fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "redis.url".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        if self.connect_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "redis.connect_timeout_secs".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.read_timeout_secs == Some(0) || self.write_timeout_secs == Some(0) {
            return Err(ConfigError::Invalid {
                field: "redis.read_timeout_secs/write_timeout_secs".to_string(),
                reason: "must be greater than zero; omit to disable".to_string(),
            });
        }
        if matches!(self.database, Some(db) if db < 0) {
            return Err(ConfigError::Invalid {
                field: "redis.database".to_string(),
                reason: "must not be negative".to_string(),
            });
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Session Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// What to do when a stored snapshot cannot be decoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecodePolicy {
    /// Log the error and continue as if the session held no data.
    ///
    /// The corrupt snapshot is overwritten by the next write to the session.
    #[default]
    Lenient,
    /// Report the error to the caller.
    Strict,
}

/// Session bridge settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Expiration given to a new session entry by `acquire`.
    pub default_expires_secs: u64,
    /// Handling of corrupt snapshots.
    pub decode_policy: DecodePolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_expires_secs: DEFAULT_EXPIRES_SECS,
            decode_policy: DecodePolicy::default(),
        }
    }
}

impl SessionConfig {
    pub fn default_expires(&self) -> Duration {
        Duration::from_secs(self.default_expires_secs)
    }

    fn validate(&self) -> Result<()> {
        if self.default_expires_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "session.default_expires_secs".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = SeshConfig::from_toml("").unwrap();
        assert!(config.redis.is_none());
        assert_eq!(config.redis().url, DEFAULT_REDIS_URL);
        assert_eq!(config.session().default_expires_secs, DEFAULT_EXPIRES_SECS);
        assert_eq!(config.session().decode_policy, DecodePolicy::Lenient);
    }

    #[test]
    fn test_parse_full_config() {
        let config = SeshConfig::from_toml(
            r#"
[redis]
url = "redis://cache:6380"
password = "hunter2"
database = 3
prefix = "app:sess:"
read_timeout_secs = 5

[session]
default_expires_secs = 60
decode_policy = "strict"
"#,
        )
        .unwrap();

        let redis = config.redis();
        assert_eq!(redis.url, "redis://cache:6380");
        assert_eq!(redis.database, Some(3));
        assert_eq!(redis.prefix, "app:sess:");
        assert_eq!(redis.read_timeout(), Some(Duration::from_secs(5)));
        assert_eq!(redis.write_timeout(), None);
        assert_eq!(redis.connect_timeout_secs, DEFAULT_CONNECT_TIMEOUT_SECS);
        assert!(redis.has_plaintext_password());

        let session = config.session();
        assert_eq!(session.default_expires(), Duration::from_secs(60));
        assert_eq!(session.decode_policy, DecodePolicy::Strict);
    }

    #[test]
    fn test_unknown_decode_policy_rejected() {
        let result = SeshConfig::from_toml("[session]\ndecode_policy = \"maybe\"\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_merge_overrides_sections() {
        let mut base = SeshConfig::from_toml("[redis]\nurl = \"redis://a\"\n").unwrap();
        let overlay = SeshConfig::from_toml("[session]\ndefault_expires_secs = 10\n").unwrap();
        base.merge(overlay);

        assert_eq!(base.redis().url, "redis://a");
        assert_eq!(base.session().default_expires_secs, 10);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = SeshConfig {
            redis: Some(RedisConfig::new("redis://x").with_prefix("p:").with_database(2)),
            session: Some(SessionConfig::default()),
        };
        let text = config.to_toml().unwrap();
        assert_eq!(SeshConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn test_validate() {
        assert!(SeshConfig::new().validate().is_ok());

        let config = SeshConfig::from_toml("[redis]\nurl = \"\"\n").unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field, .. }) if field == "redis.url"
        ));

        let config = SeshConfig::from_toml("[session]\ndefault_expires_secs = 0\n").unwrap();
        assert!(config.validate().is_err());

        let config = SeshConfig::from_toml("[redis]\ndatabase = -1\n").unwrap();
        assert!(config.validate().is_err());
    }
}
