//! Config file discovery and layered merging.
//!
//! Resolution order (later overrides earlier):
//! 1. `~/.config/sesh/config.toml` (XDG user config)
//! 2. `./sesh.toml` (project-local)
//! 3. `SESH_REDIS_*` environment variables
//! 4. CLI arguments (handled externally)

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::{ConfigError, Result, SeshConfig};

/// Default config filename for project-local config.
const PROJECT_CONFIG_FILE: &str = "sesh.toml";

/// Default config filename within XDG config directory.
const USER_CONFIG_FILE: &str = "config.toml";

/// Application name for XDG directory resolution.
const APP_NAME: &str = "sesh";

/// Environment variable to override the config directory.
const CONFIG_DIR_ENV: &str = "SESH_CONFIG_DIR";

/// Environment overrides for the `[redis]` section.
const REDIS_URL_ENV: &str = "SESH_REDIS_URL";
const REDIS_PASSWORD_ENV: &str = "SESH_REDIS_PASSWORD";
const REDIS_PREFIX_ENV: &str = "SESH_REDIS_PREFIX";

/// Tracks where each config layer was loaded from.
#[derive(Debug, Clone)]
pub struct ConfigSource {
    /// Path to the config file.
    pub path: PathBuf,
    /// Whether the file was found and loaded.
    pub loaded: bool,
}

/// Result of config discovery and loading.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// The merged configuration.
    pub config: SeshConfig,
    /// Sources that were checked, in order of precedence (lowest first).
    pub sources: Vec<ConfigSource>,
    /// Environment variables that overrode file values.
    pub env_overrides: Vec<&'static str>,
    /// Warnings generated during loading (e.g., plaintext passwords).
    pub warnings: Vec<String>,
}

impl LoadedConfig {
    /// Get paths of sources that were actually loaded.
    pub fn loaded_from(&self) -> Vec<&Path> {
        self.sources
            .iter()
            .filter(|s| s.loaded)
            .map(|s| s.path.as_path())
            .collect()
    }
}

/// Load configuration by discovering and merging all config layers.
pub fn load_config(project_dir: Option<&Path>) -> Result<LoadedConfig> {
    load_config_with_options(project_dir, None)
}

/// Load configuration with explicit control over the user config directory.
///
/// `config_dir` overrides both `SESH_CONFIG_DIR` and the platform default.
pub fn load_config_with_options(
    project_dir: Option<&Path>,
    config_dir: Option<&Path>,
) -> Result<LoadedConfig> {
    let mut config = SeshConfig::new();
    let mut sources = Vec::new();
    let mut warnings = Vec::new();

    // 1. User config: explicit override, then env var, then platform default
    let user_config_path = match config_dir {
        Some(dir) => Some(dir.join(USER_CONFIG_FILE)),
        None => xdg_config_path(),
    };
    if let Some(path) = user_config_path {
        sources.push(load_layer(&mut config, &path, &mut warnings));
    }

    // 2. Project-local config
    let project_path = project_dir
        .map(|d| d.join(PROJECT_CONFIG_FILE))
        .unwrap_or_else(|| PathBuf::from(PROJECT_CONFIG_FILE));
    sources.push(load_layer(&mut config, &project_path, &mut warnings));

    // Plaintext check runs before env overrides so a password supplied
    // through the environment is not reported.
    check_plaintext_password(&config, &mut warnings);

    // 3. Environment
    let env_overrides = apply_env_overrides(&mut config);

    config.validate()?;

    Ok(LoadedConfig {
        config,
        sources,
        env_overrides,
        warnings,
    })
}

/// Load config from a specific file path (no discovery).
pub fn load_config_file(path: &Path) -> Result<SeshConfig> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.display().to_string(),
        source: e,
    })?;
    SeshConfig::from_toml(&contents)
}

/// Save configuration to a file.
///
/// Creates parent directories if they don't exist.
pub fn save_config(config: &SeshConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::WriteFile {
            path: parent.display().to_string(),
            source: e,
        })?;
    }

    let contents = config.to_toml()?;
    std::fs::write(path, contents).map_err(|e| ConfigError::WriteFile {
        path: path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

/// Get the XDG config file path for sesh.
pub fn xdg_config_path() -> Option<PathBuf> {
    xdg_config_dir().map(|d| d.join(USER_CONFIG_FILE))
}

/// Get the XDG config directory for sesh.
///
/// Checks `SESH_CONFIG_DIR` env var first, then falls back to platform default.
pub fn xdg_config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV)
        && !dir.is_empty()
    {
        return Some(PathBuf::from(dir));
    }
    dirs::config_dir().map(|d| d.join(APP_NAME))
}

/// Try to load a config file and merge it into the existing config.
///
/// A missing file is skipped; an unreadable one becomes a warning.
fn load_layer(config: &mut SeshConfig, path: &Path, warnings: &mut Vec<String>) -> ConfigSource {
    if !path.is_file() {
        return ConfigSource {
            path: path.to_path_buf(),
            loaded: false,
        };
    }

    match load_config_file(path) {
        Ok(layer) => {
            debug!(path = %path.display(), "Loaded config layer");
            config.merge(layer);
            ConfigSource {
                path: path.to_path_buf(),
                loaded: true,
            }
        }
        Err(e) => {
            warnings.push(format!("Failed to load {}: {}", path.display(), e));
            ConfigSource {
                path: path.to_path_buf(),
                loaded: false,
            }
        }
    }
}

fn apply_env_overrides(config: &mut SeshConfig) -> Vec<&'static str> {
    let mut applied = Vec::new();
    let mut redis = config.redis();

    if let Some(url) = env_value(REDIS_URL_ENV) {
        redis.url = url;
        applied.push(REDIS_URL_ENV);
    }
    if let Some(password) = env_value(REDIS_PASSWORD_ENV) {
        redis.password = Some(password);
        applied.push(REDIS_PASSWORD_ENV);
    }
    if let Some(prefix) = env_value(REDIS_PREFIX_ENV) {
        redis.prefix = prefix;
        applied.push(REDIS_PREFIX_ENV);
    }

    if !applied.is_empty() {
        debug!(vars = ?applied, "Applied environment overrides");
        config.redis = Some(redis);
    }
    applied
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Check for a plaintext Redis password in the config and emit a warning.
fn check_plaintext_password(config: &SeshConfig, warnings: &mut Vec<String>) {
    if let Some(ref redis) = config.redis
        && redis.has_plaintext_password()
    {
        warnings.push(format!(
            "[redis] contains a plaintext password. \
             Consider setting {} in the environment instead.",
            REDIS_PASSWORD_ENV
        ));
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
