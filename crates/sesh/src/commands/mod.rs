//! CLI command handlers.

pub mod config;
pub mod ping;
pub mod session;

use anyhow::{Context as _, Result};
use sesh_config::{LoadedConfig, SeshConfig};
use sesh_session::SessionBridge;

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Effective configuration after CLI overrides.
    pub config: SeshConfig,
    /// Configuration as discovered on disk and in the environment.
    pub loaded: LoadedConfig,
    /// Output as JSON for scripting.
    pub json_output: bool,
    /// Verbose output enabled.
    pub verbose: bool,
}

impl Context {
    /// Connect a session bridge to the configured Redis server.
    pub fn connect(&self) -> Result<SessionBridge> {
        SessionBridge::from_config(&self.config)
            .with_context(|| format!("could not reach Redis at {}", self.config.redis().url))
    }
}
