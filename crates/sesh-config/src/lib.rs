//! Configuration system for sesh.
//!
//! Provides TOML-based configuration with:
//! - Redis connection settings (`[redis]`)
//! - Session bridge behavior (`[session]`)
//! - Config file layering (XDG user config + project-local overrides)
//! - Environment overrides for connection secrets

pub mod discovery;
pub mod error;
pub mod types;

pub use discovery::{
    LoadedConfig, load_config, load_config_file, load_config_with_options, save_config,
    xdg_config_dir, xdg_config_path,
};
pub use error::{ConfigError, Result};
pub use types::*;
