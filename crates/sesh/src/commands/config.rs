//! Config command - configuration inspection.

use std::path::PathBuf;

use anyhow::{Context as _, Result, bail};
use clap::{Args, Subcommand};
use console::Style;
use sesh_config::{RedisConfig, SeshConfig, SessionConfig};

use super::Context;

/// Arguments for the config command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the effective configuration (passwords redacted)
    Show,

    /// Show which config files and environment variables are in effect
    Which,

    /// Show the user configuration file path
    Path,

    /// Write a config file with default settings
    Init {
        /// Create project-local config (./sesh.toml) instead of user config
        #[arg(long)]
        local: bool,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Run the config command.
pub fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show(ctx),
        ConfigCommand::Which => which(ctx),
        ConfigCommand::Path => {
            match sesh_config::xdg_config_path() {
                Some(path) => println!("{}", path.display()),
                None => bail!("no config directory available on this platform"),
            }
            Ok(())
        }
        ConfigCommand::Init { local, force } => init(local, force),
    }
}

fn show(ctx: &Context) -> Result<()> {
    let mut config = ctx.config.clone();
    let mut redis = config.redis();
    if redis.password.is_some() {
        redis.password = Some("********".to_string());
    }
    config.redis = Some(redis);
    config.session = Some(config.session());

    if ctx.json_output {
        let json = serde_json::to_value(&config)?;
        println!("{}", serde_json::to_string_pretty(&json)?);
    } else {
        print!("{}", config.to_toml()?);
    }
    Ok(())
}

fn which(ctx: &Context) -> Result<()> {
    let dim = Style::new().dim();
    let green = Style::new().green();

    if ctx.json_output {
        let sources: Vec<_> = ctx
            .loaded
            .sources
            .iter()
            .map(|s| serde_json::json!({ "path": s.path, "loaded": s.loaded }))
            .collect();
        let output = serde_json::json!({
            "sources": sources,
            "env_overrides": ctx.loaded.env_overrides,
            "warnings": ctx.loaded.warnings,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("Config layers (lowest precedence first):");
    for source in &ctx.loaded.sources {
        if source.loaded {
            println!("  {} {}", green.apply_to("●"), source.path.display());
        } else {
            println!(
                "  {} {}",
                dim.apply_to("○"),
                dim.apply_to(format!("{} (not found)", source.path.display()))
            );
        }
    }
    if !ctx.loaded.env_overrides.is_empty() {
        println!("Environment overrides:");
        for var in &ctx.loaded.env_overrides {
            println!("  {} {}", green.apply_to("●"), var);
        }
    }
    for warning in &ctx.loaded.warnings {
        let yellow = Style::new().yellow();
        println!("{} {}", yellow.apply_to("warning:"), warning);
    }
    Ok(())
}

fn init(local: bool, force: bool) -> Result<()> {
    let path = if local {
        PathBuf::from("sesh.toml")
    } else {
        sesh_config::xdg_config_path().context("no config directory available on this platform")?
    };

    if path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    let config = SeshConfig {
        redis: Some(RedisConfig::default()),
        session: Some(SessionConfig::default()),
    };
    sesh_config::save_config(&config, &path)?;

    let green = Style::new().green();
    println!("{} wrote {}", green.apply_to("✓"), path.display());
    Ok(())
}
