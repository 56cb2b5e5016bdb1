//! Session commands - read and modify values stored for a session id.

use std::time::Duration;

use anyhow::Result;
use clap::Subcommand;
use console::{Style, style};
use serde::Serialize;
use sesh_session::{Lifetime, SessionBridge, TtlBackend, TtlStatus};

use super::Context;
use crate::values::{ValueKind, parse_value, to_json};

#[derive(Subcommand, Debug)]
pub enum SessionCommand {
    /// Show one value of a session
    Get {
        /// Session id
        sid: String,
        /// Value key
        key: String,
    },

    /// Set one value of a session
    Set {
        /// Session id
        sid: String,
        /// Value key
        key: String,
        /// Value to store
        value: String,
        /// How to interpret the value
        #[arg(long = "type", value_enum, default_value = "str")]
        kind: ValueKind,
        /// Expire the session this many seconds from now (default: keep current TTL)
        #[arg(long)]
        ttl: Option<u64>,
    },

    /// Remove one value of a session
    Delete {
        /// Session id
        sid: String,
        /// Value key
        key: String,
    },

    /// Show every value of a session
    Dump {
        /// Session id
        sid: String,
    },

    /// Show a session's remaining time to live
    Ttl {
        /// Session id
        sid: String,
    },

    /// Read a session's lifetime, creating the entry if it does not exist
    Acquire {
        /// Session id
        sid: String,
        /// Expiration in seconds for a new entry (default: from config)
        #[arg(long)]
        expires: Option<u64>,
    },

    /// Reset a session's time to live
    Touch {
        /// Session id
        sid: String,
        /// New time to live in seconds
        seconds: u64,
    },

    /// Remove every value of a session, keeping the session itself
    Clear {
        /// Session id
        sid: String,
    },

    /// Destroy a session
    Release {
        /// Session id
        sid: String,
    },
}

#[derive(Debug, Serialize)]
struct TtlOutput<'a> {
    sid: &'a str,
    exists: bool,
    expires_in_secs: Option<u64>,
}

#[derive(Debug, Serialize)]
struct LifetimeOutput<'a> {
    sid: &'a str,
    expires_at: Option<String>,
}

/// Run a session command.
pub fn run(command: SessionCommand, ctx: &Context) -> Result<()> {
    let bridge = ctx.connect()?;
    let result = dispatch(&bridge, command, ctx);
    bridge.close()?;
    result
}

fn dispatch(bridge: &SessionBridge, command: SessionCommand, ctx: &Context) -> Result<()> {
    let green = Style::new().green();
    let dim = Style::new().dim();

    match command {
        SessionCommand::Get { sid, key } => {
            let value = bridge.get(&sid, &key)?;
            if ctx.json_output {
                let json = value.as_ref().map(to_json).unwrap_or_default();
                println!("{}", serde_json::to_string_pretty(&json)?);
            } else {
                match value {
                    Some(value) => println!("{}", value),
                    None => println!("{}", dim.apply_to("(absent)")),
                }
            }
        }
        SessionCommand::Set {
            sid,
            key,
            value,
            kind,
            ttl,
        } => {
            let value = parse_value(&value, kind)?;
            let lifetime = match ttl {
                Some(secs) => Lifetime::from_now(Duration::from_secs(secs)),
                None => Lifetime::unset(),
            };
            bridge.set(&sid, &lifetime, key.as_str(), value)?;
            if !ctx.json_output {
                println!("{} {} set", green.apply_to("✓"), key);
            }
        }
        SessionCommand::Delete { sid, key } => {
            let deleted = bridge.delete(&sid, &key)?;
            if ctx.json_output {
                println!("{}", serde_json::json!({ "deleted": deleted }));
            } else if deleted {
                println!("{} {} deleted", green.apply_to("✓"), key);
            } else {
                println!("{}", dim.apply_to(format!("{} was not set", key)));
            }
        }
        SessionCommand::Dump { sid } => {
            let mut entries = Vec::new();
            bridge.visit(&sid, |key, value| entries.push((key.to_string(), value.clone())))?;
            entries.sort_by(|a, b| a.0.cmp(&b.0));

            if ctx.json_output {
                let object: serde_json::Map<String, serde_json::Value> =
                    entries.iter().map(|(k, v)| (k.clone(), to_json(v))).collect();
                println!("{}", serde_json::to_string_pretty(&object)?);
            } else if entries.is_empty() {
                println!("{}", dim.apply_to("(empty session)"));
            } else {
                println!();
                println!("{}", style(format!("Session {}", sid)).bold());
                if ctx.verbose {
                    let size = bridge.backend().get(&sid)?.map_or(0, |b| b.len());
                    let ttl = match bridge.backend().ttl(&sid)? {
                        TtlStatus::Expires(d) => format!("{}s", d.as_secs()),
                        TtlStatus::Persistent => "never expires".to_string(),
                        TtlStatus::Missing => "no entry".to_string(),
                    };
                    println!(
                        "{}",
                        dim.apply_to(format!("snapshot {} bytes, ttl {}", size, ttl))
                    );
                }
                println!("{}", dim.apply_to("─".repeat(40)));
                for (key, value) in &entries {
                    println!(
                        "  {} {} {}",
                        key,
                        dim.apply_to(format!("({})", value.kind())),
                        value
                    );
                }
                println!();
            }
        }
        SessionCommand::Ttl { sid } => {
            let status = bridge.backend().ttl(&sid)?;
            if ctx.json_output {
                let output = TtlOutput {
                    sid: &sid,
                    exists: status.exists(),
                    expires_in_secs: status.remaining().map(|d| d.as_secs()),
                };
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                match status {
                    TtlStatus::Missing => println!("{}", dim.apply_to("(no such session)")),
                    TtlStatus::Persistent => println!("never expires"),
                    TtlStatus::Expires(d) => println!("{}s", d.as_secs()),
                }
            }
        }
        SessionCommand::Acquire { sid, expires } => {
            let lifetime = match expires {
                Some(secs) => bridge.acquire(&sid, Duration::from_secs(secs)),
                None => bridge.acquire_default(&sid),
            };
            let expires_at = lifetime.expires_at().map(|t| t.to_rfc3339());
            if ctx.json_output {
                let output = LifetimeOutput {
                    sid: &sid,
                    expires_at,
                };
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                match expires_at {
                    Some(at) => println!("expires at {}", at),
                    None => println!("{}", dim.apply_to("(default lifetime)")),
                }
            }
        }
        SessionCommand::Touch { sid, seconds } => {
            bridge.on_update_expiration(&sid, Duration::from_secs(seconds))?;
            if !ctx.json_output {
                println!("{} ttl set to {}s", green.apply_to("✓"), seconds);
            }
        }
        SessionCommand::Clear { sid } => {
            bridge.clear(&sid)?;
            if !ctx.json_output {
                println!("{} {} cleared", green.apply_to("✓"), sid);
            }
        }
        SessionCommand::Release { sid } => {
            bridge.release(&sid)?;
            if !ctx.json_output {
                println!("{} {} released", green.apply_to("✓"), sid);
            }
        }
    }

    Ok(())
}
