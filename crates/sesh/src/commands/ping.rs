//! Ping command - checks that the Redis server answers.

use std::time::Instant;

use anyhow::Result;
use clap::Args;
use console::Style;
use serde::Serialize;

use super::Context;

/// Arguments for the ping command.
#[derive(Args, Debug)]
pub struct PingArgs {}

#[derive(Debug, Serialize)]
struct PingOutput {
    reachable: bool,
    url: String,
    latency_ms: Option<u128>,
    error: Option<String>,
}

/// Run the ping command.
pub fn run(_args: PingArgs, ctx: &Context) -> Result<()> {
    let url = ctx.config.redis().url;
    let started = Instant::now();

    let output = match ctx.connect() {
        Ok(bridge) => {
            bridge.close()?;
            PingOutput {
                reachable: true,
                url,
                latency_ms: Some(started.elapsed().as_millis()),
                error: None,
            }
        }
        Err(e) => PingOutput {
            reachable: false,
            url,
            latency_ms: None,
            error: Some(format!("{:#}", e)),
        },
    };

    if ctx.json_output {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if output.reachable {
        let green = Style::new().green();
        let dim = Style::new().dim();
        println!(
            "{} {} {}",
            green.apply_to("● PONG"),
            output.url,
            dim.apply_to(format!("({} ms)", output.latency_ms.unwrap_or_default()))
        );
    } else {
        let red = Style::new().red();
        println!("{} {}", red.apply_to("● unreachable"), output.url);
        if let Some(ref error) = output.error {
            println!("  {}", error);
        }
    }

    if output.reachable {
        Ok(())
    } else {
        anyhow::bail!("Redis at {} is unreachable", output.url)
    }
}
