//! `slots` CLI — resolve meeting slots across attendee timezones.
//!
//! ## Usage
//!
//! ```sh
//! # Resolve a request (stdin → stdout)
//! slots resolve < request.json
//!
//! # Resolve from file to file, local parsing only
//! slots resolve -i request.json -o result.json --offline
//!
//! # Return five slots on a 15-minute grid
//! slots resolve -i request.json --top 5 --granularity 15
//!
//! # Try the local availability text parser
//! slots parse "Mondays and Tuesdays between 8 am to 3 pm"
//!
//! # Resolve a timezone name or alias
//! slots zone IST
//! ```

mod config;

use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use slot_engine::{parse_fallback, resolve_timezone, MeetingRequest, Resolver};
use tracing_subscriber::EnvFilter;

use crate::config::Config;

#[derive(Parser)]
#[command(
    name = "slots",
    version,
    about = "Find meeting times that work across attendee timezones"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a JSON meeting request into ranked meeting times
    Resolve {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Skip Claude parsing and preference analysis
        #[arg(long)]
        offline: bool,
        /// Number of meeting times to return
        #[arg(long)]
        top: Option<usize>,
        /// Minutes between candidate start times
        #[arg(long)]
        granularity: Option<u32>,
    },
    /// Parse availability text with the local parser and print the intervals
    Parse {
        /// Free-text availability, e.g. "every working day 2 pm to 5 pm"
        text: String,
    },
    /// Resolve a timezone name, abbreviation, or city alias
    Zone {
        name: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    // Logs go to stderr so stdout stays machine-readable.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    match cli.command {
        Commands::Resolve {
            input,
            output,
            offline,
            top,
            granularity,
        } => {
            let mut config =
                Config::load_from(cli.config.as_deref()).context("Failed to load configuration")?;
            tracing::debug!(?config, "loaded configuration");
            if let Some(top) = top {
                config.resolver.top_n = top;
            }
            if let Some(granularity) = granularity {
                config.resolver.granularity_minutes = granularity;
            }

            let json = read_input(input.as_deref())?;
            let request =
                MeetingRequest::from_json(&json).context("Failed to read meeting request")?;
            let resolver = build_resolver(&config, offline)?;
            let resolution = resolver
                .resolve(&request)
                .context("Failed to resolve meeting slots")?;
            let pretty = serde_json::to_string_pretty(&resolution)?;
            write_output(output.as_deref(), &pretty)?;
        }
        Commands::Parse { text } => {
            let intervals = parse_fallback(&text);
            println!("{}", serde_json::to_string_pretty(&intervals)?);
        }
        Commands::Zone { name } => {
            let resolved = resolve_timezone(&name);
            if let Some(warning) = &resolved.warning {
                eprintln!("warning: {warning}");
            }
            println!("{}", resolved.zone.name());
        }
    }

    Ok(())
}

/// Build a resolver, attaching Claude collaborators when an API key is configured.
fn build_resolver(config: &Config, offline: bool) -> Result<Resolver> {
    let resolver = Resolver::new(config.resolver.clone());
    if offline {
        return Ok(resolver);
    }

    let Some(api_key) = config.anthropic_api_key.as_deref() else {
        tracing::warn!("no Anthropic API key configured, using local parsing and default scoring");
        return Ok(resolver);
    };

    let client = slot_llm::Client::new(api_key, config.model.as_str(), config.timeout())
        .context("Failed to build Claude client")?;
    Ok(resolver
        .with_text_parser(Box::new(client.clone()))
        .with_preference_analyzer(Box::new(client)))
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
