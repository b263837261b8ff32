//! bootconf - inspect layered configuration
//!
//! Bootstraps exactly as a host process would and answers queries against
//! the result.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use bootconf::config::env_name;
use bootconf::{Bootstrap, Config, Source};
use clap::{Parser, Subcommand};
use serde::Serialize;

/// Inspect configuration resolved from flags, environment and property files
#[derive(Parser, Debug)]
#[command(name = "bootconf")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Base directory searched before the working directory
    #[arg(long, env = "BOOTCONF_BASE_DIR")]
    base_dir: Option<PathBuf>,

    /// Working directory for property and logging files
    #[arg(long, env = "BOOTCONF_WORKING_DIR", default_value = ".")]
    working_dir: PathBuf,

    /// Command-line override, `NAME` or `NAME=VALUE`; repeatable
    #[arg(short = 'D', long = "define", value_name = "NAME[=VALUE]", global = true)]
    defines: Vec<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the resolved value of a property
    Get {
        name: String,

        /// Value printed when the property is absent
        #[arg(long)]
        default: Option<String>,

        /// Print nothing instead of failing when absent
        #[arg(long)]
        optional: bool,
    },
    /// Print whether a property resolves
    Has { name: String },
    /// Print the active profile
    Profile,
    /// Print every known property with its source
    Dump {
        /// Emit JSON instead of `name=value` lines
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct Entry {
    name: String,
    value: String,
    source: Source,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut bootstrap = Bootstrap::from_process()?
        .args(define_flags(&cli.defines))
        .working_dir(cli.working_dir);
    if let Some(dir) = cli.base_dir {
        bootstrap = bootstrap.base_dir(dir);
    }

    let config = bootstrap.run()?.config;
    tracing::debug!(command = ?cli.command, "configuration loaded");

    if let Some(output) = render(&config, cli.command)? {
        println!("{output}");
    }
    Ok(())
}

/// Turn `NAME[=VALUE]` defines into `--NAME[=VALUE]` flags.
fn define_flags(defines: &[String]) -> Vec<String> {
    defines.iter().map(|define| format!("--{define}")).collect()
}

/// Output for `command`; `None` prints nothing.
fn render(config: &Config, command: Command) -> Result<Option<String>> {
    let output = match command {
        Command::Get {
            name,
            default,
            optional,
        } => {
            let value = match default {
                Some(default) => Some(config.get_or(&name, default)),
                None if optional => config.get_optional(&name),
                None => Some(config.get(&name).map_err(|err| {
                    if err.is_not_found() {
                        anyhow!("{err} (set it with -D {name}=VALUE or {})", env_name(&name))
                    } else {
                        err.into()
                    }
                })?),
            };
            value.map(|value| value.to_string())
        }
        Command::Has { name } => Some(config.has(&name).to_string()),
        Command::Profile => config.profile(),
        Command::Dump { json } => {
            let entries = entries(config);
            if json {
                Some(serde_json::to_string_pretty(&entries)?)
            } else {
                Some(
                    entries
                        .iter()
                        .map(|entry| {
                            format!("{}={}  ({})", entry.name, entry.value, entry.source.as_str())
                        })
                        .collect::<Vec<_>>()
                        .join("\n"),
                )
            }
        }
    };
    Ok(output)
}

fn entries(config: &Config) -> Vec<Entry> {
    config
        .entries()
        .into_iter()
        .map(|(name, value, source)| Entry {
            name,
            value: value.to_string(),
            source,
        })
        .collect()
}
