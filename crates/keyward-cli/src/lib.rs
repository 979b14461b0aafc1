//! Keyward command-line interface.

pub mod commands;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use keyward_core::env;
use keyward_core::config::LogLevel;
use keyward_core::{ConfigError, StoreConfig};
use keyward_secrets::SecretStore;
use tracing_subscriber::EnvFilter;

/// Keyward - keychain-backed secret store
#[derive(Parser)]
#[command(name = "keyward")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase logging verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file
    #[arg(short, long, env = "KEYWARD_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Store a secret. --hex takes raw bytes as hex; otherwise the prompted text is stored as UTF-8
    Save {
        /// Secret name (alphanumeric, underscore, hyphen, dot)
        name: String,

        /// Raw secret bytes as hex (without it, the typed text is stored as UTF-8)
        #[arg(long, value_name = "HEX")]
        hex: Option<String>,
    },

    /// Print a stored secret as hex
    Load {
        /// Secret name
        name: String,
    },

    /// Delete a secret
    Delete {
        /// Secret name
        name: String,
    },

    /// Delete every secret of the configured service
    Purge {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },

    /// Check that the identity key is present
    Verify,

    /// Configuration management
    Config(commands::config::ConfigArgs),
}

/// Build the log filter.
///
/// `KEYWARD_LOG` wins. Otherwise each `-v` raises the level above the
/// configured one (default `info`).
pub fn log_filter(verbose: u8, configured: Option<LogLevel>) -> EnvFilter {
    if let Some(directives) = env::get_var(env::vars::KEYWARD_LOG) {
        if let Ok(filter) = EnvFilter::try_new(directives) {
            return filter;
        }
    }
    EnvFilter::new(format!("keyward={}", verbosity_level(verbose, configured)))
}

fn verbosity_level(verbose: u8, configured: Option<LogLevel>) -> &'static str {
    match verbose {
        0 => configured.unwrap_or_default().as_str(),
        1 => "debug",
        _ => "trace",
    }
}

/// Load the store configuration from `path` or the default location.
///
/// A missing file yields the defaults. Environment overrides apply either way.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<StoreConfig> {
    let loaded = match path {
        Some(path) => StoreConfig::load(path),
        None => StoreConfig::load_default(),
    };
    let mut config = match loaded {
        Ok(config) => config,
        Err(ConfigError::NotFound(_)) => StoreConfig::default(),
        Err(e) => return Err(e).context("Failed to load configuration"),
    };
    config.apply_env_overrides();
    Ok(config)
}

/// Run the CLI with the given arguments.
pub fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = cli.config.as_deref();
    let open_store = || -> anyhow::Result<SecretStore> {
        commands::secrets::open_store(&load_config(config_path)?)
    };

    match cli.command {
        Commands::Save { name, hex } => commands::secrets::save(&open_store()?, &name, hex),
        Commands::Load { name } => commands::secrets::load(&open_store()?, &name),
        Commands::Delete { name } => commands::secrets::delete(&open_store()?, &name),
        Commands::Purge { yes } => commands::secrets::purge(&open_store()?, yes),
        Commands::Verify => commands::secrets::verify(&open_store()?),
        Commands::Config(args) => commands::config::run(args, config_path),
    }
}
