//! Configuration management commands.

use std::path::{Path, PathBuf};

use clap::Args;
use keyward_core::{paths, StoreConfig};

use crate::load_config;

/// Config command arguments.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(clap::Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,

    /// Write a default configuration file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

/// Run the config command.
pub fn run(args: ConfigArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => {
            let config = load_config(config_path)?;
            println!("{}", config.to_json5()?);
        }

        ConfigCommand::Init { force } => {
            let path = match config_path {
                Some(path) => path.to_path_buf(),
                None => paths::config_file()?,
            };
            init(&path, force)?;
            println!("Created config file: {}", path.display());
        }
    }

    Ok(())
}

/// Write the default configuration, with file auditing enabled, to `path`.
pub fn init(path: &Path, force: bool) -> anyhow::Result<StoreConfig> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            path.display()
        );
    }

    let mut config = StoreConfig::default();
    config.audit.file = Some(default_audit_file(path)?);
    config.validate()?;
    config.save(path)?;
    Ok(config)
}

/// Audit log beside an explicitly placed config, else the default location.
fn default_audit_file(config_path: &Path) -> anyhow::Result<PathBuf> {
    match config_path.parent() {
        Some(dir) if paths::config_file().ok().as_deref() != Some(config_path) => {
            Ok(dir.join("audit").join("keychain.jsonl"))
        }
        _ => Ok(paths::audit_file()?),
    }
}
