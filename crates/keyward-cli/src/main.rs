//! Keyward CLI entry point.

use clap::Parser;
use keyward_cli::{load_config, log_filter, run, Cli};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging; stdout is reserved for command output
    let configured = load_config(cli.config.as_deref())
        .ok()
        .map(|config| config.logging.level);
    tracing_subscriber::registry()
        .with(log_filter(cli.verbose, configured))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Run the command
    run(cli)
}
