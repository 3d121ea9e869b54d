// ABOUTME: Entry point for the barn binary.
// ABOUTME: Initializes tracing, opens the file-backed store, and executes one command from argv.

mod cli;

use anyhow::Context;
use barn::config::BarnConfig;
use barn::{Barn, FileBackend};
use clap::Parser;

use crate::cli::Cli;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("barn=info,barn_store=info")),
        )
        .init();

    let cli = Cli::parse();

    let config = BarnConfig::from_env()?;
    let backend = FileBackend::open(&config.data)
        .with_context(|| format!("failed to open {}", config.data.display()))?;
    let mut barn = Barn::with_namespace(&config.namespace, backend, config.store)?;

    let Some(cmd) = cli.action.into_command() else {
        barn.condense()?;
        println!("OK");
        return Ok(());
    };

    tracing::debug!("executing {} against {}", cmd.name(), config.data.display());
    let reply = barn.execute(cmd)?;
    println!("{}", reply);

    Ok(())
}
