mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{handle_collect, handle_index, handle_inspect, handle_versions, Cli, Commands};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Collect { root, single } => handle_collect(&root, single, config_path)?,
        Commands::Index { path, name, out } => {
            handle_index(&path, name.as_deref(), out.as_deref(), config_path)?
        }
        Commands::Versions { repo } => handle_versions(&repo, config_path)?,
        Commands::Inspect { file } => handle_inspect(&file)?,
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}
