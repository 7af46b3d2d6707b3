use anyhow::{Context, Result};
use clap::Parser;

use routegen::Settings;
use routegen::cli::commands;
use routegen::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::Init { force } = cli.command {
        routegen::logging::init();
        return commands::init::run_init(force);
    }

    let settings = match &cli.config {
        Some(path) => Settings::load_from(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => Settings::load().context("Failed to load settings")?,
    };

    routegen::logging::init_with_config(&settings.effective_logging());

    // Malformed alias tables and patterns are fatal at startup
    settings.validate().context("Invalid configuration")?;

    match cli.command {
        Commands::Init { .. } => Ok(()),
        Commands::Generate => commands::generate::run(settings),
        Commands::Watch => commands::watch::run(settings).await,
        Commands::Routes { tree } => commands::routes::run(settings, tree),
        Commands::Config => commands::init::run_config(&settings),
    }
}
