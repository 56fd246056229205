use anyhow::{Context, Result};
use clap::Parser;
use quire::app::App;
use quire::cli::{Cli, CliHandler};
use quire::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.load_config()?;

    let log_level = if cli.debug {
        tracing::Level::DEBUG
    } else {
        config.logging.max_level()
    };

    // Handle CLI commands
    if let Some(command) = cli.command.clone() {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_max_level(log_level)
            .init();

        let handler = CliHandler::new(config);
        let mut stdout = std::io::stdout().lock();
        return handler.handle_command(command, &mut stdout).await;
    }

    // Interactive reader logs to a file to avoid interfering with the TUI
    init_file_logging(&config, log_level)?;
    if cli.debug {
        tracing::info!("Debug mode enabled - verbose logging active");
    }

    let catalog = CliHandler::new(config.clone()).load_catalog()?;
    tracing::info!("Loaded {} essays", catalog.len());

    let mut app = App::new(&config, catalog, cli.initial_location());
    app.run().await
}

fn init_file_logging(config: &Config, level: tracing::Level) -> Result<()> {
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.logging.file)
        .with_context(|| format!("Failed to open log file {}", config.logging.file.display()))?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false) // Disable ANSI colors in log file
        .with_max_level(level)
        .init();
    Ok(())
}
