// Layerport - Batch Layer Export Tool
// Copyright (c) 2026 Layerport Contributors
// Licensed under the MIT License

use clap::Parser;
use layerport::cli::{Cli, Commands};
use layerport::config::LoggingConfig;
use layerport::logging::init_logging;
use std::process;

fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Console-only logging for the CLI; file logging is a library concern
    let log_level = cli.log_level.as_deref().unwrap_or("info");
    let logging_config = LoggingConfig {
        local_enabled: false,
        ..LoggingConfig::default()
    };
    if let Err(e) = init_logging(log_level, &logging_config) {
        eprintln!("Failed to initialize logging: {e}");
        process::exit(2);
    }

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "Layerport");

    let exit_code = match execute_command(&cli) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            1
        }
    };

    process::exit(exit_code);
}

/// Execute the CLI command
fn execute_command(cli: &Cli) -> anyhow::Result<i32> {
    match &cli.command {
        Commands::Export(args) => args.execute(&cli.config),
        Commands::PreviewNames(args) => args.execute(&cli.config),
        Commands::ValidateConfig(args) => args.execute(&cli.config),
        Commands::Init(args) => args.execute(),
    }
}
