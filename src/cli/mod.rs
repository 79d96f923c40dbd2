//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Layerport using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Layerport - batch layer export tool
#[derive(Parser, Debug)]
#[command(name = "layerport")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "layerport.toml", env = "LAYERPORT_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "LAYERPORT_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export the layers of a project to individual files
    Export(commands::export::ExportArgs),

    /// Show the output names an export would produce, without writing
    PreviewNames(commands::preview::PreviewArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_export() {
        let cli = Cli::parse_from(["layerport", "export", "--manifest", "scene.json"]);
        assert_eq!(cli.config, "layerport.toml");
        assert!(matches!(cli.command, Commands::Export(_)));
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from([
            "layerport",
            "--config",
            "custom.toml",
            "export",
            "--manifest",
            "scene.json",
        ]);
        assert_eq!(cli.config, "custom.toml");
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from([
            "layerport",
            "--log-level",
            "debug",
            "preview-names",
            "--manifest",
            "scene.json",
        ]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
        assert!(matches!(cli.command, Commands::PreviewNames(_)));
    }

    #[test]
    fn test_cli_parse_validate_config() {
        let cli = Cli::parse_from(["layerport", "validate-config"]);
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["layerport", "init"]);
        assert!(matches!(cli.command, Commands::Init(_)));
    }
}
