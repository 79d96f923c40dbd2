//! Validate-config command implementation

use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates after parsing
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!(
            "  Output Directory: {}",
            config.export.output_directory.display()
        );
        println!("  File Extension: {}", config.export.file_extension);
        println!("  Filename Pattern: {}", config.export.filename_pattern);
        println!("  Overwrite Mode: {:?}", config.export.overwrite_mode);
        println!("  Flatten Folders: {}", config.export.flatten_folders);
        println!("  Procedures: {}", config.procedures.len());
        println!("  Constraints: {}", config.constraints.len());
        println!();
        Ok(0)
    }
}
