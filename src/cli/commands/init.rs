//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "layerport.toml")]
    pub output: String,

    /// Include example operations and comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2); // Configuration error exit code
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Validate configuration: layerport validate-config");
                println!("  3. Preview output names: layerport preview-names --manifest scene.json");
                println!("  4. Run export: layerport export --manifest scene.json");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(1)
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# Layerport Configuration File
# Batch layer export tool

[application]
log_level = "info"

[export]
output_directory = "export"
file_extension = "png"
filename_pattern = "[name]"
overwrite_mode = "rename"  # replace | skip | rename | cancel
flatten_folders = false
infer_file_extensions = false
run_mode = "non_interactive"
keep_image_copy = false

[logging]
local_enabled = false
local_path = "logs"
local_rotation = "daily"
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# Layerport Configuration File
# Batch layer export tool
#
# This file contains all configuration options with examples.

[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

[export]
# Directory the output tree is written under
output_directory = "export"

# Default file extension, without a leading dot
file_extension = "png"

# Filename pattern. Available fields:
#   [name]       layer name
#   [000]        ascending counter, zero-padded to the field width
#   [date:FMT]   current date (strftime format, default %Y-%m-%d)
#   [path:SEP]   parent group chain joined by SEP (default "-")
#   [tags:SEP]   layer tags joined by SEP (default "-")
#   [document]   source document name
# Use [[ for a literal [.
filename_pattern = "[name]"

# What to do with already existing output files
overwrite_mode = "rename"  # replace | skip | rename | cancel

# Export all layers directly into the output directory
flatten_folders = false

# Use a layer's own file extension when its name carries a valid one
infer_file_extensions = false

# Run mode used for the first export of each file format
run_mode = "non_interactive"  # interactive | non_interactive | with_last_vals

# Keep the working image copy alive after the run
keep_image_copy = false

# Procedures run on every exported layer, in order.
# Built-in functions: merge_visible, resize_to_image
#
# [[procedures]]
# function = "resize_to_image"
#
# [[procedures]]
# function = "merge_visible"
# enabled = false

# Constraints decide which layers are exported.
# Built-in functions: layers, groups, visible, name_matches, with_tags,
# without_tags
#
# [[constraints]]
# function = "visible"
#
# [[constraints]]
# function = "name_matches"
# args = ["^fg_"]
# subfilter = "names"
# match_mode = "any"

[logging]
# Write JSON logs to a rotating local file
local_enabled = false
local_path = "logs"
local_rotation = "daily"  # daily | hourly
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_args_defaults() {
        let args = InitArgs {
            output: "layerport.toml".to_string(),
            with_examples: false,
            force: false,
        };
        assert_eq!(args.output, "layerport.toml");
        assert!(!args.with_examples);
    }

    #[test]
    fn test_generated_configs_parse() {
        use crate::config::LayerportConfig;

        let minimal: LayerportConfig =
            toml::from_str(&InitArgs::generate_minimal_config()).unwrap();
        assert!(minimal.validate().is_ok());

        let full: LayerportConfig =
            toml::from_str(&InitArgs::generate_config_with_examples()).unwrap();
        assert!(full.validate().is_ok());
        assert!(InitArgs::generate_config_with_examples().contains("filename_pattern"));
    }
}
