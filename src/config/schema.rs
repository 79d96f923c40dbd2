//! Configuration schema types
//!
//! This module defines the configuration structure mapping to the
//! `layerport.toml` file: application settings, export settings, the
//! declared procedures and constraints, and logging.

use crate::core::export::{ExportOptions, OverwriteMode, PhaseSet, RunMode};
use crate::core::ops::OperationSpec;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main Layerport configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerportConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Export settings
    pub export: ExportConfig,

    /// Procedures applied to every exported layer, in order
    #[serde(default)]
    pub procedures: Vec<OperationSpec>,

    /// Constraints deciding which layers are exported, in order
    #[serde(default)]
    pub constraints: Vec<OperationSpec>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl LayerportConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.export.validate()?;
        for spec in self.procedures.iter().chain(self.constraints.iter()) {
            if spec.function.is_empty() {
                return Err("operation with an empty 'function' field".to_string());
            }
        }
        self.logging.validate()?;
        Ok(())
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

fn default_file_extension() -> String {
    "png".to_string()
}

fn default_filename_pattern() -> String {
    "[name]".to_string()
}

/// Export settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory the output tree is written under
    pub output_directory: PathBuf,

    /// Default file extension, without a leading dot
    #[serde(default = "default_file_extension")]
    pub file_extension: String,

    /// Filename pattern applied to every exported layer
    #[serde(default = "default_filename_pattern")]
    pub filename_pattern: String,

    /// What to do with already existing output files
    #[serde(default)]
    pub overwrite_mode: OverwriteMode,

    /// Export all layers directly into the output directory
    #[serde(default)]
    pub flatten_folders: bool,

    /// Use a layer's own file extension when its name carries a valid one
    #[serde(default)]
    pub infer_file_extensions: bool,

    /// Run mode used for the first export of each file format
    #[serde(default)]
    pub run_mode: RunMode,

    /// Keep the working image copy alive after the run
    #[serde(default)]
    pub keep_image_copy: bool,
}

impl ExportConfig {
    fn validate(&self) -> Result<(), String> {
        if self.output_directory.as_os_str().is_empty() {
            return Err("output_directory must not be empty".to_string());
        }
        if self.file_extension.trim().trim_start_matches('.').is_empty() {
            return Err("file_extension must not be empty".to_string());
        }
        if self.filename_pattern.is_empty() {
            return Err("filename_pattern must not be empty".to_string());
        }
        Ok(())
    }

    /// Converts the settings into pipeline options
    pub fn to_options(&self) -> ExportOptions {
        ExportOptions {
            output_directory: self.output_directory.clone(),
            file_extension: self.file_extension.clone(),
            filename_pattern: self.filename_pattern.clone(),
            overwrite_mode: self.overwrite_mode,
            flatten_folders: self.flatten_folders,
            infer_file_extensions: self.infer_file_extensions,
            initial_run_mode: self.run_mode,
            keep_image_copy: self.keep_image_copy,
            phases: PhaseSet::ALL,
        }
    }
}

fn default_local_path() -> String {
    "logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Write JSON logs to a rotating local file
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory the log files are written to
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log file rotation: daily or hourly
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        if !["daily", "hourly"].contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid local_rotation '{}'. Must be 'daily' or 'hourly'",
                self.local_rotation
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal() -> LayerportConfig {
        toml::from_str(
            r#"
            [export]
            output_directory = "out"
            "#,
        )
        .unwrap()
    }

    #[test]
    fn test_minimal_config_is_valid() {
        let config = minimal();
        assert!(config.validate().is_ok());
        assert_eq!(config.export.file_extension, "png");
        assert_eq!(config.export.filename_pattern, "[name]");
        assert_eq!(config.export.overwrite_mode, OverwriteMode::Replace);
        assert_eq!(config.application.log_level, "info");
        assert!(!config.logging.local_enabled);
    }

    #[test]
    fn test_operations_deserialize() {
        let config: LayerportConfig = toml::from_str(
            r#"
            [export]
            output_directory = "out"

            [[procedures]]
            function = "merge_visible"

            [[constraints]]
            function = "name_matches"
            args = ["^fg_"]
            subfilter = "names"
            match_mode = "any"
            "#,
        )
        .unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.procedures.len(), 1);
        assert_eq!(config.constraints[0].subfilter.as_deref(), Some("names"));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let mut config = minimal();
        config.application.log_level = "verbose".to_string();
        assert!(config.validate().is_err());

        let mut config = minimal();
        config.export.file_extension = ".".to_string();
        assert!(config.validate().is_err());

        let mut config = minimal();
        config.logging.local_rotation = "weekly".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_to_options() {
        let mut config = minimal();
        config.export.flatten_folders = true;
        let options = config.export.to_options();
        assert!(options.flatten_folders);
        assert_eq!(options.output_directory, PathBuf::from("out"));
    }
}
