//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::LayerportConfig;
use crate::core::export::{OverwriteMode, RunMode};
use crate::domain::errors::LayerportError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into LayerportConfig
/// 4. Applies environment variable overrides (LAYERPORT_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsing fails, a referenced
/// environment variable is missing, or validation fails.
pub fn load_config(path: impl AsRef<Path>) -> Result<LayerportConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(LayerportError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        LayerportError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: LayerportConfig = toml::from_str(&contents)
        .map_err(|e| LayerportError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        LayerportError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| LayerportError::Configuration(e.to_string()))?;
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    // Process line by line to skip comments
    for line in input.lines() {
        let trimmed = line.trim_start();

        // Don't substitute inside comments
        if trimmed.starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(LayerportError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the LAYERPORT_* prefix
///
/// Environment variables follow the pattern LAYERPORT_<SECTION>_<KEY>,
/// e.g. LAYERPORT_EXPORT_OUTPUT_DIRECTORY. Values that fail to parse leave
/// the configured value untouched.
fn apply_env_overrides(config: &mut LayerportConfig) {
    if let Ok(val) = std::env::var("LAYERPORT_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    if let Ok(val) = std::env::var("LAYERPORT_EXPORT_OUTPUT_DIRECTORY") {
        config.export.output_directory = val.into();
    }
    if let Ok(val) = std::env::var("LAYERPORT_EXPORT_FILE_EXTENSION") {
        config.export.file_extension = val;
    }
    if let Ok(val) = std::env::var("LAYERPORT_EXPORT_FILENAME_PATTERN") {
        config.export.filename_pattern = val;
    }
    if let Ok(val) = std::env::var("LAYERPORT_EXPORT_OVERWRITE_MODE") {
        config.export.overwrite_mode = match val.as_str() {
            "replace" => OverwriteMode::Replace,
            "skip" => OverwriteMode::Skip,
            "rename" => OverwriteMode::Rename,
            "cancel" => OverwriteMode::Cancel,
            _ => config.export.overwrite_mode,
        };
    }
    if let Ok(val) = std::env::var("LAYERPORT_EXPORT_RUN_MODE") {
        config.export.run_mode = match val.as_str() {
            "interactive" => RunMode::Interactive,
            "non_interactive" => RunMode::NonInteractive,
            "with_last_vals" => RunMode::WithLastVals,
            _ => config.export.run_mode,
        };
    }
    if let Ok(val) = std::env::var("LAYERPORT_EXPORT_FLATTEN_FOLDERS") {
        config.export.flatten_folders = val.parse().unwrap_or(config.export.flatten_folders);
    }
    if let Ok(val) = std::env::var("LAYERPORT_EXPORT_INFER_FILE_EXTENSIONS") {
        config.export.infer_file_extensions =
            val.parse().unwrap_or(config.export.infer_file_extensions);
    }
    if let Ok(val) = std::env::var("LAYERPORT_EXPORT_KEEP_IMAGE_COPY") {
        config.export.keep_image_copy = val.parse().unwrap_or(config.export.keep_image_copy);
    }

    if let Ok(val) = std::env::var("LAYERPORT_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(config.logging.local_enabled);
    }
    if let Ok(val) = std::env::var("LAYERPORT_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("LAYERPORT_TEST_VAR", "test_value");
        let input = "output_directory = \"${LAYERPORT_TEST_VAR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "output_directory = \"test_value\"\n");
        std::env::remove_var("LAYERPORT_TEST_VAR");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("LAYERPORT_MISSING_VAR");
        let input = "output_directory = \"${LAYERPORT_MISSING_VAR}\"";
        assert!(substitute_env_vars(input).is_err());
    }

    #[test]
    fn test_substitute_env_vars_skips_comments() {
        std::env::remove_var("LAYERPORT_MISSING_VAR");
        let input = "# uses ${LAYERPORT_MISSING_VAR}\nfile_extension = \"png\"";
        assert!(substitute_env_vars(input).is_ok());
    }

    #[test]
    fn test_load_config_missing_file() {
        assert!(load_config("nonexistent.toml").is_err());
    }

    #[test]
    fn test_load_config_valid() {
        let toml_content = r#"
[application]
log_level = "debug"

[export]
output_directory = "out"
file_extension = "png"
filename_pattern = "[name]_[000]"
overwrite_mode = "rename"

[[constraints]]
function = "visible"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.application.log_level, "debug");
        assert_eq!(config.export.filename_pattern, "[name]_[000]");
        assert_eq!(config.constraints.len(), 1);
    }

    #[test]
    fn test_load_config_invalid_values() {
        let toml_content = r#"
[application]
log_level = "loud"

[export]
output_directory = "out"
"#;
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        assert!(load_config(temp_file.path()).is_err());
    }
}
