//! Export command implementation
//!
//! Loads the configuration and the project manifest, assembles the
//! exporter and runs one full export.

use crate::adapters::manifest;
use crate::adapters::memory::FileBackend;
use crate::adapters::progress::LogProgress;
use crate::config::load_config;
use crate::core::export::ExporterBuilder;
use crate::domain::LayerportError;
use clap::Args;
use std::path::Path;

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Path to the project manifest (JSON)
    #[arg(short, long, env = "LAYERPORT_MANIFEST")]
    pub manifest: String,

    /// Override the configured output directory
    #[arg(short, long)]
    pub output: Option<String>,

    /// Override the configured default file extension
    #[arg(long)]
    pub file_extension: Option<String>,

    /// Override the configured filename pattern
    #[arg(long)]
    pub pattern: Option<String>,
}

impl ExportArgs {
    /// Execute the export command
    pub fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, manifest = %self.manifest, "Running export");

        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };
        if let Some(output) = &self.output {
            config.export.output_directory = output.into();
        }
        if let Some(extension) = &self.file_extension {
            config.export.file_extension = extension.clone();
        }
        if let Some(pattern) = &self.pattern {
            config.export.filename_pattern = pattern.clone();
        }

        let project = match manifest::load_manifest(Path::new(&self.manifest)) {
            Ok(m) => m,
            Err(e) => {
                println!("❌ Failed to load manifest {}", self.manifest);
                println!("   Error: {e}");
                return Ok(1);
            }
        };
        let (host, image, tree) = manifest::build_project(&project)?;

        let exporter = ExporterBuilder::new(Box::new(host), image, tree, project.name.clone())
            .backend(Box::new(FileBackend::new()))
            .progress(Box::new(LogProgress::new()))
            .options(config.export.to_options())
            .procedures(config.procedures.clone())
            .constraints(config.constraints.clone())
            .build();
        let mut exporter = match exporter {
            Ok(e) => e,
            Err(e) => {
                println!("❌ Invalid operation in configuration");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        match exporter.export() {
            Ok(summary) => {
                println!("✅ {summary}");
                for path in summary.exported_paths() {
                    println!("   {}", path.display());
                }
                Ok(0)
            }
            Err(LayerportError::Cancelled) => {
                println!("⚠️  Export cancelled");
                Ok(130)
            }
            Err(e) => {
                println!("❌ Export failed");
                println!("   Error: {e}");
                Ok(1)
            }
        }
    }
}
