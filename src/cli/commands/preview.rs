//! Preview-names command implementation
//!
//! Runs only the naming phase of the pipeline and prints the relative
//! output path of every layer the export would write. No image contents
//! are touched and nothing is written to disk.

use crate::adapters::manifest;
use crate::adapters::memory::FileBackend;
use crate::adapters::progress::NullProgress;
use crate::config::load_config;
use crate::core::export::{ExporterBuilder, PhaseSet};
use crate::domain::ItemKind;
use clap::Args;
use std::path::Path;

/// Arguments for the preview-names command
#[derive(Args, Debug)]
pub struct PreviewArgs {
    /// Path to the project manifest (JSON)
    #[arg(short, long, env = "LAYERPORT_MANIFEST")]
    pub manifest: String,

    /// Override the configured filename pattern
    #[arg(long)]
    pub pattern: Option<String>,
}

impl PreviewArgs {
    /// Execute the preview-names command
    pub fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, manifest = %self.manifest, "Previewing names");

        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2);
            }
        };
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

        let mut options = config.export.to_options();
        options.phases = PhaseSet::NAMING_ONLY;

        let exporter = ExporterBuilder::new(Box::new(host), image, tree, project.name.clone())
            .backend(Box::new(FileBackend::new()))
            .progress(Box::new(NullProgress))
            .options(options)
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
            Ok(_) => {
                let tree = exporter.tree();
                for item in tree.iterate(true) {
                    if item.kind() == ItemKind::Leaf {
                        let path = tree.filepath(item.id(), Path::new(""))?;
                        println!("{}", path.display());
                    }
                }
                Ok(0)
            }
            Err(e) => {
                println!("❌ Preview failed");
                println!("   Error: {e}");
                Ok(1)
            }
        }
    }
}
