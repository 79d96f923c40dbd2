// Layerport - Batch Layer Export Tool
// Copyright (c) 2026 Layerport Contributors
// Licensed under the MIT License

//! # Layerport - Batch Layer Export
//!
//! Layerport exports the layers of a layered image project to individual
//! files, mirroring the group structure as directories. Which layers are
//! exported is decided by composable *constraints*; every exported layer is
//! run through configurable *procedures* before it is written.
//!
//! ## Architecture
//!
//! Layerport follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (item tree, operations, execution, renaming,
//!   export)
//! - [`adapters`] - Host integrations (in-memory host, manifests, backends)
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use layerport::adapters::manifest;
//! use layerport::adapters::memory::FileBackend;
//! use layerport::core::export::{ExportOptions, ExporterBuilder};
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let project = manifest::load_manifest(Path::new("scene.json"))?;
//!     let (host, image, tree) = manifest::build_project(&project)?;
//!
//!     let mut exporter = ExporterBuilder::new(Box::new(host), image, tree, project.name)
//!         .backend(Box::new(FileBackend::new()))
//!         .options(ExportOptions {
//!             output_directory: "export".into(),
//!             ..ExportOptions::default()
//!         })
//!         .build()?;
//!
//!     let summary = exporter.export()?;
//!     println!("{summary}");
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Layerport uses the [`domain::LayerportError`] type for all errors:
//!
//! ```rust,no_run
//! use layerport::domain::LayerportError;
//!
//! fn example() -> Result<(), LayerportError> {
//!     // Errors are automatically converted using the ? operator
//!     let config = layerport::config::load_config("layerport.toml")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Logging
//!
//! Layerport uses structured logging with the `tracing` crate:
//!
//! ```rust,no_run
//! use tracing::{info, warn};
//!
//! info!("starting export");
//! warn!(item = "background", "skipped existing file");
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
