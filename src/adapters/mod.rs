//! Adapters connecting the export pipeline to the outside world.
//!
//! This module contains:
//! - [`host`]: the image host and export backend traits the pipeline drives
//! - [`memory`]: an in-memory image host with a filesystem export backend
//! - [`manifest`]: loading layered projects from JSON manifests
//! - [`progress`]: progress reporting sinks

pub mod host;
pub mod manifest;
pub mod memory;
pub mod progress;
