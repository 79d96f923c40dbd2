//! Core export pipeline
//!
//! This module contains the domain-independent machinery of the exporter:
//! - [`tree`]: the item tree, filtering and name helpers
//! - [`ops`]: operation registries (procedures and constraints)
//! - [`exec`]: the callable execution engine
//! - [`rename`]: filename patterns
//! - [`export`]: the export orchestrator and its state machine

pub mod exec;
pub mod export;
pub mod ops;
pub mod rename;
pub mod tree;
