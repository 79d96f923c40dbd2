//! Configuration management
//!
//! Configuration is read from a TOML file (`layerport.toml` by default),
//! with `${VAR}` placeholders substituted from the environment and
//! `LAYERPORT_*` environment variables overriding individual keys.

pub mod loader;
pub mod schema;

pub use loader::load_config;
pub use schema::{ApplicationConfig, ExportConfig, LayerportConfig, LoggingConfig};
