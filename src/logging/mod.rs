//! Logging and observability
//!
//! Structured logging through `tracing`: human-readable console output,
//! plus optional JSON logs written to a rotating local file.

pub mod structured;

pub use structured::{init_logging, LoggingGuard};
