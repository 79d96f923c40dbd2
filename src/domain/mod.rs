//! Domain models and types for Layerport.
//!
//! This module contains the core domain models and error types shared by the
//! rest of the crate.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed handles** ([`ItemId`], [`ImageRef`], [`LayerRef`])
//! - **The item model** ([`Item`], [`ItemKind`])
//! - **Error types** ([`LayerportError`])
//! - **Result type alias** ([`Result`])
//!
//! # Type Safety
//!
//! Layerport uses the newtype pattern for handles to prevent mixing
//! identifier spaces:
//!
//! ```rust
//! use layerport::domain::{ItemId, LayerRef};
//!
//! let item_id = ItemId::new(1);
//! let layer = LayerRef::new(1);
//!
//! // This won't compile - type safety prevents mixing handles
//! // let wrong: ItemId = layer;  // Compile error!
//! ```

pub mod errors;
pub mod ids;
pub mod item;
pub mod result;

// Re-export commonly used types for convenience
pub use errors::LayerportError;
pub use ids::{ImageRef, ItemId, LayerRef};
pub use item::{Item, ItemKind};
pub use result::Result;
