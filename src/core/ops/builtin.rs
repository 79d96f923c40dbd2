//! Built-in procedures and constraints
//!
//! The [`BuiltinResolver`] knows the operations shipped with the crate.
//! Procedures operate on the working image through the call context;
//! constraints are pure predicates over items.
//!
//! Built-in procedures:
//! - `merge_visible`: merge all visible layers of the working image into
//!   one and continue with the merged layer
//! - `resize_to_image`: resize the working layer to the image canvas
//!
//! Built-in constraints:
//! - `layers`: leaf layers only
//! - `groups`: layer groups only
//! - `visible`: visible layers only
//! - `name_matches <regex>`: layer name matches the pattern
//! - `with_tags <tag>...`: layer carries all of the tags
//! - `without_tags <tag>...`: layer carries none of the tags

use crate::core::ops::operation::{ConstraintFn, OperationResolver, ProcedureFn};
use crate::domain::Item;
use regex::Regex;
use std::sync::Arc;

/// Resolver for the operations shipped with the crate
#[derive(Debug, Default)]
pub struct BuiltinResolver;

impl BuiltinResolver {
    /// Creates the resolver
    pub fn new() -> Self {
        Self
    }
}

impl OperationResolver for BuiltinResolver {
    fn resolve_procedure(&self, function: &str) -> Option<ProcedureFn> {
        match function {
            "merge_visible" => Some(Arc::new(|ctx, _args| {
                let merged = ctx.host.merge_visible(ctx.image)?;
                ctx.layer = Some(merged);
                Ok(())
            })),
            "resize_to_image" => Some(Arc::new(|ctx, _args| {
                let layer = ctx.layer()?;
                ctx.host.resize_to_image(ctx.image, layer)
            })),
            _ => None,
        }
    }

    fn resolve_constraint(&self, function: &str) -> Option<ConstraintFn> {
        match function {
            "layers" => Some(Arc::new(|item: &Item, _args| !item.kind().is_group())),
            "groups" => Some(Arc::new(|item: &Item, _args| item.kind().is_group())),
            "visible" => Some(Arc::new(|item: &Item, _args| item.is_visible())),
            "name_matches" => Some(Arc::new(|item: &Item, args| {
                let Some(pattern) = args.first().and_then(|a| a.as_str()) else {
                    return false;
                };
                match Regex::new(pattern) {
                    Ok(re) => re.is_match(item.name()),
                    Err(_) => false,
                }
            })),
            "with_tags" => Some(Arc::new(|item: &Item, args| {
                args.iter()
                    .filter_map(|a| a.as_str())
                    .all(|tag| item.has_tag(tag))
            })),
            "without_tags" => Some(Arc::new(|item: &Item, args| {
                !args
                    .iter()
                    .filter_map(|a| a.as_str())
                    .any(|tag| item.has_tag(tag))
            })),
            _ => None,
        }
    }
}
