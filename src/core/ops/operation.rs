//! Operation model
//!
//! An operation is a named, configurable unit of work applied during an
//! export: a *procedure* mutates the working image through the call context,
//! a *constraint* decides whether an item takes part in the export at all.
//! Operation specifications are plain data (deserialized from the config
//! file); resolution binds each specification to a concrete function once,
//! when the registry is built.

use crate::core::exec::CallContext;
use crate::core::tree::MatchMode;
use crate::domain::{Item, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A literal argument passed to an operation function
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArgValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl ArgValue {
    /// The string value, if this argument is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ArgValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The boolean value, if this argument is a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ArgValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The integer value, if this argument is an integer
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ArgValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// The float value; integers are widened
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ArgValue::Float(f) => Some(*f),
            ArgValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Declarative description of one operation, as found in the config file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationSpec {
    /// Function to bind; must be known to the registry's resolver
    pub function: String,
    /// Registry name; defaults to the function name, uniquified on insert
    #[serde(default)]
    pub name: String,
    /// Arguments passed to the function on every call
    #[serde(default)]
    pub args: Vec<ArgValue>,
    /// Disabled operations stay registered but are never run
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Human-readable name shown in summaries; defaults to the name
    #[serde(default)]
    pub display_name: Option<String>,
    /// Invoker groups the operation runs in; empty means the registry's
    /// default group
    #[serde(default)]
    pub groups: Vec<String>,
    /// Procedures only: name of a constraint gating this procedure per item
    #[serde(default)]
    pub local_constraint: Option<String>,
    /// Procedures only: run even for items failing the global constraints
    #[serde(default)]
    pub ignore_global_constraints: bool,
    /// Constraints only: sub-filter this constraint's rule is added to
    #[serde(default)]
    pub subfilter: Option<String>,
    /// Constraints only: match mode used when creating the sub-filter
    #[serde(default)]
    pub match_mode: Option<MatchMode>,
}

impl OperationSpec {
    /// Creates a minimal specification for the given function
    pub fn for_function(function: impl Into<String>) -> Self {
        Self {
            function: function.into(),
            name: String::new(),
            args: Vec::new(),
            enabled: true,
            display_name: None,
            groups: Vec::new(),
            local_constraint: None,
            ignore_global_constraints: false,
            subfilter: None,
            match_mode: None,
        }
    }

    /// Sets the arguments
    pub fn with_args(mut self, args: Vec<ArgValue>) -> Self {
        self.args = args;
        self
    }
}

/// A procedure body: mutates the working image through the call context
pub type ProcedureFn = Arc<dyn for<'a> Fn(&mut CallContext<'a>, &[ArgValue]) -> Result<()>>;

/// A constraint body: decides whether an item takes part in the export
pub type ConstraintFn = Arc<dyn Fn(&Item, &[ArgValue]) -> bool>;

/// Resolved operation body
#[derive(Clone)]
pub enum OperationFn {
    Procedure(ProcedureFn),
    Constraint(ConstraintFn),
}

/// Binds function names to concrete operation bodies.
///
/// Resolution happens once, when a registry is constructed or an operation
/// is added; an unknown function name is rejected immediately instead of
/// failing mid-export.
pub trait OperationResolver {
    /// Resolves a procedure by function name
    fn resolve_procedure(&self, function: &str) -> Option<ProcedureFn>;

    /// Resolves a constraint by function name
    fn resolve_constraint(&self, function: &str) -> Option<ConstraintFn>;
}

/// A specification bound to its resolved function
pub struct Operation {
    spec: OperationSpec,
    func: OperationFn,
}

impl Operation {
    pub(crate) fn new(spec: OperationSpec, func: OperationFn) -> Self {
        Self { spec, func }
    }

    /// Unique registry name
    pub fn name(&self) -> &str {
        &self.spec.name
    }

    /// Human-readable name
    pub fn display_name(&self) -> &str {
        self.spec.display_name.as_deref().unwrap_or(&self.spec.name)
    }

    /// The underlying specification
    pub fn spec(&self) -> &OperationSpec {
        &self.spec
    }

    pub(crate) fn spec_mut(&mut self) -> &mut OperationSpec {
        &mut self.spec
    }

    /// Whether the operation participates in runs
    pub fn is_enabled(&self) -> bool {
        self.spec.enabled
    }

    /// The resolved body
    pub fn func(&self) -> &OperationFn {
        &self.func
    }

    /// The body as a procedure, if it is one
    pub fn as_procedure(&self) -> Option<&ProcedureFn> {
        match &self.func {
            OperationFn::Procedure(f) => Some(f),
            OperationFn::Constraint(_) => None,
        }
    }

    /// The body as a constraint, if it is one
    pub fn as_constraint(&self) -> Option<&ConstraintFn> {
        match &self.func {
            OperationFn::Constraint(f) => Some(f),
            OperationFn::Procedure(_) => None,
        }
    }
}

impl std::fmt::Debug for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Operation")
            .field("name", &self.spec.name)
            .field("function", &self.spec.function)
            .field("enabled", &self.spec.enabled)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arg_value_untagged_deserialization() {
        let args: Vec<ArgValue> = serde_json::from_str(r#"[true, 3, 2.5, "x"]"#).unwrap();
        assert_eq!(args[0].as_bool(), Some(true));
        assert_eq!(args[1].as_i64(), Some(3));
        assert_eq!(args[2].as_f64(), Some(2.5));
        assert_eq!(args[3].as_str(), Some("x"));
        assert_eq!(args[0].as_str(), None);
    }

    #[test]
    fn test_spec_defaults() {
        let spec: OperationSpec =
            toml::from_str(r#"function = "merge_visible""#).unwrap();
        assert!(spec.enabled);
        assert!(spec.name.is_empty());
        assert!(spec.args.is_empty());
        assert!(!spec.ignore_global_constraints);
    }
}
