//! Operation registries
//!
//! A registry holds an ordered list of resolved operations of one kind
//! (procedures or constraints). Mutations keep names unique, notify
//! subscribed observers around every change, and reject unknown function
//! names at insertion time.

pub mod builtin;
pub mod events;
pub mod operation;

pub use builtin::BuiltinResolver;
pub use events::RegistryEvent;
pub use operation::{
    ArgValue, ConstraintFn, Operation, OperationFn, OperationResolver, OperationSpec, ProcedureFn,
};

use crate::core::tree::names;
use crate::domain::{LayerportError, Result};
use std::sync::Arc;

/// What kind of operations a registry holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryKind {
    Procedures,
    Constraints,
}

impl RegistryKind {
    /// Invoker group operations of this kind run in by default
    pub fn default_group(self) -> &'static str {
        match self {
            RegistryKind::Procedures => "default_procedures",
            RegistryKind::Constraints => "default_constraints",
        }
    }
}

type Observer = Box<dyn FnMut(&RegistryEvent)>;

/// Ordered collection of resolved operations of one kind
pub struct OperationRegistry {
    name: String,
    kind: RegistryKind,
    resolver: Arc<dyn OperationResolver>,
    operations: Vec<Operation>,
    initial: Vec<OperationSpec>,
    observers: Vec<Observer>,
}

impl OperationRegistry {
    /// Creates a registry pre-populated with `initial` specifications.
    ///
    /// Every initial specification is resolved immediately; an unknown
    /// function name fails construction with
    /// [`LayerportError::InvalidProcedure`].
    pub fn new(
        name: impl Into<String>,
        kind: RegistryKind,
        resolver: Arc<dyn OperationResolver>,
        initial: Vec<OperationSpec>,
    ) -> Result<Self> {
        let mut registry = Self {
            name: name.into(),
            kind,
            resolver,
            operations: Vec::new(),
            initial: initial.clone(),
            observers: Vec::new(),
        };
        for spec in initial {
            registry.add(spec)?;
        }
        Ok(registry)
    }

    /// Registry name, used in log output
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Kind of operations this registry holds
    pub fn kind(&self) -> RegistryKind {
        self.kind
    }

    /// Number of registered operations
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Returns `true` when no operations are registered
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Looks up an operation by its unique name
    pub fn get(&self, name: &str) -> Option<&Operation> {
        self.operations.iter().find(|op| op.name() == name)
    }

    /// All operations in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Operation> {
        self.operations.iter()
    }

    /// Enabled operations in registration order
    pub fn iter_enabled(&self) -> impl Iterator<Item = &Operation> {
        self.operations.iter().filter(|op| op.is_enabled())
    }

    /// Subscribes an observer to registry change events
    pub fn subscribe<F>(&mut self, observer: F)
    where
        F: FnMut(&RegistryEvent) + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    fn emit(observers: &mut [Observer], event: &RegistryEvent) {
        for observer in observers {
            observer(event);
        }
    }

    fn resolve(&self, spec: &OperationSpec) -> Result<OperationFn> {
        let resolved = match self.kind {
            RegistryKind::Procedures => self
                .resolver
                .resolve_procedure(&spec.function)
                .map(OperationFn::Procedure),
            RegistryKind::Constraints => self
                .resolver
                .resolve_constraint(&spec.function)
                .map(OperationFn::Constraint),
        };
        resolved.ok_or_else(|| LayerportError::InvalidProcedure(spec.function.clone()))
    }

    /// Adds an operation, returning its final (uniquified) name.
    ///
    /// An empty name defaults to the function name. Name collisions get a
    /// `_2`-style suffix, display name collisions a ` (2)`-style suffix.
    pub fn add(&mut self, mut spec: OperationSpec) -> Result<String> {
        let func = self.resolve(&spec)?;

        if spec.name.is_empty() {
            spec.name = spec.function.clone();
        }
        spec.name = names::uniquify(
            &spec.name,
            |candidate| self.operations.iter().any(|op| op.name() == candidate),
            |n| format!("_{n}"),
            None,
        );
        if let Some(display) = &spec.display_name {
            let display = names::uniquify(
                display,
                |candidate| self.operations.iter().any(|op| op.display_name() == candidate),
                |n| format!(" ({n})"),
                None,
            );
            spec.display_name = Some(display);
        }
        if spec.groups.is_empty() {
            spec.groups = vec![self.kind.default_group().to_string()];
        }

        let name = spec.name.clone();
        Self::emit(
            &mut self.observers,
            &RegistryEvent::BeforeAdd { name: name.clone() },
        );
        self.operations.push(Operation::new(spec, func));
        let position = self.operations.len() - 1;
        Self::emit(
            &mut self.observers,
            &RegistryEvent::AfterAdd {
                name: name.clone(),
                position,
            },
        );
        Ok(name)
    }

    fn position(&self, name: &str) -> Result<usize> {
        self.operations
            .iter()
            .position(|op| op.name() == name)
            .ok_or_else(|| {
                LayerportError::NotFound(format!("operation '{name}' in registry '{}'", self.name))
            })
    }

    /// Removes the operation registered under `name`
    pub fn remove(&mut self, name: &str) -> Result<()> {
        let pos = self.position(name)?;
        Self::emit(
            &mut self.observers,
            &RegistryEvent::BeforeRemove {
                name: name.to_string(),
            },
        );
        self.operations.remove(pos);
        Self::emit(
            &mut self.observers,
            &RegistryEvent::AfterRemove {
                name: name.to_string(),
            },
        );
        Ok(())
    }

    /// Moves an operation to `position` in the registration order.
    ///
    /// Negative positions count from the end, `-1` being the last slot.
    /// Out-of-range positions clamp.
    pub fn reorder(&mut self, name: &str, position: isize) -> Result<()> {
        let old = self.position(name)?;
        Self::emit(
            &mut self.observers,
            &RegistryEvent::BeforeReorder {
                name: name.to_string(),
                position: old,
            },
        );

        let operation = self.operations.remove(old);
        let len = self.operations.len() as isize;
        let target = if position < 0 {
            (len + position + 1).max(0)
        } else {
            position.min(len)
        } as usize;
        self.operations.insert(target, operation);

        Self::emit(
            &mut self.observers,
            &RegistryEvent::AfterReorder {
                name: name.to_string(),
                old_position: old,
                new_position: target,
            },
        );
        Ok(())
    }

    /// Enables or disables the operation registered under `name`
    pub fn set_enabled(&mut self, name: &str, enabled: bool) -> Result<()> {
        let pos = self.position(name)?;
        self.operations[pos].spec_mut().enabled = enabled;
        Ok(())
    }

    /// Removes all operations and re-adds the initial ones
    pub fn clear(&mut self) -> Result<()> {
        Self::emit(&mut self.observers, &RegistryEvent::BeforeClear);
        self.operations.clear();
        Self::emit(&mut self.observers, &RegistryEvent::AfterClear);

        for spec in self.initial.clone() {
            self.add(spec)?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for OperationRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperationRegistry")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field(
                "operations",
                &self.operations.iter().map(|op| op.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
