//! Error types for the Cadence ECS.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.

use std::fmt;

use thiserror::Error;

use crate::id::{EcsId, EntityId, SlotId, SystemId};
use crate::kind::{ComponentKind, MAX_COMPONENT_KINDS};

/// Result alias used throughout Cadence.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for Cadence operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Names the operation that failed, keeping any existing context.
    #[must_use]
    pub fn during(mut self, operation: &'static str) -> Self {
        let context = self.context.take().unwrap_or_default();
        self.context = Some(context.with_operation(operation));
        self
    }

    /// Creates an entity not found error.
    #[must_use]
    pub fn entity_not_found(id: EntityId) -> Self {
        Self::new(ErrorKind::EntityNotFound(id))
    }

    /// Creates a system not found error.
    #[must_use]
    pub fn system_not_found(id: SystemId) -> Self {
        Self::new(ErrorKind::SystemNotFound(id))
    }

    /// Creates an instance not found error.
    #[must_use]
    pub fn instance_not_found(id: EcsId) -> Self {
        Self::new(ErrorKind::InstanceNotFound(id))
    }

    /// Creates a no active instance error.
    #[must_use]
    pub fn no_active_instance() -> Self {
        Self::new(ErrorKind::NoActiveInstance)
    }

    /// Creates a component kind out of range error.
    #[must_use]
    pub fn kind_out_of_range(raw: u32) -> Self {
        Self::new(ErrorKind::ComponentKindOutOfRange(raw))
    }

    /// Creates a component not attached error.
    #[must_use]
    pub fn component_not_attached(entity: EntityId, kind: ComponentKind) -> Self {
        Self::new(ErrorKind::ComponentNotAttached { entity, kind })
    }

    /// Creates a duplicate component error.
    #[must_use]
    pub fn duplicate_component(kind: ComponentKind) -> Self {
        Self::new(ErrorKind::DuplicateComponent(kind))
    }

    /// Creates a component size mismatch error.
    #[must_use]
    pub fn size_mismatch(expected: usize, actual: usize) -> Self {
        Self::new(ErrorKind::ComponentSizeMismatch { expected, actual })
    }

    /// Creates a systems locked error.
    #[must_use]
    pub fn systems_locked(entities: usize) -> Self {
        Self::new(ErrorKind::SystemsLocked { entities })
    }

    /// Creates a vacant slot error.
    #[must_use]
    pub fn slot_vacant(id: SlotId) -> Self {
        Self::new(ErrorKind::SlotVacant(id))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// Entity was not found in the instance.
    #[error("entity not found: {0:?}")]
    EntityNotFound(EntityId),

    /// System was not registered with the instance.
    #[error("system not found: {0:?}")]
    SystemNotFound(SystemId),

    /// ECS instance was not found in the registry.
    #[error("ECS instance not found: {0:?}")]
    InstanceNotFound(EcsId),

    /// An instance-scoped call was made with no instance activated.
    #[error("no active ECS instance")]
    NoActiveInstance,

    /// Component kind outside the kind space.
    #[error("component kind {0} out of range (max {max})", max = MAX_COMPONENT_KINDS)]
    ComponentKindOutOfRange(u32),

    /// Component kind is not attached to the entity.
    #[error("component {kind} not attached to {entity:?}")]
    ComponentNotAttached {
        /// The entity that was queried.
        entity: EntityId,
        /// The kind that was not found.
        kind: ComponentKind,
    },

    /// The same kind was supplied twice for one entity.
    #[error("duplicate component {0} on entity")]
    DuplicateComponent(ComponentKind),

    /// Typed access with a payload of the wrong size.
    #[error("component size mismatch: expected {expected} bytes, got {actual}")]
    ComponentSizeMismatch {
        /// Size of the stored payload.
        expected: usize,
        /// Size of the requested type.
        actual: usize,
    },

    /// Systems must be registered before any entity exists.
    #[error("cannot register a system after entities exist ({entities} live)")]
    SystemsLocked {
        /// Number of live entities at the time of the call.
        entities: usize,
    },

    /// Slot id is free or was never issued.
    #[error("slot {0} is vacant")]
    SlotVacant(SlotId),
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Name of the operation that failed.
    pub operation: Option<&'static str>,
    /// Instance the operation targeted.
    pub instance: Option<EcsId>,
    /// Entity the operation targeted.
    pub entity: Option<EntityId>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the operation name.
    #[must_use]
    pub fn with_operation(mut self, operation: &'static str) -> Self {
        self.operation = Some(operation);
        self
    }

    /// Sets the targeted instance.
    #[must_use]
    pub fn with_instance(mut self, instance: EcsId) -> Self {
        self.instance = Some(instance);
        self
    }

    /// Sets the targeted entity.
    #[must_use]
    pub fn with_entity(mut self, entity: EntityId) -> Self {
        self.entity = Some(entity);
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(operation) = self.operation {
            write!(f, "in {operation}")?;
        }
        if let Some(instance) = self.instance {
            write!(f, " on {instance}")?;
        }
        if let Some(entity) = self.entity {
            write!(f, " for {entity}")?;
        }
        Ok(())
    }
}
