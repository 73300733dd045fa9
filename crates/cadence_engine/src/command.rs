//! Deferred structural mutations.
//!
//! Structural changes never touch storage or match caches directly. They are
//! recorded as commands in one of three FIFO queues and applied by
//! [`EcsInstance::update`](crate::EcsInstance::update) after every system has
//! been dispatched, so the caches being iterated stay untouched for the
//! whole dispatch phase.
//!
//! ## Invariants
//! - Each queue is applied in arrival order.
//! - Queues are drained systems first, then entities, then components.
//! - Target ids are validated when the command is recorded; a target can
//!   still vanish earlier in the same drain (two destroys of one entity).

use std::collections::VecDeque;

use cadence_foundation::{ComponentKind, EntityId, SystemId};

/// A pending change to an entity.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EntityCommand {
    /// Match a freshly created entity against the registered systems.
    Create(EntityId),
    /// Shut the entity down in every system holding it, then free it.
    Delete(EntityId),
    /// Set the entity's active flag.
    ChangeState {
        /// Target entity.
        entity: EntityId,
        /// Requested flag.
        active: bool,
    },
}

impl EntityCommand {
    /// Returns the targeted entity.
    #[must_use]
    pub fn entity(self) -> EntityId {
        match self {
            Self::Create(entity) | Self::Delete(entity) | Self::ChangeState { entity, .. } => entity,
        }
    }
}

/// A pending change to one component of an entity.
///
/// Components cannot be attached or detached after creation, so toggling
/// the active flag is the only operation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ComponentCommand {
    /// Set the component's active flag.
    ChangeState {
        /// Entity owning the component.
        entity: EntityId,
        /// Kind of the component.
        kind: ComponentKind,
        /// Requested flag.
        active: bool,
    },
}

/// A pending change to a registered system.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SystemCommand {
    /// Set the system's active flag.
    ChangeState {
        /// Target system.
        system: SystemId,
        /// Requested flag.
        active: bool,
    },
}

/// The three dirty queues of an instance.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DirtyQueues {
    pub(crate) systems: VecDeque<SystemCommand>,
    pub(crate) entities: VecDeque<EntityCommand>,
    pub(crate) components: VecDeque<ComponentCommand>,
}

impl DirtyQueues {
    /// Creates empty queues.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_system(&mut self, command: SystemCommand) {
        self.systems.push_back(command);
    }

    pub(crate) fn push_entity(&mut self, command: EntityCommand) {
        self.entities.push_back(command);
    }

    pub(crate) fn push_component(&mut self, command: ComponentCommand) {
        self.components.push_back(command);
    }

    /// Moves every pending command out, leaving the queues empty.
    pub(crate) fn take(&mut self) -> Self {
        std::mem::take(self)
    }

    /// Returns pending system commands in arrival order.
    pub fn systems(&self) -> impl Iterator<Item = &SystemCommand> + '_ {
        self.systems.iter()
    }

    /// Returns pending entity commands in arrival order.
    pub fn entities(&self) -> impl Iterator<Item = &EntityCommand> + '_ {
        self.entities.iter()
    }

    /// Returns pending component commands in arrival order.
    pub fn components(&self) -> impl Iterator<Item = &ComponentCommand> + '_ {
        self.components.iter()
    }

    /// Returns the total number of pending commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.systems.len() + self.entities.len() + self.components.len()
    }

    /// Returns true if nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
