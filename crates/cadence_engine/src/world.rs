//! Entity storage and dirty queues of one ECS instance.
//!
//! The `World` is the half of an instance that lifecycle hooks may touch.
//! Reads reflect the state as of the last completed drain. Structural
//! requests validate their targets and enqueue a command; nothing about
//! entity activity or match membership changes until the next
//! [`EcsInstance::update`](crate::EcsInstance::update).
//!
//! Entity creation is the one request with an immediate effect: the entity
//! is allocated (so its id and components can be read back at once) but is
//! not matched against any system until the queue is drained.

use bytemuck::Pod;
use cadence_foundation::{
    ComponentKind, EcsId, EntityId, Error, ErrorContext, Result, SlotId, SystemId,
};
use cadence_storage::{Component, Entity, SlotStorage};
use tracing::debug;

use crate::command::{ComponentCommand, DirtyQueues, EntityCommand, SystemCommand};
use crate::config::EcsConfig;

/// Entity storage plus pending structural commands.
#[derive(Debug)]
pub struct World {
    /// Owning instance.
    id: EcsId,
    /// Live entities, including ones whose creation is still queued.
    entities: SlotStorage<Entity>,
    /// Pending structural commands.
    dirty: DirtyQueues,
    /// Registered systems; ids are issued densely and never freed.
    system_count: SlotId,
}

impl World {
    pub(crate) fn new(id: EcsId, config: &EcsConfig) -> Self {
        Self {
            id,
            entities: SlotStorage::with_reserved(config.entity_capacity),
            dirty: DirtyQueues::new(),
            system_count: 0,
        }
    }

    /// Returns the id of the owning instance.
    #[must_use]
    pub fn id(&self) -> EcsId {
        self.id
    }

    fn context(&self, operation: &'static str, entity: EntityId) -> ErrorContext {
        ErrorContext::new()
            .with_operation(operation)
            .with_instance(self.id)
            .with_entity(entity)
    }

    // =========================================================================
    // Structural requests
    // =========================================================================

    /// Creates an entity owning `components`.
    ///
    /// The entity exists immediately but matches no system until the next
    /// update drains its creation.
    ///
    /// # Errors
    ///
    /// Returns `ComponentKindOutOfRange` or `DuplicateComponent` for an
    /// invalid component set; nothing is allocated in that case.
    pub fn create_entity(&mut self, components: impl IntoIterator<Item = Component>) -> Result<EntityId> {
        let id = EntityId::new(self.entities.next_id());
        let entity = Entity::new(id, components.into_iter().collect())
            .map_err(|err| err.with_context(self.context("create_entity", id)))?;
        let component_count = entity.component_count();

        let issued = self.entities.create(entity);
        debug_assert_eq!(issued, id.index());

        self.dirty.push_entity(EntityCommand::Create(id));
        debug!(ecs = %self.id, entity = %id, components = component_count, "entity created");
        Ok(id)
    }

    /// Requests destruction of an entity.
    ///
    /// # Errors
    ///
    /// Returns `EntityNotFound` if the entity does not exist.
    pub fn destroy_entity(&mut self, entity: EntityId) -> Result<()> {
        self.require_entity(entity, "destroy_entity")?;
        self.dirty.push_entity(EntityCommand::Delete(entity));
        debug!(ecs = %self.id, %entity, "entity destruction requested");
        Ok(())
    }

    /// Requests a change of an entity's active flag.
    ///
    /// # Errors
    ///
    /// Returns `EntityNotFound` if the entity does not exist.
    pub fn modify_entity_status(&mut self, entity: EntityId, active: bool) -> Result<()> {
        self.require_entity(entity, "modify_entity_status")?;
        self.dirty
            .push_entity(EntityCommand::ChangeState { entity, active });
        Ok(())
    }

    /// Requests a change of a component's active flag.
    ///
    /// # Errors
    ///
    /// Returns `ComponentKindOutOfRange`, `EntityNotFound`, or
    /// `ComponentNotAttached`.
    pub fn modify_component_status(
        &mut self,
        entity: EntityId,
        kind: ComponentKind,
        active: bool,
    ) -> Result<()> {
        let kind = kind.validate()?;
        if !self.require_entity(entity, "modify_component_status")?.has_component(kind) {
            return Err(Error::component_not_attached(entity, kind)
                .with_context(self.context("modify_component_status", entity)));
        }
        self.dirty.push_component(ComponentCommand::ChangeState {
            entity,
            kind,
            active,
        });
        Ok(())
    }

    /// Requests a change of a system's active flag.
    ///
    /// # Errors
    ///
    /// Returns `SystemNotFound` if no such system is registered.
    pub fn modify_system_status(&mut self, system: SystemId, active: bool) -> Result<()> {
        if system.index() >= self.system_count {
            return Err(Error::system_not_found(system).during("modify_system_status"));
        }
        self.dirty
            .push_system(SystemCommand::ChangeState { system, active });
        Ok(())
    }

    // =========================================================================
    // Reads
    // =========================================================================

    fn require_entity(&self, entity: EntityId, operation: &'static str) -> Result<&Entity> {
        self.entities.get(entity.index()).ok_or_else(|| {
            Error::entity_not_found(entity).with_context(self.context(operation, entity))
        })
    }

    /// Returns an entity.
    ///
    /// # Errors
    ///
    /// Returns `EntityNotFound` if the entity does not exist.
    pub fn entity(&self, entity: EntityId) -> Result<&Entity> {
        self.require_entity(entity, "entity")
    }

    /// Checks whether an entity exists.
    #[must_use]
    pub fn contains(&self, entity: EntityId) -> bool {
        self.entities.contains(entity.index())
    }

    /// Returns the component of `kind` on an entity, or `None` if not attached.
    ///
    /// # Errors
    ///
    /// Returns `ComponentKindOutOfRange` or `EntityNotFound`.
    pub fn component(&self, entity: EntityId, kind: ComponentKind) -> Result<Option<&Component>> {
        let kind = kind.validate()?;
        Ok(self.require_entity(entity, "component")?.component(kind))
    }

    /// Returns the payload of a component for in-place mutation.
    ///
    /// Activity flags are not reachable this way; use
    /// [`modify_component_status`](Self::modify_component_status).
    ///
    /// # Errors
    ///
    /// Returns `ComponentKindOutOfRange` or `EntityNotFound`.
    pub fn component_data_mut(
        &mut self,
        entity: EntityId,
        kind: ComponentKind,
    ) -> Result<Option<&mut [u8]>> {
        let kind = kind.validate()?;
        let context = self.context("component_data_mut", entity);
        let found = self
            .entities
            .get_mut(entity.index())
            .ok_or_else(|| Error::entity_not_found(entity).with_context(context))?;
        Ok(found.component_mut(kind).map(Component::data_mut))
    }

    /// Copies a plain-old-data component payload out.
    ///
    /// # Errors
    ///
    /// Returns `EntityNotFound`, `ComponentNotAttached`, or
    /// `ComponentSizeMismatch` if `T` does not fit the payload.
    pub fn read_component<T: Pod>(&self, entity: EntityId, kind: ComponentKind) -> Result<T> {
        let component = self
            .component(entity, kind)?
            .ok_or_else(|| Error::component_not_attached(entity, kind))?;
        component
            .read()
            .ok_or_else(|| Error::size_mismatch(component.size(), size_of::<T>()))
    }

    /// Overwrites a plain-old-data component payload.
    ///
    /// # Errors
    ///
    /// Returns `EntityNotFound`, `ComponentNotAttached`, or
    /// `ComponentSizeMismatch` if `T` does not fit the payload.
    pub fn write_component<T: Pod>(&mut self, entity: EntityId, kind: ComponentKind, value: &T) -> Result<()> {
        let kind = kind.validate()?;
        let context = self.context("write_component", entity);
        self.entities
            .get_mut(entity.index())
            .ok_or_else(|| Error::entity_not_found(entity).with_context(context))?
            .component_mut(kind)
            .ok_or_else(|| Error::component_not_attached(entity, kind))?
            .write(value)
    }

    /// Returns the number of live entities.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Iterates over live entity ids in ascending order.
    pub fn entity_ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities.ids().map(EntityId::new)
    }

    /// Returns the commands waiting for the next update.
    #[must_use]
    pub fn pending(&self) -> &DirtyQueues {
        &self.dirty
    }

    // =========================================================================
    // Drain access
    // =========================================================================

    pub(crate) fn register_system(&mut self) -> SlotId {
        let next = self.system_count;
        self.system_count += 1;
        next
    }

    pub(crate) fn take_dirty(&mut self) -> DirtyQueues {
        self.dirty.take()
    }

    pub(crate) fn entity_mut(&mut self, entity: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(entity.index())
    }

    pub(crate) fn free_entity(&mut self, entity: EntityId) -> Result<()> {
        self.entities.free(entity.index())
    }
}
