//! The instance registry.
//!
//! Holds every live [`EcsInstance`] and a selector naming the active one.
//! Entity, component, and system calls made through the registry target the
//! active instance. Switching instances is the caller's business and happens
//! between frames.

use cadence_foundation::{
    ComponentKind, EcsId, EntityId, Error, ErrorContext, Result, SlotId, SystemId,
};
use cadence_storage::{Component, Entity, SlotStorage};
use tracing::{debug, info};

use crate::config::EcsConfig;
use crate::instance::EcsInstance;
use crate::system::System;

/// Owner of all ECS instances.
#[derive(Debug)]
pub struct EcsRegistry {
    instances: SlotStorage<EcsInstance>,
    active: Option<EcsId>,
    config: EcsConfig,
}

impl Default for EcsRegistry {
    fn default() -> Self {
        Self::initialize(EcsConfig::default())
    }
}

impl EcsRegistry {
    /// Creates an empty registry whose instances default to `config`.
    #[must_use]
    pub fn initialize(config: EcsConfig) -> Self {
        info!(?config, "ecs registry initialized");
        let instances = SlotStorage::new().with_deallocator(|id: SlotId, instance: EcsInstance| {
            info!(
                ecs = %EcsId::new(id),
                entities = instance.world().entity_count(),
                systems = instance.system_count(),
                frames = instance.frame(),
                "ecs instance torn down"
            );
        });
        Self {
            instances,
            active: None,
            config,
        }
    }

    /// Destroys every instance and the registry itself.
    pub fn shutdown(self) {
        info!(instances = self.instances.len(), "ecs registry shutting down");
    }

    /// Returns the default instance configuration.
    #[must_use]
    pub fn config(&self) -> &EcsConfig {
        &self.config
    }

    // =========================================================================
    // Instance lifecycle
    // =========================================================================

    /// Creates an instance with the registry's default configuration.
    ///
    /// The new instance is not activated.
    pub fn create(&mut self) -> EcsId {
        self.create_with(self.config.clone())
    }

    /// Creates an instance with its own configuration.
    pub fn create_with(&mut self, config: EcsConfig) -> EcsId {
        let id = self
            .instances
            .create_with(|slot| EcsInstance::new(EcsId::new(slot), config));
        let id = EcsId::new(id);
        info!(ecs = %id, "ecs instance created");
        id
    }

    /// Destroys an instance, clearing the selector if it was active.
    ///
    /// # Errors
    ///
    /// Returns `InstanceNotFound` if `id` is not live.
    pub fn destroy(&mut self, id: EcsId) -> Result<()> {
        if !self.instances.contains(id.index()) {
            return Err(Error::instance_not_found(id).during("destroy"));
        }
        if self.active == Some(id) {
            self.active = None;
            debug!(ecs = %id, "active ecs instance cleared");
        }
        self.instances.free(id.index())
    }

    /// Makes `id` the active instance.
    ///
    /// # Errors
    ///
    /// Returns `InstanceNotFound` if `id` is not live.
    pub fn activate(&mut self, id: EcsId) -> Result<()> {
        if !self.instances.contains(id.index()) {
            return Err(Error::instance_not_found(id).during("activate"));
        }
        self.active = Some(id);
        debug!(ecs = %id, "ecs instance activated");
        Ok(())
    }

    /// Returns the active instance id, if any.
    #[must_use]
    pub fn active_id(&self) -> Option<EcsId> {
        self.active
    }

    /// Returns the number of live instances.
    #[must_use]
    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    /// Returns an instance by id.
    ///
    /// # Errors
    ///
    /// Returns `InstanceNotFound` if `id` is not live.
    pub fn get(&self, id: EcsId) -> Result<&EcsInstance> {
        self.instances
            .get(id.index())
            .ok_or_else(|| Error::instance_not_found(id))
    }

    /// Returns an instance by id, mutably.
    ///
    /// # Errors
    ///
    /// Returns `InstanceNotFound` if `id` is not live.
    pub fn get_mut(&mut self, id: EcsId) -> Result<&mut EcsInstance> {
        self.instances
            .get_mut(id.index())
            .ok_or_else(|| Error::instance_not_found(id))
    }

    /// Returns the active instance.
    ///
    /// # Errors
    ///
    /// Returns `NoActiveInstance` if nothing is active.
    pub fn active(&self) -> Result<&EcsInstance> {
        let id = self.active.ok_or_else(Error::no_active_instance)?;
        self.get(id)
    }

    /// Returns the active instance, mutably.
    ///
    /// # Errors
    ///
    /// Returns `NoActiveInstance` if nothing is active.
    pub fn active_mut(&mut self) -> Result<&mut EcsInstance> {
        let id = self.active.ok_or_else(Error::no_active_instance)?;
        self.get_mut(id)
    }

    fn with_active<T>(
        &mut self,
        operation: &'static str,
        f: impl FnOnce(&mut EcsInstance) -> Result<T>,
    ) -> Result<T> {
        let instance = self.active_mut().map_err(|err| err.during(operation))?;
        let id = instance.id();
        f(instance).map_err(|mut err| {
            let context = err
                .context
                .take()
                .unwrap_or_else(|| ErrorContext::new().with_operation(operation));
            err.with_context(context.with_instance(id))
        })
    }

    // =========================================================================
    // Active instance forwarding
    // =========================================================================

    /// Creates an entity in the active instance.
    ///
    /// # Errors
    ///
    /// `NoActiveInstance`, or any error of [`EcsInstance::create_entity`].
    pub fn create_entity(&mut self, components: impl IntoIterator<Item = Component>) -> Result<EntityId> {
        self.with_active("create_entity", |ecs| ecs.create_entity(components))
    }

    /// Queues destruction of an entity in the active instance.
    ///
    /// # Errors
    ///
    /// `NoActiveInstance` or `EntityNotFound`.
    pub fn destroy_entity(&mut self, entity: EntityId) -> Result<()> {
        self.with_active("destroy_entity", |ecs| ecs.destroy_entity(entity))
    }

    /// Queues an entity activity change in the active instance.
    ///
    /// # Errors
    ///
    /// `NoActiveInstance` or `EntityNotFound`.
    pub fn modify_entity_status(&mut self, entity: EntityId, active: bool) -> Result<()> {
        self.with_active("modify_entity_status", |ecs| ecs.modify_entity_status(entity, active))
    }

    /// Queues a component activity change in the active instance.
    ///
    /// # Errors
    ///
    /// `NoActiveInstance`, `EntityNotFound`, `ComponentKindOutOfRange`, or
    /// `ComponentNotAttached`.
    pub fn modify_component_status(&mut self, entity: EntityId, kind: ComponentKind, active: bool) -> Result<()> {
        self.with_active("modify_component_status", |ecs| {
            ecs.modify_component_status(entity, kind, active)
        })
    }

    /// Queues a system activity change in the active instance.
    ///
    /// # Errors
    ///
    /// `NoActiveInstance` or `SystemNotFound`.
    pub fn modify_system_status(&mut self, system: SystemId, active: bool) -> Result<()> {
        self.with_active("modify_system_status", |ecs| ecs.modify_system_status(system, active))
    }

    /// Returns an entity of the active instance.
    ///
    /// # Errors
    ///
    /// `NoActiveInstance` or `EntityNotFound`.
    pub fn get_entity(&self, entity: EntityId) -> Result<&Entity> {
        self.active()?.entity(entity)
    }

    /// Returns a component of an entity in the active instance.
    ///
    /// # Errors
    ///
    /// `NoActiveInstance`, `EntityNotFound`, or `ComponentKindOutOfRange`.
    pub fn get_component(&self, entity: EntityId, kind: ComponentKind) -> Result<Option<&Component>> {
        self.active()?.component(entity, kind)
    }

    /// Registers a system with the active instance.
    ///
    /// # Errors
    ///
    /// `NoActiveInstance`, or any error of [`EcsInstance::register_system`].
    pub fn register_system(&mut self, system: impl System + 'static, required: &[ComponentKind]) -> Result<SystemId> {
        self.with_active("register_system", |ecs| ecs.register_system(system, required))
    }

    /// Advances the active instance by one frame.
    ///
    /// # Errors
    ///
    /// `NoActiveInstance` if nothing is active.
    pub fn update(&mut self, delta_time: f32) -> Result<()> {
        self.active_mut()?.update(delta_time);
        Ok(())
    }
}
