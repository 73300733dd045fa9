//! ECS instances and the per-frame update loop.
//!
//! An instance owns a [`World`] and the registered systems. Each system
//! record caches the entities that currently match it; the cache is updated
//! incrementally while the dirty queues drain. The only scan over all
//! entities happens when an inactive system is switched back on.
//!
//! # Frame phases
//!
//! 1. Dispatch: every active system runs `update` over its cache, in
//!    registration order, then cache order.
//! 2. System commands: active flags change. A reactivated system picks up
//!    every entity that started matching while it was off.
//! 3. Entity commands: create, delete, and activity changes, with the
//!    matching `initial` / `shutdown` / `suspend` / `resume` hooks.
//! 4. Component commands: activity changes, reconciled like entity ones.
//!
//! The queues are snapshotted before phase 2. Requests made by hooks while
//! the snapshot drains are applied on the next frame. Ids freed by the drain
//! are retired until it ends: a hook may be handed such an id for a new
//! entity, and the snapshot's remaining commands for the old one are skipped.

use std::collections::HashSet;

use cadence_foundation::{ComponentKind, EcsId, EntityId, Error, Result, SystemId};
use cadence_storage::{Component, Entity, SlotStorage};
use tracing::{debug, trace, warn};

use crate::command::{ComponentCommand, EntityCommand, SystemCommand};
use crate::config::EcsConfig;
use crate::system::{Hook, System};
use crate::world::World;

// =============================================================================
// System Record
// =============================================================================

/// A registered system with its requirements and match cache.
pub struct SystemRecord {
    /// Kinds an entity must carry, all active, to match.
    required: Vec<ComponentKind>,
    /// Inactive systems are not dispatched and gain no new matches.
    is_active: bool,
    /// The user system.
    system: Box<dyn System>,
    /// Entities currently matching, in match order.
    matched: Vec<EntityId>,
    /// Entities that have received `initial` and not yet been destroyed.
    initialized: HashSet<EntityId>,
}

impl SystemRecord {
    fn new(system: Box<dyn System>, required: Vec<ComponentKind>) -> Self {
        Self {
            required,
            is_active: true,
            system,
            matched: Vec::new(),
            initialized: HashSet::new(),
        }
    }

    /// Returns the required component kinds.
    #[must_use]
    pub fn required(&self) -> &[ComponentKind] {
        &self.required
    }

    /// Returns whether the system is dispatched.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Returns the cached matching entities in dispatch order.
    #[must_use]
    pub fn matched(&self) -> &[EntityId] {
        &self.matched
    }

    /// Returns the system's diagnostic name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.system.name()
    }

    /// Evaluates the matching predicate for `entity`.
    #[must_use]
    pub fn accepts(&self, entity: &Entity) -> bool {
        entity.satisfies(&self.required)
    }
}

impl std::fmt::Debug for SystemRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemRecord")
            .field("name", &self.system.name())
            .field("required", &self.required)
            .field("is_active", &self.is_active)
            .field("matched", &self.matched)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// ECS Instance
// =============================================================================

/// One ECS session: a world plus the systems driven over it.
#[derive(Debug)]
pub struct EcsInstance {
    world: World,
    systems: SlotStorage<SystemRecord>,
    config: EcsConfig,
    frame: u64,
    /// Entities freed by the drain in progress.
    retired: HashSet<EntityId>,
}

impl EcsInstance {
    /// Creates an empty instance.
    #[must_use]
    pub fn new(id: EcsId, config: EcsConfig) -> Self {
        Self {
            world: World::new(id, &config),
            systems: SlotStorage::with_reserved(config.system_capacity),
            config,
            frame: 0,
            retired: HashSet::new(),
        }
    }

    /// Returns the instance id.
    #[must_use]
    pub fn id(&self) -> EcsId {
        self.world.id()
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &EcsConfig {
        &self.config
    }

    /// Returns the number of completed updates.
    #[must_use]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Returns the world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Returns the world mutably.
    #[must_use]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    // =========================================================================
    // Systems
    // =========================================================================

    /// Registers a system requiring `required` component kinds.
    ///
    /// Systems are dispatched in registration order.
    ///
    /// # Errors
    ///
    /// Returns `SystemsLocked` once any entity exists, and
    /// `ComponentKindOutOfRange` for an invalid requirement.
    pub fn register_system(&mut self, system: impl System + 'static, required: &[ComponentKind]) -> Result<SystemId> {
        self.register_boxed(Box::new(system), required)
    }

    /// Registers an already boxed system.
    ///
    /// # Errors
    ///
    /// See [`register_system`](Self::register_system).
    pub fn register_boxed(&mut self, system: Box<dyn System>, required: &[ComponentKind]) -> Result<SystemId> {
        let entities = self.world.entity_count();
        if entities > 0 {
            return Err(Error::systems_locked(entities).during("register_system"));
        }
        let required = required
            .iter()
            .map(|kind| kind.validate())
            .collect::<Result<Vec<_>>>()?;

        let name = system.name().to_owned();
        let id = SystemId::new(self.systems.create(SystemRecord::new(system, required)));
        let counted = self.world.register_system();
        debug_assert_eq!(counted, id.index());

        debug!(ecs = %self.id(), system = %id, name = %name, "system registered");
        Ok(id)
    }

    /// Returns a registered system record.
    ///
    /// # Errors
    ///
    /// Returns `SystemNotFound` if no such system is registered.
    pub fn system(&self, system: SystemId) -> Result<&SystemRecord> {
        self.systems
            .get(system.index())
            .ok_or_else(|| Error::system_not_found(system))
    }

    /// Returns the cached matching entities of a system.
    ///
    /// # Errors
    ///
    /// Returns `SystemNotFound` if no such system is registered.
    pub fn matched_entities(&self, system: SystemId) -> Result<&[EntityId]> {
        Ok(self.system(system)?.matched())
    }

    /// Returns whether a system is currently dispatched.
    ///
    /// # Errors
    ///
    /// Returns `SystemNotFound` if no such system is registered.
    pub fn system_is_active(&self, system: SystemId) -> Result<bool> {
        Ok(self.system(system)?.is_active())
    }

    /// Evaluates the matching predicate against current entity state.
    ///
    /// Unlike [`matched_entities`](Self::matched_entities) this ignores the
    /// cache, so it already reflects drained state changes.
    ///
    /// # Errors
    ///
    /// Returns `EntityNotFound` or `SystemNotFound`.
    pub fn is_match(&self, entity: EntityId, system: SystemId) -> Result<bool> {
        let record = self.system(system)?;
        Ok(record.accepts(self.world.entity(entity)?))
    }

    /// Returns the number of registered systems.
    #[must_use]
    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    // =========================================================================
    // World forwarding
    // =========================================================================

    /// See [`World::create_entity`].
    ///
    /// # Errors
    ///
    /// See [`World::create_entity`].
    pub fn create_entity(&mut self, components: impl IntoIterator<Item = Component>) -> Result<EntityId> {
        self.world.create_entity(components)
    }

    /// See [`World::destroy_entity`].
    ///
    /// # Errors
    ///
    /// See [`World::destroy_entity`].
    pub fn destroy_entity(&mut self, entity: EntityId) -> Result<()> {
        self.world.destroy_entity(entity)
    }

    /// See [`World::modify_entity_status`].
    ///
    /// # Errors
    ///
    /// See [`World::modify_entity_status`].
    pub fn modify_entity_status(&mut self, entity: EntityId, active: bool) -> Result<()> {
        self.world.modify_entity_status(entity, active)
    }

    /// See [`World::modify_component_status`].
    ///
    /// # Errors
    ///
    /// See [`World::modify_component_status`].
    pub fn modify_component_status(&mut self, entity: EntityId, kind: ComponentKind, active: bool) -> Result<()> {
        self.world.modify_component_status(entity, kind, active)
    }

    /// See [`World::modify_system_status`].
    ///
    /// # Errors
    ///
    /// See [`World::modify_system_status`].
    pub fn modify_system_status(&mut self, system: SystemId, active: bool) -> Result<()> {
        self.world.modify_system_status(system, active)
    }

    /// See [`World::entity`].
    ///
    /// # Errors
    ///
    /// See [`World::entity`].
    pub fn entity(&self, entity: EntityId) -> Result<&Entity> {
        self.world.entity(entity)
    }

    /// See [`World::component`].
    ///
    /// # Errors
    ///
    /// See [`World::component`].
    pub fn component(&self, entity: EntityId, kind: ComponentKind) -> Result<Option<&Component>> {
        self.world.component(entity, kind)
    }

    // =========================================================================
    // Update
    // =========================================================================

    /// Advances one frame.
    ///
    /// Dispatches every active system over its cache, then applies the
    /// system, entity, and component commands queued before this call.
    pub fn update(&mut self, delta_time: f32) {
        let dispatched = self.dispatch(delta_time);

        let pending = self.world.take_dirty();
        let drained = pending.len();
        self.retired.clear();

        for command in pending.systems {
            self.apply_system(command);
        }
        for command in pending.entities {
            self.apply_entity(command);
        }
        for command in pending.components {
            self.apply_component(command);
        }

        self.frame += 1;
        debug!(
            ecs = %self.id(),
            frame = self.frame,
            dispatched,
            drained,
            deferred = self.world.pending().len(),
            "frame complete"
        );
    }

    fn dispatch(&mut self, delta_time: f32) -> usize {
        let trace_hooks = self.config.trace_hooks;
        let mut calls = 0;

        for (_, record) in self.systems.iter_mut() {
            if !record.is_active {
                continue;
            }
            let SystemRecord { system, matched, .. } = record;
            for &entity in matched.iter() {
                Hook::Update(delta_time).invoke(&mut **system, &mut self.world, entity, trace_hooks);
                calls += 1;
            }
        }

        calls
    }

    fn apply_system(&mut self, command: SystemCommand) {
        let SystemCommand::ChangeState { system, active } = command;
        let Some(record) = self.systems.get_mut(system.index()) else {
            self.stale(&command);
            return;
        };

        let was_active = std::mem::replace(&mut record.is_active, active);
        trace!(ecs = %self.world.id(), %system, active, "system state changed");
        if active && !was_active {
            self.catch_up(system);
        }
    }

    /// Adds every matching entity a reactivated system does not hold yet.
    fn catch_up(&mut self, system: SystemId) {
        let trace_hooks = self.config.trace_hooks;
        let Some(record) = self.systems.get_mut(system.index()) else {
            return;
        };

        let candidates: Vec<EntityId> = self.world.entity_ids().collect();
        let mut added = 0usize;
        for entity in candidates {
            let accepts = self
                .world
                .entity(entity)
                .is_ok_and(|found| record.accepts(found));
            if !accepts || record.matched.contains(&entity) {
                continue;
            }
            record.matched.push(entity);
            let hook = if record.initialized.insert(entity) {
                Hook::Initial
            } else {
                Hook::Resume
            };
            hook.invoke(&mut *record.system, &mut self.world, entity, trace_hooks);
            added += 1;
        }

        debug!(ecs = %self.world.id(), %system, added, "reactivated system caught up");
    }

    fn apply_entity(&mut self, command: EntityCommand) {
        if self.retired.contains(&command.entity()) {
            self.stale(&command);
            return;
        }
        match command {
            EntityCommand::Create(entity) => {
                if self.world.contains(entity) {
                    self.reconcile(entity);
                } else {
                    self.stale(&command);
                }
            }
            EntityCommand::Delete(entity) => {
                if self.world.contains(entity) {
                    self.delete(entity);
                } else {
                    self.stale(&command);
                }
            }
            EntityCommand::ChangeState { entity, active } => {
                let Some(found) = self.world.entity_mut(entity) else {
                    self.stale(&command);
                    return;
                };
                if found.set_active(active) != active {
                    self.reconcile(entity);
                }
            }
        }
    }

    fn apply_component(&mut self, command: ComponentCommand) {
        let ComponentCommand::ChangeState { entity, kind, active } = command;

        let found = if self.retired.contains(&entity) {
            None
        } else {
            self.world.entity_mut(entity)
        };
        let Some(found) = found else {
            trace!(ecs = %self.world.id(), %entity, %kind, "component change skipped, entity destroyed");
            return;
        };
        let Some(component) = found.component_mut(kind) else {
            self.stale(&command);
            return;
        };
        if component.set_active(active) != active {
            self.reconcile(entity);
        }
    }

    /// Brings every cache in line with the matching predicate for `entity`.
    ///
    /// Caches holding an entity that no longer matches suspend it. Active
    /// systems that now match it but do not hold it either initialize it (first
    /// match) or resume it.
    fn reconcile(&mut self, entity: EntityId) {
        let trace_hooks = self.config.trace_hooks;

        for (_, record) in self.systems.iter_mut() {
            let accepts = self
                .world
                .entity(entity)
                .is_ok_and(|found| record.accepts(found));
            let position = record.matched.iter().position(|&held| held == entity);

            match (position, accepts) {
                (Some(position), false) => {
                    record.matched.remove(position);
                    Hook::Suspend.invoke(&mut *record.system, &mut self.world, entity, trace_hooks);
                }
                (None, true) if record.is_active => {
                    record.matched.push(entity);
                    let hook = if record.initialized.insert(entity) {
                        Hook::Initial
                    } else {
                        Hook::Resume
                    };
                    hook.invoke(&mut *record.system, &mut self.world, entity, trace_hooks);
                }
                _ => {}
            }
        }
    }

    /// Shuts `entity` down in every cache holding it, then frees it.
    fn delete(&mut self, entity: EntityId) {
        let trace_hooks = self.config.trace_hooks;

        for (_, record) in self.systems.iter_mut() {
            record.initialized.remove(&entity);
            if let Some(position) = record.matched.iter().position(|&held| held == entity) {
                record.matched.remove(position);
                Hook::Shutdown.invoke(&mut *record.system, &mut self.world, entity, trace_hooks);
            }
        }

        if let Err(err) = self.world.free_entity(entity) {
            warn!(ecs = %self.world.id(), %entity, error = %err, "failed to free entity");
        } else {
            self.retired.insert(entity);
            debug!(ecs = %self.world.id(), %entity, "entity destroyed");
        }
    }

    fn stale(&self, command: &dyn std::fmt::Debug) {
        assert!(
            !self.config.strict_commands,
            "stale command in {}: {command:?}",
            self.world.id()
        );
        warn!(ecs = %self.world.id(), ?command, "skipping command with vanished target");
    }
}
