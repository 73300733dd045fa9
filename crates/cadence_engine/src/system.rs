//! The system lifecycle contract.
//!
//! A system declares a set of required component kinds at registration. The
//! instance keeps a cache of the entities that currently match and calls the
//! hooks below as entities enter and leave that cache:
//!
//! ```text
//!              create / first match
//!   (unknown) ---------------------> initial ──┐
//!                                              v
//!                        ┌──────────── matched ◄────────┐
//!        stops matching  │  update (every frame)        │ matches again
//!                        v                              │
//!                     suspend ─────► suspended ───► resume
//!
//!   matched + destroyed ─► shutdown
//! ```
//!
//! Every hook receives the instance's [`World`]. Structural requests made
//! from a hook are queued and applied at the end of the frame, or at the end
//! of the next frame when issued while the queues are being drained.

use cadence_foundation::EntityId;

use crate::world::World;

/// A processing unit driven over the entities matching its requirements.
///
/// All hooks default to no-ops.
pub trait System {
    /// Called once, the first time an entity matches this system.
    fn initial(&mut self, _world: &mut World, _entity: EntityId) {}

    /// Called every frame for each matched entity.
    fn update(&mut self, _world: &mut World, _entity: EntityId, _delta_time: f32) {}

    /// Called when a matched entity stops matching (it or a required
    /// component was deactivated).
    fn suspend(&mut self, _world: &mut World, _entity: EntityId) {}

    /// Called when a previously suspended entity matches again.
    fn resume(&mut self, _world: &mut World, _entity: EntityId) {}

    /// Called when a matched entity is destroyed.
    fn shutdown(&mut self, _world: &mut World, _entity: EntityId) {}

    /// Name used in diagnostics.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// A [`System`] backed by an update closure.
///
/// For systems that only need the per-frame hook.
pub struct FnSystem<F>
where
    F: FnMut(&mut World, EntityId, f32) + 'static,
{
    name: &'static str,
    f: F,
}

impl<F> FnSystem<F>
where
    F: FnMut(&mut World, EntityId, f32) + 'static,
{
    /// Creates a function-backed system.
    pub fn new(name: &'static str, f: F) -> Self {
        Self { name, f }
    }
}

impl<F> System for FnSystem<F>
where
    F: FnMut(&mut World, EntityId, f32) + 'static,
{
    fn update(&mut self, world: &mut World, entity: EntityId, delta_time: f32) {
        (self.f)(world, entity, delta_time);
    }

    fn name(&self) -> &str {
        self.name
    }
}

/// Lifecycle hook selector used by the update loop.
#[derive(Copy, Clone, Debug)]
pub(crate) enum Hook {
    Initial,
    Update(f32),
    Suspend,
    Resume,
    Shutdown,
}

impl Hook {
    fn label(self) -> &'static str {
        match self {
            Self::Initial => "initial",
            Self::Update(_) => "update",
            Self::Suspend => "suspend",
            Self::Resume => "resume",
            Self::Shutdown => "shutdown",
        }
    }

    /// Invokes this hook on `system`.
    pub(crate) fn invoke(self, system: &mut dyn System, world: &mut World, entity: EntityId, trace: bool) {
        if trace {
            tracing::trace!(
                ecs = %world.id(),
                system = system.name(),
                hook = self.label(),
                %entity,
                "lifecycle hook"
            );
        }

        match self {
            Self::Initial => system.initial(world, entity),
            Self::Update(delta_time) => system.update(world, entity, delta_time),
            Self::Suspend => system.suspend(world, entity),
            Self::Resume => system.resume(world, entity),
            Self::Shutdown => system.shutdown(world, entity),
        }
    }
}
