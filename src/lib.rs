//! Cadence - Entity-component-system runtime
//!
//! This crate re-exports all layers of the Cadence system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 2: cadence_engine     - Systems, dirty queues, instances, registry
//! Layer 1: cadence_storage    - Slot storage, entities, components
//! Layer 0: cadence_foundation - Ids, component kinds, errors
//! ```
//!
//! # Example
//!
//! ```
//! use cadence::prelude::*;
//!
//! const HEALTH: ComponentKind = ComponentKind::new(0);
//!
//! let mut registry = EcsRegistry::default();
//! let ecs = registry.create();
//! registry.activate(ecs).unwrap();
//!
//! registry
//!     .register_system(
//!         FnSystem::new("regen", |world, entity, _dt| {
//!             let hp: u32 = world.read_component(entity, HEALTH).unwrap();
//!             world.write_component(entity, HEALTH, &(hp + 1)).unwrap();
//!         }),
//!         &[HEALTH],
//!     )
//!     .unwrap();
//!
//! let hero = registry
//!     .create_entity([Component::from_value(HEALTH, true, &10u32)])
//!     .unwrap();
//!
//! registry.update(0.016).unwrap(); // hero is matched
//! registry.update(0.016).unwrap(); // regen runs once
//!
//! let hp: u32 = registry.active().unwrap().world().read_component(hero, HEALTH).unwrap();
//! assert_eq!(hp, 11);
//! ```

pub use cadence_engine as engine;
pub use cadence_foundation as foundation;
pub use cadence_storage as storage;

/// Commonly used types from every layer.
pub mod prelude {
    pub use cadence_engine::{EcsConfig, EcsInstance, EcsRegistry, FnSystem, System, World};
    pub use cadence_foundation::{ComponentKind, EcsId, EntityId, Error, ErrorKind, Result, SystemId};
    pub use cadence_storage::{Component, Entity};
}
