//! Systems, deferred command queues, and the per-frame update loop for Cadence.
//!
//! This crate provides:
//! - [`System`] - Lifecycle hooks implemented by processing units
//! - [`World`] - Entity storage and dirty queues handed to every hook
//! - [`EcsInstance`] - Owns systems and a world, runs [`EcsInstance::update`]
//! - [`EcsRegistry`] - Owns instances and selects the active one
//! - [`EcsConfig`] - Per-instance tuning and diagnostics

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod command;
pub mod config;
pub mod instance;
pub mod registry;
pub mod system;
pub mod world;

pub use command::{ComponentCommand, DirtyQueues, EntityCommand, SystemCommand};
pub use config::EcsConfig;
pub use instance::{EcsInstance, SystemRecord};
pub use registry::EcsRegistry;
pub use system::{FnSystem, System};
pub use world::World;
