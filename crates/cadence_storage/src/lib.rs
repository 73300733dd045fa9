//! Slot storage, entities, and owned component payloads for Cadence.
//!
//! This crate provides:
//! - [`SlotStorage`] - Id-indexed arena with lowest-id recycling
//! - [`Component`] - Owned, kind-tagged data block with an active flag
//! - [`Entity`] - Identity owning its components with O(1) kind lookup

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod component;
pub mod entity;
pub mod slot;

pub use component::Component;
pub use entity::Entity;
pub use slot::{Deallocator, SlotStorage};
