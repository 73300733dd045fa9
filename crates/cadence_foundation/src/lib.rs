//! Core identifiers, component kinds, and error types for Cadence.
//!
//! This crate provides:
//! - [`EntityId`], [`SystemId`], [`EcsId`] - Slot-backed identifiers
//! - [`ComponentKind`] - Bounded component kind ids
//! - [`Error`] - Rich error types with context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod id;
pub mod kind;

pub use error::{Error, ErrorContext, ErrorKind, Result};
pub use id::{EcsId, EntityId, INVALID_ID, SlotId, SystemId};
pub use kind::{ComponentKind, MAX_COMPONENT_KINDS};
