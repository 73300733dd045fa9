//! Identifiers backed by slot indices.
//!
//! Every id in Cadence is an index into a slot storage. Ids are plain
//! integers: a freed id can be issued again by the owning storage, so holding
//! an id across a destroy is the caller's responsibility.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Raw index issued by a slot storage.
pub type SlotId = u32;

/// Sentinel for "no slot".
pub const INVALID_ID: SlotId = SlotId::MAX;

macro_rules! slot_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
        #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
        pub struct $name(SlotId);

        impl $name {
            /// The invalid sentinel.
            pub const INVALID: Self = Self(INVALID_ID);

            /// Wraps a raw slot index.
            #[must_use]
            pub const fn new(index: SlotId) -> Self {
                Self(index)
            }

            /// Returns the raw slot index.
            #[must_use]
            pub const fn index(self) -> SlotId {
                self.0
            }

            /// Returns true if this is the invalid sentinel.
            #[must_use]
            pub const fn is_invalid(self) -> bool {
                self.0 == INVALID_ID
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl From<SlotId> for $name {
            fn from(index: SlotId) -> Self {
                Self(index)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_invalid() {
                    write!(f, concat!(stringify!($name), "(invalid)"))
                } else {
                    write!(f, concat!(stringify!($name), "({})"), self.0)
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_invalid() {
                    write!(f, concat!($label, "(invalid)"))
                } else {
                    write!(f, concat!($label, "({})"), self.0)
                }
            }
        }
    };
}

slot_id!(
    /// Identifies an entity within one ECS instance.
    EntityId,
    "Entity"
);

slot_id!(
    /// Identifies a registered system within one ECS instance.
    ///
    /// Systems are never freed, so ids also encode registration order.
    SystemId,
    "System"
);

slot_id!(
    /// Identifies an ECS instance within a registry.
    EcsId,
    "Ecs"
);
