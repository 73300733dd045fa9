//! Component kind ids.
//!
//! The kind space is small and fixed. Callers agree on kind assignment out of
//! band; nothing validates that two modules do not reuse the same kind.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Number of distinct component kinds an entity can carry.
pub const MAX_COMPONENT_KINDS: usize = 32;

/// Tags a component with the kind systems match against.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ComponentKind(u32);

impl ComponentKind {
    /// Creates a kind without range checking.
    ///
    /// Intended for `const` kind tables. APIs that accept a kind validate it
    /// with [`ComponentKind::validate`] before indexing.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Creates a kind, rejecting values outside the kind space.
    ///
    /// # Errors
    ///
    /// Returns `ComponentKindOutOfRange` if `raw >= MAX_COMPONENT_KINDS`.
    pub fn checked(raw: u32) -> Result<Self> {
        Self(raw).validate()
    }

    /// Returns this kind if it lies inside the kind space.
    ///
    /// # Errors
    ///
    /// Returns `ComponentKindOutOfRange` otherwise.
    pub fn validate(self) -> Result<Self> {
        if (self.0 as usize) < MAX_COMPONENT_KINDS {
            Ok(self)
        } else {
            Err(Error::kind_out_of_range(self.0))
        }
    }

    /// Returns the raw kind value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Returns the kind as a table index.
    #[must_use]
    pub const fn slot(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComponentKind({})", self.0)
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "kind#{}", self.0)
    }
}
