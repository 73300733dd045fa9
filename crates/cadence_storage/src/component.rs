//! Owned, kind-tagged component payloads.
//!
//! A component is an opaque block of bytes. The engine never interprets the
//! payload; systems agree on its layout through the kind id. Plain-old-data
//! payloads can be read and written through the typed `bytemuck` helpers.

use std::fmt;

use bytemuck::Pod;
use cadence_foundation::{ComponentKind, Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An opaque data block tagged with a kind and an active flag.
///
/// Attaching a component to an entity moves an owned copy into the entity;
/// the caller's buffer is never retained.
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Component {
    /// Kind systems match against.
    kind: ComponentKind,
    /// Inactive components do not satisfy system requirements.
    is_active: bool,
    /// Owned payload.
    data: Box<[u8]>,
}

impl Component {
    /// Creates a component holding a copy of `data`.
    #[must_use]
    pub fn new(kind: ComponentKind, is_active: bool, data: &[u8]) -> Self {
        Self {
            kind,
            is_active,
            data: data.into(),
        }
    }

    /// Creates a component with no payload, used as a pure tag.
    #[must_use]
    pub fn tag(kind: ComponentKind, is_active: bool) -> Self {
        Self::new(kind, is_active, &[])
    }

    /// Creates a component holding the bytes of `value`.
    #[must_use]
    pub fn from_value<T: Pod>(kind: ComponentKind, is_active: bool, value: &T) -> Self {
        Self::new(kind, is_active, bytemuck::bytes_of(value))
    }

    /// Returns the component kind.
    #[must_use]
    pub fn kind(&self) -> ComponentKind {
        self.kind
    }

    /// Returns whether the component counts toward system matching.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Sets the active flag, returning the previous value.
    pub fn set_active(&mut self, is_active: bool) -> bool {
        std::mem::replace(&mut self.is_active, is_active)
    }

    /// Returns the payload size in bytes.
    #[must_use]
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Returns the payload.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the payload mutably.
    #[must_use]
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Copies the payload out as a `T`.
    ///
    /// Returns `None` if the payload size differs from `size_of::<T>()`.
    #[must_use]
    pub fn read<T: Pod>(&self) -> Option<T> {
        bytemuck::try_pod_read_unaligned(&self.data).ok()
    }

    /// Overwrites the payload with the bytes of `value`.
    ///
    /// # Errors
    ///
    /// Returns `ComponentSizeMismatch` if `size_of::<T>()` differs from the
    /// stored payload size. Payloads never change size after creation.
    pub fn write<T: Pod>(&mut self, value: &T) -> Result<()> {
        let bytes = bytemuck::bytes_of(value);
        if bytes.len() != self.data.len() {
            return Err(Error::size_mismatch(self.data.len(), bytes.len()));
        }
        self.data.copy_from_slice(bytes);
        Ok(())
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("kind", &self.kind)
            .field("is_active", &self.is_active)
            .field("size", &self.data.len())
            .finish()
    }
}
