//! Entities and their attached components.
//!
//! An entity owns a fixed set of components chosen at creation. Components
//! cannot be attached or detached afterwards, only activated or deactivated.
//! A per-kind index table gives O(1) lookup on the matching fast path.

// Component positions are bounded by MAX_COMPONENT_KINDS and fit in u8.
#![allow(clippy::cast_possible_truncation)]

use cadence_foundation::{ComponentKind, EntityId, Error, MAX_COMPONENT_KINDS, Result};

use crate::component::Component;

/// An identity owning zero or more components.
#[derive(Clone, Debug)]
pub struct Entity {
    /// Id issued by the owning storage.
    id: EntityId,
    /// Inactive entities match no system.
    is_active: bool,
    /// Owned components, in the order supplied at creation.
    components: Vec<Component>,
    /// Kind -> position in `components`, `None` when absent.
    index_by_kind: [Option<u8>; MAX_COMPONENT_KINDS],
}

impl Entity {
    /// Creates an active entity owning `components`.
    ///
    /// # Errors
    ///
    /// Returns `ComponentKindOutOfRange` for a kind outside the kind space and
    /// `DuplicateComponent` if two components share a kind.
    pub fn new(id: EntityId, components: Vec<Component>) -> Result<Self> {
        let mut index_by_kind = [None; MAX_COMPONENT_KINDS];

        for (position, component) in components.iter().enumerate() {
            let kind = component.kind().validate()?;
            let slot = &mut index_by_kind[kind.slot()];
            if slot.is_some() {
                return Err(Error::duplicate_component(kind));
            }
            *slot = Some(position as u8);
        }

        Ok(Self {
            id,
            is_active: true,
            components,
            index_by_kind,
        })
    }

    /// Returns the entity id.
    #[must_use]
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Returns whether the entity takes part in system matching.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Sets the active flag, returning the previous value.
    pub fn set_active(&mut self, is_active: bool) -> bool {
        std::mem::replace(&mut self.is_active, is_active)
    }

    fn position(&self, kind: ComponentKind) -> Option<usize> {
        self.index_by_kind
            .get(kind.slot())
            .copied()
            .flatten()
            .map(usize::from)
    }

    /// Returns the component of `kind`, if attached.
    #[must_use]
    pub fn component(&self, kind: ComponentKind) -> Option<&Component> {
        self.position(kind).map(|position| &self.components[position])
    }

    /// Returns the component of `kind` mutably, if attached.
    #[must_use]
    pub fn component_mut(&mut self, kind: ComponentKind) -> Option<&mut Component> {
        self.position(kind)
            .map(|position| &mut self.components[position])
    }

    /// Checks whether a component of `kind` is attached.
    #[must_use]
    pub fn has_component(&self, kind: ComponentKind) -> bool {
        self.position(kind).is_some()
    }

    /// Checks whether a component of `kind` is attached and active.
    #[must_use]
    pub fn has_active_component(&self, kind: ComponentKind) -> bool {
        self.component(kind).is_some_and(Component::is_active)
    }

    /// Checks the matching predicate against a requirement list.
    ///
    /// True when the entity is active and carries every required kind with
    /// its component active.
    #[must_use]
    pub fn satisfies(&self, required: &[ComponentKind]) -> bool {
        self.is_active && required.iter().all(|&kind| self.has_active_component(kind))
    }

    /// Returns the attached components in creation order.
    #[must_use]
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Returns the number of attached components.
    #[must_use]
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Iterates over the attached kinds in creation order.
    pub fn kinds(&self) -> impl Iterator<Item = ComponentKind> + '_ {
        self.components.iter().map(Component::kind)
    }
}
