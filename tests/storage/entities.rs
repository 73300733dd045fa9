//! Integration tests for entities
//!
//! Tests component attachment, lookup, activity flags, and the matching predicate.

use cadence_foundation::{ComponentKind, EntityId, ErrorKind};
use cadence_storage::{Component, Entity};

const POSITION: ComponentKind = ComponentKind::new(0);
const VELOCITY: ComponentKind = ComponentKind::new(1);
const SPRITE: ComponentKind = ComponentKind::new(31);

fn mover() -> Entity {
    Entity::new(
        EntityId::new(0),
        vec![
            Component::from_value(POSITION, true, &[0.0f32, 0.0]),
            Component::from_value(VELOCITY, true, &[1.0f32, 0.5]),
        ],
    )
    .unwrap()
}

// =============================================================================
// Construction
// =============================================================================

#[test]
fn entities_start_active() {
    let entity = mover();
    assert!(entity.is_active());
    assert_eq!(entity.component_count(), 2);
    assert_eq!(entity.kinds().collect::<Vec<_>>(), vec![POSITION, VELOCITY]);
}

#[test]
fn entity_without_components() {
    let entity = Entity::new(EntityId::new(5), Vec::new()).unwrap();
    assert_eq!(entity.component_count(), 0);
    assert!(entity.satisfies(&[]));
    assert!(!entity.satisfies(&[POSITION]));
}

#[test]
fn duplicate_kinds_are_rejected() {
    let err = Entity::new(
        EntityId::new(0),
        vec![Component::tag(SPRITE, true), Component::tag(SPRITE, false)],
    )
    .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::DuplicateComponent(kind) if kind == SPRITE));
}

#[test]
fn out_of_range_kinds_are_rejected() {
    let err = Entity::new(EntityId::new(0), vec![Component::tag(ComponentKind::new(32), true)]).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::ComponentKindOutOfRange(32)));
}

// =============================================================================
// Matching Predicate
// =============================================================================

#[test]
fn satisfies_requires_every_kind_active() {
    let mut entity = mover();
    assert!(entity.satisfies(&[POSITION, VELOCITY]));
    assert!(!entity.satisfies(&[POSITION, SPRITE]));

    entity.component_mut(VELOCITY).unwrap().set_active(false);
    assert!(entity.has_component(VELOCITY));
    assert!(!entity.has_active_component(VELOCITY));
    assert!(entity.satisfies(&[POSITION]));
    assert!(!entity.satisfies(&[POSITION, VELOCITY]));
}

#[test]
fn inactive_entity_satisfies_nothing() {
    let mut entity = mover();
    assert!(entity.set_active(false));
    assert!(!entity.satisfies(&[POSITION]));
    assert!(!entity.satisfies(&[]));
}
