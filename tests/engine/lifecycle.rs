//! Integration tests for lifecycle hook sequencing

use cadence_engine::{FnSystem, System, World};
use cadence_foundation::{ComponentKind, EntityId};
use cadence_storage::Component;

use crate::support::{A, B, Counting, DT, counts, instance};

// =============================================================================
// Create / Update / Destroy
// =============================================================================

#[test]
fn create_update_destroy_sequence() {
    let mut ecs = instance();
    let system = Counting::default();
    ecs.register_system(system.clone(), &[A]).unwrap();
    assert_eq!(system.counts(), counts(0, 0, 0, 0, 0));

    let entity = ecs
        .create_entity([Component::tag(A, true), Component::tag(B, true)])
        .unwrap();
    assert_eq!(system.counts(), counts(0, 0, 0, 0, 0));
    assert_eq!(ecs.world().entity_count(), 1);

    ecs.update(DT);
    assert_eq!(system.counts(), counts(1, 0, 0, 0, 0));

    ecs.update(DT);
    assert_eq!(system.counts(), counts(1, 1, 0, 0, 0));

    ecs.update(DT);
    assert_eq!(system.counts(), counts(1, 2, 0, 0, 0));

    ecs.destroy_entity(entity).unwrap();
    ecs.update(DT);
    assert_eq!(system.counts(), counts(1, 3, 0, 0, 1));
}

#[test]
fn n_creates_give_n_initials_and_no_updates() {
    let mut ecs = instance();
    let system = Counting::default();
    ecs.register_system(system.clone(), &[A]).unwrap();

    for _ in 0..25 {
        ecs.create_entity([Component::tag(A, true)]).unwrap();
    }
    ecs.update(DT);
    assert_eq!(system.counts(), counts(25, 0, 0, 0, 0));

    ecs.update(DT);
    assert_eq!(system.counts(), counts(25, 25, 0, 0, 0));
}

#[test]
fn disjoint_single_kind_systems_initialize_once_each() {
    let mut ecs = instance();
    let kinds: Vec<ComponentKind> = (0..8).map(ComponentKind::new).collect();
    let systems: Vec<Counting> = kinds
        .iter()
        .map(|&kind| {
            let system = Counting::default();
            ecs.register_system(system.clone(), &[kind]).unwrap();
            system
        })
        .collect();

    for &kind in &kinds {
        ecs.create_entity([Component::tag(kind, true)]).unwrap();
    }
    assert_eq!(ecs.world().entity_count(), kinds.len());

    ecs.update(DT);
    let initials: u32 = systems.iter().map(|system| system.counts().initial).sum();
    let updates: u32 = systems.iter().map(|system| system.counts().update).sum();
    assert_eq!(initials, 8);
    assert_eq!(updates, 0);
    for system in &systems {
        assert_eq!(system.counts(), counts(1, 0, 0, 0, 0));
    }
}

// =============================================================================
// Entity Deactivation
// =============================================================================

#[test]
fn entity_deactivation_sequence() {
    let mut ecs = instance();
    let system = Counting::default();
    ecs.register_system(system.clone(), &[A]).unwrap();
    let entity = ecs.create_entity([Component::from_value(A, true, &5i32)]).unwrap();

    ecs.update(DT);
    assert_eq!(system.counts(), counts(1, 0, 0, 0, 0));
    ecs.update(DT);
    assert_eq!(system.counts(), counts(1, 1, 0, 0, 0));

    ecs.modify_entity_status(entity, true).unwrap();
    ecs.update(DT);
    assert_eq!(system.counts(), counts(1, 2, 0, 0, 0));

    ecs.modify_entity_status(entity, false).unwrap();
    ecs.update(DT);
    assert_eq!(system.counts(), counts(1, 3, 1, 0, 0));

    ecs.update(DT);
    assert_eq!(system.counts(), counts(1, 3, 1, 0, 0));

    ecs.modify_entity_status(entity, true).unwrap();
    ecs.update(DT);
    assert_eq!(system.counts(), counts(1, 3, 1, 1, 0));

    ecs.update(DT);
    assert_eq!(system.counts(), counts(1, 4, 1, 1, 0));
}

#[test]
fn component_deactivation_sequence() {
    let mut ecs = instance();
    let system = Counting::default();
    ecs.register_system(system.clone(), &[A]).unwrap();
    let entity = ecs.create_entity([Component::from_value(A, true, &5i32)]).unwrap();

    ecs.update(DT);
    ecs.update(DT);
    assert_eq!(system.counts(), counts(1, 1, 0, 0, 0));

    ecs.modify_component_status(entity, A, true).unwrap();
    ecs.update(DT);
    assert_eq!(system.counts(), counts(1, 2, 0, 0, 0));

    ecs.modify_component_status(entity, A, false).unwrap();
    ecs.update(DT);
    assert_eq!(system.counts(), counts(1, 3, 1, 0, 0));

    ecs.update(DT);
    assert_eq!(system.counts(), counts(1, 3, 1, 0, 0));

    ecs.modify_component_status(entity, A, true).unwrap();
    ecs.update(DT);
    assert_eq!(system.counts(), counts(1, 3, 1, 1, 0));

    ecs.update(DT);
    assert_eq!(system.counts(), counts(1, 4, 1, 1, 0));
}

#[test]
fn suspend_and_resume_fan_out_to_every_holder() {
    let mut ecs = instance();
    let systems: Vec<Counting> = (0..4).map(|_| Counting::default()).collect();
    for system in &systems {
        ecs.register_system(system.clone(), &[A]).unwrap();
    }
    let bystander = Counting::default();
    ecs.register_system(bystander.clone(), &[B]).unwrap();

    let entity = ecs.create_entity([Component::tag(A, true)]).unwrap();
    ecs.update(DT);

    ecs.modify_entity_status(entity, false).unwrap();
    ecs.update(DT);
    ecs.modify_entity_status(entity, true).unwrap();
    ecs.update(DT);

    for system in &systems {
        assert_eq!(system.counts(), counts(1, 1, 1, 1, 0));
    }
    assert_eq!(bystander.counts(), counts(0, 0, 0, 0, 0));
}

#[test]
fn suspended_entity_is_shut_down_by_nobody() {
    let mut ecs = instance();
    let system = Counting::default();
    ecs.register_system(system.clone(), &[A]).unwrap();
    let entity = ecs.create_entity([Component::tag(A, true)]).unwrap();
    ecs.update(DT);

    ecs.modify_entity_status(entity, false).unwrap();
    ecs.update(DT);
    ecs.destroy_entity(entity).unwrap();
    ecs.update(DT);

    assert_eq!(system.counts(), counts(1, 1, 1, 0, 0));
}

// =============================================================================
// Hooks With World Access
// =============================================================================

#[test]
fn update_hook_mutates_component_data() {
    let mut ecs = instance();
    ecs.register_system(
        FnSystem::new("add_one", |world, entity, _| {
            let value: i32 = world.read_component(entity, A).unwrap();
            world.write_component(entity, A, &(value + 1)).unwrap();
        }),
        &[A],
    )
    .unwrap();
    let entity = ecs.create_entity([Component::from_value(A, true, &5i32)]).unwrap();

    ecs.update(DT);
    assert_eq!(ecs.world().read_component::<i32>(entity, A).unwrap(), 5);
    ecs.update(DT);
    assert_eq!(ecs.world().read_component::<i32>(entity, A).unwrap(), 6);
    ecs.update(DT);
    assert_eq!(ecs.world().read_component::<i32>(entity, A).unwrap(), 7);
}

/// Destroys every entity it initializes.
struct Reaper;

impl System for Reaper {
    fn initial(&mut self, world: &mut World, entity: EntityId) {
        world.destroy_entity(entity).unwrap();
    }
}

#[test]
fn requests_from_drain_hooks_apply_next_frame() {
    let mut ecs = instance();
    ecs.register_system(Reaper, &[A]).unwrap();
    let watcher = Counting::default();
    ecs.register_system(watcher.clone(), &[A]).unwrap();

    let entity = ecs.create_entity([Component::tag(A, true)]).unwrap();
    ecs.update(DT);
    assert!(ecs.entity(entity).is_ok());
    assert_eq!(ecs.world().pending().len(), 1);
    assert_eq!(watcher.counts(), counts(1, 0, 0, 0, 0));

    ecs.update(DT);
    assert!(ecs.entity(entity).is_err());
    assert_eq!(watcher.counts(), counts(1, 1, 0, 0, 1));
    assert!(ecs.world().pending().is_empty());
}
