//! Integration tests for slot storage
//!
//! Tests id issuance, lowest-id recycling, capacity tracking, and deallocators.

use std::cell::RefCell;
use std::rc::Rc;

use cadence_foundation::{ErrorKind, SlotId};
use cadence_storage::SlotStorage;
use proptest::prelude::*;

// =============================================================================
// Issuance and Reuse
// =============================================================================

#[test]
fn ids_issue_densely() {
    let mut storage = SlotStorage::new();
    let ids: Vec<SlotId> = ["a", "b", "c"].into_iter().map(|v| storage.create(v)).collect();

    assert_eq!(ids, vec![0, 1, 2]);
    assert_eq!(storage.len(), 3);
    assert_eq!(storage.capacity(), 3);
}

#[test]
fn lowest_freed_id_is_reused_first() {
    let mut storage = SlotStorage::new();
    for n in 0..5 {
        storage.create(n);
    }
    storage.free(3).unwrap();
    storage.free(1).unwrap();

    assert_eq!(storage.next_id(), 1);
    assert_eq!(storage.create(10), 1);
    assert_eq!(storage.create(30), 3);
    assert_eq!(storage.create(50), 5);
    assert_eq!(storage.get(3), Some(&30));
}

#[test]
fn capacity_shrinks_past_trailing_frees() {
    let mut storage = SlotStorage::new();
    for n in 0..4 {
        storage.create(n);
    }
    storage.free(1).unwrap();
    assert_eq!(storage.capacity(), 4);

    storage.free(3).unwrap();
    storage.free(2).unwrap();
    assert_eq!(storage.capacity(), 1);
    assert_eq!(storage.ids().collect::<Vec<_>>(), vec![0]);
}

#[test]
fn freeing_twice_is_an_error() {
    let mut storage = SlotStorage::new();
    let id = storage.create(());
    storage.free(id).unwrap();

    let err = storage.free(id).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::SlotVacant(vacant) if vacant == id));
    assert!(storage.free(99).is_err());
}

// =============================================================================
// Deallocator
// =============================================================================

#[test]
fn deallocator_sees_freed_and_dropped_values() {
    let released = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&released);

    let mut storage =
        SlotStorage::<String>::new().with_deallocator(move |id, value| sink.borrow_mut().push((id, value)));
    storage.create("left".to_owned());
    storage.create("right".to_owned());
    storage.free(0).unwrap();
    assert_eq!(*released.borrow(), vec![(0, "left".to_owned())]);

    drop(storage);
    assert_eq!(released.borrow().len(), 2);
    assert_eq!(released.borrow()[1], (1, "right".to_owned()));
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn count_matches_live_ids(ops in prop::collection::vec(any::<Option<u8>>(), 0..64)) {
        let mut storage = SlotStorage::new();
        let mut live: Vec<SlotId> = Vec::new();

        for op in ops {
            match op {
                Some(pick) if !live.is_empty() => {
                    let id = live.remove(usize::from(pick) % live.len());
                    storage.free(id).unwrap();
                }
                _ => live.push(storage.create(())),
            }
        }

        live.sort_unstable();
        prop_assert_eq!(storage.len(), live.len());
        prop_assert_eq!(storage.ids().collect::<Vec<_>>(), live.clone());
        prop_assert_eq!(storage.capacity(), live.last().map_or(0, |id| id + 1));
    }

    #[test]
    fn freed_id_is_reissued(size in 1u32..32, victim in any::<u32>()) {
        let mut storage = SlotStorage::new();
        for n in 0..size {
            storage.create(n);
        }
        let victim = victim % size;
        storage.free(victim).unwrap();
        prop_assert_eq!(storage.create(victim), victim);
        prop_assert_eq!(storage.len() as u32, size);
    }
}
