//! Integration tests for error reporting

use cadence_foundation::{ComponentKind, EcsId, EntityId, Error, ErrorContext, ErrorKind, SystemId};

// =============================================================================
// Messages
// =============================================================================

#[test]
fn messages_name_the_target() {
    let err = Error::component_not_attached(EntityId::new(7), ComponentKind::new(2));
    let message = err.to_string();
    assert!(message.contains("kind#2"), "{message}");
    assert!(message.contains('7'), "{message}");

    let err = Error::system_not_found(SystemId::new(11));
    assert!(err.to_string().contains("11"));
}

#[test]
fn systems_locked_reports_live_entities() {
    let err = Error::systems_locked(3);
    assert!(matches!(err.kind, ErrorKind::SystemsLocked { entities: 3 }));
    assert!(err.to_string().contains("3 live"));
}

#[test]
fn size_mismatch_reports_both_sizes() {
    let err = Error::size_mismatch(8, 4);
    assert_eq!(err.to_string(), "component size mismatch: expected 8 bytes, got 4");
}

// =============================================================================
// Context
// =============================================================================

#[test]
fn during_keeps_existing_context() {
    let err = Error::entity_not_found(EntityId::new(1))
        .with_context(ErrorContext::new().with_instance(EcsId::new(0)))
        .during("destroy_entity");

    let context = err.context.unwrap();
    assert_eq!(context.operation, Some("destroy_entity"));
    assert_eq!(context.instance, Some(EcsId::new(0)));
}

#[test]
fn context_display() {
    let context = ErrorContext::new()
        .with_operation("modify_component_status")
        .with_instance(EcsId::new(1))
        .with_entity(EntityId::new(9));
    assert_eq!(context.to_string(), "in modify_component_status on Ecs(1) for Entity(9)");
}

#[test]
fn errors_are_std_errors() {
    fn assert_error<E: std::error::Error + Send + Sync + 'static>() {}
    assert_error::<Error>();
    assert!(matches!(Error::no_active_instance().kind, ErrorKind::NoActiveInstance));
}
