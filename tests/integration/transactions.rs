//! Transaction boundary tests across middlewares

use tessera::engine::{Patch, TransactionError};

use crate::{Harness, Health, Position, e};

#[test]
fn revert_leaves_store_mutated() {
    let mut harness = Harness::new();
    let before = harness.history.history_length();

    let result = harness.controller.handle(|service| {
        service.patch_entity(&e("e1"), Patch::new().set(Position { x: 4, y: 2 }));
        Err::<(), _>("threw")
    });

    assert!(matches!(result, Err(TransactionError::Failed("threw"))));
    assert_eq!(
        harness.controller.service().component::<Position>(&e("e1")),
        Some(&Position { x: 4, y: 2 })
    );
    assert_eq!(harness.history.history_length(), before);
    assert!(!harness.history.is_staged());
    assert!(!harness.observer.is_pending());
}

#[test]
fn panicking_system_is_reverted_like_a_failure() {
    let mut harness = Harness::new();

    let result = harness.controller.run(|service| {
        service.patch_entity(&e("e1"), Patch::new().set(Health(7)));
        service
            .component::<Position>(&e("e1"))
            .map(|position| position.x)
            .expect("position missing")
    });

    assert!(result.unwrap_err().is_panicked());
    assert_eq!(harness.health("e1"), Some(7));
    assert_eq!(harness.history.history_length(), 0);
}

#[test]
fn reverted_writes_are_invisible_to_undo() {
    let mut harness = Harness::new();
    harness
        .controller
        .run(|service| service.patch_entity(&e("e1"), Patch::new().set(Health(10))))
        .unwrap();

    let _ = harness.controller.handle(|service| {
        service.patch_entity(&e("e1"), Patch::new().set(Health(3)));
        Err::<(), _>("interrupted")
    });
    assert_eq!(harness.health("e1"), Some(3));

    assert!(harness.undo());
    assert_eq!(harness.health("e1"), None);
}

#[test]
fn read_only_system_commits_nothing() {
    let mut harness = Harness::new();
    harness
        .controller
        .run(|service| service.patch_entity(&e("e1"), Patch::new().set(Health(1))))
        .unwrap();

    let total = harness
        .controller
        .run(|service| service.entities(&[crate::GameKey::Health]).count())
        .unwrap();

    assert_eq!(total, 1);
    assert_eq!(harness.history.history_length(), 1);
}
