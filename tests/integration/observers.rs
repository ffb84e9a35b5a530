//! Observer integration tests

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tessera::engine::Patch;
use tessera::foundation::ErrorKind;
use tessera::middleware::Condition;

use crate::{GameKey, Harness, Health, Position, Tag, e};

fn counter() -> (Rc<Cell<usize>>, impl Fn() + 'static) {
    let count = Rc::new(Cell::new(0));
    let handle = Rc::clone(&count);
    (count, move || handle.set(handle.get() + 1))
}

fn apply(harness: &mut Harness, entity: &str, patch: Patch<crate::Game>) {
    harness
        .controller
        .run(|service| service.patch_entity(&e(entity), patch))
        .unwrap();
}

#[test]
fn overlap_and_superset_rule() {
    let mut harness = Harness::new();
    apply(&mut harness, "e1", Patch::new().set(Position { x: 0, y: 0 }).set(Health(1)));

    let (count, callback) = counter();
    harness
        .observer
        .register_observer(callback, Condition::new().entity("e1").signature([GameKey::Position]))
        .unwrap();

    apply(&mut harness, "e1", Patch::new().set(Position { x: 1, y: 0 }));
    assert_eq!(count.get(), 1);

    apply(&mut harness, "e1", Patch::new().set(Health(2)));
    assert_eq!(count.get(), 1);

    apply(&mut harness, "e1", Patch::new().delete(GameKey::Position));
    assert_eq!(count.get(), 2);

    apply(&mut harness, "e1", Patch::new().set(Health(3)));
    assert_eq!(count.get(), 2);
}

#[test]
fn callback_reads_component_being_deleted() {
    let mut harness = Harness::new();
    apply(&mut harness, "e1", Patch::new().set(Tag("doomed")));

    let observer = harness.observer.clone();
    let seen = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&seen);
    harness
        .observer
        .register_observer(
            move || *sink.borrow_mut() = Some(observer.signature(&e("e1"))),
            Condition::new().signature([GameKey::Tag]),
        )
        .unwrap();

    apply(&mut harness, "e1", Patch::new().delete(GameKey::Tag));

    let seen = seen.borrow().clone().unwrap();
    assert!(seen.contains(GameKey::Tag));
    assert!(harness.observer.signature(&e("e1")).is_empty());
}

#[test]
fn undo_notifies_observers() {
    let mut harness = Harness::new();
    let (count, callback) = counter();
    harness
        .observer
        .register_observer(callback, Condition::new().signature([GameKey::Health]))
        .unwrap();

    apply(&mut harness, "e1", Patch::new().set(Health(10)));
    apply(&mut harness, "e1", Patch::new().set(Health(5)));
    assert_eq!(count.get(), 2);

    assert!(harness.undo());
    assert_eq!(count.get(), 3);
}

#[test]
fn failed_transaction_notifies_nobody() {
    let mut harness = Harness::new();
    let (count, callback) = counter();
    harness
        .observer
        .register_observer(callback, Condition::new().entity("e1"))
        .unwrap();

    let result = harness.controller.handle(|service| {
        service.patch_entity(&e("e1"), Patch::new().set(Health(1)));
        Err::<(), _>("interrupted")
    });

    assert!(result.is_err());
    assert_eq!(count.get(), 0);
    assert_eq!(harness.observer.observer_count(), 1);
}

#[test]
fn registration_errors() {
    let harness = Harness::new();

    let err = harness
        .observer
        .register_observer(|| {}, Condition::new())
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::EmptyCondition);

    let id = harness
        .observer
        .register_observer(|| {}, Condition::new().entity("e1"))
        .unwrap();
    harness.observer.unregister_observer(id).unwrap();
    let err = harness.observer.unregister_observer(id).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnknownObserver(_)));
}
