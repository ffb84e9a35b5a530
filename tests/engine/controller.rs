//! Transaction controller tests

use std::cell::Cell;
use std::rc::Rc;

use tessera::engine::{Controller, ControllerConfig, Middleware, Patch, TransactionError};
use tessera::foundation::EntityId;
use tessera::storage::Store;

use crate::{Health, Position, Sim, SimKey, e};

#[derive(Default)]
struct Tally {
    commits: Cell<usize>,
    reverts: Cell<usize>,
}

struct Outcomes(Rc<Tally>);

impl Middleware<Sim> for Outcomes {
    fn set_value(&mut self, _: &Store<Sim>, _: &EntityId, _: &Sim) {}

    fn delete_value(&mut self, _: &Store<Sim>, _: &EntityId, _: SimKey) {}

    fn commit(&mut self) {
        self.0.commits.set(self.0.commits.get() + 1);
    }

    fn revert(&mut self) {
        self.0.reverts.set(self.0.reverts.get() + 1);
    }
}

fn controller() -> (Controller<Sim>, Rc<Tally>) {
    let tally = Rc::new(Tally::default());
    let mut controller = Controller::new();
    controller.use_middleware(Outcomes(Rc::clone(&tally)));
    (controller, tally)
}

#[derive(Debug, PartialEq)]
enum Blocked {
    Wall,
}

#[test]
fn result_surfaces_system_value() {
    let (mut controller, tally) = controller();

    let moved = controller.handle(|service| {
        service.patch_entity(&e("e1"), Patch::new().set(Position { x: 1, y: 0 }));
        Ok::<_, Blocked>(1)
    });

    assert_eq!(moved.unwrap(), 1);
    assert_eq!(tally.commits.get(), 1);
    assert_eq!(tally.reverts.get(), 0);
}

#[test]
fn failure_reverts_but_keeps_writes() {
    let (mut controller, tally) = controller();

    let result: Result<(), _> = controller.handle(|service| {
        service.patch_entity(&e("e1"), Patch::new().set(Position { x: 9, y: 9 }));
        Err(Blocked::Wall)
    });

    assert!(matches!(result, Err(TransactionError::Failed(Blocked::Wall))));
    assert_eq!(tally.reverts.get(), 1);
    assert_eq!(
        controller.service().component::<Position>(&e("e1")),
        Some(&Position { x: 9, y: 9 })
    );
}

#[test]
fn panic_is_captured_as_error() {
    let (mut controller, tally) = controller();

    let result = controller.run(|service| {
        service.patch_entity(&e("e1"), Patch::new().set(Health(1)));
        service
            .component::<Position>(&e("e1"))
            .map(|position| position.x)
            .expect("no position")
    });

    match result {
        Err(TransactionError::Panicked(message)) => assert_eq!(message, "no position"),
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(tally.reverts.get(), 1);
    assert_eq!(controller.service().component::<Health>(&e("e1")), Some(&Health(1)));
}

#[test]
fn consecutive_transactions_are_independent() {
    let (mut controller, tally) = controller();

    let _ = controller.handle(|_| Err::<(), _>(Blocked::Wall));
    let _ = controller.run(|service| service.patch_entity(&e("e1"), Patch::new().set(Health(2))));
    let _ = controller.handle(|_| Err::<(), _>(Blocked::Wall));

    assert_eq!(tally.commits.get(), 1);
    assert_eq!(tally.reverts.get(), 2);
}

#[test]
fn config_defaults_catch_panics() {
    assert!(ControllerConfig::default().catch_panics);

    let controller =
        Controller::<Sim>::new().with_config(ControllerConfig::new().with_catch_panics(false));
    assert!(!controller.config().catch_panics);
}
