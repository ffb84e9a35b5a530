//! Middleware chain tests

use std::cell::RefCell;
use std::rc::Rc;

use tessera::engine::{Middleware, Patch, Service};
use tessera::foundation::{EntityId, Schema};
use tessera::storage::Store;

use crate::{Health, Sim, SimKey, e};

/// Writes every hook as a line, tagged with the middleware name.
struct Journal {
    tag: &'static str,
    lines: Rc<RefCell<Vec<String>>>,
}

impl Middleware<Sim> for Journal {
    fn set_value(&mut self, store: &Store<Sim>, entity: &EntityId, value: &Sim) {
        let existed = store.contains(entity, value.key());
        self.lines
            .borrow_mut()
            .push(format!("{} set {entity} {:?} existed={existed}", self.tag, value.key()));
    }

    fn delete_value(&mut self, store: &Store<Sim>, entity: &EntityId, key: SimKey) {
        let existed = store.contains(entity, key);
        self.lines
            .borrow_mut()
            .push(format!("{} delete {entity} {key:?} existed={existed}", self.tag));
    }

    fn commit(&mut self) {
        self.lines.borrow_mut().push(format!("{} commit", self.tag));
    }

    fn revert(&mut self) {
        self.lines.borrow_mut().push(format!("{} revert", self.tag));
    }

    fn name(&self) -> &'static str {
        self.tag
    }
}

fn journaled() -> (Service<Sim>, Rc<RefCell<Vec<String>>>) {
    let lines = Rc::new(RefCell::new(Vec::new()));
    let mut service = Service::new();
    for tag in ["a", "b"] {
        service.use_middleware(Journal {
            tag,
            lines: Rc::clone(&lines),
        });
    }
    (service, lines)
}

#[test]
fn hooks_see_store_before_write() {
    let (mut service, lines) = journaled();

    service.patch_entity(&e("e1"), Patch::new().set(Health(1)));
    service.patch_entity(&e("e1"), Patch::new().delete(SimKey::Health));

    assert_eq!(
        *lines.borrow(),
        vec![
            "a set e1 Health existed=false",
            "b set e1 Health existed=false",
            "a delete e1 Health existed=true",
            "b delete e1 Health existed=true",
        ]
    );
    assert_eq!(service.middleware_count(), 2);
}

#[test]
fn deleting_absent_component_still_reaches_hooks() {
    let (mut service, lines) = journaled();

    service.patch_entity(&e("e1"), Patch::new().delete(SimKey::Velocity));

    assert_eq!(lines.borrow().len(), 2);
    assert_eq!(lines.borrow()[0], "a delete e1 Velocity existed=false");
}

#[test]
fn default_name_is_type_name() {
    struct Silent;
    impl Middleware<Sim> for Silent {
        fn set_value(&mut self, _: &Store<Sim>, _: &EntityId, _: &Sim) {}
        fn delete_value(&mut self, _: &Store<Sim>, _: &EntityId, _: SimKey) {}
        fn commit(&mut self) {}
        fn revert(&mut self) {}
    }

    assert!(Silent.name().ends_with("Silent"));
}
