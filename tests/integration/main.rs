//! Cross-layer integration tests for Tessera
//!
//! Tests that verify correct interaction between the controller and the
//! built-in middlewares.

mod observers;
mod transactions;

use tessera::engine::Controller;
use tessera::foundation::{EntityId, component_schema};
use tessera::middleware::{HistoryMiddleware, ObserverMiddleware};

#[derive(Clone, Debug, PartialEq)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Health(pub i64);

#[derive(Clone, Debug, PartialEq)]
pub struct Tag(pub &'static str);

component_schema! {
    /// Schema shared by the integration tests.
    pub enum Game: GameKey {
        /// Grid position.
        Position(Position),
        /// Hit points.
        Health(Health),
        /// Free-form label.
        Tag(Tag),
    }
}

pub fn e(name: &str) -> EntityId {
    EntityId::from(name)
}

/// A controller with history and observer middlewares, in that order.
pub struct Harness {
    pub controller: Controller<Game>,
    pub history: HistoryMiddleware<Game>,
    pub observer: ObserverMiddleware<Game>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_history(HistoryMiddleware::new())
    }

    pub fn with_history(history: HistoryMiddleware<Game>) -> Self {
        let observer = ObserverMiddleware::new();
        let mut controller = Controller::new();
        controller.use_middleware(history.clone());
        controller.use_middleware(observer.clone());
        Self {
            controller,
            history,
            observer,
        }
    }

    pub fn health(&self, entity: &str) -> Option<i64> {
        self.controller
            .service()
            .component::<Health>(&e(entity))
            .map(|health| health.0)
    }

    pub fn undo(&mut self) -> bool {
        let history = self.history.clone();
        self.controller
            .run(|service| history.undo(service))
            .unwrap_or(false)
    }

    pub fn redo(&mut self) -> bool {
        let history = self.history.clone();
        self.controller
            .run(|service| history.redo(service))
            .unwrap_or(false)
    }
}
