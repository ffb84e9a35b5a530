//! Built-in middlewares for Tessera.
//!
//! This crate provides:
//! - [`HistoryMiddleware`] - Linear undo/redo over committed transactions
//! - [`ObserverMiddleware`] - Signature-based change notification
//!
//! Both are cheap handles over shared state: register one clone with the
//! controller and keep another to drive undo/redo or manage observers.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod history;
pub mod observer;

pub use history::{ChangeSet, EntitySnapshot, HistoryConfig, HistoryMiddleware, RedoIndexing};
pub use observer::{Condition, ObserverId, ObserverMiddleware};

#[cfg(test)]
mod testing;
