//! Queries, mutations and transactions for Tessera.
//!
//! This crate provides:
//! - [`Entity`] - Entity views synthesized from a component signature
//! - [`Patch`] - Partial records of sets and deletes
//! - [`Middleware`] - The write-interception contract
//! - [`Service`] - Queries and middleware-routed mutations over a [`Store`]
//! - [`Controller`] - The transaction boundary around system functions
//!
//! [`Store`]: tessera_storage::Store

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod controller;
pub mod entity;
pub mod error;
pub mod middleware;
pub mod patch;
pub mod service;

pub use controller::{Controller, ControllerConfig};
pub use entity::Entity;
pub use error::TransactionError;
pub use middleware::Middleware;
pub use patch::Patch;
pub use service::Service;

#[cfg(test)]
mod testing;
