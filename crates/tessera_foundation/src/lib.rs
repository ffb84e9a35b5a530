//! Core types for Tessera.
//!
//! This crate provides:
//! - [`EntityId`] - Opaque, cheaply cloned entity identifiers
//! - [`Schema`], [`ComponentKey`], [`Component`] - The host's component schema
//! - [`component_schema!`] - Declares a schema and its key registry
//! - [`Error`] - Rich error types with context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod entity;
pub mod error;
pub mod schema;

pub use entity::EntityId;
pub use error::{Error, ErrorContext, ErrorKind, Result};
pub use schema::{Component, ComponentKey, Schema};
