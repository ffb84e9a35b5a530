//! Keyed component storage for Tessera.
//!
//! This crate provides:
//! - [`Store`] - The canonical component key -> entity -> value mapping
//! - [`Signature`] - Sorted sets of component keys

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod signature;
pub mod store;

pub use signature::Signature;
pub use store::Store;
