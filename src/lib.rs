//! Tessera - In-process entity-component store
//!
//! This crate re-exports all layers of the Tessera system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 3: tessera_middleware  - Undo/redo history, signature observers
//! Layer 2: tessera_engine      - Service queries, middleware chain, controller
//! Layer 1: tessera_storage     - Keyed component store, signatures
//! Layer 0: tessera_foundation  - Core types (EntityId, Schema, Error)
//! ```

pub use tessera_engine as engine;
pub use tessera_foundation as foundation;
pub use tessera_middleware as middleware;
pub use tessera_storage as storage;
