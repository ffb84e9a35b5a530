//! The write-interception contract.
//!
//! Every mutation routed through a [`Service`](crate::Service) is offered
//! to each registered middleware, in registration order, before it lands
//! in the store. `commit` and `revert` close the transaction on the
//! middleware side only; store writes are never staged.

use tessera_foundation::{EntityId, Schema};
use tessera_storage::Store;

/// Hooks invoked around every mutation and at the end of a transaction.
///
/// The `store` passed to the write hooks still holds the value from
/// before the write.
pub trait Middleware<S: Schema> {
    /// Called before `value` is written to `entity`.
    fn set_value(&mut self, store: &Store<S>, entity: &EntityId, value: &S);

    /// Called before the `key` component is deleted from `entity`.
    fn delete_value(&mut self, store: &Store<S>, entity: &EntityId, key: S::Key);

    /// Finalizes the bookkeeping of the current transaction.
    fn commit(&mut self);

    /// Discards the bookkeeping of the current transaction.
    fn revert(&mut self);

    /// Short name used in log fields.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
