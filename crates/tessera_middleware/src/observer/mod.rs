//! Signature-based change notification.
//!
//! The observer tracks the committed signature of every entity it has seen
//! written, plus a [`Diff`] per entity for the in-flight transaction. On
//! commit it runs three phases:
//!
//! 1. Merge each diff's added keys into the entity's signature.
//! 2. Fire every observer whose condition matches, in registration order.
//! 3. Remove each diff's deleted keys from the signature and clear the diffs.
//!
//! Deletes land after notification, so a callback still sees components
//! that the transaction is about to remove from the signature.

mod diff;

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::rc::Rc;

use tessera_engine::Middleware;
use tessera_foundation::{EntityId, Error, ErrorContext, Result, Schema};
use tessera_storage::{Signature, Store};
use tracing::{debug, trace};

use self::diff::Diff;

/// Handle returned by [`ObserverMiddleware::register_observer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObserverId(u64);

impl ObserverId {
    /// Returns the raw id.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ObserverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// =============================================================================
// Condition
// =============================================================================

/// What an observer watches.
///
/// - Entity only: fires whenever that entity changes.
/// - Signature only: fires at most once per commit, when any changed
///   entity touched a watched key and holds every watched key.
/// - Both: the signature rule, restricted to that entity.
#[derive(Clone, Debug, PartialEq)]
pub struct Condition<S: Schema> {
    entity: Option<EntityId>,
    signature: Option<Signature<S::Key>>,
}

impl<S: Schema> Condition<S> {
    /// Creates a condition that watches nothing.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entity: None,
            signature: None,
        }
    }

    /// Builder method to watch one entity.
    #[must_use]
    pub fn entity(mut self, entity: impl Into<EntityId>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    /// Builder method to watch a set of keys. An empty set watches nothing.
    #[must_use]
    pub fn signature(mut self, keys: impl IntoIterator<Item = S::Key>) -> Self {
        let signature: Signature<S::Key> = keys.into_iter().collect();
        self.signature = (!signature.is_empty()).then_some(signature);
        self
    }

    /// Returns the watched entity.
    #[must_use]
    pub fn watched_entity(&self) -> Option<&EntityId> {
        self.entity.as_ref()
    }

    /// Returns the watched keys.
    #[must_use]
    pub fn watched_signature(&self) -> Option<&Signature<S::Key>> {
        self.signature.as_ref()
    }

    /// Returns true if the condition watches neither an entity nor keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entity.is_none() && self.signature.is_none()
    }
}

impl<S: Schema> Default for Condition<S> {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Observer Middleware
// =============================================================================

type Callback = Rc<dyn Fn()>;

struct Observer<S: Schema> {
    id: ObserverId,
    condition: Condition<S>,
    callback: Callback,
}

struct ObserverState<S: Schema> {
    observers: Vec<Observer<S>>,
    next_id: u64,
    signatures: HashMap<EntityId, Signature<S::Key>>,
    diffs: BTreeMap<EntityId, Diff<S::Key>>,
}

impl<S: Schema> ObserverState<S> {
    fn diff_mut(&mut self, entity: &EntityId) -> &mut Diff<S::Key> {
        self.diffs.entry(entity.clone()).or_default()
    }

    fn satisfies(
        &self,
        entity: &EntityId,
        diff: &Diff<S::Key>,
        watched: &Signature<S::Key>,
    ) -> bool {
        diff.overlaps(watched)
            && self
                .signatures
                .get(entity)
                .is_some_and(|signature| signature.contains_all(watched))
    }

    fn matches(&self, condition: &Condition<S>) -> bool {
        match (&condition.entity, &condition.signature) {
            (Some(entity), None) => self.diffs.contains_key(entity),
            (Some(entity), Some(watched)) => self
                .diffs
                .get(entity)
                .is_some_and(|diff| self.satisfies(entity, diff, watched)),
            (None, Some(watched)) => self
                .diffs
                .iter()
                .any(|(entity, diff)| self.satisfies(entity, diff, watched)),
            (None, None) => false,
        }
    }

    fn merge_added(&mut self) {
        for (entity, diff) in &self.diffs {
            self.signatures
                .entry(entity.clone())
                .or_default()
                .insert_all(diff.added());
        }
    }

    fn remove_deleted(&mut self) {
        let diffs = std::mem::take(&mut self.diffs);
        for (entity, diff) in diffs {
            if let Some(signature) = self.signatures.get_mut(&entity) {
                signature.remove_all(diff.deleted());
                if signature.is_empty() {
                    self.signatures.remove(&entity);
                }
            }
        }
    }
}

/// Drops deleted keys and clears the diffs once notification ends, even
/// if a callback panics.
struct SettleGuard<'a, S: Schema>(&'a RefCell<ObserverState<S>>);

impl<S: Schema> Drop for SettleGuard<'_, S> {
    fn drop(&mut self) {
        if let Ok(mut state) = self.0.try_borrow_mut() {
            state.remove_deleted();
        }
    }
}

/// Notifies callbacks when watched entities or keys change.
///
/// Cloning yields another handle to the same observer set.
pub struct ObserverMiddleware<S: Schema> {
    state: Rc<RefCell<ObserverState<S>>>,
}

impl<S: Schema> ObserverMiddleware<S> {
    /// Creates a middleware with no observers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(ObserverState {
                observers: Vec::new(),
                next_id: 0,
                signatures: HashMap::new(),
                diffs: BTreeMap::new(),
            })),
        }
    }

    /// Registers a callback to run after each commit matching `condition`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::EmptyCondition`](tessera_foundation::ErrorKind::EmptyCondition)
    /// if the condition watches neither an entity nor any key.
    pub fn register_observer(
        &self,
        callback: impl Fn() + 'static,
        condition: Condition<S>,
    ) -> Result<ObserverId> {
        if condition.is_empty() {
            return Err(Error::empty_condition()
                .with_context(ErrorContext::new().with_operation("register_observer")));
        }

        let mut state = self.state.borrow_mut();
        let id = ObserverId(state.next_id);
        state.next_id += 1;
        state.observers.push(Observer {
            id,
            condition,
            callback: Rc::new(callback),
        });
        debug!(observer = %id, total = state.observers.len(), "observer registered");
        Ok(id)
    }

    /// Removes an observer.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::UnknownObserver`](tessera_foundation::ErrorKind::UnknownObserver)
    /// if `id` is not registered.
    pub fn unregister_observer(&self, id: ObserverId) -> Result<()> {
        let mut state = self.state.borrow_mut();
        let Some(index) = state.observers.iter().position(|observer| observer.id == id) else {
            return Err(Error::unknown_observer(id.raw())
                .with_context(ErrorContext::new().with_operation("unregister_observer")));
        };
        state.observers.remove(index);
        debug!(observer = %id, total = state.observers.len(), "observer unregistered");
        Ok(())
    }

    /// Returns the number of registered observers.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.state.borrow().observers.len()
    }

    /// Returns the committed signature of an entity.
    ///
    /// Only writes seen by this middleware count; an unseen entity has an
    /// empty signature.
    #[must_use]
    pub fn signature(&self, entity: &EntityId) -> Signature<S::Key> {
        self.state
            .borrow()
            .signatures
            .get(entity)
            .cloned()
            .unwrap_or_default()
    }

    /// Returns true if the in-flight transaction has recorded changes.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        !self.state.borrow().diffs.is_empty()
    }
}

impl<S: Schema> Middleware<S> for ObserverMiddleware<S> {
    fn set_value(&mut self, _store: &Store<S>, entity: &EntityId, value: &S) {
        self.state.borrow_mut().diff_mut(entity).add(value.key());
    }

    fn delete_value(&mut self, _store: &Store<S>, entity: &EntityId, key: S::Key) {
        self.state.borrow_mut().diff_mut(entity).delete(key);
    }

    fn commit(&mut self) {
        let fired: Vec<(ObserverId, Callback)> = {
            let mut state = self.state.borrow_mut();
            if state.diffs.is_empty() {
                return;
            }
            state.merge_added();
            let state = &*state;
            state
                .observers
                .iter()
                .filter(|observer| state.matches(&observer.condition))
                .map(|observer| (observer.id, Rc::clone(&observer.callback)))
                .collect()
        };

        let _settle = SettleGuard(&self.state);
        debug!(fired = fired.len(), "notifying observers");
        for (id, callback) in fired {
            trace!(observer = %id, "observer fired");
            callback();
        }
    }

    fn revert(&mut self) {
        self.state.borrow_mut().diffs.clear();
    }

    fn name(&self) -> &'static str {
        "observer"
    }
}

impl<S: Schema> Clone for ObserverMiddleware<S> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
        }
    }
}

impl<S: Schema> Default for ObserverMiddleware<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Schema> fmt::Debug for ObserverMiddleware<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("ObserverMiddleware")
            .field("observers", &state.observers.len())
            .field("tracked", &state.signatures.len())
            .field("pending", &state.diffs.len())
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
