//! Undo/redo history over committed transactions.
//!
//! The history buffers the net effect of the in-flight transaction as a
//! stage of per-entity snapshots. A commit with a non-empty stage cuts the
//! log at the cursor (dropping any redo branch), appends the stage and
//! advances the cursor. Undo and redo replay a logged change set through
//! [`Service::patch_entity`], so other middlewares see the replay as
//! ordinary writes.
//!
//! # Example
//!
//! ```text
//! controller.use_middleware(history.clone());
//! controller.run(|service| service.patch_entity(&e1, Patch::new().set(Health(10))));
//! controller.run(|service| history.undo(service));
//! ```

mod change_set;

pub use change_set::{ChangeSet, EntitySnapshot};

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use tessera_engine::{Middleware, Service};
use tessera_foundation::{EntityId, Schema};
use tessera_storage::Store;
use tracing::debug;

// =============================================================================
// History Configuration
// =============================================================================

/// Which log slot `redo` replays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RedoIndexing {
    /// Replay slot `change_count - 1`, the same slot `undo` reads.
    ///
    /// After an undo this replays the entry *before* the one just undone
    /// and moves the cursor past it.
    #[default]
    Observed,
    /// Replay slot `change_count`, the entry the last undo vacated.
    Vacated,
}

/// Configuration for the history middleware.
#[derive(Clone, Debug, Default)]
pub struct HistoryConfig {
    /// Maximum number of logged change sets; the oldest are evicted.
    /// `None` keeps everything.
    pub capacity: Option<usize>,
    /// Which slot `redo` replays.
    pub redo: RedoIndexing,
}

impl HistoryConfig {
    /// Creates a new configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to bound the log length.
    #[must_use]
    pub const fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Builder method to choose the redo slot.
    #[must_use]
    pub const fn with_redo(mut self, redo: RedoIndexing) -> Self {
        self.redo = redo;
        self
    }
}

// =============================================================================
// History Middleware
// =============================================================================

struct HistoryState<S: Schema> {
    config: HistoryConfig,
    log: VecDeque<ChangeSet<S>>,
    change_count: usize,
    stage: ChangeSet<S>,
    replaying: bool,
}

impl<S: Schema> HistoryState<S> {
    fn undo_slot(&self) -> Option<usize> {
        self.change_count
            .checked_sub(1)
            .filter(|&slot| slot < self.log.len())
    }

    fn redo_slot(&self) -> Option<usize> {
        let slot = match self.config.redo {
            RedoIndexing::Observed => self.change_count.checked_sub(1)?,
            RedoIndexing::Vacated => self.change_count,
        };
        (slot < self.log.len()).then_some(slot)
    }

    fn evict(&mut self) {
        let Some(capacity) = self.config.capacity else {
            return;
        };
        while self.log.len() > capacity {
            self.log.pop_front();
            self.change_count = self.change_count.saturating_sub(1);
            debug!(capacity, "evicted oldest history entry");
        }
    }
}

/// Linear undo/redo over committed transactions.
///
/// Cloning yields another handle to the same history.
pub struct HistoryMiddleware<S: Schema> {
    state: Rc<RefCell<HistoryState<S>>>,
}

#[derive(Clone, Copy)]
enum Direction {
    Backward,
    Forward,
}

impl<S: Schema> HistoryMiddleware<S> {
    /// Creates a history with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(HistoryConfig::default())
    }

    /// Creates a history with custom configuration.
    #[must_use]
    pub fn with_config(config: HistoryConfig) -> Self {
        Self {
            state: Rc::new(RefCell::new(HistoryState {
                config,
                log: VecDeque::new(),
                change_count: 0,
                stage: ChangeSet::new(),
                replaying: false,
            })),
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> HistoryConfig {
        self.state.borrow().config.clone()
    }

    /// Returns the cursor: the number of entries currently applied.
    #[must_use]
    pub fn change_count(&self) -> usize {
        self.state.borrow().change_count
    }

    /// Returns the number of logged change sets.
    #[must_use]
    pub fn history_length(&self) -> usize {
        self.state.borrow().log.len()
    }

    /// Returns a copy of the change set in a log slot.
    #[must_use]
    pub fn entry(&self, slot: usize) -> Option<ChangeSet<S>> {
        self.state.borrow().log.get(slot).cloned()
    }

    /// Returns true if the in-flight transaction has recorded changes.
    #[must_use]
    pub fn is_staged(&self) -> bool {
        !self.state.borrow().stage.is_empty()
    }

    /// Returns true if [`undo`](Self::undo) would replay an entry.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.state.borrow().undo_slot().is_some()
    }

    /// Returns true if [`redo`](Self::redo) would replay an entry.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.state.borrow().redo_slot().is_some()
    }

    /// Applies the backward patches of the entry at `change_count - 1`
    /// and moves the cursor back.
    ///
    /// Returns false, changing nothing, if there is no such entry.
    pub fn undo(&self, service: &mut Service<S>) -> bool {
        let Some((slot, change_set)) = self.take_slot(HistoryState::undo_slot) else {
            return false;
        };
        self.replay(service, &change_set, Direction::Backward);

        let mut state = self.state.borrow_mut();
        state.change_count -= 1;
        debug!(slot, change_count = state.change_count, "undo");
        true
    }

    /// Applies the forward patches of the redo slot (see [`RedoIndexing`])
    /// and moves the cursor forward.
    ///
    /// Returns false, changing nothing, if there is no such entry.
    pub fn redo(&self, service: &mut Service<S>) -> bool {
        let Some((slot, change_set)) = self.take_slot(HistoryState::redo_slot) else {
            return false;
        };
        self.replay(service, &change_set, Direction::Forward);

        let mut state = self.state.borrow_mut();
        state.change_count += 1;
        debug!(slot, change_count = state.change_count, "redo");
        true
    }

    /// Drops the log, the cursor and any staged changes.
    pub fn clear(&self) {
        let mut state = self.state.borrow_mut();
        state.log.clear();
        state.change_count = 0;
        state.stage = ChangeSet::new();
    }

    fn take_slot(
        &self,
        pick: fn(&HistoryState<S>) -> Option<usize>,
    ) -> Option<(usize, ChangeSet<S>)> {
        let state = self.state.borrow();
        let slot = pick(&state)?;
        state.log.get(slot).map(|change_set| (slot, change_set.clone()))
    }

    fn replay(&self, service: &mut Service<S>, change_set: &ChangeSet<S>, direction: Direction) {
        let _guard = ReplayGuard::begin(&self.state);
        for (entity, snapshot) in change_set.iter() {
            let patch = match direction {
                Direction::Backward => snapshot.backward().clone(),
                Direction::Forward => snapshot.forward().clone(),
            };
            service.patch_entity(entity, patch);
        }
    }
}

/// Keeps the history's own replay writes out of its stage.
///
/// The flag is cleared on drop, including when a later middleware panics
/// mid-replay.
struct ReplayGuard<'a, S: Schema>(&'a RefCell<HistoryState<S>>);

impl<'a, S: Schema> ReplayGuard<'a, S> {
    fn begin(state: &'a RefCell<HistoryState<S>>) -> Self {
        state.borrow_mut().replaying = true;
        Self(state)
    }
}

impl<S: Schema> Drop for ReplayGuard<'_, S> {
    fn drop(&mut self) {
        if let Ok(mut state) = self.0.try_borrow_mut() {
            state.replaying = false;
        }
    }
}

impl<S: Schema> Middleware<S> for HistoryMiddleware<S> {
    fn set_value(&mut self, store: &Store<S>, entity: &EntityId, value: &S) {
        let mut state = self.state.borrow_mut();
        if state.replaying {
            return;
        }
        let prior = store.value(entity, value.key());
        state.stage.snapshot_mut(entity).record_set(value, prior);
    }

    fn delete_value(&mut self, store: &Store<S>, entity: &EntityId, key: S::Key) {
        let mut state = self.state.borrow_mut();
        if state.replaying {
            return;
        }
        let prior = store.value(entity, key);
        state.stage.snapshot_mut(entity).record_delete(key, prior);
    }

    fn commit(&mut self) {
        let mut state = self.state.borrow_mut();
        if state.stage.is_empty() {
            return;
        }
        let stage = std::mem::take(&mut state.stage);
        let cursor = state.change_count;
        let dropped = state.log.len().saturating_sub(cursor);
        state.log.truncate(cursor);
        state.log.push_back(stage);
        state.change_count += 1;
        state.evict();
        debug!(
            dropped,
            change_count = state.change_count,
            history_length = state.log.len(),
            "history commit"
        );
    }

    fn revert(&mut self) {
        let mut state = self.state.borrow_mut();
        if !state.stage.is_empty() {
            debug!(entities = state.stage.len(), "history stage discarded");
        }
        state.stage = ChangeSet::new();
    }

    fn name(&self) -> &'static str {
        "history"
    }
}

impl<S: Schema> Clone for HistoryMiddleware<S> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
        }
    }
}

impl<S: Schema> Default for HistoryMiddleware<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Schema> fmt::Debug for HistoryMiddleware<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("HistoryMiddleware")
            .field("change_count", &state.change_count)
            .field("history_length", &state.log.len())
            .field("staged", &state.stage.len())
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
