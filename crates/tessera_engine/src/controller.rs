//! The transaction boundary.
//!
//! A system function runs against the [`Service`]. If it returns `Ok`
//! every middleware commits; if it returns `Err` or panics every
//! middleware reverts. Reverting only discards middleware bookkeeping:
//! store writes made before the failure stay in place.
//!
//! Nested transactions are not supported. A system cannot reach its own
//! controller, so it cannot start one.

use std::any::Any;
use std::convert::Infallible;
use std::panic::{self, AssertUnwindSafe};

use tessera_foundation::Schema;
use tracing::{debug, warn};

use crate::error::TransactionError;
use crate::middleware::Middleware;
use crate::service::Service;

// =============================================================================
// Controller Configuration
// =============================================================================

/// Configuration for the controller.
#[derive(Clone, Debug)]
pub struct ControllerConfig {
    /// Whether a panicking system is caught and reverted.
    ///
    /// When off, the panic propagates to the caller and no revert happens.
    pub catch_panics: bool,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self { catch_panics: true }
    }
}

impl ControllerConfig {
    /// Creates a new configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to enable/disable panic capture.
    #[must_use]
    pub const fn with_catch_panics(mut self, enabled: bool) -> Self {
        self.catch_panics = enabled;
        self
    }
}

// =============================================================================
// Controller
// =============================================================================

/// Runs systems transactionally against a [`Service`].
#[derive(Debug)]
pub struct Controller<S: Schema> {
    service: Service<S>,
    config: ControllerConfig,
}

impl<S: Schema> Controller<S> {
    /// Creates a controller over an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::with_service(Service::new())
    }

    /// Creates a controller over an existing service.
    #[must_use]
    pub fn with_service(service: Service<S>) -> Self {
        Self {
            service,
            config: ControllerConfig::default(),
        }
    }

    /// Builder method to set the configuration.
    #[must_use]
    pub fn with_config(mut self, config: ControllerConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Returns read-only access to the service.
    #[must_use]
    pub fn service(&self) -> &Service<S> {
        &self.service
    }

    /// Returns mutable access to the service for setup outside a
    /// transaction.
    ///
    /// Writes made here reach the middlewares, but nothing commits or
    /// reverts them until the next [`handle`](Self::handle).
    pub fn service_mut(&mut self) -> &mut Service<S> {
        &mut self.service
    }

    /// Registers a middleware with the service.
    pub fn use_middleware<M: Middleware<S> + 'static>(&mut self, middleware: M) {
        self.service.use_middleware(middleware);
    }

    /// Runs a system, then commits on `Ok` or reverts on `Err` or panic.
    ///
    /// # Errors
    ///
    /// Returns [`TransactionError::Failed`] with the system's error, or
    /// [`TransactionError::Panicked`] if it panicked. The transaction has
    /// been reverted in both cases.
    pub fn handle<T, E, F>(&mut self, system: F) -> Result<T, TransactionError<E>>
    where
        F: FnOnce(&mut Service<S>) -> Result<T, E>,
    {
        let outcome = if self.config.catch_panics {
            let service = &mut self.service;
            match panic::catch_unwind(AssertUnwindSafe(move || system(service))) {
                Ok(result) => result.map_err(TransactionError::Failed),
                Err(payload) => Err(TransactionError::Panicked(panic_message(payload.as_ref()))),
            }
        } else {
            system(&mut self.service).map_err(TransactionError::Failed)
        };

        match outcome {
            Ok(value) => {
                self.service.commit();
                Ok(value)
            }
            Err(err) => {
                warn!(cause = err.kind(), "system did not complete, reverting");
                self.service.revert();
                Err(err)
            }
        }
    }

    /// Runs an infallible system; only a panic can revert it.
    ///
    /// # Errors
    ///
    /// Returns [`TransactionError::Panicked`] if the system panicked.
    pub fn run<T, F>(&mut self, system: F) -> Result<T, TransactionError<Infallible>>
    where
        F: FnOnce(&mut Service<S>) -> T,
    {
        self.handle(|service| Ok(system(service)))
    }
}

impl<S: Schema> Default for Controller<S> {
    fn default() -> Self {
        Self::new()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    let message = if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    };
    debug!(%message, "captured system panic");
    message
}
