//! Error types for the Tessera system.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.

use std::fmt;

use thiserror::Error;

/// The main error type for Tessera operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates an empty observer condition error.
    #[must_use]
    pub fn empty_condition() -> Self {
        Self::new(ErrorKind::EmptyCondition)
    }

    /// Creates an unknown observer error.
    #[must_use]
    pub fn unknown_observer(id: u64) -> Self {
        Self::new(ErrorKind::UnknownObserver(id))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// An observer condition named neither an entity nor a signature.
    #[error("observer condition watches neither an entity nor a signature")]
    EmptyCondition,

    /// No observer is registered under this id.
    #[error("unknown observer: #{0}")]
    UnknownObserver(u64),
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// The operation that was running.
    pub operation: Option<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the operation name.
    #[must_use]
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.operation {
            Some(operation) => write!(f, "during {operation}"),
            None => Ok(()),
        }
    }
}

/// Result type alias using the Tessera error.
pub type Result<T> = std::result::Result<T, Error>;
