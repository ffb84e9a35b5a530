//! Transaction outcomes.

use thiserror::Error;

/// Why a system did not commit.
///
/// Either way the transaction was reverted: middleware bookkeeping was
/// discarded, while store writes made before the failure remain.
#[derive(Debug, Error)]
pub enum TransactionError<E> {
    /// The system returned an error.
    #[error("system failed: {0}")]
    Failed(E),

    /// The system panicked; the payload message is captured.
    #[error("system panicked: {0}")]
    Panicked(String),
}

impl<E> TransactionError<E> {
    /// Returns true if the system returned an error.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Returns true if the system panicked.
    #[must_use]
    pub fn is_panicked(&self) -> bool {
        matches!(self, Self::Panicked(_))
    }

    /// Returns the system's own error, if it returned one.
    #[must_use]
    pub fn into_failure(self) -> Option<E> {
        match self {
            Self::Failed(err) => Some(err),
            Self::Panicked(_) => None,
        }
    }

    /// Short label for log fields.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Failed(_) => "failed",
            Self::Panicked(_) => "panicked",
        }
    }
}
