//! Error types for ledger primitives.

use thiserror::Error;

use crate::amount::Amount;
use crate::identity::Identity;

/// Result type alias for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Errors that can occur while moving balances.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// The debited identity does not hold enough units.
    #[error("insufficient balance for {identity}: required {required}, available {available}")]
    InsufficientBalance {
        /// Identity being debited.
        identity: Identity,
        /// Amount required for the operation.
        required: Amount,
        /// Amount currently held.
        available: Amount,
    },

    /// A credit would push a balance past the representable maximum.
    #[error("balance overflow for {identity}")]
    Overflow {
        /// Identity being credited.
        identity: Identity,
    },

    /// Identity string was rejected.
    #[error("invalid identity: {message}")]
    InvalidIdentity {
        /// Description of the problem.
        message: String,
    },
}

impl LedgerError {
    /// Create an insufficient balance error.
    #[must_use]
    pub fn insufficient_balance(identity: &Identity, required: Amount, available: Amount) -> Self {
        Self::InsufficientBalance {
            identity: identity.clone(),
            required,
            available,
        }
    }

    /// Create an invalid identity error.
    #[must_use]
    pub fn invalid_identity(message: impl Into<String>) -> Self {
        Self::InvalidIdentity {
            message: message.into(),
        }
    }
}
