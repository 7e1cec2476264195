//! Error types for quanta-market.

use chrono::{DateTime, Utc};
use quanta_core::{Amount, LedgerError};
use thiserror::Error;

use crate::listing::ListingId;

/// Result type alias for marketplace operations.
pub type Result<T> = std::result::Result<T, MarketError>;

/// Errors that can occur in marketplace operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarketError {
    /// Listing does not exist (never created, or already sold out).
    #[error("listing not found: {0}")]
    NotFound(ListingId),

    /// Seller cannot cover the amount being listed.
    #[error("insufficient energy balance: required {required}, available {available}")]
    InsufficientEnergyBalance {
        /// Amount the listing needs escrowed.
        required: Amount,
        /// Seller's current energy balance.
        available: Amount,
    },

    /// Purchase asks for more than the listing holds.
    #[error("insufficient listed amount: requested {requested}, available {available}")]
    InsufficientListedAmount {
        /// Amount requested by the buyer.
        requested: Amount,
        /// Amount still listed.
        available: Amount,
    },

    /// Buyer cannot pay for the purchase.
    #[error("insufficient currency balance: required {required}, available {available}")]
    InsufficientCurrencyBalance {
        /// Total cost of the purchase.
        required: Amount,
        /// Buyer's current currency balance.
        available: Amount,
    },

    /// Zero quantity or zero price.
    #[error("invalid amount: {0}")]
    InvalidAmount(&'static str),

    /// Listing is past its expiration and expiry is enforced.
    #[error("listing {listing} expired at {expiration}")]
    ListingExpired {
        /// The expired listing.
        listing: ListingId,
        /// When it expired.
        expiration: DateTime<Utc>,
    },

    /// Arithmetic would exceed the representable range.
    #[error("overflow: {0}")]
    Overflow(&'static str),

    /// Restored state breaks a marketplace invariant.
    #[error("corrupt market state: {0}")]
    CorruptState(String),

    /// Underlying ledger rejected a movement.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_listed_display() {
        let err = MarketError::InsufficientListedAmount {
            requested: Amount::new(600),
            available: Amount::new(500),
        };
        let msg = err.to_string();
        assert!(msg.contains("600"));
        assert!(msg.contains("500"));
    }

    #[test]
    fn not_found_display() {
        assert_eq!(
            MarketError::NotFound(ListingId::new(3)).to_string(),
            "listing not found: 3"
        );
    }

    #[test]
    fn ledger_error_converts() {
        let err: MarketError = LedgerError::invalid_identity("empty").into();
        assert!(matches!(err, MarketError::Ledger(_)));
    }
}
