//! Energy listings.

use chrono::{DateTime, Utc};
use quanta_core::{Amount, Identity};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sequential listing identifier, starting at 1.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ListingId(u64);

impl ListingId {
    /// Wraps a raw id.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Raw id value.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Energy offered for sale at a fixed unit price.
///
/// `amount` is the escrowed energy still unsold. A listing only exists
/// while `amount` is positive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    /// Listing id.
    pub id: ListingId,
    /// Identity paid on each purchase.
    pub seller: Identity,
    /// Energy still held in escrow.
    pub amount: Amount,
    /// Currency charged per energy unit.
    pub price_per_unit: Amount,
    /// Creation time plus the requested offset.
    pub expiration: DateTime<Utc>,
}

impl Listing {
    /// Returns true once `now` has reached the expiration.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expiration
    }

    /// Returns true if `identity` created this listing.
    #[must_use]
    pub fn is_sold_by(&self, identity: &Identity) -> bool {
        &self.seller == identity
    }
}
