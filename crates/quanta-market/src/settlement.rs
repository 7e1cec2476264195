//! Purchase pricing and settlement records.
//!
//! Pricing is a fixed unit price: `cost = price_per_unit × quantity`, in
//! whole currency units. Intermediate math is checked; a product that does
//! not fit in `u64` is reported rather than wrapped or saturated, because a
//! saturated cost would undercharge the buyer.

use quanta_core::{Amount, Identity};
use serde::{Deserialize, Serialize};

use crate::listing::ListingId;

/// Computes the currency cost of `quantity` energy units.
///
/// Returns `None` if the product overflows.
///
/// # Examples
/// ```
/// use quanta_core::Amount;
/// use quanta_market::settlement::purchase_cost;
///
/// assert_eq!(purchase_cost(Amount::new(10), Amount::new(200)), Some(Amount::new(2000)));
/// assert_eq!(purchase_cost(Amount::new(5), Amount::ZERO), Some(Amount::ZERO));
/// assert_eq!(purchase_cost(Amount::MAX, Amount::new(2)), None);
/// ```
#[must_use]
pub const fn purchase_cost(price_per_unit: Amount, quantity: Amount) -> Option<Amount> {
    price_per_unit.checked_mul(quantity.units())
}

/// Outcome of a settled purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseReceipt {
    /// Listing the energy came from.
    pub listing_id: ListingId,
    /// Paying identity, credited with energy.
    pub buyer: Identity,
    /// Listing owner, credited with currency.
    pub seller: Identity,
    /// Energy units bought.
    pub amount: Amount,
    /// Currency moved from buyer to seller.
    pub total_cost: Amount,
    /// Energy left on the listing afterwards.
    pub remaining: Amount,
}

impl PurchaseReceipt {
    /// Returns true if this purchase emptied the listing.
    #[must_use]
    pub const fn closed_listing(&self) -> bool {
        self.remaining.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(10, 200, Some(2000) ; "scenario price")]
    #[test_case(5, 200, Some(1000) ; "cheap units")]
    #[test_case(8, 0, Some(0) ; "nothing bought")]
    #[test_case(u64::MAX, 1, Some(u64::MAX) ; "max single unit")]
    #[test_case(u64::MAX, 2, None ; "overflow")]
    #[test_case(1 << 32, 1 << 32, None ; "square overflow")]
    fn cost(price: u64, quantity: u64, expected: Option<u64>) {
        assert_eq!(
            purchase_cost(Amount::new(price), Amount::new(quantity)),
            expected.map(Amount::new)
        );
    }

    #[test]
    fn receipt_closed_when_empty() {
        let receipt = PurchaseReceipt {
            listing_id: ListingId::new(1),
            buyer: Identity::new("buyer").unwrap(),
            seller: Identity::new("seller").unwrap(),
            amount: Amount::new(500),
            total_cost: Amount::new(4000),
            remaining: Amount::ZERO,
        };
        assert!(receipt.closed_listing());

        let partial = PurchaseReceipt {
            remaining: Amount::new(1),
            ..receipt
        };
        assert!(!partial.closed_listing());
    }
}
