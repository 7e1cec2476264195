//! Balance ledger.
//!
//! A mapping from identity to non-negative balance. An identity with no entry
//! holds zero. Every movement is validated in full before any balance is
//! written, so a failed call leaves the ledger untouched.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use tracing::trace;

use crate::amount::Amount;
use crate::error::{LedgerError, Result};
use crate::identity::Identity;

/// Identity to balance mapping with checked credit, debit, and transfer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceLedger {
    #[serde(deserialize_with = "non_zero_balances")]
    balances: BTreeMap<Identity, Amount>,
}

fn non_zero_balances<'de, D>(
    deserializer: D,
) -> std::result::Result<BTreeMap<Identity, Amount>, D::Error>
where
    D: Deserializer<'de>,
{
    let mut balances = BTreeMap::<Identity, Amount>::deserialize(deserializer)?;
    balances.retain(|_, amount| !amount.is_zero());
    Ok(balances)
}

impl BalanceLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Balance held by `identity` (zero when absent).
    #[must_use]
    pub fn balance_of(&self, identity: &Identity) -> Amount {
        self.balances.get(identity).copied().unwrap_or(Amount::ZERO)
    }

    /// Verifies that `identity` could be debited by `amount`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InsufficientBalance`] when the balance is short.
    pub fn check_debit(&self, identity: &Identity, amount: Amount) -> Result<()> {
        let available = self.balance_of(identity);
        if available < amount {
            return Err(LedgerError::insufficient_balance(identity, amount, available));
        }
        Ok(())
    }

    /// Verifies that `identity` could be credited by `amount`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Overflow`] when the credit would not fit.
    pub fn check_credit(&self, identity: &Identity, amount: Amount) -> Result<()> {
        self.balance_of(identity)
            .checked_add(amount)
            .map(|_| ())
            .ok_or_else(|| LedgerError::Overflow {
                identity: identity.clone(),
            })
    }

    /// Adds `amount` to `identity`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Overflow`] if the new balance does not fit.
    pub fn credit(&mut self, identity: &Identity, amount: Amount) -> Result<Amount> {
        let updated = self
            .balance_of(identity)
            .checked_add(amount)
            .ok_or_else(|| LedgerError::Overflow {
                identity: identity.clone(),
            })?;
        self.store(identity, updated);
        trace!(identity = %identity, amount = %amount, balance = %updated, "credited");
        Ok(updated)
    }

    /// Removes `amount` from `identity`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InsufficientBalance`] if the balance is short.
    pub fn debit(&mut self, identity: &Identity, amount: Amount) -> Result<Amount> {
        let available = self.balance_of(identity);
        let updated = available
            .checked_sub(amount)
            .ok_or_else(|| LedgerError::insufficient_balance(identity, amount, available))?;
        self.store(identity, updated);
        trace!(identity = %identity, amount = %amount, balance = %updated, "debited");
        Ok(updated)
    }

    /// Moves `amount` from `from` to `to`.
    ///
    /// A transfer to self only checks that the balance covers `amount`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InsufficientBalance`] or [`LedgerError::Overflow`];
    /// in either case neither balance has changed.
    pub fn transfer(&mut self, from: &Identity, to: &Identity, amount: Amount) -> Result<()> {
        self.check_debit(from, amount)?;
        if from == to {
            return Ok(());
        }
        self.check_credit(to, amount)?;

        self.debit(from, amount)?;
        self.credit(to, amount)?;
        Ok(())
    }

    /// Sum of every balance.
    #[must_use]
    pub fn total(&self) -> u128 {
        self.balances
            .values()
            .map(|a| u128::from(a.units()))
            .sum()
    }

    /// Identities holding a non-zero balance, in identity order.
    pub fn holders(&self) -> impl Iterator<Item = (&Identity, Amount)> {
        self.balances.iter().map(|(id, amount)| (id, *amount))
    }

    /// Number of identities holding a non-zero balance.
    #[must_use]
    pub fn len(&self) -> usize {
        self.balances.len()
    }

    /// Returns true if no identity holds a balance.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }

    fn store(&mut self, identity: &Identity, amount: Amount) {
        if amount.is_zero() {
            self.balances.remove(identity);
        } else {
            self.balances.insert(identity.clone(), amount);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> Identity {
        Identity::new(s).unwrap()
    }

    #[test]
    fn absent_identity_has_zero() {
        let ledger = BalanceLedger::new();
        assert_eq!(ledger.balance_of(&id("nobody")), Amount::ZERO);
        assert!(ledger.is_empty());
    }

    #[test]
    fn credit_then_debit() {
        let mut ledger = BalanceLedger::new();
        let alice = id("alice");

        assert_eq!(ledger.credit(&alice, Amount::new(1000)).unwrap(), Amount::new(1000));
        assert_eq!(ledger.debit(&alice, Amount::new(400)).unwrap(), Amount::new(600));
        assert_eq!(ledger.balance_of(&alice), Amount::new(600));
    }

    #[test]
    fn debit_insufficient_leaves_balance() {
        let mut ledger = BalanceLedger::new();
        let alice = id("alice");
        ledger.credit(&alice, Amount::new(10)).unwrap();

        let err = ledger.debit(&alice, Amount::new(11)).unwrap_err();
        assert_eq!(
            err,
            LedgerError::InsufficientBalance {
                identity: alice.clone(),
                required: Amount::new(11),
                available: Amount::new(10),
            }
        );
        assert_eq!(ledger.balance_of(&alice), Amount::new(10));
    }

    #[test]
    fn credit_overflow_rejected() {
        let mut ledger = BalanceLedger::new();
        let alice = id("alice");
        ledger.credit(&alice, Amount::MAX).unwrap();

        let err = ledger.credit(&alice, Amount::new(1)).unwrap_err();
        assert!(matches!(err, LedgerError::Overflow { .. }));
        assert_eq!(ledger.balance_of(&alice), Amount::MAX);
    }

    #[test]
    fn debit_to_zero_removes_entry() {
        let mut ledger = BalanceLedger::new();
        let alice = id("alice");
        ledger.credit(&alice, Amount::new(5)).unwrap();
        ledger.debit(&alice, Amount::new(5)).unwrap();

        assert_eq!(ledger.len(), 0);
        assert_eq!(ledger.balance_of(&alice), Amount::ZERO);
    }

    #[test]
    fn transfer_moves_units() {
        let mut ledger = BalanceLedger::new();
        let (alice, bob) = (id("alice"), id("bob"));
        ledger.credit(&alice, Amount::new(100)).unwrap();

        ledger.transfer(&alice, &bob, Amount::new(30)).unwrap();

        assert_eq!(ledger.balance_of(&alice), Amount::new(70));
        assert_eq!(ledger.balance_of(&bob), Amount::new(30));
        assert_eq!(ledger.total(), 100);
    }

    #[test]
    fn transfer_to_self_is_noop() {
        let mut ledger = BalanceLedger::new();
        let alice = id("alice");
        ledger.credit(&alice, Amount::new(100)).unwrap();

        ledger.transfer(&alice, &alice, Amount::new(100)).unwrap();
        assert_eq!(ledger.balance_of(&alice), Amount::new(100));

        assert!(ledger.transfer(&alice, &alice, Amount::new(101)).is_err());
    }

    #[test]
    fn transfer_overflow_is_atomic() {
        let mut ledger = BalanceLedger::new();
        let (alice, bob) = (id("alice"), id("bob"));
        ledger.credit(&alice, Amount::new(10)).unwrap();
        ledger.credit(&bob, Amount::MAX).unwrap();

        let err = ledger.transfer(&alice, &bob, Amount::new(5)).unwrap_err();
        assert!(matches!(err, LedgerError::Overflow { .. }));
        assert_eq!(ledger.balance_of(&alice), Amount::new(10));
        assert_eq!(ledger.balance_of(&bob), Amount::MAX);
    }

    #[test]
    fn total_does_not_overflow_u64() {
        let mut ledger = BalanceLedger::new();
        ledger.credit(&id("a"), Amount::MAX).unwrap();
        ledger.credit(&id("b"), Amount::MAX).unwrap();
        assert_eq!(ledger.total(), 2 * u128::from(u64::MAX));
    }

    #[test]
    fn holders_in_identity_order() {
        let mut ledger = BalanceLedger::new();
        ledger.credit(&id("carol"), Amount::new(3)).unwrap();
        ledger.credit(&id("alice"), Amount::new(1)).unwrap();

        let names: Vec<_> = ledger.holders().map(|(i, _)| i.as_str().to_string()).collect();
        assert_eq!(names, vec!["alice", "carol"]);
    }

    #[test]
    fn deserialize_drops_zero_entries() {
        let ledger: BalanceLedger =
            serde_json::from_str(r#"{"balances": {"alice": 0, "bob": 7}}"#).unwrap();

        assert_eq!(ledger.len(), 1);
        let holders: Vec<_> = ledger
            .holders()
            .map(|(i, a)| (i.as_str().to_string(), a))
            .collect();
        assert_eq!(holders, vec![("bob".to_string(), Amount::new(7))]);
        assert_eq!(ledger.balance_of(&id("alice")), Amount::ZERO);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn transfers_conserve_total(
                seed in 0u64..1_000_000,
                moves in prop::collection::vec((0usize..4, 0usize..4, 0u64..2_000), 0..40)
            ) {
                let people = [id("a"), id("b"), id("c"), id("d")];
                let mut ledger = BalanceLedger::new();
                ledger.credit(&people[0], Amount::new(seed)).unwrap();

                for (from, to, amount) in moves {
                    let before = ledger.clone();
                    if ledger.transfer(&people[from], &people[to], Amount::new(amount)).is_err() {
                        prop_assert_eq!(&ledger, &before);
                    }
                    prop_assert_eq!(ledger.total(), u128::from(seed));
                }
            }
        }
    }
}
