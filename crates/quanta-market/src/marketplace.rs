//! The energy marketplace.
//!
//! Owns the listings and both balance ledgers. Each operation validates
//! everything it needs before the first write, so an error always leaves
//! the state exactly as it was.

use chrono::Duration;
use quanta_core::{Amount, BalanceLedger, Clock, Identity, SystemClock};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::config::MarketConfig;
use crate::error::{MarketError, Result};
use crate::listing::{Listing, ListingId};
use crate::settlement::{purchase_cost, PurchaseReceipt};

/// Persistable marketplace state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketState {
    /// Id handed to the next listing.
    next_listing_id: u64,
    /// Live listings; sold-out listings are removed.
    listings: BTreeMap<ListingId, Listing>,
    /// Spendable energy per identity.
    energy: BalanceLedger,
    /// Currency per identity.
    currency: BalanceLedger,
}

impl Default for MarketState {
    fn default() -> Self {
        Self {
            next_listing_id: 1,
            listings: BTreeMap::new(),
            energy: BalanceLedger::new(),
            currency: BalanceLedger::new(),
        }
    }
}

impl MarketState {
    fn validate(&self) -> Result<()> {
        if self.next_listing_id == 0 {
            return Err(MarketError::CorruptState(
                "listing id counter must start at 1".to_string(),
            ));
        }
        for (key, listing) in &self.listings {
            if key.get() >= self.next_listing_id {
                return Err(MarketError::CorruptState(format!(
                    "listing id {key} not below counter {}",
                    self.next_listing_id
                )));
            }
            if listing.id != *key {
                return Err(MarketError::CorruptState(format!(
                    "listing {} stored under id {key}",
                    listing.id
                )));
            }
            if listing.amount.is_zero() || listing.price_per_unit.is_zero() {
                return Err(MarketError::CorruptState(format!(
                    "listing {key} has zero amount or price"
                )));
            }
        }
        Ok(())
    }
}

/// The energy marketplace.
#[derive(Debug)]
pub struct EnergyMarketplace<C = SystemClock> {
    state: MarketState,
    config: MarketConfig,
    clock: C,
}

impl EnergyMarketplace<SystemClock> {
    /// Creates an empty marketplace with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(MarketConfig::default(), SystemClock)
    }
}

impl Default for EnergyMarketplace<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> EnergyMarketplace<C> {
    /// Creates an empty marketplace.
    pub fn with_clock(config: MarketConfig, clock: C) -> Self {
        Self {
            state: MarketState::default(),
            config,
            clock,
        }
    }

    /// Restores a marketplace from a previously saved state.
    ///
    /// The listing counter must be positive and above every stored id, and
    /// every listing must be filed under its own id with a positive amount
    /// and price.
    pub fn from_state(state: MarketState, config: MarketConfig, clock: C) -> Result<Self> {
        state.validate()?;
        Ok(Self {
            state,
            config,
            clock,
        })
    }

    /// Current state, for persistence.
    #[must_use]
    pub fn state(&self) -> &MarketState {
        &self.state
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &MarketConfig {
        &self.config
    }

    /// Credits spendable energy to `identity`.
    ///
    /// This is the host's bridge from harvested energy into the market.
    pub fn deposit_energy(&mut self, identity: &Identity, amount: Amount) -> Result<Amount> {
        let balance = self.state.energy.credit(identity, amount)?;
        info!(identity = %identity, amount = %amount, balance = %balance, "energy deposited");
        Ok(balance)
    }

    /// Credits currency to `identity`.
    pub fn deposit_currency(&mut self, identity: &Identity, amount: Amount) -> Result<Amount> {
        let balance = self.state.currency.credit(identity, amount)?;
        info!(identity = %identity, amount = %amount, balance = %balance, "currency deposited");
        Ok(balance)
    }

    /// Lists `amount` energy at `price_per_unit`, escrowing it from `seller`.
    ///
    /// The listing expires `expiration_offset_secs` after creation.
    pub fn create_energy_listing(
        &mut self,
        amount: Amount,
        price_per_unit: Amount,
        expiration_offset_secs: u32,
        seller: &Identity,
    ) -> Result<ListingId> {
        if amount.is_zero() {
            return Err(MarketError::InvalidAmount("listing amount must be positive"));
        }
        if price_per_unit.is_zero() {
            return Err(MarketError::InvalidAmount("price per unit must be positive"));
        }

        let available = self.state.energy.balance_of(seller);
        if available < amount {
            debug!(
                seller = %seller,
                required = %amount,
                available = %available,
                "listing rejected: insufficient energy"
            );
            return Err(MarketError::InsufficientEnergyBalance {
                required: amount,
                available,
            });
        }

        let id = ListingId::new(self.state.next_listing_id);
        let next_listing_id = self
            .state
            .next_listing_id
            .checked_add(1)
            .ok_or(MarketError::Overflow("listing id counter"))?;
        let expiration = self
            .clock
            .now()
            .checked_add_signed(Duration::seconds(i64::from(expiration_offset_secs)))
            .ok_or(MarketError::Overflow("listing expiration"))?;
        if self.state.listings.contains_key(&id) {
            return Err(MarketError::CorruptState(format!(
                "listing id {id} already assigned"
            )));
        }

        self.state.energy.debit(seller, amount)?;
        self.state.listings.insert(
            id,
            Listing {
                id,
                seller: seller.clone(),
                amount,
                price_per_unit,
                expiration,
            },
        );
        self.state.next_listing_id = next_listing_id;

        info!(
            listing = %id,
            seller = %seller,
            amount = %amount,
            price_per_unit = %price_per_unit,
            expiration = %expiration,
            "energy listed"
        );
        Ok(id)
    }

    /// Buys `amount` energy from a listing.
    pub fn purchase_energy(
        &mut self,
        listing_id: ListingId,
        amount: Amount,
        buyer: &Identity,
    ) -> Result<bool> {
        self.purchase_energy_with_receipt(listing_id, amount, buyer)
            .map(|_| true)
    }

    /// Buys `amount` energy from a listing and reports what moved.
    ///
    /// Currency moves from buyer to seller, energy is credited to the
    /// buyer, and the listing shrinks by `amount`. A listing brought to zero
    /// is removed. Partial fills leave the remainder purchasable.
    pub fn purchase_energy_with_receipt(
        &mut self,
        listing_id: ListingId,
        amount: Amount,
        buyer: &Identity,
    ) -> Result<PurchaseReceipt> {
        let listing = self.state.listings.get(&listing_id).ok_or_else(|| {
            debug!(listing = %listing_id, "purchase rejected: listing not found");
            MarketError::NotFound(listing_id)
        })?;

        if amount.is_zero() {
            return Err(MarketError::InvalidAmount("purchase amount must be positive"));
        }

        if self.config.enforce_expiration && listing.is_expired(self.clock.now()) {
            debug!(listing = %listing_id, "purchase rejected: listing expired");
            return Err(MarketError::ListingExpired {
                listing: listing_id,
                expiration: listing.expiration,
            });
        }

        let remaining = listing.amount.checked_sub(amount).ok_or_else(|| {
            debug!(
                listing = %listing_id,
                requested = %amount,
                available = %listing.amount,
                "purchase rejected: not enough listed"
            );
            MarketError::InsufficientListedAmount {
                requested: amount,
                available: listing.amount,
            }
        })?;

        let total_cost = purchase_cost(listing.price_per_unit, amount)
            .ok_or(MarketError::Overflow("purchase cost"))?;

        let funds = self.state.currency.balance_of(buyer);
        if funds < total_cost {
            debug!(
                listing = %listing_id,
                buyer = %buyer,
                required = %total_cost,
                available = %funds,
                "purchase rejected: insufficient currency"
            );
            return Err(MarketError::InsufficientCurrencyBalance {
                required: total_cost,
                available: funds,
            });
        }

        let seller = listing.seller.clone();
        if &seller != buyer {
            self.state
                .currency
                .check_credit(&seller, total_cost)
                .map_err(|_| MarketError::Overflow("seller currency balance"))?;
        }
        self.state
            .energy
            .check_credit(buyer, amount)
            .map_err(|_| MarketError::Overflow("buyer energy balance"))?;

        // Validated; nothing below can fail.
        self.state.currency.transfer(buyer, &seller, total_cost)?;
        self.state.energy.credit(buyer, amount)?;
        if remaining.is_zero() {
            self.state.listings.remove(&listing_id);
        } else if let Some(listing) = self.state.listings.get_mut(&listing_id) {
            listing.amount = remaining;
        }

        info!(
            listing = %listing_id,
            buyer = %buyer,
            seller = %seller,
            amount = %amount,
            total_cost = %total_cost,
            remaining = %remaining,
            "energy purchased"
        );

        Ok(PurchaseReceipt {
            listing_id,
            buyer: buyer.clone(),
            seller,
            amount,
            total_cost,
            remaining,
        })
    }

    /// Looks up a live listing.
    #[must_use]
    pub fn listing(&self, id: ListingId) -> Option<&Listing> {
        self.state.listings.get(&id)
    }

    /// All live listings, in id order.
    pub fn listings(&self) -> impl Iterator<Item = &Listing> {
        self.state.listings.values()
    }

    /// Live listings created by `seller`, in id order.
    pub fn listings_by_seller<'a>(
        &'a self,
        seller: &'a Identity,
    ) -> impl Iterator<Item = &'a Listing> + 'a {
        self.listings().filter(move |l| l.is_sold_by(seller))
    }

    /// Spendable energy held by `identity`.
    #[must_use]
    pub fn energy_balance(&self, identity: &Identity) -> Amount {
        self.state.energy.balance_of(identity)
    }

    /// Currency held by `identity`.
    #[must_use]
    pub fn currency_balance(&self, identity: &Identity) -> Amount {
        self.state.currency.balance_of(identity)
    }

    /// Energy held in escrow across live listings.
    #[must_use]
    pub fn escrowed_energy(&self) -> u128 {
        self.state
            .listings
            .values()
            .map(|l| u128::from(l.amount.units()))
            .sum()
    }

    /// Spendable plus escrowed energy. Trading never changes this.
    #[must_use]
    pub fn total_energy(&self) -> u128 {
        self.state.energy.total() + self.escrowed_energy()
    }

    /// Currency across all identities. Trading never changes this.
    #[must_use]
    pub fn total_currency(&self) -> u128 {
        self.state.currency.total()
    }
}
