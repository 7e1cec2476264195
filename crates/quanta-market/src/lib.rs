//! # quanta-market
//!
//! Marketplace for trading harvested energy against currency.
//!
//! This crate provides:
//!
//! - Escrowed listings: the seller's energy is debited when a listing is created
//! - Atomic purchase settlement with partial fills
//! - Separate energy and currency ledgers, both conserved by trading
//!
//! Energy is fungible here. The marketplace never looks at which detector
//! produced it.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod listing;
pub mod marketplace;
pub mod settlement;

pub use config::MarketConfig;
pub use error::{MarketError, Result};
pub use listing::{Listing, ListingId};
pub use marketplace::{EnergyMarketplace, MarketState};
pub use settlement::{purchase_cost, PurchaseReceipt};
