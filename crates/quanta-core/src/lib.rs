//! # quanta-core
//!
//! Shared primitives for the Quanta detector registry and energy marketplace.
//!
//! This crate provides:
//! - [`Identity`]: an already-authenticated caller principal
//! - [`Amount`]: a non-negative quantity of energy or currency units
//! - [`BalanceLedger`]: identity to balance mapping with checked movements
//! - [`Clock`]: the time source components read `now` from
//!
//! ## Example
//!
//! ```rust
//! use quanta_core::{Amount, BalanceLedger, Identity};
//!
//! # fn example() -> quanta_core::Result<()> {
//! let alice = Identity::new("alice")?;
//! let bob = Identity::new("bob")?;
//!
//! let mut ledger = BalanceLedger::new();
//! ledger.credit(&alice, Amount::new(100))?;
//! ledger.transfer(&alice, &bob, Amount::new(40))?;
//!
//! assert_eq!(ledger.balance_of(&alice), Amount::new(60));
//! assert_eq!(ledger.balance_of(&bob), Amount::new(40));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod amount;
pub mod clock;
pub mod error;
pub mod identity;
pub mod ledger;

pub use amount::Amount;
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{LedgerError, Result};
pub use identity::Identity;
pub use ledger::BalanceLedger;
