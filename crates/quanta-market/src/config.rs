//! Marketplace configuration.

use serde::{Deserialize, Serialize};

/// Marketplace behaviour switches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketConfig {
    /// Reject purchases against listings past their expiration.
    ///
    /// Off by default: expiration is stored but purchases ignore it. An
    /// expired listing keeps its escrow either way.
    pub enforce_expiration: bool,
}

impl MarketConfig {
    /// Configuration that rejects purchases on expired listings.
    #[must_use]
    pub const fn enforcing_expiration() -> Self {
        Self {
            enforce_expiration: true,
        }
    }
}
