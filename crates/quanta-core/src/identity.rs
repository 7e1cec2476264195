//! Caller identities.
//!
//! Authentication happens outside this workspace. An [`Identity`] is the
//! already-verified principal the host passes into every operation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{LedgerError, Result};

/// An authenticated principal (detector owner, seller, or buyer).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identity(String);

impl Identity {
    /// Create an identity from a string.
    ///
    /// # Errors
    ///
    /// Returns error if the string is empty or carries leading/trailing
    /// whitespace, either of which would make two callers compare unequal
    /// for the same principal.
    pub fn new(s: impl Into<String>) -> Result<Self> {
        let s = s.into();
        if s.is_empty() {
            return Err(LedgerError::invalid_identity("identity must not be empty"));
        }
        if s.trim() != s {
            return Err(LedgerError::invalid_identity(format!(
                "identity {s:?} has surrounding whitespace"
            )));
        }
        Ok(Self(s))
    }

    /// Get the identity string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Identity {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Identity {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for Identity {
    type Error = LedgerError;

    fn try_from(s: String) -> Result<Self> {
        Self::new(s)
    }
}

impl From<Identity> for String {
    fn from(identity: Identity) -> Self {
        identity.0
    }
}
