//! Detector records.

use chrono::{DateTime, Utc};
use quanta_core::{Amount, Identity};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::RegistryError;

/// Sequential detector identifier, starting at 1.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct DetectorId(u64);

impl DetectorId {
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

impl fmt::Display for DetectorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Operational status of a detector.
///
/// Every state may move to every other state; none is terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectorStatus {
    /// Harvesting normally.
    #[default]
    Active,
    /// Taken down for servicing.
    Maintenance,
    /// Switched off.
    Inactive,
}

impl DetectorStatus {
    /// All states, in declaration order.
    pub const ALL: [Self; 3] = [Self::Active, Self::Maintenance, Self::Inactive];

    /// Lowercase name used on the wire.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Maintenance => "maintenance",
            Self::Inactive => "inactive",
        }
    }
}

impl fmt::Display for DetectorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DetectorStatus {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "maintenance" => Ok(Self::Maintenance),
            "inactive" => Ok(Self::Inactive),
            other => Err(RegistryError::InvalidStatus(other.to_string())),
        }
    }
}

/// A registered energy-harvesting detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detector {
    /// Detector id.
    pub id: DetectorId,
    /// Owning identity; the only caller allowed to mutate this record.
    pub owner: Identity,
    /// Free-text location.
    pub location: String,
    /// Free-text detector type.
    #[serde(rename = "type")]
    pub detector_type: String,
    /// Reported efficiency. Informational, not range checked.
    pub efficiency: f64,
    /// Current status.
    pub status: DetectorStatus,
    /// Total energy recorded against this detector.
    pub energy_harvested: Amount,
    /// Set at registration.
    pub last_maintenance: DateTime<Utc>,
}

impl Detector {
    /// Returns true if `caller` owns this detector.
    #[must_use]
    pub fn is_owned_by(&self, caller: &Identity) -> bool {
        &self.owner == caller
    }
}
