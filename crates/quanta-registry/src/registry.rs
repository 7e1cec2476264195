//! Detector registry.
//!
//! Owns every detector record. All mutations are gated on the caller being
//! the detector's owner, checked before anything is written.

use quanta_core::{Amount, Clock, Identity, SystemClock};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use tracing::{debug, info};

use crate::detector::{Detector, DetectorId, DetectorStatus};
use crate::error::{RegistryError, Result};

/// Persistable registry state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryState {
    /// Id handed to the next registration.
    next_id: u64,
    /// Every detector ever registered.
    detectors: BTreeMap<DetectorId, Detector>,
}

impl Default for RegistryState {
    fn default() -> Self {
        Self {
            next_id: 1,
            detectors: BTreeMap::new(),
        }
    }
}

impl RegistryState {
    fn validate(&self) -> Result<()> {
        if self.next_id == 0 {
            return Err(RegistryError::CorruptState(
                "detector id counter must start at 1".to_string(),
            ));
        }
        for (key, detector) in &self.detectors {
            if key.get() >= self.next_id {
                return Err(RegistryError::CorruptState(format!(
                    "detector id {key} not below counter {}",
                    self.next_id
                )));
            }
            if detector.id != *key {
                return Err(RegistryError::CorruptState(format!(
                    "detector {} stored under id {key}",
                    detector.id
                )));
            }
        }
        Ok(())
    }
}

/// The detector registry.
#[derive(Debug)]
pub struct DetectorRegistry<C = SystemClock> {
    state: RegistryState,
    clock: C,
}

impl DetectorRegistry<SystemClock> {
    /// Creates an empty registry on the wall clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for DetectorRegistry<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> DetectorRegistry<C> {
    /// Creates an empty registry reading time from `clock`.
    pub fn with_clock(clock: C) -> Self {
        Self {
            state: RegistryState::default(),
            clock,
        }
    }

    /// Restores a registry from a previously saved state.
    ///
    /// The id counter must be positive and above every stored id, and each
    /// record must sit under its own id.
    pub fn from_state(state: RegistryState, clock: C) -> Result<Self> {
        state.validate()?;
        Ok(Self { state, clock })
    }

    /// Current state, for persistence.
    #[must_use]
    pub fn state(&self) -> &RegistryState {
        &self.state
    }

    /// Registers a new detector owned by `owner`.
    ///
    /// The detector starts `active` with nothing harvested, and its
    /// maintenance timestamp is the registration time.
    pub fn register_detector(
        &mut self,
        location: impl Into<String>,
        detector_type: impl Into<String>,
        efficiency: f64,
        owner: Identity,
    ) -> Result<DetectorId> {
        let id = DetectorId::new(self.state.next_id);
        let next_id = self
            .state
            .next_id
            .checked_add(1)
            .ok_or(RegistryError::Overflow("detector id counter"))?;

        let Entry::Vacant(slot) = self.state.detectors.entry(id) else {
            return Err(RegistryError::CorruptState(format!(
                "detector id {id} already assigned"
            )));
        };
        let detector = slot.insert(Detector {
            id,
            owner,
            location: location.into(),
            detector_type: detector_type.into(),
            efficiency,
            status: DetectorStatus::Active,
            energy_harvested: Amount::ZERO,
            last_maintenance: self.clock.now(),
        });

        info!(
            detector = %id,
            owner = %detector.owner,
            location = %detector.location,
            "detector registered"
        );

        self.state.next_id = next_id;
        Ok(id)
    }

    /// Changes a detector's status from its textual name.
    ///
    /// Failures are reported in order: unknown detector, wrong caller,
    /// then unknown status. Only `status` changes on success.
    pub fn update_detector_status(
        &mut self,
        id: DetectorId,
        new_status: &str,
        caller: &Identity,
    ) -> Result<bool> {
        let detector = Self::owned_mut(&mut self.state.detectors, id, caller)?;
        let status = new_status.parse::<DetectorStatus>().inspect_err(|_| {
            debug!(detector = %id, status = new_status, "rejected unknown status");
        })?;
        Self::apply_status(detector, status);
        Ok(true)
    }

    /// Changes a detector's status.
    pub fn set_status(
        &mut self,
        id: DetectorId,
        status: DetectorStatus,
        caller: &Identity,
    ) -> Result<bool> {
        let detector = Self::owned_mut(&mut self.state.detectors, id, caller)?;
        Self::apply_status(detector, status);
        Ok(true)
    }

    /// Adds `amount` to a detector's harvest accumulator.
    ///
    /// Does not touch any marketplace balance.
    pub fn record_energy_harvest(
        &mut self,
        id: DetectorId,
        amount: Amount,
        caller: &Identity,
    ) -> Result<bool> {
        let detector = Self::owned_mut(&mut self.state.detectors, id, caller)?;
        let total = detector
            .energy_harvested
            .checked_add(amount)
            .ok_or(RegistryError::Overflow("energy harvested"))?;
        detector.energy_harvested = total;

        info!(detector = %id, amount = %amount, total = %total, "energy harvest recorded");
        Ok(true)
    }

    /// Looks up a detector.
    #[must_use]
    pub fn detector(&self, id: DetectorId) -> Option<&Detector> {
        self.state.detectors.get(&id)
    }

    /// Detectors owned by `owner`, in id order.
    pub fn detectors_by_owner<'a>(
        &'a self,
        owner: &'a Identity,
    ) -> impl Iterator<Item = &'a Detector> + 'a {
        self.state
            .detectors
            .values()
            .filter(move |d| d.is_owned_by(owner))
    }

    /// Number of registered detectors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.detectors.len()
    }

    /// Returns true if nothing has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.detectors.is_empty()
    }

    /// Energy harvested across all detectors.
    #[must_use]
    pub fn total_energy_harvested(&self) -> u128 {
        self.state
            .detectors
            .values()
            .map(|d| u128::from(d.energy_harvested.units()))
            .sum()
    }

    fn owned_mut<'a>(
        detectors: &'a mut BTreeMap<DetectorId, Detector>,
        id: DetectorId,
        caller: &Identity,
    ) -> Result<&'a mut Detector> {
        let detector = detectors.get_mut(&id).ok_or_else(|| {
            debug!(detector = %id, "detector not found");
            RegistryError::NotFound(id)
        })?;
        if !detector.is_owned_by(caller) {
            debug!(detector = %id, caller = %caller, "caller does not own detector");
            return Err(RegistryError::NotAuthorized {
                detector: id,
                caller: caller.clone(),
            });
        }
        Ok(detector)
    }

    fn apply_status(detector: &mut Detector, status: DetectorStatus) {
        let previous = detector.status;
        detector.status = status;
        info!(
            detector = %detector.id,
            from = %previous,
            to = %status,
            "detector status updated"
        );
    }
}
