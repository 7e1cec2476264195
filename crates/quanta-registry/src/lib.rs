//! # quanta-registry
//!
//! Registry of physical energy-harvesting detectors.
//!
//! This crate provides:
//!
//! - Detector registration with sequential ids
//! - Owner-gated status transitions (active, maintenance, inactive)
//! - Owner-gated harvest accounting
//!
//! Harvested energy is bookkeeping only. Moving it into a spendable
//! marketplace balance is the host's job.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod detector;
pub mod error;
pub mod registry;

pub use detector::{Detector, DetectorId, DetectorStatus};
pub use error::{RegistryError, Result};
pub use registry::{DetectorRegistry, RegistryState};
