//! Integration test crate for Quanta components.
//!
//! Runs end-to-end flows that span the registry and the marketplace.
//! It has no public API - all functionality is in the test modules.

#![forbid(unsafe_code)]
