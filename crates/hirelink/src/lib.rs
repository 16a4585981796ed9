//! Job-marketplace application lifecycle core and notification bridge.
//!
//! The `marketplace` module owns the application state machine, the
//! chat-channel provisioning that follows an engaged status, and the
//! preference-matched job-alert fan-out. Storage and collaborator lookups
//! are trait seams so the HTTP service, demos, and tests can each supply
//! their own backing implementations.

pub mod config;
pub mod error;
pub mod marketplace;
pub mod telemetry;
