//! Marketplace domain core: application lifecycle, chat provisioning, and
//! the preference-matched job-alert bridge.

pub mod alerts;
pub mod applications;
pub mod directory;
