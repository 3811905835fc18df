//! # Airfield Dashboard
//!
//! Client side of an airfield operations dashboard built on `resource_sync`.
//!
//! - **[clients]**: one typed client per backend resource (`fuels`, `fuelings`, `alerts`, `sms`).
//! - **[model]**: the record shapes those resources hold.
//! - **[views]**: what each page displays, derived from query snapshots.
//! - **[lifecycle]**: starting and stopping the sync runtime.
//! - **[config]**: buffer and page sizes from the environment.

pub mod clients;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod model;
pub mod views;

pub use config::SyncConfig;
pub use error::DashboardError;
pub use lifecycle::DashboardSystem;
