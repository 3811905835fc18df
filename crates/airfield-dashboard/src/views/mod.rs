//! # View Models
//!
//! Everything the dashboard pages display, derived from query snapshots by plain functions.
//! Nothing here renders; a UI layer maps these values onto its widgets.

pub mod alerts_panel;
pub mod clock;
pub mod fuel_page;
pub mod report_view;

pub use alerts_panel::*;
pub use clock::*;
pub use fuel_page::*;
pub use report_view::*;

use crate::error::DashboardError;
use resource_sync::{decode, QueryResult};
use serde::de::DeserializeOwned;

/// Semantic colour of a chip or badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Error,
    Warning,
    Info,
    Success,
    Default,
}

/// Decodes every record of a query snapshot. A snapshot without data yields an empty list.
pub fn decode_records<T: DeserializeOwned>(result: &QueryResult, resource: &str) -> Result<Vec<T>, DashboardError> {
    result
        .records()
        .iter()
        .map(|r| decode(r).map_err(|e| DashboardError::decode(resource, e)))
        .collect()
}
