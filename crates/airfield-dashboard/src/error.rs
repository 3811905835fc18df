//! Error types for the dashboard.

use resource_sync::SyncError;
use thiserror::Error;

/// Errors surfaced by dashboard clients and view models.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DashboardError {
    /// The sync layer or the backend behind it failed.
    #[error(transparent)]
    Sync(#[from] SyncError),

    /// A record did not have the shape its resource promises.
    #[error("Malformed {resource} record: {message}")]
    Decode { resource: String, message: String },

    /// Form input rejected before submission.
    #[error("Invalid input: {0}")]
    Validation(String),

    /// A background task ended abnormally.
    #[error("Task failed: {0}")]
    Task(String),
}

impl DashboardError {
    pub fn decode(resource: &str, e: serde_json::Error) -> Self {
        DashboardError::Decode {
            resource: resource.to_string(),
            message: e.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DashboardError::Sync(SyncError::NotFound { .. }))
    }
}
