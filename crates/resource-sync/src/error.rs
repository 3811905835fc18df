//! # Sync Errors
//!
//! This module defines the common error type shared by the sync actor, its clients and
//! every data provider. Errors are carried inside query and mutation state, so they are
//! `Clone` and comparable rather than boxed.

/// Errors that can occur while reading or writing resources.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SyncError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("{resource} record not found: {id}")]
    NotFound { resource: String, id: String },
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
}

impl SyncError {
    pub fn not_found(resource: impl Into<String>, id: impl ToString) -> Self {
        SyncError::NotFound {
            resource: resource.into(),
            id: id.to_string(),
        }
    }
}
