//! # Provider Boundaries
//!
//! The sync actor never talks to a transport directly. Reads and writes go through a
//! [`DataProvider`]; the current user comes from an [`IdentityProvider`]. Both are injected
//! when the actor (or the view layer) starts, so tests can swap in the doubles from
//! [`crate::mock`] and the demo can run against [`crate::memory`].

use crate::error::SyncError;
use crate::query::ListParams;
use crate::record::{Record, RecordId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Uniform read/write contract for every resource.
#[async_trait]
pub trait DataProvider: Send + Sync + 'static {
    /// Reads one page of a resource, in the order the backend chooses.
    async fn get_list(&self, resource: &str, params: &ListParams) -> Result<Vec<Record>, SyncError>;

    /// Reads one record. Fails with [`SyncError::NotFound`] when no record has that id.
    async fn get_one(&self, resource: &str, id: &RecordId) -> Result<Record, SyncError>;

    async fn create(&self, resource: &str, payload: Record) -> Result<Record, SyncError>;

    async fn update(&self, resource: &str, id: &RecordId, payload: Record) -> Result<Record, SyncError>;
}

/// Minimal profile of the authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// The signed-in user, or `None` before authentication has resolved.
    async fn current(&self) -> Result<Option<Identity>, SyncError>;
}

/// Identity provider with a fixed answer.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity(Option<Identity>);

impl StaticIdentity {
    pub fn signed_in(id: impl Into<String>) -> Self {
        Self(Some(Identity { id: id.into() }))
    }

    pub fn anonymous() -> Self {
        Self(None)
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentity {
    async fn current(&self) -> Result<Option<Identity>, SyncError> {
        Ok(self.0.clone())
    }
}
