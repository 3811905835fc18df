//! # Observable State
//!
//! Subscribers never see the actor's internals, only these snapshots pushed through
//! `tokio::sync::watch` channels. Every change to a snapshot is a re-render signal.

use crate::error::SyncError;
use crate::record::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    /// Disabled, or not yet issued.
    Idle,
    /// First fetch for the current key is in flight.
    Loading,
    Success,
    Error,
}

/// Snapshot of one query subscription.
///
/// Once a fetch settles exactly one of `is_loading()`, `is_error()` and `data.is_some()`
/// holds. A background refetch of the same key keeps the data and raises `is_fetching`.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    pub status: QueryStatus,
    /// Records in backend order. A single-record query holds exactly one.
    pub data: Option<Vec<Record>>,
    pub error: Option<SyncError>,
    pub is_fetching: bool,
}

impl Default for QueryResult {
    fn default() -> Self {
        Self::idle()
    }
}

impl QueryResult {
    pub fn idle() -> Self {
        Self {
            status: QueryStatus::Idle,
            data: None,
            error: None,
            is_fetching: false,
        }
    }

    pub fn loading() -> Self {
        Self {
            status: QueryStatus::Loading,
            is_fetching: true,
            ..Self::idle()
        }
    }

    pub fn success(data: Vec<Record>) -> Self {
        Self {
            status: QueryStatus::Success,
            data: Some(data),
            ..Self::idle()
        }
    }

    pub fn failure(error: SyncError) -> Self {
        Self {
            status: QueryStatus::Error,
            error: Some(error),
            ..Self::idle()
        }
    }

    pub fn is_idle(&self) -> bool {
        self.status == QueryStatus::Idle
    }

    pub fn is_loading(&self) -> bool {
        self.status == QueryStatus::Loading
    }

    pub fn is_error(&self) -> bool {
        self.status == QueryStatus::Error
    }

    pub fn is_success(&self) -> bool {
        self.status == QueryStatus::Success
    }

    /// No request is in flight for this subscription.
    pub fn is_settled(&self) -> bool {
        !self.is_loading() && !self.is_fetching
    }

    pub fn records(&self) -> &[Record] {
        self.data.as_deref().unwrap_or(&[])
    }

    /// The record of a single-record query.
    pub fn record(&self) -> Option<&Record> {
        self.data.as_ref().and_then(|d| d.first())
    }
}

/// Lifecycle of one mutation.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum MutationState {
    #[default]
    Idle,
    Pending,
    Succeeded(Record),
    Failed(SyncError),
}

impl MutationState {
    pub fn is_pending(&self) -> bool {
        matches!(self, MutationState::Pending)
    }

    pub fn is_settled(&self) -> bool {
        matches!(self, MutationState::Succeeded(_) | MutationState::Failed(_))
    }

    pub fn error(&self) -> Option<&SyncError> {
        match self {
            MutationState::Failed(e) => Some(e),
            _ => None,
        }
    }

    /// Converts a settled state into the mutation's outcome.
    pub fn into_result(self) -> Option<Result<Record, SyncError>> {
        match self {
            MutationState::Succeeded(record) => Some(Ok(record)),
            MutationState::Failed(e) => Some(Err(e)),
            MutationState::Idle | MutationState::Pending => None,
        }
    }
}
