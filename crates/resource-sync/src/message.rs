//! # Sync Messages
//!
//! Message types exchanged between [`SyncClient`](crate::SyncClient) and
//! [`SyncActor`](crate::SyncActor), plus the [`MutationRequest`] DTO.

use crate::error::SyncError;
use crate::query::ResourceQuery;
use crate::record::{Record, RecordId};
use crate::state::{MutationState, QueryResult};
use std::fmt::{Debug, Display};
use tokio::sync::{oneshot, watch};

/// Type alias for the one-shot response channel used by the actor.
pub type Response<T> = oneshot::Sender<Result<T, SyncError>>;

/// Callback run once when a mutation succeeds.
pub type SuccessCallback = Box<dyn FnOnce() + Send + 'static>;

/// Identifies one live query subscription inside the actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub u64);

impl Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sub_{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationAction {
    Create,
    Update(RecordId),
}

/// A create or update against one resource.
pub struct MutationRequest {
    pub resource: String,
    pub action: MutationAction,
    pub payload: Record,
    pub on_success: Option<SuccessCallback>,
}

impl MutationRequest {
    pub fn create(resource: impl Into<String>, payload: Record) -> Self {
        Self {
            resource: resource.into(),
            action: MutationAction::Create,
            payload,
            on_success: None,
        }
    }

    pub fn update(resource: impl Into<String>, id: impl Into<RecordId>, payload: Record) -> Self {
        Self {
            resource: resource.into(),
            action: MutationAction::Update(id.into()),
            payload,
            on_success: None,
        }
    }

    /// Runs `callback` on the sync actor's task once the backend accepts the write, before
    /// affected queries are refetched. Keep it short; a panic is caught and logged.
    pub fn on_success(mut self, callback: impl FnOnce() + Send + 'static) -> Self {
        self.on_success = Some(Box::new(callback));
        self
    }
}

impl Debug for MutationRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MutationRequest")
            .field("resource", &self.resource)
            .field("action", &self.action)
            .field("payload", &self.payload)
            .field("on_success", &self.on_success.is_some())
            .finish()
    }
}

/// Requests sent from clients to the sync actor.
///
/// Subscriptions follow a view's lifetime: `Subscribe` on mount, `SetQuery` whenever its
/// parameters change, `Unsubscribe` on unmount. `Fetch` is a one-off read with no state.
#[derive(Debug)]
pub enum SyncRequest {
    Subscribe {
        query: ResourceQuery,
        respond_to: Response<(SubscriptionId, watch::Receiver<QueryResult>)>,
    },
    /// Responds with `true` when the change re-issued (or disabled) the query.
    SetQuery {
        id: SubscriptionId,
        query: ResourceQuery,
        respond_to: Response<bool>,
    },
    Refetch {
        id: SubscriptionId,
        respond_to: Response<()>,
    },
    Unsubscribe {
        id: SubscriptionId,
    },
    Mutate {
        request: MutationRequest,
        state: watch::Sender<MutationState>,
    },
    Fetch {
        query: ResourceQuery,
        respond_to: Response<Vec<Record>>,
    },
}
