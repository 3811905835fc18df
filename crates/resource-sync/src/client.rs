//! # Sync Client
//!
//! Handles for talking to a [`SyncActor`](crate::SyncActor).

use crate::error::SyncError;
use crate::message::{MutationRequest, SubscriptionId, SyncRequest};
use crate::query::ResourceQuery;
use crate::record::{Record, RecordId};
use crate::state::{MutationState, QueryResult};
use tokio::sync::{mpsc, oneshot, watch};

/// ## SyncClient
///
/// Async API in front of the sync actor. Every method forwards a request over a Tokio mpsc
/// channel and, where the actor answers, awaits a oneshot reply.
///
/// * **Cloneable** – holds only a sender, so cloning is inexpensive.
/// * **Subscriptions** – [`query`](Self::query) hands back a [`QueryHandle`] that is kept
///   current by the actor until it is dropped.
/// * **One-off calls** – [`list`](Self::list) and [`get_one`](Self::get_one) read once and
///   keep no state.
#[derive(Clone)]
pub struct SyncClient {
    sender: mpsc::Sender<SyncRequest>,
}

impl SyncClient {
    pub fn new(sender: mpsc::Sender<SyncRequest>) -> Self {
        Self { sender }
    }

    /// Mounts a query. A disabled query stays idle and issues no request.
    pub async fn query(&self, query: ResourceQuery) -> Result<QueryHandle, SyncError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(SyncRequest::Subscribe {
                query: query.clone(),
                respond_to,
            })
            .await
            .map_err(|_| SyncError::ActorClosed)?;
        let (id, state) = response.await.map_err(|_| SyncError::ActorDropped)??;
        Ok(QueryHandle {
            id,
            query,
            state,
            client: self.clone(),
            closed: false,
        })
    }

    /// Submits a create or update. The returned handle reports progress; the request itself
    /// proceeds whether or not the handle is kept.
    pub async fn mutate(&self, request: MutationRequest) -> Result<MutationHandle, SyncError> {
        let (state, receiver) = watch::channel(MutationState::Pending);
        self.sender
            .send(SyncRequest::Mutate { request, state })
            .await
            .map_err(|_| SyncError::ActorClosed)?;
        Ok(MutationHandle { state: receiver })
    }

    pub async fn list(&self, query: ResourceQuery) -> Result<Vec<Record>, SyncError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(SyncRequest::Fetch { query, respond_to })
            .await
            .map_err(|_| SyncError::ActorClosed)?;
        response.await.map_err(|_| SyncError::ActorDropped)?
    }

    pub async fn get_one(&self, resource: &str, id: impl Into<RecordId>) -> Result<Record, SyncError> {
        let id = id.into();
        let records = self.list(ResourceQuery::one(resource, id.clone())).await?;
        records
            .into_iter()
            .next()
            .ok_or_else(|| SyncError::not_found(resource, id))
    }

    async fn set_query(&self, id: SubscriptionId, query: ResourceQuery) -> Result<bool, SyncError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(SyncRequest::SetQuery {
                id,
                query,
                respond_to,
            })
            .await
            .map_err(|_| SyncError::ActorClosed)?;
        response.await.map_err(|_| SyncError::ActorDropped)?
    }

    async fn refetch(&self, id: SubscriptionId) -> Result<(), SyncError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(SyncRequest::Refetch { id, respond_to })
            .await
            .map_err(|_| SyncError::ActorClosed)?;
        response.await.map_err(|_| SyncError::ActorDropped)?
    }
}

/// A mounted query.
///
/// Reads never block: [`current`](Self::current) returns the latest snapshot. Use
/// [`changed`](Self::changed) to wait for the next one, or [`settled`](Self::settled) to wait
/// until nothing is in flight. Dropping the handle unsubscribes.
pub struct QueryHandle {
    id: SubscriptionId,
    query: ResourceQuery,
    state: watch::Receiver<QueryResult>,
    client: SyncClient,
    closed: bool,
}

impl QueryHandle {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// The parameters most recently sent for this subscription.
    pub fn query(&self) -> &ResourceQuery {
        &self.query
    }

    pub fn current(&self) -> QueryResult {
        self.state.borrow().clone()
    }

    pub async fn changed(&mut self) -> Result<QueryResult, SyncError> {
        self.state.changed().await.map_err(|_| SyncError::ActorClosed)?;
        Ok(self.state.borrow_and_update().clone())
    }

    pub async fn settled(&mut self) -> Result<QueryResult, SyncError> {
        let state = self
            .state
            .wait_for(QueryResult::is_settled)
            .await
            .map_err(|_| SyncError::ActorClosed)?;
        Ok(QueryResult::clone(&state))
    }

    /// Replaces the parameters. Returns `false` when they produce the same key and enabled
    /// flag as before, in which case nothing is re-issued.
    pub async fn set_query(&mut self, query: ResourceQuery) -> Result<bool, SyncError> {
        let changed = self.client.set_query(self.id, query.clone()).await?;
        self.query = query;
        Ok(changed)
    }

    pub async fn refetch(&self) -> Result<(), SyncError> {
        self.client.refetch(self.id).await
    }

    /// Unsubscribes, waiting for channel capacity instead of relying on `Drop`.
    pub async fn close(mut self) {
        self.closed = true;
        let _ = self
            .client
            .sender
            .send(SyncRequest::Unsubscribe { id: self.id })
            .await;
    }
}

impl Drop for QueryHandle {
    fn drop(&mut self) {
        if !self.closed {
            // A full channel is fine here; the actor prunes subscriptions with no receivers.
            let _ = self.client.sender.try_send(SyncRequest::Unsubscribe { id: self.id });
        }
    }
}

/// Progress of one submitted mutation.
pub struct MutationHandle {
    state: watch::Receiver<MutationState>,
}

impl MutationHandle {
    pub fn state(&self) -> MutationState {
        self.state.borrow().clone()
    }

    /// Waits for the mutation to succeed or fail.
    pub async fn settled(&mut self) -> Result<Record, SyncError> {
        let state = self
            .state
            .wait_for(MutationState::is_settled)
            .await
            .map_err(|_| SyncError::ActorDropped)?;
        MutationState::clone(&state)
            .into_result()
            .unwrap_or(Err(SyncError::ActorDropped))
    }
}
