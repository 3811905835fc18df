//! # Sync Actor
//!
//! This module defines the `SyncActor`, the component that owns every query subscription
//! and runs every mutation. It processes requests from [`SyncClient`] handles and
//! completions from provider calls on a single task, so subscription state needs no locks.

use crate::client::SyncClient;
use crate::error::SyncError;
use crate::message::{MutationAction, MutationRequest, SubscriptionId, SuccessCallback, SyncRequest};
use crate::provider::DataProvider;
use crate::query::{QueryKey, QueryTarget, ResourceQuery};
use crate::record::Record;
use crate::state::{MutationState, QueryResult};
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

/// One mounted query.
struct Subscription {
    query: ResourceQuery,
    key: QueryKey,
    /// Bumped on every issued fetch and on disable. Only a completion carrying the
    /// current generation may touch `state`.
    generation: u64,
    state: watch::Sender<QueryResult>,
}

/// Provider call completions, reported back to the actor task.
enum Settled {
    Query {
        id: SubscriptionId,
        generation: u64,
        outcome: Result<Vec<Record>, SyncError>,
    },
    Mutation {
        resource: String,
        outcome: Result<Record, SyncError>,
        on_success: Option<SuccessCallback>,
        state: watch::Sender<MutationState>,
    },
}

/// The actor that keeps query subscriptions in sync with a [`DataProvider`].
///
/// # Concurrency Model
/// Provider calls run in spawned tasks so that independent queries proceed concurrently,
/// but their results are applied here, one at a time. A subscription whose parameters
/// changed while a request was in flight has moved to a newer generation; the late
/// response is dropped instead of overwriting the newer state.
///
/// # Usage Pattern
///
/// ```rust
/// use resource_sync::memory::MemoryBackend;
/// use resource_sync::{ResourceQuery, SyncActor};
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() {
///     let (backend, provider) = MemoryBackend::new(16);
///     tokio::spawn(backend.run());
///
///     let (actor, client) = SyncActor::new(16);
///     tokio::spawn(actor.run(Arc::new(provider)));
///
///     let mut fuels = client.query(ResourceQuery::list("fuels")).await.unwrap();
///     let result = fuels.settled().await.unwrap();
///     assert!(result.is_success());
/// }
/// ```
pub struct SyncActor {
    receiver: mpsc::Receiver<SyncRequest>,
    settled_tx: mpsc::UnboundedSender<Settled>,
    settled_rx: mpsc::UnboundedReceiver<Settled>,
    subscriptions: HashMap<SubscriptionId, Subscription>,
    next_id: u64,
}

impl SyncActor {
    /// Creates a new `SyncActor` and its associated `SyncClient`.
    ///
    /// `buffer_size` bounds the request channel; callers wait when it is full.
    pub fn new(buffer_size: usize) -> (Self, SyncClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let (settled_tx, settled_rx) = mpsc::unbounded_channel();
        let actor = Self {
            receiver,
            settled_tx,
            settled_rx,
            subscriptions: HashMap::new(),
            next_id: 1,
        };
        (actor, SyncClient::new(sender))
    }

    /// Runs the event loop until every client handle has been dropped.
    ///
    /// The provider is injected here rather than in `new()`, so clients can be handed out
    /// before the backend is ready.
    pub async fn run(mut self, provider: Arc<dyn DataProvider>) {
        info!("Sync actor started");

        loop {
            tokio::select! {
                msg = self.receiver.recv() => match msg {
                    Some(request) => self.handle_request(request, &provider),
                    None => break,
                },
                Some(settled) = self.settled_rx.recv() => self.handle_settled(settled, &provider),
            }
        }

        info!(subscriptions = self.subscriptions.len(), "Shutdown");
    }

    fn handle_request(&mut self, request: SyncRequest, provider: &Arc<dyn DataProvider>) {
        self.prune_closed();

        match request {
            SyncRequest::Subscribe { query, respond_to } => {
                let id = SubscriptionId(self.next_id);
                self.next_id += 1;
                let (state, receiver) = watch::channel(QueryResult::idle());
                let enabled = query.enabled;
                debug!(%id, resource = %query.resource, enabled, "Subscribe");
                let key = query.key();
                self.subscriptions.insert(
                    id,
                    Subscription {
                        query,
                        key,
                        generation: 0,
                        state,
                    },
                );
                if enabled {
                    self.start_fetch(id, false, provider);
                }
                let _ = respond_to.send(Ok((id, receiver)));
            }
            SyncRequest::SetQuery {
                id,
                query,
                respond_to,
            } => {
                let Some(sub) = self.subscriptions.get_mut(&id) else {
                    warn!(%id, "SetQuery on unknown subscription");
                    let _ = respond_to.send(Err(SyncError::not_found("subscription", id)));
                    return;
                };
                let key = query.key();
                let key_changed = key != sub.key;
                let enabled_changed = query.enabled != sub.query.enabled;
                sub.query = query;
                sub.key = key;
                if !key_changed && !enabled_changed {
                    let _ = respond_to.send(Ok(false));
                    return;
                }
                debug!(%id, key_changed, enabled = sub.query.enabled, "Parameters changed");
                if sub.query.enabled {
                    self.start_fetch(id, !key_changed, provider);
                } else {
                    sub.generation += 1;
                    let idle = QueryResult::idle();
                    sub.state.send_if_modified(|s| {
                        if *s == idle {
                            return false;
                        }
                        *s = idle;
                        true
                    });
                }
                let _ = respond_to.send(Ok(true));
            }
            SyncRequest::Refetch { id, respond_to } => match self.subscriptions.get(&id) {
                Some(sub) => {
                    if sub.query.enabled {
                        self.start_fetch(id, true, provider);
                    } else {
                        debug!(%id, "Refetch ignored for disabled query");
                    }
                    let _ = respond_to.send(Ok(()));
                }
                None => {
                    warn!(%id, "Refetch on unknown subscription");
                    let _ = respond_to.send(Err(SyncError::not_found("subscription", id)));
                }
            },
            SyncRequest::Unsubscribe { id } => {
                if self.subscriptions.remove(&id).is_some() {
                    debug!(%id, size = self.subscriptions.len(), "Unsubscribe");
                }
            }
            SyncRequest::Mutate { request, state } => self.start_mutation(request, state, provider),
            SyncRequest::Fetch { query, respond_to } => {
                if !query.enabled {
                    let _ = respond_to.send(Ok(Vec::new()));
                    return;
                }
                debug!(resource = %query.resource, "Fetch once");
                let provider = Arc::clone(provider);
                tokio::spawn(async move {
                    let outcome = fetch(provider.as_ref(), &query).await;
                    let _ = respond_to.send(outcome);
                });
            }
        }
    }

    fn handle_settled(&mut self, settled: Settled, provider: &Arc<dyn DataProvider>) {
        match settled {
            Settled::Query {
                id,
                generation,
                outcome,
            } => {
                let Some(sub) = self.subscriptions.get_mut(&id) else {
                    debug!(%id, "Discarding response for closed subscription");
                    return;
                };
                if sub.generation != generation {
                    debug!(%id, generation, current = sub.generation, "Discarding stale response");
                    return;
                }
                match outcome {
                    Ok(records) => {
                        info!(%id, resource = %sub.query.resource, count = records.len(), "Query settled");
                        sub.state.send_replace(QueryResult::success(records));
                    }
                    Err(e) => {
                        warn!(%id, resource = %sub.query.resource, error = %e, "Query failed");
                        sub.state.send_replace(QueryResult::failure(e));
                    }
                }
            }
            Settled::Mutation {
                resource,
                outcome,
                on_success,
                state,
            } => match outcome {
                Ok(record) => {
                    info!(%resource, "Mutation succeeded");
                    // Callbacks run on the actor task; a panic must not take every view down.
                    if let Some(callback) = on_success {
                        if catch_unwind(AssertUnwindSafe(callback)).is_err() {
                            error!(%resource, "Mutation success callback panicked");
                        }
                    }
                    self.invalidate(&resource, provider);
                    state.send_replace(MutationState::Succeeded(record));
                }
                Err(e) => {
                    warn!(%resource, error = %e, "Mutation failed");
                    state.send_replace(MutationState::Failed(e));
                }
            },
        }
    }

    /// Issues a fetch for one subscription under a fresh generation.
    ///
    /// With `keep_data`, existing records stay visible and only `is_fetching` is raised;
    /// otherwise (or when there is nothing to keep) the subscription shows as loading.
    fn start_fetch(&mut self, id: SubscriptionId, keep_data: bool, provider: &Arc<dyn DataProvider>) {
        let Some(sub) = self.subscriptions.get_mut(&id) else {
            return;
        };
        sub.generation += 1;
        let generation = sub.generation;
        sub.state.send_modify(|s| {
            if keep_data && s.data.is_some() {
                s.is_fetching = true;
            } else {
                *s = QueryResult::loading();
            }
        });

        let query = sub.query.clone();
        debug!(%id, generation, resource = %query.resource, "Fetch");
        let provider = Arc::clone(provider);
        let settled = self.settled_tx.clone();
        tokio::spawn(async move {
            let outcome = fetch(provider.as_ref(), &query).await;
            let _ = settled.send(Settled::Query {
                id,
                generation,
                outcome,
            });
        });
    }

    fn start_mutation(
        &mut self,
        request: MutationRequest,
        state: watch::Sender<MutationState>,
        provider: &Arc<dyn DataProvider>,
    ) {
        let MutationRequest {
            resource,
            action,
            payload,
            on_success,
        } = request;
        debug!(%resource, ?action, ?payload, "Mutate");
        state.send_replace(MutationState::Pending);

        let provider = Arc::clone(provider);
        let settled = self.settled_tx.clone();
        tokio::spawn(async move {
            let outcome = match &action {
                MutationAction::Create => provider.create(&resource, payload).await,
                MutationAction::Update(id) => provider.update(&resource, id, payload).await,
            };
            let _ = settled.send(Settled::Mutation {
                resource,
                outcome,
                on_success,
                state,
            });
        });
    }

    /// Refetches every enabled subscription on `resource`, keeping current data visible.
    fn invalidate(&mut self, resource: &str, provider: &Arc<dyn DataProvider>) {
        let stale: Vec<SubscriptionId> = self
            .subscriptions
            .iter()
            .filter(|(_, s)| s.query.enabled && s.query.resource == resource)
            .map(|(id, _)| *id)
            .collect();
        debug!(%resource, count = stale.len(), "Invalidate");
        for id in stale {
            self.start_fetch(id, true, provider);
        }
    }

    /// Drops subscriptions whose every receiver is gone (the view unmounted without
    /// managing to send `Unsubscribe`).
    fn prune_closed(&mut self) {
        self.subscriptions.retain(|id, sub| {
            let open = !sub.state.is_closed();
            if !open {
                debug!(%id, "Subscription dropped");
            }
            open
        });
    }
}

async fn fetch(provider: &dyn DataProvider, query: &ResourceQuery) -> Result<Vec<Record>, SyncError> {
    match &query.target {
        QueryTarget::List => provider.get_list(&query.resource, &query.list_params()).await,
        QueryTarget::One(id) => provider.get_one(&query.resource, id).await.map(|r| vec![r]),
    }
}
