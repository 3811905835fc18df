//! # Mock Providers & Testing Guide
//!
//! Two test doubles for [`DataProvider`], so that sync logic and view code can be tested
//! without a backend.
//!
//! ## When to use which
//!
//! | Feature | MockProvider | Channel provider | MemoryBackend |
//! |---------|--------------|------------------|---------------|
//! | **Responses** | Scripted up front | Answered by the test, one call at a time | Real list/create/update |
//! | **Timing** | Immediate | Fully controlled | Immediate |
//! | **Use Case** | Error injection, call counting | Races, stale responses, in-flight states | End-to-end flows |
//!
//! ## Scripted responses
//!
//! ```rust
//! use resource_sync::mock::MockProvider;
//! use resource_sync::{ResourceQuery, SyncActor, SyncError};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mock = MockProvider::new();
//!     mock.expect_list("alerts").return_err(SyncError::Network("timeout".into()));
//!
//!     let (actor, client) = SyncActor::new(10);
//!     tokio::spawn(actor.run(Arc::new(mock.clone())));
//!
//!     let mut alerts = client.query(ResourceQuery::list("alerts")).await.unwrap();
//!     assert!(alerts.settled().await.unwrap().is_error());
//!     mock.verify();
//! }
//! ```
//!
//! ## Controlled timing
//!
//! Use [`create_mock_provider`] to get a provider and a receiver. Every provider call shows up
//! on the receiver with its responder; the call stays in flight until the test answers it.
//!
//! ```rust
//! use resource_sync::mock::{create_mock_provider, expect_list};
//! use resource_sync::{ResourceQuery, SyncActor};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let (provider, mut calls) = create_mock_provider(10);
//!     let (actor, client) = SyncActor::new(10);
//!     tokio::spawn(actor.run(Arc::new(provider)));
//!
//!     let mut fuels = client.query(ResourceQuery::list("fuels")).await.unwrap();
//!     let (resource, _params, responder) = expect_list(&mut calls).await.unwrap();
//!     assert_eq!(resource, "fuels");
//!     assert!(fuels.current().is_loading());
//!
//!     responder.send(Ok(vec![])).unwrap();
//!     assert!(fuels.settled().await.unwrap().is_success());
//! }
//! ```

use crate::error::SyncError;
use crate::message::Response;
use crate::provider::DataProvider;
use crate::query::ListParams;
use crate::record::{Record, RecordId};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{mpsc, oneshot};

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CallKind {
    List,
    GetOne,
    Create,
    Update,
}

/// One scripted response.
struct Expectation {
    kind: CallKind,
    resource: String,
    id: Option<RecordId>,
    response: Result<Vec<Record>, SyncError>,
}

impl Expectation {
    fn accepts(&self, kind: CallKind, resource: &str, id: Option<&RecordId>) -> bool {
        self.kind == kind
            && self.resource == resource
            && (self.id.is_none() || self.id.as_ref() == id)
    }
}

/// A call the mock received, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    List { resource: String, params: ListParams },
    GetOne { resource: String, id: RecordId },
    Create { resource: String, payload: Record },
    Update { resource: String, id: RecordId, payload: Record },
}

impl RecordedCall {
    pub fn resource(&self) -> &str {
        match self {
            RecordedCall::List { resource, .. }
            | RecordedCall::GetOne { resource, .. }
            | RecordedCall::Create { resource, .. }
            | RecordedCall::Update { resource, .. } => resource,
        }
    }
}

#[derive(Default)]
struct MockState {
    expectations: VecDeque<Expectation>,
    calls: Vec<RecordedCall>,
    unexpected: Vec<RecordedCall>,
}

/// A data provider answering from a queue of expectations.
///
/// Each call consumes the first pending expectation of the same kind and resource. A call
/// with no matching expectation fails with a network error and is reported by
/// [`verify`](Self::verify).
///
/// # Example
/// ```ignore
/// let mock = MockProvider::new();
/// mock.expect_list("fueling").return_ok(vec![record(json!({ "id": 2 }))]);
/// mock.expect_create("fueling").return_ok(record(json!({ "id": 3 })));
///
/// // Hand `Arc::new(mock.clone())` to the sync actor...
/// mock.verify(); // Ensures all expectations were met
/// ```
#[derive(Clone, Default)]
pub struct MockProvider {
    state: Arc<Mutex<MockState>>,
}

impl MockProvider {
    /// Creates a new mock provider with no expectations.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn builder(&self, kind: CallKind, resource: &str, id: Option<RecordId>) -> ExpectationBuilder {
        ExpectationBuilder {
            kind,
            resource: resource.to_string(),
            id,
            state: Arc::clone(&self.state),
        }
    }

    /// Expects a `get_list` call.
    pub fn expect_list(&self, resource: &str) -> ExpectationBuilder {
        self.builder(CallKind::List, resource, None)
    }

    /// Expects a `get_one` call for `id`.
    pub fn expect_get_one(&self, resource: &str, id: impl Into<RecordId>) -> ExpectationBuilder {
        self.builder(CallKind::GetOne, resource, Some(id.into()))
    }

    /// Expects a `create` call.
    pub fn expect_create(&self, resource: &str) -> ExpectationBuilder {
        self.builder(CallKind::Create, resource, None)
    }

    /// Expects an `update` call for `id`.
    pub fn expect_update(&self, resource: &str, id: impl Into<RecordId>) -> ExpectationBuilder {
        self.builder(CallKind::Update, resource, Some(id.into()))
    }

    /// Every call received so far.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.lock().calls.clone()
    }

    /// Number of calls received for `resource`.
    pub fn call_count(&self, resource: &str) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|c| c.resource() == resource)
            .count()
    }

    /// Verifies that all expectations were met and nothing unexpected arrived.
    pub fn verify(&self) {
        let state = self.lock();
        if !state.unexpected.is_empty() {
            panic!("Unexpected provider calls: {:?}", state.unexpected);
        }
        if !state.expectations.is_empty() {
            panic!(
                "Not all expectations were met. {} remaining",
                state.expectations.len()
            );
        }
    }

    fn answer(
        &self,
        kind: CallKind,
        id: Option<&RecordId>,
        call: RecordedCall,
    ) -> Result<Vec<Record>, SyncError> {
        let mut state = self.lock();
        let position = state
            .expectations
            .iter()
            .position(|e| e.accepts(kind, call.resource(), id));
        state.calls.push(call.clone());
        match position.and_then(|i| state.expectations.remove(i)) {
            Some(expectation) => expectation.response,
            None => {
                let message = format!("unexpected call: {:?}", call);
                state.unexpected.push(call);
                Err(SyncError::Network(message))
            }
        }
    }

    fn answer_one(
        &self,
        kind: CallKind,
        id: Option<&RecordId>,
        call: RecordedCall,
    ) -> Result<Record, SyncError> {
        let resource = call.resource().to_string();
        self.answer(kind, id, call)?
            .into_iter()
            .next()
            .ok_or_else(|| SyncError::not_found(resource, id.map(|i| i.to_string()).unwrap_or_default()))
    }
}

#[async_trait]
impl DataProvider for MockProvider {
    async fn get_list(&self, resource: &str, params: &ListParams) -> Result<Vec<Record>, SyncError> {
        let call = RecordedCall::List {
            resource: resource.to_string(),
            params: params.clone(),
        };
        self.answer(CallKind::List, None, call)
    }

    async fn get_one(&self, resource: &str, id: &RecordId) -> Result<Record, SyncError> {
        let call = RecordedCall::GetOne {
            resource: resource.to_string(),
            id: id.clone(),
        };
        self.answer_one(CallKind::GetOne, Some(id), call)
    }

    async fn create(&self, resource: &str, payload: Record) -> Result<Record, SyncError> {
        let call = RecordedCall::Create {
            resource: resource.to_string(),
            payload,
        };
        self.answer_one(CallKind::Create, None, call)
    }

    async fn update(&self, resource: &str, id: &RecordId, payload: Record) -> Result<Record, SyncError> {
        let call = RecordedCall::Update {
            resource: resource.to_string(),
            id: id.clone(),
            payload,
        };
        self.answer_one(CallKind::Update, Some(id), call)
    }
}

/// Builder for one expectation.
pub struct ExpectationBuilder {
    kind: CallKind,
    resource: String,
    id: Option<RecordId>,
    state: Arc<Mutex<MockState>>,
}

impl ExpectationBuilder {
    fn push(self, response: Result<Vec<Record>, SyncError>) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.expectations.push_back(Expectation {
            kind: self.kind,
            resource: self.resource,
            id: self.id,
            response,
        });
    }

    /// Sets the expectation to return these records (a list call) or the first of them.
    pub fn return_records(self, records: Vec<Record>) {
        self.push(Ok(records));
    }

    /// Sets the expectation to return a single record.
    pub fn return_ok(self, record: Record) {
        self.push(Ok(vec![record]));
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: SyncError) {
        self.push(Err(error));
    }
}

// =============================================================================
// CHANNEL PROVIDER
// =============================================================================

/// A provider call waiting for the test to answer it.
#[derive(Debug)]
pub enum ProviderCall {
    List {
        resource: String,
        params: ListParams,
        respond_to: Response<Vec<Record>>,
    },
    GetOne {
        resource: String,
        id: RecordId,
        respond_to: Response<Record>,
    },
    Create {
        resource: String,
        payload: Record,
        respond_to: Response<Record>,
    },
    Update {
        resource: String,
        id: RecordId,
        payload: Record,
        respond_to: Response<Record>,
    },
}

/// Provider that forwards every call to a test-owned receiver.
#[derive(Clone)]
pub struct ChannelProvider {
    sender: mpsc::Sender<ProviderCall>,
}

impl ChannelProvider {
    async fn forward<T>(&self, build: impl FnOnce(Response<T>) -> ProviderCall) -> Result<T, SyncError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| SyncError::Network("mock receiver dropped".into()))?;
        response
            .await
            .map_err(|_| SyncError::Network("request abandoned".into()))?
    }
}

#[async_trait]
impl DataProvider for ChannelProvider {
    async fn get_list(&self, resource: &str, params: &ListParams) -> Result<Vec<Record>, SyncError> {
        let resource = resource.to_string();
        let params = params.clone();
        self.forward(|respond_to| ProviderCall::List {
            resource,
            params,
            respond_to,
        })
        .await
    }

    async fn get_one(&self, resource: &str, id: &RecordId) -> Result<Record, SyncError> {
        let resource = resource.to_string();
        let id = id.clone();
        self.forward(|respond_to| ProviderCall::GetOne {
            resource,
            id,
            respond_to,
        })
        .await
    }

    async fn create(&self, resource: &str, payload: Record) -> Result<Record, SyncError> {
        let resource = resource.to_string();
        self.forward(|respond_to| ProviderCall::Create {
            resource,
            payload,
            respond_to,
        })
        .await
    }

    async fn update(&self, resource: &str, id: &RecordId, payload: Record) -> Result<Record, SyncError> {
        let resource = resource.to_string();
        let id = id.clone();
        self.forward(|respond_to| ProviderCall::Update {
            resource,
            id,
            payload,
            respond_to,
        })
        .await
    }
}

/// Creates a channel provider and the receiver its calls arrive on.
///
/// # Testing Strategy
/// The sync actor issues provider calls from spawned tasks. With this provider each call
/// parks until the test answers it, which makes in-flight states and out-of-order
/// completions reproducible.
pub fn create_mock_provider(buffer_size: usize) -> (ChannelProvider, mpsc::Receiver<ProviderCall>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ChannelProvider { sender }, receiver)
}

/// Helper to verify that the next call is a list read
pub async fn expect_list(
    receiver: &mut mpsc::Receiver<ProviderCall>,
) -> Option<(String, ListParams, Response<Vec<Record>>)> {
    match receiver.recv().await {
        Some(ProviderCall::List {
            resource,
            params,
            respond_to,
        }) => Some((resource, params, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next call is a single-record read
pub async fn expect_get_one(
    receiver: &mut mpsc::Receiver<ProviderCall>,
) -> Option<(String, RecordId, Response<Record>)> {
    match receiver.recv().await {
        Some(ProviderCall::GetOne {
            resource,
            id,
            respond_to,
        }) => Some((resource, id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next call is a create
pub async fn expect_create(
    receiver: &mut mpsc::Receiver<ProviderCall>,
) -> Option<(String, Record, Response<Record>)> {
    match receiver.recv().await {
        Some(ProviderCall::Create {
            resource,
            payload,
            respond_to,
        }) => Some((resource, payload, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next call is an update
pub async fn expect_update(
    receiver: &mut mpsc::Receiver<ProviderCall>,
) -> Option<(String, RecordId, Record, Response<Record>)> {
    match receiver.recv().await {
        Some(ProviderCall::Update {
            resource,
            id,
            payload,
            respond_to,
        }) => Some((resource, id, payload, respond_to)),
        _ => None,
    }
}
