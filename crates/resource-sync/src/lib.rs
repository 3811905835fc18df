//! # Resource Sync
//!
//! Declarative client-side data synchronization for resource-oriented backends. Views
//! describe *what* they read (a resource, filters, sorters, a page, or one record by id)
//! and receive observable snapshots that the sync layer keeps current; writes go through
//! mutations that report their own lifecycle and refresh affected reads.
//!
//! ## Architecture Overview
//!
//! The crate separates concerns into three layers:
//!
//! 1. **Provider Layer** ([`DataProvider`], [`IdentityProvider`]) - the backend contract
//! 2. **Runtime Layer** ([`SyncActor`]) - subscription state, request ordering, invalidation
//! 3. **Interface Layer** ([`SyncClient`], [`QueryHandle`], [`MutationHandle`]) - what views hold
//!
//! ## Core Abstractions
//!
//! ### [`ResourceQuery`] - What to read
//!
//! ```rust
//! use resource_sync::{FilterOperator, ResourceQuery, SortOrder};
//!
//! let history = ResourceQuery::list("fueling")
//!     .filter("uid", FilterOperator::Eq, "user-42")
//!     .sort("created_at", SortOrder::Desc);
//!
//! // Same parameters, same key: re-submitting it does not re-issue the request.
//! assert_eq!(history.key(), history.clone().key());
//! ```
//!
//! ### [`SyncActor`] - Keeping reads current
//!
//! ```rust
//! use resource_sync::memory::MemoryBackend;
//! use resource_sync::{record, MutationRequest, ResourceQuery, SyncActor};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let (backend, provider) = MemoryBackend::new(10);
//!     tokio::spawn(backend.run());
//!     let (actor, client) = SyncActor::new(10);
//!     tokio::spawn(actor.run(Arc::new(provider)));
//!
//!     let mut history = client.query(ResourceQuery::list("fueling")).await.unwrap();
//!     assert!(history.settled().await.unwrap().records().is_empty());
//!
//!     let payload = record(json!({ "fuel": 1, "amount": 40.0 }));
//!     let mut created = client.mutate(MutationRequest::create("fueling", payload)).await.unwrap();
//!     created.settled().await.unwrap();
//!
//!     // A successful mutation refetches every read of the same resource.
//!     assert_eq!(history.settled().await.unwrap().records().len(), 1);
//! }
//! ```
//!
//! ## Concurrency Model
//!
//! - The sync actor runs in its own Tokio task and applies every state change sequentially
//! - Provider calls run concurrently in spawned tasks
//! - A response for parameters that have since changed is discarded, never applied
//! - Snapshots reach views through `tokio::sync::watch`, so readers never block the actor
//!
//! ## Testing
//!
//! The [`mock`] module provides a scripted [`mock::MockProvider`] and a channel-driven
//! provider for controlling exactly when each call completes. The [`memory`] module
//! provides a working in-process backend.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod error;
pub mod memory;
pub mod message;
pub mod mock;
pub mod provider;
pub mod query;
pub mod record;
pub mod state;
pub mod tracing;

// Re-export core types for convenience
pub use actor::SyncActor;
pub use client::{MutationHandle, QueryHandle, SyncClient};
pub use client_trait::ResourceClient;
pub use error::SyncError;
pub use message::{MutationAction, MutationRequest, Response, SubscriptionId, SyncRequest};
pub use provider::{DataProvider, Identity, IdentityProvider, StaticIdentity};
pub use query::{
    Filter, FilterOperator, ListParams, Pagination, QueryKey, QueryTarget, ResourceQuery, SortOrder, Sorter,
    DEFAULT_PAGE_SIZE,
};
pub use record::{decode, encode, record, Record, RecordId};
pub use state::{MutationState, QueryResult, QueryStatus};
pub use crate::tracing::setup_tracing;
