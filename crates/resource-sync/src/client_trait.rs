//! # ResourceClient Trait
//!
//! Provides a common interface for resource‑specific clients, adding typed default `get`,
//! `list` and `watch` methods built on top of a shared [`SyncClient`].
use crate::record::{decode, RecordId};
use crate::{QueryHandle, ResourceQuery, SyncClient, SyncError};
use async_trait::async_trait;
use serde::de::DeserializeOwned;

/// Trait for resource-specific clients to inherit standard typed reads.
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use resource_sync::{ResourceClient, SyncClient, SyncError};
/// use serde::Deserialize;
///
/// #[derive(Debug, Deserialize)]
/// struct Fuel { id: u32, label: String }
///
/// #[derive(Debug, thiserror::Error)]
/// enum FuelError {
///     #[error(transparent)]
///     Sync(#[from] SyncError),
///     #[error("bad fuel record: {0}")]
///     Decode(#[from] serde_json::Error),
/// }
///
/// struct FuelClient { sync: SyncClient }
///
/// impl ResourceClient for FuelClient {
///     const RESOURCE: &'static str = "fuels";
///     type Item = Fuel;
///     type Error = FuelError;
///
///     fn sync(&self) -> &SyncClient { &self.sync }
///     fn map_error(e: SyncError) -> FuelError { FuelError::Sync(e) }
///     fn decode_error(e: serde_json::Error) -> FuelError { FuelError::Decode(e) }
/// }
///
/// async fn usage(client: FuelClient) {
///     // get() and list() are provided automatically
///     let _ = client.get(1u32.into()).await;
///     let _ = client.list(client.query()).await;
/// }
/// ```
#[async_trait]
pub trait ResourceClient: Send + Sync {
    /// Backend resource name.
    const RESOURCE: &'static str;

    /// Typed view of one record.
    type Item: DeserializeOwned + Send;

    /// The resource-specific error type.
    type Error: Send + Sync;

    fn sync(&self) -> &SyncClient;

    /// Map sync errors to the specific resource error type.
    fn map_error(e: SyncError) -> Self::Error;

    fn decode_error(e: serde_json::Error) -> Self::Error;

    /// A list query over this resource with default pagination.
    fn query(&self) -> ResourceQuery {
        ResourceQuery::list(Self::RESOURCE)
    }

    /// Fetch one record by id.
    #[tracing::instrument(skip(self))]
    async fn get(&self, id: RecordId) -> Result<Self::Item, Self::Error> {
        tracing::debug!("Sending request");
        let record = self
            .sync()
            .get_one(Self::RESOURCE, id)
            .await
            .map_err(Self::map_error)?;
        decode(&record).map_err(Self::decode_error)
    }

    /// Fetch one page of records once.
    #[tracing::instrument(skip(self))]
    async fn list(&self, query: ResourceQuery) -> Result<Vec<Self::Item>, Self::Error> {
        tracing::debug!("Sending request");
        let records = self.sync().list(query).await.map_err(Self::map_error)?;
        records
            .iter()
            .map(|r| decode(r).map_err(Self::decode_error))
            .collect()
    }

    /// Mount a subscription for `query`.
    async fn watch(&self, query: ResourceQuery) -> Result<QueryHandle, Self::Error> {
        self.sync().query(query).await.map_err(Self::map_error)
    }
}
