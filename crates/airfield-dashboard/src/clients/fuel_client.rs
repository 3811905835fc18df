//! # Fuel Clients
//!
//! High-level API over the `fuels` (fuel types and tank figures) and `fuelings` (recorded
//! additions) resources.
use crate::error::DashboardError;
use crate::model::{FuelItem, FuelOption, FuelingValues};
use async_trait::async_trait;
use resource_sync::{
    encode, FilterOperator, Identity, MutationHandle, MutationRequest, QueryHandle, ResourceClient, ResourceQuery,
    SortOrder, SyncClient, SyncError,
};
use tracing::{debug, instrument};

/// Client for the `fuels` resource.
#[derive(Clone)]
pub struct FuelClient {
    inner: SyncClient,
    page_size: u32,
}

impl FuelClient {
    pub fn new(inner: SyncClient, page_size: u32) -> Self {
        Self { inner, page_size }
    }

    pub fn options_query(&self) -> ResourceQuery {
        self.query().page_size(self.page_size)
    }

    #[instrument(skip(self))]
    pub async fn watch_options(&self) -> Result<QueryHandle, DashboardError> {
        debug!("Subscribing");
        self.watch(self.options_query()).await
    }
}

#[async_trait]
impl ResourceClient for FuelClient {
    const RESOURCE: &'static str = "fuels";
    type Item = FuelOption;
    type Error = DashboardError;

    fn sync(&self) -> &SyncClient {
        &self.inner
    }

    fn map_error(e: SyncError) -> Self::Error {
        DashboardError::Sync(e)
    }

    fn decode_error(e: serde_json::Error) -> Self::Error {
        DashboardError::decode(Self::RESOURCE, e)
    }
}

/// Client for the `fuelings` resource.
#[derive(Clone)]
pub struct FuelingClient {
    inner: SyncClient,
    page_size: u32,
}

impl FuelingClient {
    pub fn new(inner: SyncClient, page_size: u32) -> Self {
        Self { inner, page_size }
    }

    /// The signed-in user's fuelings, newest first. Disabled until an identity is known.
    pub fn history_query(&self, identity: Option<&Identity>) -> ResourceQuery {
        let uid = identity.map(|i| i.id.as_str()).unwrap_or_default();
        self.query()
            .filter("uid", FilterOperator::Eq, uid)
            .sort("created_at", SortOrder::Desc)
            .page_size(self.page_size)
            .enabled(!uid.is_empty())
    }

    /// Submits a fuel addition. `on_success` runs once, after the backend has stored it.
    #[instrument(skip(self, on_success))]
    pub async fn record_fueling(
        &self,
        values: FuelingValues,
        on_success: impl FnOnce() + Send + 'static,
    ) -> Result<MutationHandle, DashboardError> {
        debug!("Sending request");
        let payload = encode(&values).map_err(Self::decode_error)?;
        let request = MutationRequest::create(Self::RESOURCE, payload).on_success(on_success);
        self.inner.mutate(request).await.map_err(Self::map_error)
    }
}

#[async_trait]
impl ResourceClient for FuelingClient {
    const RESOURCE: &'static str = "fuelings";
    type Item = FuelItem;
    type Error = DashboardError;

    fn sync(&self) -> &SyncClient {
        &self.inner
    }

    fn map_error(e: SyncError) -> Self::Error {
        DashboardError::Sync(e)
    }

    fn decode_error(e: serde_json::Error) -> Self::Error {
        DashboardError::decode(Self::RESOURCE, e)
    }
}
