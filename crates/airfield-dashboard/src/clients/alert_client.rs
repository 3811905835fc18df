//! # Alert Client
//!
//! Read-only access to the `alerts` resource.
use crate::error::DashboardError;
use crate::model::Alert;
use async_trait::async_trait;
use resource_sync::{FilterOperator, QueryHandle, ResourceClient, ResourceQuery, SortOrder, SyncClient, SyncError};
use tracing::{debug, instrument};

/// The alerts overlay lists up to this many alerts.
pub const ALERTS_PAGE_SIZE: u32 = 20;

#[derive(Clone)]
pub struct AlertClient {
    inner: SyncClient,
}

impl AlertClient {
    pub fn new(inner: SyncClient) -> Self {
        Self { inner }
    }

    /// Active alerts, most severe first.
    pub fn active_query(&self) -> ResourceQuery {
        self.query()
            .filter("is_active", FilterOperator::Eq, "true")
            .sort("severity", SortOrder::Asc)
            .page_size(ALERTS_PAGE_SIZE)
    }

    #[instrument(skip(self))]
    pub async fn watch_active(&self) -> Result<QueryHandle, DashboardError> {
        debug!("Subscribing");
        self.watch(self.active_query()).await
    }
}

#[async_trait]
impl ResourceClient for AlertClient {
    const RESOURCE: &'static str = "alerts";
    type Item = Alert;
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
