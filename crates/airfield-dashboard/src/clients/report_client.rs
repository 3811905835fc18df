//! # Report Client
//!
//! Access to safety management system reports (`sms` resource).
use crate::error::DashboardError;
use crate::model::{ReportStatusUpdate, SafetyReport};
use async_trait::async_trait;
use chrono::Utc;
use resource_sync::{
    encode, MutationHandle, MutationRequest, QueryHandle, RecordId, ResourceClient, ResourceQuery, SyncClient,
    SyncError,
};
use tracing::{debug, instrument};

#[derive(Clone)]
pub struct ReportClient {
    inner: SyncClient,
}

impl ReportClient {
    pub fn new(inner: SyncClient) -> Self {
        Self { inner }
    }

    /// Single-report query. Without an id (no route parameter yet) the query is disabled.
    pub fn report_query(&self, id: Option<RecordId>) -> ResourceQuery {
        match id {
            Some(id) => ResourceQuery::one(Self::RESOURCE, id),
            None => ResourceQuery::one(Self::RESOURCE, "").enabled(false),
        }
    }

    #[instrument(skip(self))]
    pub async fn watch_report(&self, id: Option<RecordId>) -> Result<QueryHandle, DashboardError> {
        debug!("Subscribing");
        self.watch(self.report_query(id)).await
    }

    /// Moves a report to `status`. Resolving stamps `resolved_at`.
    #[instrument(skip(self))]
    pub async fn update_status(&self, id: RecordId, status: &str) -> Result<MutationHandle, DashboardError> {
        debug!("Sending request");
        let update = ReportStatusUpdate {
            status: status.to_string(),
            resolved_at: (status == "resolved").then(Utc::now),
        };
        let payload = encode(&update).map_err(Self::decode_error)?;
        self.inner
            .mutate(MutationRequest::update(Self::RESOURCE, id, payload))
            .await
            .map_err(Self::map_error)
    }
}

#[async_trait]
impl ResourceClient for ReportClient {
    const RESOURCE: &'static str = "sms";
    type Item = SafetyReport;
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
