//! # System Lifecycle
//!
//! Starts the sync actor (and, for demos and tests, the in-memory backend), hands out the
//! resource clients wired to it, and shuts everything down in order.
//!
//! ## Shutdown
//!
//! 1. Drop the clients the system owns. Every `SyncClient` clone is a sender, so the sync
//!    actor stops once the last one (including those held by live query handles) is gone.
//! 2. The sync actor drops its provider. The in-memory backend stops when the last
//!    provider clone is dropped.
//! 3. Await every task handle.
//!
//! Query handles obtained from the clients must be dropped or closed before calling
//! [`DashboardSystem::shutdown`], otherwise the sync actor keeps running.

use crate::clients::{AlertClient, FuelClient, FuelingClient, ReportClient};
use crate::config::SyncConfig;
use crate::error::DashboardError;
use resource_sync::memory::{MemoryBackend, MemoryProvider};
use resource_sync::{DataProvider, Record, SyncActor, SyncClient};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

/// Runtime orchestrator for the dashboard.
///
/// ```ignore
/// let system = DashboardSystem::in_memory(SyncConfig::from_env());
/// let mut alerts = system.alerts.watch_active().await?;
/// // ...
/// drop(alerts);
/// system.shutdown().await?;
/// ```
pub struct DashboardSystem {
    pub fuels: FuelClient,
    pub fuelings: FuelingClient,
    pub alerts: AlertClient,
    pub reports: ReportClient,
    sync: SyncClient,
    backend: Option<MemoryProvider>,
    handles: Vec<JoinHandle<()>>,
}

impl DashboardSystem {
    /// Starts the sync actor against `provider`.
    pub fn new(config: SyncConfig, provider: Arc<dyn DataProvider>) -> Self {
        let (actor, sync) = SyncActor::new(config.buffer_size);
        let handle = tokio::spawn(actor.run(provider));
        info!(buffer_size = config.buffer_size, page_size = config.default_page_size, "Dashboard system started");
        Self::wire(config, sync, None, vec![handle])
    }

    /// Starts an in-memory backend and a sync actor reading from it.
    pub fn in_memory(config: SyncConfig) -> Self {
        let (backend, provider) = MemoryBackend::new(config.buffer_size);
        let backend_handle = tokio::spawn(backend.run());
        let (actor, sync) = SyncActor::new(config.buffer_size);
        let sync_handle = tokio::spawn(actor.run(Arc::new(provider.clone())));
        info!(buffer_size = config.buffer_size, "In-memory system started");
        // The sync actor must stop first so the backend sees its last provider dropped.
        Self::wire(config, sync, Some(provider), vec![sync_handle, backend_handle])
    }

    fn wire(config: SyncConfig, sync: SyncClient, backend: Option<MemoryProvider>, handles: Vec<JoinHandle<()>>) -> Self {
        Self {
            fuels: FuelClient::new(sync.clone(), config.default_page_size),
            fuelings: FuelingClient::new(sync.clone(), config.default_page_size),
            alerts: AlertClient::new(sync.clone()),
            reports: ReportClient::new(sync.clone()),
            sync,
            backend,
            handles,
        }
    }

    /// Loads fixture rows into the in-memory backend and returns the table size. Fails on
    /// systems started with [`DashboardSystem::new`].
    pub async fn seed(&self, resource: &str, records: Vec<Record>) -> Result<usize, DashboardError> {
        let backend = self
            .backend
            .as_ref()
            .ok_or_else(|| DashboardError::Task("no in-memory backend to seed".into()))?;
        let size = backend.seed(resource, records).await?;
        debug!(resource, size, "Seeded");
        Ok(size)
    }

    pub async fn shutdown(self) -> Result<(), DashboardError> {
        info!("Shutting down system...");

        drop(self.fuels);
        drop(self.fuelings);
        drop(self.alerts);
        drop(self.reports);
        drop(self.sync);
        drop(self.backend);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(DashboardError::Task(format!("{:?}", e)));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
