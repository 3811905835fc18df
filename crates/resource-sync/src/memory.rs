//! # In-Memory Backend
//!
//! A [`DataProvider`] that keeps every resource in process. It is an actor of its own: the
//! `MemoryBackend` owns the tables, and the cloneable [`MemoryProvider`] forwards calls to it.
//! Used by the demo binary and by tests that want real list/create/update semantics without
//! scripting every response.

use crate::error::SyncError;
use crate::message::Response;
use crate::provider::DataProvider;
use crate::query::ListParams;
use crate::record::{Record, RecordId};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

#[derive(Debug)]
pub enum MemoryRequest {
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
    Seed {
        resource: String,
        records: Vec<Record>,
        respond_to: Response<usize>,
    },
}

/// One resource's rows, in insertion order.
#[derive(Default)]
struct Table {
    rows: Vec<Record>,
    next_id: u64,
}

impl Table {
    fn row(&self, id: &RecordId) -> Option<&Record> {
        self.rows.iter().find(|row| RecordId::of(row).as_ref() == Some(id))
    }

    fn row_mut(&mut self, id: &RecordId) -> Option<&mut Record> {
        self.rows
            .iter_mut()
            .find(|row| RecordId::of(row).as_ref() == Some(id))
    }

    /// Assigns the next counter id when the record has none. A record whose id is already
    /// taken is rejected. The counter stays ahead of every numeric id, given as a number or
    /// as a string.
    fn insert(&mut self, resource: &str, mut record: Record) -> Result<Record, SyncError> {
        match RecordId::of(&record) {
            Some(id) => {
                if self.row(&id).is_some() {
                    return Err(SyncError::Validation(format!("{} record {} already exists", resource, id)));
                }
                if let Ok(n) = id.as_str().parse::<u64>() {
                    self.next_id = self.next_id.max(n);
                }
            }
            None => {
                self.next_id += 1;
                record.insert("id".into(), Value::from(self.next_id));
            }
        }
        self.rows.push(record.clone());
        Ok(record)
    }
}

/// Actor owning every in-memory table.
pub struct MemoryBackend {
    receiver: mpsc::Receiver<MemoryRequest>,
    tables: HashMap<String, Table>,
}

impl MemoryBackend {
    pub fn new(buffer_size: usize) -> (Self, MemoryProvider) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let backend = Self {
            receiver,
            tables: HashMap::new(),
        };
        (backend, MemoryProvider { sender })
    }

    pub async fn run(mut self) {
        info!("Memory backend started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                MemoryRequest::List {
                    resource,
                    params,
                    respond_to,
                } => {
                    let rows = self
                        .tables
                        .get(&resource)
                        .map(|t| params.apply(&t.rows))
                        .unwrap_or_default();
                    debug!(%resource, count = rows.len(), "List");
                    let _ = respond_to.send(Ok(rows));
                }
                MemoryRequest::GetOne {
                    resource,
                    id,
                    respond_to,
                } => {
                    let found = self
                        .tables
                        .get(&resource)
                        .and_then(|t| t.row(&id).cloned());
                    debug!(%resource, %id, found = found.is_some(), "Get");
                    let _ = respond_to.send(found.ok_or_else(|| SyncError::not_found(&resource, &id)));
                }
                MemoryRequest::Create {
                    resource,
                    mut payload,
                    respond_to,
                } => {
                    payload
                        .entry("created_at")
                        .or_insert_with(|| Value::from(Utc::now().to_rfc3339()));
                    let table = self.tables.entry(resource.clone()).or_default();
                    let created = table.insert(&resource, payload);
                    match &created {
                        Ok(row) => info!(%resource, id = ?RecordId::of(row), size = table.rows.len(), "Created"),
                        Err(e) => warn!(%resource, error = %e, "Create rejected"),
                    }
                    let _ = respond_to.send(created);
                }
                MemoryRequest::Update {
                    resource,
                    id,
                    payload,
                    respond_to,
                } => {
                    let row = self
                        .tables
                        .get_mut(&resource)
                        .and_then(|t| t.row_mut(&id));
                    match row {
                        Some(row) => {
                            for (field, value) in payload {
                                if field != "id" {
                                    row.insert(field, value);
                                }
                            }
                            row.insert("updated_at".into(), Value::from(Utc::now().to_rfc3339()));
                            info!(%resource, %id, "Updated");
                            let _ = respond_to.send(Ok(row.clone()));
                        }
                        None => {
                            warn!(%resource, %id, "Not found");
                            let _ = respond_to.send(Err(SyncError::not_found(&resource, &id)));
                        }
                    }
                }
                MemoryRequest::Seed {
                    resource,
                    records,
                    respond_to,
                } => {
                    let table = self.tables.entry(resource.clone()).or_default();
                    let seeded = records
                        .into_iter()
                        .try_for_each(|record| table.insert(&resource, record).map(drop))
                        .map(|()| table.rows.len());
                    match &seeded {
                        Ok(size) => info!(%resource, size, "Seeded"),
                        Err(e) => warn!(%resource, error = %e, "Seed stopped"),
                    }
                    let _ = respond_to.send(seeded);
                }
            }
        }

        info!(tables = self.tables.len(), "Shutdown");
    }
}

/// Client half of [`MemoryBackend`].
#[derive(Clone)]
pub struct MemoryProvider {
    sender: mpsc::Sender<MemoryRequest>,
}

impl MemoryProvider {
    async fn call<T>(
        &self,
        build: impl FnOnce(Response<T>) -> MemoryRequest,
    ) -> Result<T, SyncError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| SyncError::ActorClosed)?;
        response.await.map_err(|_| SyncError::ActorDropped)?
    }

    /// Inserts records as given. Records without an id get the next free one.
    /// Returns the table size afterwards.
    pub async fn seed(&self, resource: &str, records: Vec<Record>) -> Result<usize, SyncError> {
        let resource = resource.to_string();
        self.call(|respond_to| MemoryRequest::Seed {
            resource,
            records,
            respond_to,
        })
        .await
    }
}

#[async_trait]
impl DataProvider for MemoryProvider {
    async fn get_list(&self, resource: &str, params: &ListParams) -> Result<Vec<Record>, SyncError> {
        let resource = resource.to_string();
        let params = params.clone();
        self.call(|respond_to| MemoryRequest::List {
            resource,
            params,
            respond_to,
        })
        .await
    }

    async fn get_one(&self, resource: &str, id: &RecordId) -> Result<Record, SyncError> {
        let resource = resource.to_string();
        let id = id.clone();
        self.call(|respond_to| MemoryRequest::GetOne {
            resource,
            id,
            respond_to,
        })
        .await
    }

    async fn create(&self, resource: &str, payload: Record) -> Result<Record, SyncError> {
        let resource = resource.to_string();
        self.call(|respond_to| MemoryRequest::Create {
            resource,
            payload,
            respond_to,
        })
        .await
    }

    async fn update(&self, resource: &str, id: &RecordId, payload: Record) -> Result<Record, SyncError> {
        let resource = resource.to_string();
        let id = id.clone();
        self.call(|respond_to| MemoryRequest::Update {
            resource,
            id,
            payload,
            respond_to,
        })
        .await
    }
}
