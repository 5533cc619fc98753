use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::{Timestamp, Uuid};

use crate::{Collection, Document, DocumentStore, Filter, StoreError, ID_FIELD};

/// Process-local document store.
///
/// Collections keep documents in insertion order, which is the natural
/// iteration order reported by `find`. Each collection is guarded by a single
/// lock, so operations on one document never interleave.
pub struct MemoryStore {
    database: String,
    closed: Arc<AtomicBool>,
    collections: Mutex<HashMap<String, Arc<MemoryCollection>>>,
}

impl MemoryStore {
    pub fn new(database: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            closed: Arc::new(AtomicBool::new(false)),
            collections: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    fn collection(&self, name: &str) -> Arc<dyn Collection> {
        let mut collections = self
            .collections
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let collection = collections.entry(name.to_string()).or_insert_with(|| {
            Arc::new(MemoryCollection {
                closed: Arc::clone(&self.closed),
                documents: RwLock::new(Vec::new()),
            })
        });

        Arc::clone(collection) as Arc<dyn Collection>
    }

    async fn ping(&self) -> Result<(), StoreError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(StoreError::Closed);
        }
        Ok(())
    }

    async fn close(&self) -> Result<(), StoreError> {
        self.closed.store(true, Ordering::Release);
        tracing::info!(target: "catalog-db", database = %self.database, "memory store closed");
        Ok(())
    }
}

struct MemoryCollection {
    closed: Arc<AtomicBool>,
    documents: RwLock<Vec<Document>>,
}

impl MemoryCollection {
    fn ensure_open(&self) -> Result<(), StoreError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(StoreError::Closed);
        }
        Ok(())
    }
}

fn new_id() -> String {
    Uuid::new_v7(Timestamp::now(uuid::NoContext))
        .simple()
        .to_string()
}

fn merge(target: &mut Document, patch: Document) {
    for (field, value) in patch {
        if field == ID_FIELD {
            continue;
        }
        target.insert(field, value);
    }
}

#[async_trait]
impl Collection for MemoryCollection {
    async fn insert_one(&self, mut document: Document) -> Result<Document, StoreError> {
        self.ensure_open()?;

        document.insert(ID_FIELD.to_string(), Value::String(new_id()));
        self.documents.write().await.push(document.clone());

        Ok(document)
    }

    async fn find(&self, filter: &Filter) -> Result<Vec<Document>, StoreError> {
        self.ensure_open()?;

        let documents = self.documents.read().await;
        Ok(documents
            .iter()
            .filter(|document| filter.matches(document))
            .cloned()
            .collect())
    }

    async fn find_one_and_update(
        &self,
        filter: &Filter,
        patch: Document,
    ) -> Result<Option<Document>, StoreError> {
        self.ensure_open()?;

        let mut documents = self.documents.write().await;
        let Some(document) = documents.iter_mut().find(|document| filter.matches(document)) else {
            return Ok(None);
        };

        merge(document, patch);
        Ok(Some(document.clone()))
    }

    async fn find_by_id_and_delete(&self, id: &str) -> Result<Option<Document>, StoreError> {
        self.ensure_open()?;

        let mut documents = self.documents.write().await;
        let position = documents
            .iter()
            .position(|document| document.get(ID_FIELD).and_then(Value::as_str) == Some(id));

        Ok(position.map(|index| documents.remove(index)))
    }
}
