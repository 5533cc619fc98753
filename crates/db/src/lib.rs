//! Document store client factory for the catalog.
//!
//! The catalog treats persistence as an opaque service: named collections of
//! schema-flexible JSON documents, selected with field-equality [`Filter`]s.
//! Backends implement [`DocumentStore`] and hand out [`Collection`] handles.

use std::sync::Arc;

use async_trait::async_trait;

pub mod error;
pub mod filter;
pub mod memory;

pub use error::StoreError;
pub use filter::Filter;
pub use memory::MemoryStore;

/// Key under which a store keeps the identifier it assigns to a document.
pub const ID_FIELD: &str = "_id";

/// A stored record: a JSON object keyed by field name.
pub type Document = serde_json::Map<String, serde_json::Value>;

/// Shared handle to a connected store.
pub type Store = Arc<dyn DocumentStore>;

/// A connected document store with an explicit lifecycle.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Backend name used in logs
    fn backend(&self) -> &'static str;

    /// Get a handle to the named collection, creating it lazily
    fn collection(&self, name: &str) -> Arc<dyn Collection>;

    /// Verify the store is reachable
    async fn ping(&self) -> Result<(), StoreError>;

    /// Release the connection; later operations fail with [`StoreError::Closed`]
    async fn close(&self) -> Result<(), StoreError>;
}

/// Operations over a single collection of documents.
#[async_trait]
pub trait Collection: Send + Sync {
    /// Insert a document, assigning a fresh identifier under [`ID_FIELD`].
    /// Any identifier already present in `document` is replaced.
    async fn insert_one(&self, document: Document) -> Result<Document, StoreError>;

    /// All documents matching `filter`, in the store's natural order
    async fn find(&self, filter: &Filter) -> Result<Vec<Document>, StoreError>;

    /// Shallow-merge `patch` into the first document matching `filter` and
    /// return the document as it is after the merge
    async fn find_one_and_update(
        &self,
        filter: &Filter,
        patch: Document,
    ) -> Result<Option<Document>, StoreError>;

    /// Shallow-merge `patch` into the document with identifier `id`
    async fn find_by_id_and_update(
        &self,
        id: &str,
        patch: Document,
    ) -> Result<Option<Document>, StoreError> {
        self.find_one_and_update(&Filter::eq(ID_FIELD, id), patch)
            .await
    }

    /// Remove the document with identifier `id`, returning it as it was
    async fn find_by_id_and_delete(&self, id: &str) -> Result<Option<Document>, StoreError>;
}

/// Connect to the store named by `endpoint`.
///
/// Supported endpoints: `memory://` (process-local store).
pub async fn connect(endpoint: &str, database: &str) -> Result<Store, StoreError> {
    let store: Store = match endpoint.split_once("://") {
        Some(("memory", _)) => Arc::new(MemoryStore::new(database)),
        _ => return Err(StoreError::UnsupportedEndpoint(endpoint.to_string())),
    };

    store.ping().await?;

    tracing::info!(
        target: "catalog-db",
        backend = store.backend(),
        %database,
        "document store connected"
    );

    Ok(store)
}
