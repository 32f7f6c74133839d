//! JSON-file implementation of the tenant store
//!
//! One file per tenant at `<root>/<user_id>/<session_id>/knowledge.json`,
//! holding the whole collection. Writes go through a temp file followed
//! by an atomic rename, so a crash mid-write leaves the previous state
//! fully intact and readable. Appends to the same tenant are serialized
//! by a per-key async mutex; without it two concurrent load-modify-write
//! sequences would silently drop one of the appended documents at the
//! rename boundary.

use super::{Document, StoreError, TenantCollection, TenantKey, TenantStore};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

const STORE_FILE: &str = "knowledge.json";

/// One-JSON-file-per-tenant storage backend.
pub struct JsonFileStore {
    root: PathBuf,
    write_locks: Mutex<HashMap<TenantKey, Arc<Mutex<()>>>>,
}

impl JsonFileStore {
    /// Create a store rooted at `root`. The directory does not need to
    /// exist yet; tenant directories are created lazily on first append.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            write_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Path of the collection file for `key`.
    pub fn tenant_path(&self, key: TenantKey) -> PathBuf {
        self.root
            .join(key.user_id.to_string())
            .join(key.session_id.to_string())
            .join(STORE_FILE)
    }

    async fn write_lock(&self, key: TenantKey) -> Arc<Mutex<()>> {
        let mut locks = self.write_locks.lock().await;
        // A strong count of 1 means only the map holds the lock, so no
        // append is using it; evicting here keeps the map bounded by the
        // number of tenants with writes in flight.
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        locks.entry(key).or_default().clone()
    }

    async fn read_collection(path: &Path, key: TenantKey) -> TenantCollection {
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return TenantCollection::default();
            }
            Err(err) => {
                tracing::warn!(%key, %err, "failed to read tenant store, reinitializing");
                return TenantCollection::default();
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(collection) => collection,
            Err(err) => {
                tracing::warn!(%key, %err, "tenant store is corrupt, reinitializing");
                TenantCollection::default()
            }
        }
    }

    async fn persist(&self, key: TenantKey, collection: &TenantCollection) -> Result<(), StoreError> {
        let path = self.tenant_path(key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let bytes = serde_json::to_vec_pretty(collection)?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &bytes).await?;
        tokio::fs::rename(&tmp, &path).await?;

        tracing::info!(
            %key,
            documents = collection.documents.len(),
            chunks = collection.chunk_count(),
            "persisted tenant store"
        );
        Ok(())
    }
}

#[async_trait]
impl TenantStore for JsonFileStore {
    async fn load(&self, key: TenantKey) -> Result<TenantCollection, StoreError> {
        Ok(Self::read_collection(&self.tenant_path(key), key).await)
    }

    async fn append(&self, key: TenantKey, document: Document) -> Result<(), StoreError> {
        let lock = self.write_lock(key).await;
        let _guard = lock.lock().await;

        let mut collection = Self::read_collection(&self.tenant_path(key), key).await;

        // Enforce the per-tenant dimension lock before anything is written.
        // Every chunk must match; a ragged document is rejected outright.
        let locked = collection
            .embedding_dimension
            .or_else(|| collection.documents.iter().find_map(Document::embedding_dimension));
        let expected = locked.or(document.embedding_dimension());
        if let Some(expected) = expected {
            for chunk in &document.chunks {
                if chunk.embedding.len() != expected {
                    return Err(StoreError::DimensionMismatch {
                        tenant: key,
                        expected,
                        actual: chunk.embedding.len(),
                    });
                }
            }
        }
        collection.embedding_dimension = expected;

        collection.documents.push(document);
        self.persist(key, &collection).await
    }
}
