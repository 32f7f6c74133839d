//! Storage abstraction layer for grimoire-retriever
//!
//! This module provides the trait-based abstraction for persisting one
//! tenant's document collection. It separates the durability concerns
//! from the retrieval logic, allowing different storage backends while
//! maintaining a consistent API.
//!
//! ## Key Components
//!
//! - **TenantStore**: load/append operations over a tenant's collection
//! - **JsonFileStore**: the concrete one-JSON-file-per-tenant backend
//! - **Data Types**: TenantKey, StoredChunk, Document, TenantCollection
//!
//! ## Isolation
//!
//! Every operation is scoped by a [`TenantKey`]; distinct tenants map to
//! distinct persisted collections and no cross-tenant read or write path
//! exists. An empty collection is a valid state, not an error.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod json_store;

pub use json_store::JsonFileStore;

/// Isolated `(user, session)` scope owning one document collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TenantKey {
    pub user_id: u64,
    pub session_id: u64,
}

impl TenantKey {
    pub fn new(user_id: u64, session_id: u64) -> Self {
        Self {
            user_id,
            session_id,
        }
    }
}

impl std::fmt::Display for TenantKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "user {}, session {}", self.user_id, self.session_id)
    }
}

/// One embedded window of a source document. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredChunk {
    /// `{document_id}_{index}` — stable and traceable to parent and position
    pub chunk_id: String,
    /// The text content of the chunk
    pub text: String,
    /// Embedding vector; length must match the collection's dimension
    pub embedding: Vec<f64>,
}

/// A fully ingested document. Created only by successful ingestion,
/// never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub document_id: String,
    pub source_path: String,
    pub name: String,
    pub chunks: Vec<StoredChunk>,
}

impl Document {
    /// Vector width of this document's chunks, if it has any.
    pub fn embedding_dimension(&self) -> Option<usize> {
        self.chunks.first().map(|c| c.embedding.len())
    }
}

/// Persisted collection for one tenant.
///
/// The wire layout is `{"documents": [...]}`; `embedding_dimension` is
/// optional and defaulted so empty, missing, and pre-lock files all stay
/// readable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TenantCollection {
    #[serde(default)]
    pub documents: Vec<Document>,
    /// Vector width locked in by the first ingested document. Appends
    /// with another width are rejected: mixing embedding models within
    /// one tenant would make similarity scores meaningless.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding_dimension: Option<usize>,
}

impl TenantCollection {
    /// Total chunk count across all documents.
    pub fn chunk_count(&self) -> usize {
        self.documents.iter().map(|d| d.chunks.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Errors from the persistence boundary.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Filesystem failure while reading or writing a collection
    #[error("Store I/O failed: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// A collection could not be serialized for persistence
    #[error("Store serialization failed: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },

    /// The appended document's vector width disagrees with the tenant's lock
    #[error("Embedding dimension mismatch for {tenant}: store holds {expected}, document has {actual}")]
    DimensionMismatch {
        tenant: TenantKey,
        expected: usize,
        actual: usize,
    },
}

/// Durable read/modify/persist of one tenant's document collection.
///
/// Implementations must guarantee that readers never observe a partially
/// written collection and that concurrent appends to the same tenant do
/// not lose documents.
#[async_trait]
pub trait TenantStore: Send + Sync {
    /// Return the persisted collection for `key`.
    ///
    /// A missing or unreadable collection yields an empty, well-formed
    /// one; corruption is logged and recovered from, never propagated as
    /// a crash.
    async fn load(&self, key: TenantKey) -> Result<TenantCollection, StoreError>;

    /// Append one fully-formed document and persist the result atomically.
    async fn append(&self, key: TenantKey, document: Document) -> Result<(), StoreError>;
}
