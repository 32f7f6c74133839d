//! Ingestion pipeline: raw text in, one persisted document out
//!
//! Orchestrates the chunker, the embedding provider, and the tenant
//! store. All validation happens before the single store mutation, so no
//! failure path can leave a partial document behind: the only side
//! effects of a failed ingestion are log lines and the one embedding
//! batch call that was already made.

use crate::storage::{Document, StoreError, StoredChunk, TenantKey, TenantStore};
use grimoire_context::{ChunkConfig, chunk_text};
use grimoire_embed::{EmbedError, EmbeddingProvider};
use std::sync::Arc;
use uuid::Uuid;

/// Ingestion-time failures. All variants abort before any write.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// Upstream extraction produced no text at all
    #[error("No content extracted from source; nothing to ingest")]
    NoContentExtracted,

    /// Chunking the text yielded zero windows
    #[error("Chunking produced no chunks; nothing to ingest")]
    NoChunksProduced,

    /// The provider returned a different number of vectors than chunks sent
    #[error("Embedding mismatch: {chunks} chunks but {vectors} vectors")]
    EmbeddingMismatch { chunks: usize, vectors: usize },

    /// The embedding provider failed (timeout, quota, network)
    #[error(transparent)]
    Embedding(#[from] EmbedError),

    /// The tenant store rejected or failed the append
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Turns raw extracted text into a persisted, embedded document.
pub struct IngestionPipeline {
    store: Arc<dyn TenantStore>,
    provider: Arc<dyn EmbeddingProvider>,
    chunking: ChunkConfig,
}

impl IngestionPipeline {
    pub fn new(store: Arc<dyn TenantStore>, provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            store,
            provider,
            chunking: ChunkConfig::default(),
        }
    }

    /// Override the default 1200/150 window configuration.
    pub fn with_chunking(mut self, chunking: ChunkConfig) -> Self {
        self.chunking = chunking;
        self
    }

    /// Ingest one document for `key` and return its fresh document id.
    ///
    /// `source_path` and `name` identify where the text came from; they
    /// are stored verbatim and echoed back in query results.
    pub async fn ingest(
        &self,
        raw_text: &str,
        source_path: &str,
        name: &str,
        key: TenantKey,
    ) -> Result<String, IngestError> {
        if raw_text.trim().is_empty() {
            return Err(IngestError::NoContentExtracted);
        }

        let chunks = chunk_text(raw_text, &self.chunking);
        if chunks.is_empty() {
            return Err(IngestError::NoChunksProduced);
        }

        // One batch call for the whole document.
        let batch = self.provider.embed_texts(&chunks).await?;
        if batch.len() != chunks.len() {
            return Err(IngestError::EmbeddingMismatch {
                chunks: chunks.len(),
                vectors: batch.len(),
            });
        }
        // A ragged batch (right count, uneven widths) must not reach the store.
        batch.validate(chunks.len())?;

        let document_id = Uuid::new_v4().to_string();
        let stored_chunks: Vec<StoredChunk> = chunks
            .into_iter()
            .zip(batch.vectors)
            .enumerate()
            .map(|(index, (text, embedding))| StoredChunk {
                chunk_id: format!("{document_id}_{index}"),
                text,
                embedding,
            })
            .collect();

        let chunk_count = stored_chunks.len();
        let document = Document {
            document_id: document_id.clone(),
            source_path: source_path.to_string(),
            name: name.to_string(),
            chunks: stored_chunks,
        };

        self.store.append(key, document).await?;

        tracing::info!(%key, %document_id, chunks = chunk_count, "ingested document");
        Ok(document_id)
    }
}
