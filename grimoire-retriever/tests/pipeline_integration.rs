//! End-to-end tests over the ingestion and query pipelines
//!
//! These run against the real JSON file store in a temp directory and a
//! deterministic in-process embedding provider, so they cover:
//! - chunking + embedding + persistence as one transaction
//! - chunk id and count invariants
//! - similarity ranking through the full query path
//! - tenant isolation and the empty-tenant message
//! - failure behavior: no partial writes, degraded query strings

use async_trait::async_trait;
use grimoire_context::ChunkConfig;
use grimoire_embed::{EmbedError, EmbeddingBatch, EmbeddingProvider};
use grimoire_retriever::retrieval::{
    DEFAULT_TOP_K, IngestError, IngestionPipeline, QueryPipeline, SearchOutcome,
};
use grimoire_retriever::storage::{JsonFileStore, TenantKey, TenantStore};
use std::sync::Arc;
use tempfile::tempdir;

const DIMENSION: usize = 4;

/// Deterministic provider: each text maps to a fixed direction based on
/// simple letter counts, so identical texts embed identically and
/// different marker words point different ways.
struct CountingProvider;

fn embed(text: &str) -> Vec<f64> {
    vec![
        1.0 + text.matches("alpha").count() as f64 * 10.0,
        text.matches("beta").count() as f64 * 10.0,
        text.matches("gamma").count() as f64 * 10.0,
        text.len() as f64 / 1000.0,
    ]
}

#[async_trait]
impl EmbeddingProvider for CountingProvider {
    async fn embed_texts(&self, texts: &[String]) -> Result<EmbeddingBatch, EmbedError> {
        Ok(EmbeddingBatch::new(
            texts.iter().map(|t| embed(t)).collect(),
        ))
    }

    fn dimension(&self) -> usize {
        DIMENSION
    }

    fn provider_name(&self) -> &str {
        "counting-mock"
    }
}

/// Provider that always fails, for outage-path tests.
struct BrokenProvider;

#[async_trait]
impl EmbeddingProvider for BrokenProvider {
    async fn embed_texts(&self, _texts: &[String]) -> Result<EmbeddingBatch, EmbedError> {
        Err(EmbedError::unavailable("quota exhausted"))
    }

    fn dimension(&self) -> usize {
        DIMENSION
    }

    fn provider_name(&self) -> &str {
        "broken-mock"
    }
}

/// Provider that silently drops the last vector of every batch.
struct ShortBatchProvider;

#[async_trait]
impl EmbeddingProvider for ShortBatchProvider {
    async fn embed_texts(&self, texts: &[String]) -> Result<EmbeddingBatch, EmbedError> {
        let mut vectors: Vec<Vec<f64>> = texts.iter().map(|t| embed(t)).collect();
        vectors.pop();
        Ok(EmbeddingBatch::new(vectors))
    }

    fn dimension(&self) -> usize {
        DIMENSION
    }

    fn provider_name(&self) -> &str {
        "short-batch-mock"
    }
}

/// Provider that returns the right number of vectors but with uneven
/// widths, which a count-only check would wave through.
struct RaggedProvider;

#[async_trait]
impl EmbeddingProvider for RaggedProvider {
    async fn embed_texts(&self, texts: &[String]) -> Result<EmbeddingBatch, EmbedError> {
        let vectors = texts
            .iter()
            .enumerate()
            .map(|(i, _)| vec![1.0; DIMENSION + i])
            .collect();
        Ok(EmbeddingBatch::new(vectors))
    }

    fn dimension(&self) -> usize {
        DIMENSION
    }

    fn provider_name(&self) -> &str {
        "ragged-mock"
    }
}

#[tokio::test]
async fn ingest_chunks_embeds_and_persists_with_default_windows() {
    let dir = tempdir().unwrap();
    let store = Arc::new(JsonFileStore::new(dir.path()));
    let pipeline = IngestionPipeline::new(store.clone(), Arc::new(CountingProvider));
    let key = TenantKey::new(1, 1);

    // 2500 chars with default 1200/150 windows: 1200 + 1050 + 250 = 3 chunks.
    let text = "x".repeat(2500);
    let document_id = pipeline.ingest(&text, "/docs/big.txt", "big.txt", key)
        .await
        .unwrap();

    let collection = store.load(key).await.unwrap();
    assert_eq!(collection.documents.len(), 1);

    let document = &collection.documents[0];
    assert_eq!(document.document_id, document_id);
    assert_eq!(document.chunks.len(), 3);
    assert_eq!(collection.chunk_count(), 3);
    assert_eq!(collection.embedding_dimension, Some(DIMENSION));

    for (index, chunk) in document.chunks.iter().enumerate() {
        assert_eq!(chunk.chunk_id, format!("{document_id}_{index}"));
        assert_eq!(chunk.embedding.len(), DIMENSION);
        assert!(!chunk.text.is_empty());
    }
}

#[tokio::test]
async fn query_returns_most_similar_chunk_first() {
    let dir = tempdir().unwrap();
    let store = Arc::new(JsonFileStore::new(dir.path()));
    let provider = Arc::new(CountingProvider);
    let key = TenantKey::new(2, 1);

    // Segments are exactly 40 chars each, so with 40/0 windows every
    // marker word lands in its own chunk.
    let text = concat!(
        "alpha alpha alpha alpha alpha alpha pad.",
        "beta beta beta beta beta beta beta beta ",
        "gamma gamma gamma gamma gamma gamma pads",
    );
    let pipeline = IngestionPipeline::new(store.clone(), provider.clone())
        .with_chunking(ChunkConfig::new(40, 0));
    pipeline
        .ingest(text, "/docs/facts.txt", "facts.txt", key)
        .await
        .unwrap();

    let query = QueryPipeline::new(store, provider);
    let outcome = query.search("beta beta beta", key, 1).await.unwrap();

    let SearchOutcome::Hits(hits) = outcome else {
        panic!("expected hits for a populated tenant");
    };
    assert_eq!(hits.len(), 1);
    assert!(hits[0].text.contains("beta"));
    assert_eq!(hits[0].source, "/docs/facts.txt");
}

#[tokio::test]
async fn query_formats_ranked_snippets() {
    let dir = tempdir().unwrap();
    let store = Arc::new(JsonFileStore::new(dir.path()));
    let provider = Arc::new(CountingProvider);
    let key = TenantKey::new(2, 2);

    let pipeline = IngestionPipeline::new(store.clone(), provider.clone())
        .with_chunking(ChunkConfig::new(40, 0));
    pipeline
        .ingest(
            "alpha notes first.      beta notes second.",
            "/docs/notes.txt",
            "notes.txt",
            key,
        )
        .await
        .unwrap();

    let query = QueryPipeline::new(store, provider);
    let output = query.query("alpha", key, DEFAULT_TOP_K).await;

    assert!(output.starts_with("[1] score="));
    assert!(output.contains("| source=/docs/notes.txt"));
    assert!(output.contains("[2] score="));
}

#[tokio::test]
async fn tenants_do_not_see_each_others_documents() {
    let dir = tempdir().unwrap();
    let store = Arc::new(JsonFileStore::new(dir.path()));
    let provider = Arc::new(CountingProvider);

    let pipeline = IngestionPipeline::new(store.clone(), provider.clone());
    pipeline
        .ingest("alpha secrets", "/docs/secret.txt", "secret.txt", TenantKey::new(1, 1))
        .await
        .unwrap();

    let query = QueryPipeline::new(store, provider);
    let output = query.query("alpha", TenantKey::new(2, 2), DEFAULT_TOP_K).await;

    assert_eq!(
        output,
        "No knowledge ingested yet for user 2, session 2. Please upload a document first."
    );
}

#[tokio::test]
async fn empty_tenant_reports_no_knowledge() {
    let dir = tempdir().unwrap();
    let store = Arc::new(JsonFileStore::new(dir.path()));
    let query = QueryPipeline::new(store, Arc::new(CountingProvider));

    let outcome = query
        .search("anything", TenantKey::new(9, 9), DEFAULT_TOP_K)
        .await
        .unwrap();
    assert!(matches!(outcome, SearchOutcome::NoKnowledge));
}

#[tokio::test]
async fn failed_embedding_leaves_no_partial_write() {
    let dir = tempdir().unwrap();
    let store = Arc::new(JsonFileStore::new(dir.path()));
    let pipeline = IngestionPipeline::new(store.clone(), Arc::new(BrokenProvider));
    let key = TenantKey::new(3, 3);

    let err = pipeline
        .ingest("some text", "/docs/a.txt", "a.txt", key)
        .await
        .unwrap_err();
    assert!(matches!(err, IngestError::Embedding(_)));

    // Nothing persisted for the tenant, not even an empty file.
    assert!(!store.tenant_path(key).exists());
    let collection = store.load(key).await.unwrap();
    assert!(collection.is_empty());
}

#[tokio::test]
async fn short_embedding_batch_is_rejected_before_writing() {
    let dir = tempdir().unwrap();
    let store = Arc::new(JsonFileStore::new(dir.path()));
    let pipeline = IngestionPipeline::new(store.clone(), Arc::new(ShortBatchProvider))
        .with_chunking(ChunkConfig::new(20, 0));
    let key = TenantKey::new(4, 4);

    let err = pipeline
        .ingest(
            "alpha alpha alpha alpha beta beta beta beta",
            "/docs/a.txt",
            "a.txt",
            key,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, IngestError::EmbeddingMismatch { .. }));
    assert!(!store.tenant_path(key).exists());
}

#[tokio::test]
async fn ragged_embedding_batch_is_rejected_before_writing() {
    let dir = tempdir().unwrap();
    let store = Arc::new(JsonFileStore::new(dir.path()));
    let pipeline = IngestionPipeline::new(store.clone(), Arc::new(RaggedProvider))
        .with_chunking(ChunkConfig::new(20, 0));
    let key = TenantKey::new(10, 10);

    let err = pipeline
        .ingest(
            "alpha alpha alpha alpha beta beta beta beta",
            "/docs/a.txt",
            "a.txt",
            key,
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        IngestError::Embedding(EmbedError::DimensionMismatch { .. })
    ));

    // Nothing with mixed widths ever reaches the store.
    assert!(!store.tenant_path(key).exists());
    assert!(store.load(key).await.unwrap().is_empty());
}

#[tokio::test]
async fn empty_text_is_rejected_without_calling_the_provider() {
    let dir = tempdir().unwrap();
    let store = Arc::new(JsonFileStore::new(dir.path()));
    let pipeline = IngestionPipeline::new(store.clone(), Arc::new(BrokenProvider));
    let key = TenantKey::new(5, 5);

    // BrokenProvider would fail any embed call; NoContentExtracted proves
    // validation short-circuits first.
    let err = pipeline
        .ingest("   \n\t  ", "/docs/blank.txt", "blank.txt", key)
        .await
        .unwrap_err();
    assert!(matches!(err, IngestError::NoContentExtracted));
}

#[tokio::test]
async fn query_degrades_to_error_string_when_provider_is_down() {
    let dir = tempdir().unwrap();
    let store = Arc::new(JsonFileStore::new(dir.path()));
    let query = QueryPipeline::new(store, Arc::new(BrokenProvider));

    let output = query
        .query("anything", TenantKey::new(6, 6), DEFAULT_TOP_K)
        .await;
    assert!(output.starts_with("[retrieve error]"));
    assert!(output.contains("quota exhausted"));
}

#[tokio::test]
async fn blank_query_degrades_to_error_string() {
    let dir = tempdir().unwrap();
    let store = Arc::new(JsonFileStore::new(dir.path()));
    let query = QueryPipeline::new(store, Arc::new(CountingProvider));

    let output = query.query("   ", TenantKey::new(7, 7), DEFAULT_TOP_K).await;
    assert!(output.starts_with("[retrieve error]"));
}

#[tokio::test]
async fn multiple_ingests_accumulate_documents() {
    let dir = tempdir().unwrap();
    let store = Arc::new(JsonFileStore::new(dir.path()));
    let provider = Arc::new(CountingProvider);
    let key = TenantKey::new(8, 8);

    let pipeline = IngestionPipeline::new(store.clone(), provider.clone());
    let first = pipeline
        .ingest("alpha document", "/docs/one.txt", "one.txt", key)
        .await
        .unwrap();
    let second = pipeline
        .ingest("beta document", "/docs/two.txt", "two.txt", key)
        .await
        .unwrap();
    assert_ne!(first, second);

    let collection = store.load(key).await.unwrap();
    assert_eq!(collection.documents.len(), 2);
    assert_eq!(collection.documents[0].document_id, first);
    assert_eq!(collection.documents[1].document_id, second);
}
