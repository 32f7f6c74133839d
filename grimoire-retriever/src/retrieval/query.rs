//! Query pipeline: question in, formatted snippets out
//!
//! The outer [`QueryPipeline::query`] operation is designed for direct
//! use by an agent loop and therefore never fails: validation problems,
//! provider outages, and anything unexpected are all converted into a
//! descriptive result string. The typed [`QueryPipeline::search`]
//! operation underneath is for callers that want to branch on failures
//! themselves.

use crate::retrieval::ranker::{LinearScanRanker, Ranker, SearchHit};
use crate::storage::{StoreError, TenantKey, TenantStore};
use grimoire_embed::{EmbedError, EmbeddingProvider};
use std::sync::Arc;

/// Default number of snippets returned per query.
pub const DEFAULT_TOP_K: usize = 5;

/// Snippets longer than this are cut with a trailing ellipsis to keep
/// each result prompt-sized.
const SNIPPET_MAX_CHARS: usize = 800;

/// Typed failures of the query path.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// The query string was empty or whitespace-only
    #[error("Query must be a non-empty string")]
    EmptyQuery,

    /// Embedding the query text failed
    #[error("Query embedding failed: {0}")]
    EmbeddingFailed(#[from] EmbedError),

    /// Loading the tenant collection failed
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result of a typed search.
#[derive(Debug)]
pub enum SearchOutcome {
    /// The tenant has no ingested documents yet
    NoKnowledge,
    /// Ranked hits, best first
    Hits(Vec<SearchHit>),
}

/// Answers natural-language queries from a tenant's ingested documents.
pub struct QueryPipeline {
    store: Arc<dyn TenantStore>,
    provider: Arc<dyn EmbeddingProvider>,
    ranker: Arc<dyn Ranker>,
}

impl QueryPipeline {
    pub fn new(store: Arc<dyn TenantStore>, provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            store,
            provider,
            ranker: Arc::new(LinearScanRanker),
        }
    }

    /// Substitute another ranking backend behind the same contract.
    pub fn with_ranker(mut self, ranker: Arc<dyn Ranker>) -> Self {
        self.ranker = ranker;
        self
    }

    /// Embed the query, load the tenant's collection, and rank its chunks.
    pub async fn search(
        &self,
        query: &str,
        key: TenantKey,
        top_k: usize,
    ) -> Result<SearchOutcome, QueryError> {
        if query.trim().is_empty() {
            return Err(QueryError::EmptyQuery);
        }

        let query_vector = self.provider.embed_text(query).await?;

        let collection = self.store.load(key).await?;
        if collection.is_empty() {
            return Ok(SearchOutcome::NoKnowledge);
        }

        let hits = self
            .ranker
            .rank(&query_vector, &collection.documents, top_k);
        Ok(SearchOutcome::Hits(hits))
    }

    /// Agent-facing entry point. Always returns a printable string; a
    /// retrieval failure degrades into a message instead of crashing the
    /// enclosing loop.
    pub async fn query(&self, query: &str, key: TenantKey, top_k: usize) -> String {
        match self.search(query, key, top_k).await {
            Ok(SearchOutcome::NoKnowledge) => format!(
                "No knowledge ingested yet for {key}. Please upload a document first."
            ),
            Ok(SearchOutcome::Hits(hits)) if hits.is_empty() => {
                format!("No results found in the knowledge base for {key}.")
            }
            Ok(SearchOutcome::Hits(hits)) => format_hits(&hits),
            Err(err) => {
                tracing::warn!(%key, %err, "query degraded to error message");
                format!("[retrieve error] {err}")
            }
        }
    }
}

/// Render hits as numbered, prompt-ready lines:
/// `[rank] score=0.1234 | source=<path>` followed by the snippet.
fn format_hits(hits: &[SearchHit]) -> String {
    let lines: Vec<String> = hits
        .iter()
        .enumerate()
        .map(|(i, hit)| {
            format!(
                "[{}] score={:.4} | source={}\n{}\n",
                i + 1,
                hit.score,
                hit.source,
                compact_snippet(&hit.text)
            )
        })
        .collect();
    lines.join("\n")
}

/// Collapse embedded newlines and cap the snippet length.
fn compact_snippet(text: &str) -> String {
    let flat = text.trim().replace(['\n', '\r'], " ");
    if flat.chars().count() > SNIPPET_MAX_CHARS {
        let cut: String = flat.chars().take(SNIPPET_MAX_CHARS).collect();
        format!("{cut}...")
    } else {
        flat
    }
}
