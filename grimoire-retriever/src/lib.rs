//! grimoire-retriever: per-tenant knowledge store with semantic retrieval
//!
//! This crate ties the chunker (`grimoire-context`) and the embedding
//! boundary (`grimoire-embed`) to a JSON-file-backed tenant store, giving
//! each (user, session) pair its own append-only document collection and
//! a cosine-similarity query path over it.
//!
//! ## Key Modules
//!
//! - **[`retrieval`]**: Ingestion and query pipelines plus the linear-scan ranker
//! - **[`storage`]**: Tenant store contract and the JSON file implementation
//! - **[`extract`]**: Fallback chain of text-extraction backends for the CLI
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use grimoire_embed::{EmbedConfig, OpenAiEmbeddingProvider};
//! use grimoire_retriever::retrieval::{IngestionPipeline, QueryPipeline, DEFAULT_TOP_K};
//! use grimoire_retriever::storage::{JsonFileStore, TenantKey};
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let store = Arc::new(JsonFileStore::new("./knowledge"));
//! let config = EmbedConfig::new(
//!     "https://api.openai.com/v1",
//!     "sk-...",
//!     "text-embedding-3-small",
//!     1536,
//! );
//! let provider = Arc::new(OpenAiEmbeddingProvider::new(config)?);
//!
//! let key = TenantKey::new(1, 1);
//! let ingest = IngestionPipeline::new(store.clone(), provider.clone());
//! ingest.ingest("some document text", "/docs/a.txt", "a.txt", key).await?;
//!
//! let query = QueryPipeline::new(store, provider);
//! println!("{}", query.query("what does it say?", key, DEFAULT_TOP_K).await);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Text → Chunker → Embeddings → JSON Tenant Store
//!                                      ↓
//! Query → Embedding → Cosine Ranker → Formatted snippets
//! ```

pub mod extract;
pub mod retrieval;
pub mod storage;
