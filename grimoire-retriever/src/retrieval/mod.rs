//! Core retrieval logic: ingestion, ranking, and querying
//!
//! The two pipelines here orchestrate the chunker (`grimoire-context`),
//! the embedding boundary (`grimoire-embed`), and the tenant store
//! (`crate::storage`). They hold the components behind `Arc<dyn …>`
//! trait objects, so any store, provider, or ranker honoring the
//! contracts can be wired in — including the mocks the tests use.

pub mod ingest;
pub mod query;
pub mod ranker;

pub use ingest::{IngestError, IngestionPipeline};
pub use query::{DEFAULT_TOP_K, QueryError, QueryPipeline, SearchOutcome};
pub use ranker::{LinearScanRanker, Ranker, SearchHit, cosine_similarity};
