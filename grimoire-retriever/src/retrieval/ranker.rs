//! Cosine-similarity ranking over a tenant's chunks
//!
//! Ranking is a read-only linear scan across every chunk of every
//! document — no index structure is maintained. That is the accepted
//! trade-off for the corpus sizes this store targets; the [`Ranker`]
//! trait is the seam where an approximate-nearest-neighbor backend could
//! be slotted in later without touching the pipelines.

use crate::storage::Document;
use serde::Serialize;

/// One ranked chunk, ready for formatting.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    /// Cosine similarity against the query vector, range [-1, 1]
    pub score: f64,
    /// The chunk text
    pub text: String,
    /// Source identifier of the owning document
    pub source: String,
}

/// Ranking capability over a tenant's documents.
pub trait Ranker: Send + Sync {
    /// Return the `top_k` most similar chunks, sorted by descending
    /// score. `top_k` is clamped to a minimum of 1; the result length is
    /// `min(top_k, total chunks)`. Ties keep insertion order so results
    /// are deterministic.
    fn rank(&self, query: &[f64], documents: &[Document], top_k: usize) -> Vec<SearchHit>;
}

/// Exhaustive scan ranker.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearScanRanker;

impl Ranker for LinearScanRanker {
    fn rank(&self, query: &[f64], documents: &[Document], top_k: usize) -> Vec<SearchHit> {
        let mut hits: Vec<SearchHit> = Vec::new();
        for document in documents {
            for chunk in &document.chunks {
                hits.push(SearchHit {
                    score: cosine_similarity(query, &chunk.embedding),
                    text: chunk.text.clone(),
                    source: document.source_path.clone(),
                });
            }
        }

        // Stable sort keeps insertion order among equal scores.
        hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        hits.truncate(top_k.max(1));
        hits
    }
}

/// Cosine similarity between two vectors.
///
/// A zero-magnitude vector carries no directional information, so any
/// comparison involving one is defined as `0.0` rather than an error or
/// NaN. Length-mismatched vectors also score `0.0`; the store's dimension
/// lock makes that case unreachable for persisted data.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() {
        return 0.0;
    }

    let mut dot = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a.sqrt() * norm_b.sqrt())
    }
}
