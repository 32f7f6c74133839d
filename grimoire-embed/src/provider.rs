//! Embedding provider abstraction

use crate::error::{EmbedError, Result};
use async_trait::async_trait;

/// Ordered result of embedding a batch of texts.
///
/// Vector `i` always corresponds to input text `i`; providers that cannot
/// guarantee that must fail instead of answering.
#[derive(Debug, Clone)]
pub struct EmbeddingBatch {
    /// The generated embeddings, one per input text
    pub vectors: Vec<Vec<f64>>,
    /// The dimension of each embedding vector
    pub dimension: usize,
}

impl EmbeddingBatch {
    /// Create a batch, inferring the dimension from the first vector.
    ///
    /// An empty batch has dimension 0.
    pub fn new(vectors: Vec<Vec<f64>>) -> Self {
        let dimension = vectors.first().map(|v| v.len()).unwrap_or(0);
        Self { vectors, dimension }
    }

    /// Number of embedding vectors in this batch.
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    /// Returns `true` if this batch contains no vectors.
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Check that every vector has the same length and that the batch size
    /// matches the number of texts that were sent.
    pub fn validate(&self, sent: usize) -> Result<()> {
        if self.vectors.len() != sent {
            return Err(EmbedError::BatchMismatch {
                sent,
                received: self.vectors.len(),
            });
        }
        for vector in &self.vectors {
            if vector.len() != self.dimension {
                return Err(EmbedError::DimensionMismatch {
                    expected: self.dimension,
                    actual: vector.len(),
                });
            }
        }
        Ok(())
    }
}

/// Trait for backends that turn ordered text batches into ordered vectors.
///
/// Any backend exposing this contract — a remote API, a local model, a
/// test mock — is interchangeable; stores and rankers depend only on the
/// trait, never on a concrete provider.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate embeddings for a batch of texts, order- and
    /// length-preserving on success.
    ///
    /// An empty input must return an empty batch without invoking the
    /// backend at all.
    async fn embed_texts(&self, texts: &[String]) -> Result<EmbeddingBatch>;

    /// Generate an embedding for a single text.
    async fn embed_text(&self, text: &str) -> Result<Vec<f64>> {
        let texts = vec![text.to_string()];
        let batch = self.embed_texts(&texts).await?;
        batch
            .vectors
            .into_iter()
            .next()
            .ok_or_else(|| EmbedError::BatchMismatch {
                sent: 1,
                received: 0,
            })
    }

    /// The fixed vector width this provider produces.
    fn dimension(&self) -> usize;

    /// Name/identifier of this provider.
    fn provider_name(&self) -> &str;
}
