//! OpenAI-compatible HTTP embedding backend
//!
//! Speaks the `/v1/embeddings` wire format: a JSON POST with `model` and
//! `input`, answered by a `data` array whose items carry an `index` and an
//! `embedding`. Many local servers (Ollama, vLLM, LM Studio) expose the
//! same shape, so "OpenAI" here means the protocol, not the vendor.

use crate::config::EmbedConfig;
use crate::error::{EmbedError, Result};
use crate::provider::{EmbeddingBatch, EmbeddingProvider};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingItem>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingItem {
    index: usize,
    embedding: Vec<f64>,
}

/// Remote embedding provider over an OpenAI-compatible HTTP API.
pub struct OpenAiEmbeddingProvider {
    config: EmbedConfig,
    client: reqwest::Client,
}

impl std::fmt::Debug for OpenAiEmbeddingProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiEmbeddingProvider")
            .field("api_base", &self.config.api_base)
            .field("model", &self.config.model)
            .field("dimension", &self.config.dimension)
            .finish()
    }
}

impl OpenAiEmbeddingProvider {
    /// Build a provider from a validated configuration.
    pub fn new(config: EmbedConfig) -> Result<Self> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| EmbedError::invalid_config(format!("failed to build client: {e}")))?;
        Ok(Self { config, client })
    }

    fn map_request_error(&self, err: reqwest::Error) -> EmbedError {
        if err.is_timeout() {
            EmbedError::Timeout {
                seconds: self.config.timeout.as_secs(),
            }
        } else {
            EmbedError::unavailable(err.to_string())
        }
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddingProvider {
    async fn embed_texts(&self, texts: &[String]) -> Result<EmbeddingBatch> {
        // Skip the round-trip entirely for empty input; remote calls are
        // billed per request.
        if texts.is_empty() {
            return Ok(EmbeddingBatch::new(vec![]));
        }

        tracing::debug!(
            count = texts.len(),
            model = %self.config.model,
            "requesting embeddings"
        );

        let request = EmbeddingsRequest {
            model: &self.config.model,
            input: texts,
        };

        let response = self
            .client
            .post(self.config.embeddings_url())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_request_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%status, "embedding request rejected");
            return Err(EmbedError::unavailable(format!(
                "provider returned {status}: {body}"
            )));
        }

        let payload: EmbeddingsResponse = response
            .json()
            .await
            .map_err(|e| EmbedError::MalformedResponse {
                message: e.to_string(),
            })?;

        // The API is free to reorder items; `index` is authoritative.
        let mut items = payload.data;
        items.sort_by_key(|item| item.index);
        let vectors: Vec<Vec<f64>> = items.into_iter().map(|item| item.embedding).collect();

        let batch = EmbeddingBatch::new(vectors);
        batch.validate(texts.len())?;
        if batch.dimension != self.config.dimension {
            return Err(EmbedError::DimensionMismatch {
                expected: self.config.dimension,
                actual: batch.dimension,
            });
        }

        tracing::debug!(count = batch.len(), dimension = batch.dimension, "embeddings received");
        Ok(batch)
    }

    fn dimension(&self) -> usize {
        self.config.dimension
    }

    fn provider_name(&self) -> &str {
        "openai-compatible"
    }
}
