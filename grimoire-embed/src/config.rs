//! Configuration for remote embedding backends

use crate::error::{EmbedError, Result};
use std::time::Duration;

/// Default request deadline for one embedding batch.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for an OpenAI-compatible embedding endpoint.
///
/// All knobs are explicit constructor inputs rather than ambient
/// environment state, so pipelines can be wired with a mock or a local
/// endpoint in tests without touching the process environment.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct EmbedConfig {
    /// Base URL of the API, e.g. `https://api.openai.com/v1`
    pub api_base: String,
    /// Bearer token sent with every request
    pub api_key: String,
    /// Model identifier, e.g. `text-embedding-3-small`
    pub model: String,
    /// Expected vector width; responses with another width are rejected
    pub dimension: usize,
    /// Hard deadline for one batch request
    #[serde(with = "timeout_secs")]
    pub timeout: Duration,
}

impl EmbedConfig {
    /// Create a configuration with the default timeout.
    pub fn new(
        api_base: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        dimension: usize,
    ) -> Self {
        Self {
            api_base: api_base.into(),
            api_key: api_key.into(),
            model: model.into(),
            dimension,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the per-request deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Check the configuration before building a client from it.
    pub fn validate(&self) -> Result<()> {
        if self.api_base.trim().is_empty() {
            return Err(EmbedError::invalid_config("api_base must not be empty"));
        }
        if self.api_key.trim().is_empty() {
            return Err(EmbedError::invalid_config("api_key must not be empty"));
        }
        if self.model.trim().is_empty() {
            return Err(EmbedError::invalid_config("model must not be empty"));
        }
        if self.dimension == 0 {
            return Err(EmbedError::invalid_config("dimension must be positive"));
        }
        Ok(())
    }

    /// Full URL of the embeddings endpoint.
    pub fn embeddings_url(&self) -> String {
        format!("{}/embeddings", self.api_base.trim_end_matches('/'))
    }
}

mod timeout_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_secs(u64::deserialize(deserializer)?))
    }
}
