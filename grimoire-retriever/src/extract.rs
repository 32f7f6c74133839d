//! Text extraction collaborators for the ingest CLI
//!
//! Extraction sits outside the core pipelines: the ingestion pipeline
//! only ever sees raw text. Backends are tried in order and the first
//! one producing non-empty text wins; individual failures are logged and
//! skipped, and only an all-backends-failed run surfaces as an error.

use async_trait::async_trait;
use std::path::Path;

/// Errors from the extraction boundary.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// No configured backend produced any text
    #[error("No extraction backend produced text for {path}")]
    Unavailable { path: String },

    /// The source file could not be read at all
    #[error("Failed to read source: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

/// One extraction backend.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Extract raw text from the file at `path`. An empty string means
    /// "this backend got nothing", which sends the fallback chain to the
    /// next backend.
    async fn extract(&self, path: &Path) -> Result<String, ExtractError>;

    /// Name used in log lines.
    fn name(&self) -> &str;
}

/// Reads the file verbatim as UTF-8 text.
#[derive(Debug, Default)]
pub struct PlainTextExtractor;

#[async_trait]
impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        Ok(tokio::fs::read_to_string(path).await?.trim().to_string())
    }

    fn name(&self) -> &str {
        "plain-text"
    }
}

/// Ordered chain of extraction backends; first non-empty result wins.
pub struct FallbackExtractor {
    backends: Vec<Box<dyn TextExtractor>>,
}

impl FallbackExtractor {
    pub fn new(backends: Vec<Box<dyn TextExtractor>>) -> Self {
        Self { backends }
    }

    /// A chain containing only the plain-text backend.
    pub fn plain_text() -> Self {
        Self::new(vec![Box::new(PlainTextExtractor)])
    }

    /// Try each backend in order, returning the first non-empty text.
    pub async fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        for backend in &self.backends {
            match backend.extract(path).await {
                Ok(text) if !text.is_empty() => {
                    tracing::info!(backend = backend.name(), "extracted text");
                    return Ok(text);
                }
                Ok(_) => {
                    tracing::debug!(backend = backend.name(), "backend produced no text");
                }
                Err(err) => {
                    tracing::warn!(backend = backend.name(), %err, "extraction backend failed");
                }
            }
        }
        Err(ExtractError::Unavailable {
            path: path.display().to_string(),
        })
    }
}
