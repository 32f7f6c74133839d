//! # grimoire-embed
//!
//! Embedding provider boundary for the grimoire knowledge store: an
//! async trait over "ordered texts in, ordered vectors out" plus an
//! OpenAI-compatible HTTP backend.
//!
//! ## Contract
//!
//! [`EmbeddingProvider::embed_texts`] is order- and length-preserving on
//! success; any failure (network, quota, malformed body, wrong vector
//! width) surfaces as a typed [`EmbedError`] so callers can never
//! continue with a mismatched chunk/vector pairing. Empty input returns
//! an empty batch without a network round-trip.
//!
//! ## Quick Start
//!
//! ```no_run
//! use grimoire_embed::{EmbedConfig, EmbeddingProvider, OpenAiEmbeddingProvider};
//!
//! # async fn example() -> grimoire_embed::Result<()> {
//! let config = EmbedConfig::new(
//!     "https://api.openai.com/v1",
//!     std::env::var("OPENAI_API_KEY").unwrap_or_default(),
//!     "text-embedding-3-small",
//!     1536,
//! );
//! let provider = OpenAiEmbeddingProvider::new(config)?;
//!
//! let texts = vec!["Hello world".to_string(), "How are you?".to_string()];
//! let batch = provider.embed_texts(&texts).await?;
//!
//! println!("Generated {} embeddings of dimension {}", batch.len(), batch.dimension);
//! # Ok(())
//! # }
//! ```
//!
//! Every request is bounded by the timeout in [`EmbedConfig`]; on expiry
//! the provider fails fast with the retryable [`EmbedError::Timeout`]
//! instead of hanging its caller.

pub mod config;
pub mod error;
pub mod openai;
pub mod provider;

// Re-export main types for easy access
pub use config::{DEFAULT_TIMEOUT, EmbedConfig};
pub use error::{EmbedError, Result};
pub use openai::OpenAiEmbeddingProvider;
pub use provider::{EmbeddingBatch, EmbeddingProvider};
