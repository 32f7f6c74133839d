pub mod text;

// Re-export the chunking surface for external use
pub use text::{ChunkConfig, DEFAULT_MAX_CHARS, DEFAULT_OVERLAP, chunk_text};
