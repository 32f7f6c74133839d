//! Fixed-width overlapping text windows for retrieval pipelines.
//!
//! Raw document text is split into consecutive windows of at most
//! `max_chars` characters, where each window starts `max_chars - overlap`
//! characters after the previous one. The overlap keeps sentences that
//! straddle a window boundary retrievable from both sides. Windows are
//! measured in Unicode scalar values, never bytes, so a window boundary
//! can never split a multi-byte character.
//!
//! Chunking is a pure function: the same input and configuration always
//! produce the same windows, which makes re-ingestion idempotent and easy
//! to test.
//!
//! ```
//! use grimoire_context::{ChunkConfig, chunk_text};
//!
//! let config = ChunkConfig::new(10, 3);
//! let chunks = chunk_text("abcdefghijklmnopqrst", &config);
//!
//! assert_eq!(chunks[0], "abcdefghij");
//! // The next window starts 10 - 3 = 7 characters in.
//! assert!(chunks[1].starts_with("hij"));
//!
//! // Empty input is not an error, just an empty sequence.
//! assert!(chunk_text("", &config).is_empty());
//! ```

use serde::{Deserialize, Serialize};

/// Default window width in characters.
pub const DEFAULT_MAX_CHARS: usize = 1200;

/// Default overlap between consecutive windows in characters.
pub const DEFAULT_OVERLAP: usize = 150;

/// Window configuration for [`chunk_text`].
///
/// `overlap` must be strictly smaller than `max_chars`: each window
/// advances `max_chars - overlap` characters past the previous one, so an
/// overlap as large as the window would make no forward progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkConfig {
    /// Maximum window width in characters.
    pub max_chars: usize,
    /// Number of characters shared between consecutive windows.
    pub overlap: usize,
}

impl ChunkConfig {
    /// Create a window configuration.
    ///
    /// # Panics
    ///
    /// Panics if `max_chars` is zero or `overlap >= max_chars`. These are
    /// programmer errors, not runtime conditions.
    pub fn new(max_chars: usize, overlap: usize) -> Self {
        assert!(max_chars > 0, "max_chars must be positive");
        assert!(
            overlap < max_chars,
            "overlap ({overlap}) must be smaller than max_chars ({max_chars})"
        );
        Self { max_chars, overlap }
    }
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CHARS, DEFAULT_OVERLAP)
    }
}

/// Split `text` into overlapping character windows.
///
/// Produces consecutive windows of up to `config.max_chars` characters;
/// the final window ends exactly at end-of-text regardless of size. Each
/// window is trimmed of leading/trailing whitespace and windows that trim
/// to nothing are dropped. Empty input yields an empty vector.
pub fn chunk_text(text: &str, config: &ChunkConfig) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }

    let chars: Vec<char> = text.chars().collect();
    let total = chars.len();
    let mut chunks = Vec::new();
    let mut start = 0;

    while start < total {
        let end = (start + config.max_chars).min(total);
        let window: String = chars[start..end].iter().collect();
        let trimmed = window.trim();
        if !trimmed.is_empty() {
            chunks.push(trimmed.to_string());
        }
        if end == total {
            break;
        }
        start = end - config.overlap;
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_a_single_chunk() {
        let config = ChunkConfig::default();
        let chunks = chunk_text("a short note", &config);
        assert_eq!(chunks, vec!["a short note".to_string()]);
    }

    #[test]
    fn empty_input_yields_no_chunks() {
        let config = ChunkConfig::default();
        assert!(chunk_text("", &config).is_empty());
        // Whitespace-only windows are dropped too.
        assert!(chunk_text("   \n\t  ", &config).is_empty());
    }

    #[test]
    fn default_config_splits_2500_chars_into_three_windows() {
        let config = ChunkConfig::default();
        let text: String = std::iter::repeat('x').take(2500).collect();
        let chunks = chunk_text(&text, &config);

        // Windows start at 0, 1050, 2100: three of them.
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].chars().count(), 1200);
        assert_eq!(chunks[1].chars().count(), 1200);
        assert_eq!(chunks[2].chars().count(), 400);
    }

    #[test]
    fn overlap_removed_concatenation_reconstructs_input() {
        // Use text with no whitespace at window boundaries so trimming is
        // a no-op and reconstruction is exact.
        let text: String = (0..260).map(|i| (b'a' + (i % 26) as u8) as char).collect();
        let config = ChunkConfig::new(100, 20);
        let chunks = chunk_text(&text, &config);

        let mut rebuilt = String::new();
        for (i, chunk) in chunks.iter().enumerate() {
            if i == 0 {
                rebuilt.push_str(chunk);
            } else {
                rebuilt.extend(chunk.chars().skip(config.overlap));
            }
        }
        assert_eq!(rebuilt, text);
    }

    #[test]
    fn chunking_is_deterministic() {
        let text = "Lorem ipsum dolor sit amet, consectetur adipiscing elit. "
            .repeat(40);
        let config = ChunkConfig::new(300, 50);
        assert_eq!(chunk_text(&text, &config), chunk_text(&text, &config));
    }

    #[test]
    fn windows_never_split_multibyte_characters() {
        // 200 three-byte characters; byte-based slicing would panic.
        let text: String = std::iter::repeat('日').take(200).collect();
        let config = ChunkConfig::new(60, 10);
        let chunks = chunk_text(&text, &config);

        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.chars().all(|c| c == '日'));
            assert!(chunk.chars().count() <= 60);
        }
    }

    #[test]
    fn final_window_ends_at_end_of_text() {
        let text: String = std::iter::repeat('z').take(1250).collect();
        let config = ChunkConfig::default();
        let chunks = chunk_text(&text, &config);

        assert_eq!(chunks.len(), 2);
        // Second window covers 1050..1250.
        assert_eq!(chunks[1].chars().count(), 200);
    }

    #[test]
    #[should_panic(expected = "overlap")]
    fn overlap_must_be_smaller_than_window() {
        ChunkConfig::new(100, 100);
    }
}
