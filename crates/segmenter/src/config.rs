use serde::{Deserialize, Serialize};

/// Configuration for document segmentation.
///
/// All sizes are in estimated tokens (see
/// [`estimate_tokens`](crate::estimate_tokens)). Defaults follow common
/// retrieval practice: ~800-token chunks with a 100-token overlap window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmenterConfig {
    /// Target chunk size (soft limit used when packing sentences)
    pub target_chunk_tokens: usize,

    /// Overlap carried between adjacent chunks of a split segment
    pub overlap_tokens: usize,

    /// Minimum chunk size; smaller consecutive blocks are merged
    pub min_chunk_tokens: usize,

    /// Maximum chunk size; larger segments are split at sentence boundaries
    pub max_chunk_tokens: usize,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            target_chunk_tokens: 800,
            overlap_tokens: 100,
            min_chunk_tokens: 100,
            max_chunk_tokens: 1500,
        }
    }
}

impl SegmenterConfig {
    /// Validate invariants between the size thresholds.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_chunk_tokens == 0 {
            return Err("max_chunk_tokens must be > 0".to_string());
        }
        if self.min_chunk_tokens > self.target_chunk_tokens {
            return Err(format!(
                "min_chunk_tokens ({}) cannot exceed target_chunk_tokens ({})",
                self.min_chunk_tokens, self.target_chunk_tokens
            ));
        }
        if self.target_chunk_tokens > self.max_chunk_tokens {
            return Err(format!(
                "target_chunk_tokens ({}) cannot exceed max_chunk_tokens ({})",
                self.target_chunk_tokens, self.max_chunk_tokens
            ));
        }
        if self.overlap_tokens >= self.target_chunk_tokens {
            return Err(format!(
                "overlap_tokens ({}) must be smaller than target_chunk_tokens ({})",
                self.overlap_tokens, self.target_chunk_tokens
            ));
        }
        Ok(())
    }
}

/// Source metadata stamped onto every chunk of one document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// Parent document id; `"doc"` is used when absent
    pub parent_id: Option<String>,
    /// Source identifier (filename, URL, collection name)
    pub source_label: String,
    /// Source URL if available
    pub source_url: String,
    /// Content category
    pub category: String,
    /// Page number for paged sources
    pub page_number: Option<u32>,
}

impl SourceMetadata {
    pub(crate) fn parent_id_or_default(&self) -> &str {
        self.parent_id.as_deref().unwrap_or("doc")
    }
}
