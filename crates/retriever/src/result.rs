use serde::{Deserialize, Serialize};

/// One ranked retrieval hit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalResult {
    pub chunk_id: String,
    pub parent_id: String,
    pub chunk_index: usize,
    /// Title of the parent document
    pub title: String,
    pub text: String,
    pub heading: Option<String>,
    pub category: String,
    /// Collection the hit came from
    pub collection: String,
    pub source_label: String,
    pub source_url: String,
    /// Cosine similarity; `None` when the hit was scored keyword-only
    pub semantic_score: Option<f32>,
    /// Pool-normalized BM25 score
    pub keyword_score: f32,
    /// Weighted blend of semantic and keyword scores
    pub blended_score: f32,
    /// Blended score after rerank adjustments; ranking key
    pub final_score: f32,
    /// Quality score inherited from the parent document
    pub quality_score: f32,
}

impl RetrievalResult {
    /// Similarity reported to callers (the blended score).
    #[must_use]
    pub fn similarity(&self) -> f32 {
        self.blended_score
    }
}

/// Outcome of one retrieval: ranked results plus an explicit signal when
/// the pipeline ran in a degraded mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Retrieval {
    pub results: Vec<RetrievalResult>,
    /// Reason retrieval was degraded (e.g. embedding failure), if it was
    pub degraded: Option<String>,
}

impl Retrieval {
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.degraded.is_some()
    }
}
