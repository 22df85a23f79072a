use serde::{Deserialize, Serialize};

/// Behavior when the query embedding cannot be produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegradeMode {
    /// Continue with keyword scores only
    #[default]
    KeywordOnly,
    /// Return no results
    Empty,
}

/// Options for one retrieval call. Every recognized knob is an explicit
/// field with a documented default; there is no catch-all options bag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalOptions {
    /// Maximum results returned (default 5)
    pub top_k: usize,
    /// Explicit similarity floor; clamped to [0, 1]. `None` uses the
    /// adaptive threshold derived from the category and query length.
    pub min_similarity: Option<f32>,
    /// Restrict candidates to one document category
    pub category: Option<String>,
    /// Explicit category hint for reranking; when `None` the hint is
    /// derived from the query via the keyword rule table
    pub category_hint: Option<String>,
    /// What to do when the query embedding fails
    pub degrade_mode: DegradeMode,
}

impl Default for RetrievalOptions {
    fn default() -> Self {
        Self {
            top_k: 5,
            min_similarity: None,
            category: None,
            category_hint: None,
            degrade_mode: DegradeMode::KeywordOnly,
        }
    }
}

impl RetrievalOptions {
    /// Effective similarity floor for a query.
    #[must_use]
    pub fn similarity_floor(&self, query: &str) -> f32 {
        match self.min_similarity {
            Some(explicit) => explicit.clamp(0.0, 1.0),
            None => adaptive_similarity_threshold(self.category.as_deref(), query),
        }
    }
}

/// Similarity floor tuned by content category and query length.
///
/// Short queries carry little signal, so the floor rises to keep noise
/// out; long queries spread their signal across many terms, so it drops.
#[must_use]
pub fn adaptive_similarity_threshold(category: Option<&str>, query: &str) -> f32 {
    let base = match category {
        Some("chat") => 0.28,
        Some("podcast") => 0.27,
        Some("meeting") => 0.32,
        Some("visual") => 0.30,
        _ => 0.30,
    };

    let len = query.trim().len();
    if len < 80 {
        (base + 0.07_f32).min(0.5)
    } else if len > 300 {
        (base - 0.07_f32).max(0.2)
    } else {
        base
    }
}

/// Options for context string assembly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextOptions {
    /// Token budget for the assembled block (default 750, floor 200)
    pub max_tokens: usize,
}

impl Default for ContextOptions {
    fn default() -> Self {
        Self { max_tokens: 750 }
    }
}

impl ContextOptions {
    /// Budget with the 200-token floor applied.
    #[must_use]
    pub fn effective_budget(&self) -> usize {
        self.max_tokens.max(200)
    }
}
