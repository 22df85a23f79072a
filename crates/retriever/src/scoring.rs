use ndarray::ArrayView1;
use std::collections::{HashMap, HashSet};

/// Blend weight for the vector score.
pub const VECTOR_WEIGHT: f32 = 0.65;
/// Blend weight for the keyword score.
pub const KEYWORD_WEIGHT: f32 = 0.35;

const BM25_K1: f32 = 1.2;
const BM25_B: f32 = 0.75;

/// Cosine similarity between two vectors, `None` when dimensions differ
/// or either vector has zero magnitude.
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Option<f32> {
    if a.len() != b.len() || a.is_empty() {
        return None;
    }
    let a = ArrayView1::from(a);
    let b = ArrayView1::from(b);
    let denom = a.dot(&a).sqrt() * b.dot(&b).sqrt();
    if denom == 0.0 {
        return None;
    }
    Some(a.dot(&b) / denom)
}

/// Lowercased alphanumeric terms of a text.
#[must_use]
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// BM25 scorer built over one candidate pool.
///
/// Scores are normalized by the pool maximum into [0, 1], so keyword and
/// vector scores are blendable on the same scale. An empty pool or a query
/// with no matching terms scores everything 0.
pub struct Bm25 {
    doc_terms: Vec<HashMap<String, usize>>,
    doc_lens: Vec<usize>,
    doc_freq: HashMap<String, usize>,
    avg_len: f32,
}

impl Bm25 {
    #[must_use]
    pub fn build(texts: &[&str]) -> Self {
        let mut doc_terms = Vec::with_capacity(texts.len());
        let mut doc_lens = Vec::with_capacity(texts.len());
        let mut doc_freq: HashMap<String, usize> = HashMap::new();

        for text in texts {
            let tokens = tokenize(text);
            doc_lens.push(tokens.len());

            let mut counts: HashMap<String, usize> = HashMap::new();
            for token in tokens {
                *counts.entry(token).or_insert(0) += 1;
            }
            for term in counts.keys() {
                *doc_freq.entry(term.clone()).or_insert(0) += 1;
            }
            doc_terms.push(counts);
        }

        let total: usize = doc_lens.iter().sum();
        let avg_len = if doc_lens.is_empty() {
            0.0
        } else {
            total as f32 / doc_lens.len() as f32
        };

        Self {
            doc_terms,
            doc_lens,
            doc_freq,
            avg_len,
        }
    }

    fn raw_score(&self, idx: usize, query_terms: &HashSet<String>) -> f32 {
        let (Some(counts), Some(&len)) = (self.doc_terms.get(idx), self.doc_lens.get(idx)) else {
            return 0.0;
        };
        if self.avg_len == 0.0 {
            return 0.0;
        }

        let n = self.doc_terms.len() as f32;
        let mut score = 0.0;
        for term in query_terms {
            let Some(&tf) = counts.get(term) else {
                continue;
            };
            let df = self.doc_freq.get(term).copied().unwrap_or(0) as f32;
            let idf = ((n - df + 0.5) / (df + 0.5) + 1.0).ln();
            let tf = tf as f32;
            let norm = tf * (BM25_K1 + 1.0)
                / (tf + BM25_K1 * (1.0 - BM25_B + BM25_B * len as f32 / self.avg_len));
            score += idf * norm;
        }
        score
    }

    /// Normalized scores for the whole pool against one query.
    #[must_use]
    pub fn scores(&self, query: &str) -> Vec<f32> {
        let query_terms: HashSet<String> = tokenize(query).into_iter().collect();
        let raw: Vec<f32> = (0..self.doc_terms.len())
            .map(|idx| self.raw_score(idx, &query_terms))
            .collect();

        let max = raw.iter().fold(0.0_f32, |acc, &s| acc.max(s));
        if max <= 0.0 {
            return vec![0.0; raw.len()];
        }
        raw.into_iter().map(|s| s / max).collect()
    }
}

/// Blend a vector and a keyword score (0.65 / 0.35).
#[must_use]
pub fn blend_scores(vector: f32, keyword: f32) -> f32 {
    VECTOR_WEIGHT * vector + KEYWORD_WEIGHT * keyword
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn cosine_of_identical_vectors_is_one() {
        let v = vec![0.5, -0.2, 0.8];
        let sim = cosine_similarity(&v, &v).unwrap();
        assert!((sim - 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_of_orthogonal_vectors_is_zero() {
        let sim = cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).unwrap();
        assert!(sim.abs() < 1e-6);
    }

    #[test]
    fn cosine_rejects_mismatched_dimensions() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[1.0]), None);
        assert_eq!(cosine_similarity(&[], &[]), None);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), None);
    }

    #[test]
    fn tokenize_splits_and_lowercases() {
        assert_eq!(
            tokenize("Systemic Shift #8, overview!"),
            vec!["systemic", "shift", "8", "overview"]
        );
    }

    #[test]
    fn bm25_prefers_matching_documents() {
        let pool = vec![
            "the pricing page lists every plan",
            "onboarding steps for new hires",
            "pricing tiers and plan comparison for pricing reviews",
        ];
        let bm25 = Bm25::build(&pool);
        let scores = bm25.scores("pricing plan");

        assert_eq!(scores.len(), 3);
        assert!(scores[2] >= scores[0]);
        assert!(scores[0] > scores[1]);
        // Pool-max normalization pins the best score at 1.
        assert!((scores[2] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn bm25_with_no_matches_scores_zero() {
        let bm25 = Bm25::build(&["alpha beta", "gamma delta"]);
        assert_eq!(bm25.scores("unrelated"), vec![0.0, 0.0]);
        assert_eq!(bm25.scores(""), vec![0.0, 0.0]);
    }

    #[test]
    fn empty_pool_is_fine() {
        let bm25 = Bm25::build(&[]);
        assert!(bm25.scores("anything").is_empty());
    }

    #[test]
    fn blend_uses_configured_weights() {
        let blended = blend_scores(1.0, 0.0);
        assert!((blended - VECTOR_WEIGHT).abs() < 1e-6);
        let blended = blend_scores(0.0, 1.0);
        assert!((blended - KEYWORD_WEIGHT).abs() < 1e-6);
    }
}
