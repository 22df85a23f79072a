use crate::result::RetrievalResult;
use crate::scoring::tokenize;
use std::collections::HashSet;

/// Token-overlap ratio above which two texts count as duplicates.
const JACCARD_THRESHOLD: f32 = 0.9;

/// Drop near-duplicates from a ranked list, keeping the highest-ranked
/// instance of each.
///
/// Two results are duplicates when they come from the same parent with
/// adjacent chunk indices (overlap windows make those nearly identical),
/// or when their normalized texts match exactly or overlap at token
/// Jaccard ≥ 0.9.
pub(crate) fn dedup_results(results: Vec<RetrievalResult>) -> Vec<RetrievalResult> {
    let mut kept: Vec<RetrievalResult> = Vec::with_capacity(results.len());

    for candidate in results {
        let duplicate = kept.iter().any(|existing| is_duplicate(existing, &candidate));
        if duplicate {
            log::debug!("dropping near-duplicate '{}'", candidate.chunk_id);
        } else {
            kept.push(candidate);
        }
    }
    kept
}

fn is_duplicate(a: &RetrievalResult, b: &RetrievalResult) -> bool {
    if a.parent_id == b.parent_id && a.chunk_index.abs_diff(b.chunk_index) == 1 {
        return true;
    }

    let norm_a = normalize(&a.text);
    let norm_b = normalize(&b.text);
    if !norm_a.is_empty() && norm_a == norm_b {
        return true;
    }

    token_jaccard(&a.text, &b.text) >= JACCARD_THRESHOLD
}

fn normalize(text: &str) -> String {
    tokenize(text).join(" ")
}

fn token_jaccard(a: &str, b: &str) -> f32 {
    let set_a: HashSet<String> = tokenize(a).into_iter().collect();
    let set_b: HashSet<String> = tokenize(b).into_iter().collect();
    if set_a.is_empty() || set_b.is_empty() {
        return 0.0;
    }
    let intersection = set_a.intersection(&set_b).count() as f32;
    let union = set_a.union(&set_b).count() as f32;
    intersection / union
}
