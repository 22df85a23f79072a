use crate::result::RetrievalResult;
use std::cmp::Ordering;

/// Boost applied when a hit's category matches the query's hinted category.
const CATEGORY_BOOST: f32 = 0.05;
/// Weight of the quality adjustment; neutral quality (0.5) adds nothing.
const QUALITY_WEIGHT: f32 = 0.1;

struct CategoryRule {
    category: &'static str,
    keywords: &'static [&'static str],
}

/// Ordered rule table mapping query keywords to a content category.
/// Evaluated once per query, first match wins.
const CATEGORY_RULES: &[CategoryRule] = &[
    CategoryRule {
        category: "podcast",
        keywords: &["podcast", "episode", "interview"],
    },
    CategoryRule {
        category: "meeting",
        keywords: &["meeting", "standup", "transcript", "minutes"],
    },
    CategoryRule {
        category: "visual",
        keywords: &["image", "photo", "diagram", "chart", "screenshot", "picture"],
    },
    CategoryRule {
        category: "chat",
        keywords: &["chat", "conversation", "thread", "message"],
    },
];

/// Category hinted by the query text, if any rule matches.
#[must_use]
pub fn hinted_category(query: &str) -> Option<&'static str> {
    let lowered = query.to_lowercase();
    let words: Vec<&str> = lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    CATEGORY_RULES
        .iter()
        .find(|rule| rule.keywords.iter().any(|kw| words.contains(kw)))
        .map(|rule| rule.category)
}

/// Adjust blended scores with category alignment and document quality,
/// then sort. Ties break deterministically: blended score first, chunk id
/// second. An explicit caller hint overrides the rule table.
pub(crate) fn rerank_results(
    results: &mut [RetrievalResult],
    query: &str,
    explicit_hint: Option<&str>,
) {
    let hint = explicit_hint.or_else(|| hinted_category(query));
    if let Some(category) = hint {
        log::debug!("query hints category '{category}'");
    }

    for result in results.iter_mut() {
        let mut score = result.blended_score;
        if hint.is_some_and(|category| result.category == category) {
            score += CATEGORY_BOOST;
        }
        score += (result.quality_score - 0.5) * QUALITY_WEIGHT;
        result.final_score = score;
    }

    results.sort_by(|a, b| {
        b.final_score
            .partial_cmp(&a.final_score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| {
                b.blended_score
                    .partial_cmp(&a.blended_score)
                    .unwrap_or(Ordering::Equal)
            })
            .then_with(|| a.chunk_id.cmp(&b.chunk_id))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn result(id: &str, category: &str, blended: f32, quality: f32) -> RetrievalResult {
        RetrievalResult {
            chunk_id: id.to_string(),
            parent_id: "p".to_string(),
            chunk_index: 0,
            title: "T".to_string(),
            text: String::new(),
            heading: None,
            category: category.to_string(),
            collection: "kb".to_string(),
            source_label: String::new(),
            source_url: String::new(),
            semantic_score: None,
            keyword_score: 0.0,
            blended_score: blended,
            final_score: blended,
            quality_score: quality,
        }
    }

    #[test]
    fn rule_table_is_first_match_wins() {
        assert_eq!(hinted_category("that podcast episode"), Some("podcast"));
        // "episode" (podcast) appears later in the text than "meeting",
        // but the podcast rule is ordered first.
        assert_eq!(
            hinted_category("meeting about the podcast"),
            Some("podcast")
        );
        assert_eq!(hinted_category("show me the diagram"), Some("visual"));
        assert_eq!(hinted_category("general question"), None);
    }

    #[test]
    fn keywords_match_whole_words_only() {
        assert_eq!(hinted_category("the chattering crowd"), None);
        assert_eq!(hinted_category("open the chat log"), Some("chat"));
    }

    #[test]
    fn category_alignment_boosts_matching_results() {
        let mut results = vec![
            result("a", "general", 0.50, 0.5),
            result("b", "podcast", 0.48, 0.5),
        ];
        rerank_results(&mut results, "what did the podcast cover?", None);
        assert_eq!(results[0].chunk_id, "b");
        assert!(results[0].final_score > results[0].blended_score);
    }

    #[test]
    fn quality_adjusts_around_the_neutral_point() {
        let mut results = vec![
            result("low", "general", 0.50, 0.2),
            result("high", "general", 0.50, 0.9),
        ];
        rerank_results(&mut results, "plain query", None);
        assert_eq!(results[0].chunk_id, "high");
        assert!(results[1].final_score < results[1].blended_score);
    }

    #[test]
    fn explicit_hint_overrides_the_rule_table() {
        let mut results = vec![
            result("a", "podcast", 0.50, 0.5),
            result("b", "meeting", 0.48, 0.5),
        ];
        rerank_results(&mut results, "what did the podcast cover?", Some("meeting"));
        assert_eq!(results[0].chunk_id, "b");
    }

    #[test]
    fn ties_break_by_id() {
        let mut results = vec![
            result("z", "general", 0.5, 0.5),
            result("a", "general", 0.5, 0.5),
        ];
        rerank_results(&mut results, "plain query", None);
        assert_eq!(results[0].chunk_id, "a");
        assert_eq!(results[1].chunk_id, "z");
    }
}
