use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Intent bucket for an incoming query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryType {
    /// Asks for a specific fact ("what is…", "how many…")
    Factual,
    /// Asks for reasoning or comparison ("why…", "compare…")
    Analytical,
    /// Asks to produce new content ("write…", "draft…")
    Creative,
    /// Everything else
    General,
}

impl QueryType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Factual => "factual",
            Self::Analytical => "analytical",
            Self::Creative => "creative",
            Self::General => "general",
        }
    }
}

static FACTUAL_OPENER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(what|when|where|who|which|how many|how much)\b").expect("valid regex")
});
static FACTUAL_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(define|definition|meaning of)\b").expect("valid regex"));

static ANALYTICAL_OPENER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(why|how|compare|analy[sz]e|explain|evaluate)\b").expect("valid regex")
});
static ANALYTICAL_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(difference|versus|vs\.?|impact|implications?|trade-?offs?)\b")
        .expect("valid regex")
});

static CREATIVE_OPENER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(write|create|generate|compose|draft|imagine|design|brainstorm)\b")
        .expect("valid regex")
});
static CREATIVE_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(story|poem|slogan|tagline)\b").expect("valid regex"));

/// Classify a query's intent. Rules are evaluated in a fixed order
/// (factual, analytical, creative); the first match wins.
///
/// "how" alone is analytical; "how many"/"how much" is factual, which is
/// why the factual rules run first.
#[must_use]
pub fn classify_query(query: &str) -> QueryType {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return QueryType::General;
    }

    if FACTUAL_OPENER.is_match(trimmed) || FACTUAL_MARKER.is_match(trimmed) {
        return QueryType::Factual;
    }
    if ANALYTICAL_OPENER.is_match(trimmed) || ANALYTICAL_MARKER.is_match(trimmed) {
        return QueryType::Analytical;
    }
    if CREATIVE_OPENER.is_match(trimmed) || CREATIVE_MARKER.is_match(trimmed) {
        return QueryType::Creative;
    }
    QueryType::General
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn factual_openers() {
        assert_eq!(classify_query("What is the refund policy?"), QueryType::Factual);
        assert_eq!(classify_query("how many regions do we serve"), QueryType::Factual);
        assert_eq!(classify_query("Give me the definition of churn"), QueryType::Factual);
    }

    #[test]
    fn analytical_openers() {
        assert_eq!(classify_query("Why did revenue drop?"), QueryType::Analytical);
        assert_eq!(classify_query("how does the pipeline work"), QueryType::Analytical);
        assert_eq!(
            classify_query("plan A versus plan B"),
            QueryType::Analytical
        );
    }

    #[test]
    fn creative_openers() {
        assert_eq!(
            classify_query("Write a launch announcement"),
            QueryType::Creative
        );
        assert_eq!(classify_query("draft an outline"), QueryType::Creative);
    }

    #[test]
    fn order_is_factual_first() {
        // "how much" could open an analytical rule, but factual wins.
        assert_eq!(
            classify_query("How much does the plan cost to explain?"),
            QueryType::Factual
        );
    }

    #[test]
    fn fallthrough_is_general() {
        assert_eq!(classify_query("quarterly report"), QueryType::General);
        assert_eq!(classify_query(""), QueryType::General);
        assert_eq!(classify_query("   "), QueryType::General);
    }
}
