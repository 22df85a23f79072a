use kb_segmenter::estimate_tokens;

/// Score editorial quality of a document's text in `[0, 1]`.
///
/// A neutral 0.5 baseline, boosted for substantial length, visible
/// structure (headings), and list formatting. The score is stored on the
/// parent document and later used as a rerank boost, so it only needs to
/// order documents sensibly, not be calibrated.
#[must_use]
pub fn compute_quality_score(text: &str) -> f32 {
    let mut score = 0.5_f32;

    let tokens = estimate_tokens(text);
    if tokens >= 200 {
        score += 0.2;
    } else if tokens >= 50 {
        score += 0.1;
    }

    let has_headings = text
        .lines()
        .any(|line| line.trim_start().starts_with('#') || is_caps_heading(line));
    if has_headings {
        score += 0.15;
    }

    let has_lists = text.lines().any(|line| {
        let t = line.trim_start();
        t.starts_with("- ") || t.starts_with("* ") || starts_numbered(t)
    });
    if has_lists {
        score += 0.15;
    }

    score.clamp(0.0, 1.0)
}

fn is_caps_heading(line: &str) -> bool {
    let t = line.trim();
    t.len() >= 3
        && t.len() <= 50
        && t.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_whitespace())
        && t.chars().any(|c| c.is_ascii_uppercase())
}

fn starts_numbered(t: &str) -> bool {
    let mut chars = t.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_digit()) && t.contains(". ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_plain_text_scores_neutral() {
        assert!((compute_quality_score("just a note") - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn structured_long_text_scores_higher() {
        let doc = format!(
            "# Overview\n\n{}\n\n- point one\n- point two",
            "body text ".repeat(100)
        );
        let score = compute_quality_score(&doc);
        assert!(score > 0.9);
        assert!(score <= 1.0);
    }

    #[test]
    fn caps_headings_count_as_structure() {
        let score = compute_quality_score("EXECUTIVE SUMMARY\nshort body");
        assert!(score > 0.5);
    }
}
