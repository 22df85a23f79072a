use crate::options::ContextOptions;
use crate::result::RetrievalResult;
use kb_segmenter::CHARS_PER_TOKEN;
use serde::{Deserialize, Serialize};

const OPEN_MARKER: &str = "=== RELEVANT KNOWLEDGE BASE CONTEXT ===";
const CLOSE_MARKER: &str = "=== END OF CONTEXT ===";

/// Minimum content characters worth including for one document; below
/// this the entry is dropped and assembly stops.
const MIN_CONTENT_CHARS: usize = 40;

/// Assembled context block and what made it in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextWindow {
    pub context: String,
    pub docs_included: usize,
    pub total_docs: usize,
}

/// Assemble ranked results into a token-budgeted context block.
///
/// Each entry is a `Document N: {title} [Similarity: xx.x%]` header, the
/// chunk text, and a `Source:` footer. Content is truncated with a
/// trailing `...` when the budget would overflow, and assembly stops once
/// the budget is exhausted. Empty input yields an empty string.
#[must_use]
pub fn build_context_string(results: &[RetrievalResult], options: &ContextOptions) -> ContextWindow {
    let total_docs = results.len();
    if results.is_empty() {
        return ContextWindow {
            context: String::new(),
            docs_included: 0,
            total_docs,
        };
    }

    let budget_chars = options.effective_budget() * CHARS_PER_TOKEN;
    let mut remaining = budget_chars.saturating_sub(OPEN_MARKER.len() + CLOSE_MARKER.len() + 2);

    let mut entries: Vec<String> = Vec::new();
    for (i, result) in results.iter().enumerate() {
        let header = format!(
            "Document {}: {} [Similarity: {:.1}%]",
            i + 1,
            result.title,
            result.similarity() * 100.0
        );
        let source = if result.source_url.is_empty() {
            &result.source_label
        } else {
            &result.source_url
        };
        let footer = format!("Source: {source}");

        let framing = header.len() + footer.len() + 4;
        let content_budget = remaining.saturating_sub(framing);
        if content_budget < MIN_CONTENT_CHARS {
            break;
        }

        let content = result.text.trim();
        let content = if content.len() <= content_budget {
            content.to_string()
        } else {
            let mut end = content_budget.saturating_sub(3);
            while end > 0 && !content.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}...", &content[..end])
        };

        let entry = format!("{header}\n{content}\n{footer}");
        remaining = remaining.saturating_sub(entry.len() + 2);
        entries.push(entry);

        if remaining < MIN_CONTENT_CHARS {
            break;
        }
    }

    let docs_included = entries.len();
    if docs_included == 0 {
        return ContextWindow {
            context: String::new(),
            docs_included: 0,
            total_docs,
        };
    }

    let context = format!("{OPEN_MARKER}\n\n{}\n\n{CLOSE_MARKER}", entries.join("\n\n"));
    log::debug!("context includes {docs_included} of {total_docs} documents");
    ContextWindow {
        context,
        docs_included,
        total_docs,
    }
}
