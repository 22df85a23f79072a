use crate::types::ContentKind;
use once_cell::sync::Lazy;
use regex::Regex;

/// Markdown header: `# Title` through `###### Title`.
static MD_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^#{1,6}\s+(.+)$").expect("valid regex"));

/// ALL CAPS header line, 3-51 chars.
static CAPS_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^([A-Z][A-Z\s]{2,50})$").expect("valid regex"));

/// Numbered section header: `1. Introduction`.
static NUM_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\d+\.\s+([A-Z].+)$").expect("valid regex"));

/// Bullet list item opener.
static BULLET_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[-*•]\s+").expect("valid regex"));

/// Numbered list item opener.
static NUMBERED_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\d+\.\s+").expect("valid regex"));

/// Pipe table row.
static TABLE_ROW: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\|.+\|$").expect("valid regex"));

/// Blank-line boundary between structural blocks.
static BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{2,}").expect("valid regex"));

/// A structural block produced by the first segmentation phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Block {
    pub text: String,
    /// Heading governing this block, threaded from preceding header blocks
    pub heading: Option<String>,
    pub kind: ContentKind,
    /// Character offset of the block in the source text
    pub position: usize,
}

/// Classify the structural type of a block.
#[must_use]
pub fn detect_content_kind(text: &str) -> ContentKind {
    let trimmed = text.trim();
    if trimmed.starts_with("```") && trimmed.ends_with("```") && trimmed.len() > 3 {
        return ContentKind::CodeBlock;
    }
    if TABLE_ROW.is_match(text) {
        return ContentKind::Table;
    }
    if BULLET_ITEM.is_match(text) {
        return ContentKind::List;
    }
    if NUMBERED_ITEM.is_match(text) {
        return ContentKind::NumberedList;
    }
    if MD_HEADER.is_match(text) {
        return ContentKind::Section;
    }
    ContentKind::Prose
}

/// Extract a heading from a block of text, trying markdown headers, ALL
/// CAPS headers, numbered sections, then a short first line.
#[must_use]
pub fn extract_heading(text: &str) -> Option<String> {
    if let Some(caps) = MD_HEADER.captures(text) {
        return Some(caps[1].trim().to_string());
    }
    if let Some(caps) = CAPS_HEADER.captures(text) {
        return Some(caps[1].trim().to_string());
    }
    if let Some(caps) = NUM_HEADER.captures(text) {
        return Some(caps[1].trim().to_string());
    }

    let first_line = text.lines().next()?.trim();
    if !first_line.is_empty() && first_line.len() < 80 && !first_line.contains('.') {
        return Some(first_line.to_string());
    }
    None
}

/// Heading declared by a block, if the block itself is a header.
fn header_of(text: &str) -> Option<String> {
    MD_HEADER
        .captures(text)
        .or_else(|| CAPS_HEADER.captures(text))
        .or_else(|| NUM_HEADER.captures(text))
        .map(|caps| caps[1].trim().to_string())
}

/// Split text into structural blocks on blank-line boundaries.
///
/// The "current heading" is threaded through the fold as an explicit
/// accumulator: a header block becomes the heading for itself and every
/// following block until the next header.
pub(crate) fn split_into_blocks(text: &str) -> Vec<Block> {
    let (blocks, _) = BLANK_LINES.split(text).fold(
        (Vec::new(), (None::<String>, 0usize)),
        |(mut blocks, (current_heading, position)), raw| {
            let next_position = position + raw.len() + 2;
            if raw.trim().is_empty() {
                return (blocks, (current_heading, next_position));
            }

            let heading = header_of(raw).or(current_heading);
            blocks.push(Block {
                text: raw.trim().to_string(),
                heading: heading.clone(),
                kind: detect_content_kind(raw),
                position,
            });
            (blocks, (heading, next_position))
        },
    );
    blocks
}
