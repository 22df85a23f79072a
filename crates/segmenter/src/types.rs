use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Estimated tokens per character ratio. Deliberately approximate — this is
/// not a tokenizer, it is a budget heuristic (~4 chars per token).
pub const CHARS_PER_TOKEN: usize = 4;

/// Estimate the token count of a text: `ceil(chars / 4)`.
#[must_use]
pub fn estimate_tokens(text: &str) -> usize {
    text.len().div_ceil(CHARS_PER_TOKEN)
}

/// Structural type of a chunk's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    /// Plain prose paragraph
    Prose,
    /// Bullet list
    List,
    /// Numbered list
    NumberedList,
    /// Pipe table
    Table,
    /// Fenced code block
    CodeBlock,
    /// Markdown heading / section opener
    Section,
    /// Synthesized image chunk (caption + OCR + tags)
    Image,
}

impl ContentKind {
    /// Human-readable name matching the serialized form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Prose => "prose",
            Self::List => "list",
            Self::NumberedList => "numbered_list",
            Self::Table => "table",
            Self::CodeBlock => "code_block",
            Self::Section => "section",
            Self::Image => "image",
        }
    }
}

/// Vision metadata carried by image chunks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageInfo {
    /// URL of the source image
    pub image_url: String,
    /// AI-generated caption
    pub caption: String,
    /// Text extracted by OCR
    pub ocr_text: String,
    /// Image tags
    pub tags: Vec<String>,
    /// Vision embedding, if one was computed
    pub vision_embedding: Option<Vec<f32>>,
}

impl ImageInfo {
    /// Whether a vision embedding is attached.
    #[must_use]
    pub fn has_vision_embedding(&self) -> bool {
        self.vision_embedding.is_some()
    }
}

/// A bounded, metadata-tagged slice of a source document — the atomic
/// retrieval unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Stable id: `{parent_id}_chunk_{index}`
    pub chunk_id: String,
    /// Parent document id
    pub parent_id: String,
    /// Position within the re-indexed chunk set (0-based, contiguous)
    pub chunk_index: usize,
    /// Size of the chunk set this chunk belongs to
    pub total_chunks: usize,
    /// The chunk text
    pub text: String,
    /// Heading governing this chunk, inherited from the nearest preceding
    /// header block or extracted from the chunk's own first line
    pub heading: Option<String>,
    /// Structural content type
    pub content_kind: ContentKind,
    /// Source identifier (filename, URL, collection name)
    pub source_label: String,
    /// Source URL if available
    pub source_url: String,
    /// Content category
    pub category: String,
    /// Approximate token count of `text`
    pub estimated_tokens: usize,
    /// True for every chunk but the first of a document
    pub has_overlap: bool,
    /// Overlap budget shared with the preceding chunk (0 for the first)
    pub overlap_tokens: usize,
    /// Character offset of the originating block in the source text
    pub position: usize,
    /// Page number for paged sources
    pub page_number: Option<u32>,
    /// When the chunk was produced
    pub chunked_at: DateTime<Utc>,
    /// Vision metadata for image chunks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageInfo>,
}

impl Chunk {
    /// Re-stamp identity fields after a re-index pass.
    pub(crate) fn restamp(&mut self, index: usize, total: usize) {
        self.chunk_index = index;
        self.total_chunks = total;
        self.chunk_id = format!("{}_chunk_{}", self.parent_id, index);
    }
}

/// A page of extracted text, for paged sources like PDFs.
#[derive(Debug, Clone)]
pub struct Page {
    /// 1-based page number
    pub page_number: u32,
    /// Plain text extracted from the page
    pub text: String,
}
