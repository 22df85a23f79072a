use crate::config::{SegmenterConfig, SourceMetadata};
use crate::error::{Result, SegmenterError};
use crate::structure::{extract_heading, split_into_blocks, Block};
use crate::types::{estimate_tokens, Chunk, ContentKind, Page};
use chrono::Utc;

/// Converts raw extracted text into bounded, overlapping, metadata-tagged
/// chunks.
///
/// Segmentation is a pure, single-pass transform over one document's text:
/// no I/O, no shared state, safe to run on many documents in parallel.
///
/// Three phases:
///
/// 1. Structural split on blank-line boundaries, classifying each block
///    and threading the current heading through the fold
/// 2. Merge of consecutive small blocks up to the minimum chunk size
/// 3. Split of oversized segments at sentence boundaries, re-including
///    trailing sentences as overlap between adjacent windows
#[derive(Debug, Clone)]
pub struct Segmenter {
    config: SegmenterConfig,
}

impl Segmenter {
    /// Create a segmenter, validating the configuration.
    pub fn new(config: SegmenterConfig) -> Result<Self> {
        config
            .validate()
            .map_err(SegmenterError::InvalidConfig)?;
        Ok(Self { config })
    }

    #[must_use]
    pub fn config(&self) -> &SegmenterConfig {
        &self.config
    }

    /// Chunk one document's text.
    ///
    /// Empty or whitespace-only input yields an empty list, never an error.
    #[must_use]
    pub fn chunk_document(&self, text: &str, meta: &SourceMetadata) -> Vec<Chunk> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let blocks = split_into_blocks(text);
        let merged = self.merge_small_blocks(blocks);
        let pieces = self.split_large_segments(merged);

        let total = pieces.len();
        let parent_id = meta.parent_id_or_default();
        let chunked_at = Utc::now();

        let chunks: Vec<Chunk> = pieces
            .into_iter()
            .enumerate()
            .map(|(index, piece)| {
                let heading = piece
                    .heading
                    .clone()
                    .or_else(|| extract_heading(&piece.text));
                Chunk {
                    chunk_id: format!("{parent_id}_chunk_{index}"),
                    parent_id: parent_id.to_string(),
                    chunk_index: index,
                    total_chunks: total,
                    estimated_tokens: estimate_tokens(&piece.text),
                    text: piece.text,
                    heading,
                    content_kind: piece.kind,
                    source_label: meta.source_label.clone(),
                    source_url: meta.source_url.clone(),
                    category: meta.category.clone(),
                    has_overlap: index > 0,
                    overlap_tokens: if index > 0 { self.config.overlap_tokens } else { 0 },
                    position: piece.position,
                    page_number: meta.page_number,
                    chunked_at,
                    image: None,
                }
            })
            .collect();

        log::debug!(
            "segmented document '{parent_id}' into {} chunks",
            chunks.len()
        );
        chunks
    }

    /// Chunk a paged source (e.g. PDF pages), then re-index the chunk set
    /// across all pages.
    #[must_use]
    pub fn chunk_pages(&self, pages: &[Page], meta: &SourceMetadata) -> Vec<Chunk> {
        let mut all = Vec::new();
        for page in pages {
            let page_meta = SourceMetadata {
                page_number: Some(page.page_number),
                ..meta.clone()
            };
            all.extend(self.chunk_document(&page.text, &page_meta));
        }

        let total = all.len();
        for (index, chunk) in all.iter_mut().enumerate() {
            chunk.restamp(index, total);
        }
        all
    }

    /// Phase 2: accumulate consecutive blocks into a buffer until it
    /// reaches the minimum chunk size, then flush it as one segment. The
    /// most recent heading wins. The trailing buffer flushes regardless of
    /// size — a document's final chunk may be small.
    fn merge_small_blocks(&self, blocks: Vec<Block>) -> Vec<Block> {
        let min = self.config.min_chunk_tokens;
        let mut merged = Vec::new();
        let mut buffer: Option<Block> = None;

        for block in blocks {
            match buffer.as_mut() {
                None => buffer = Some(block),
                Some(current) if estimate_tokens(&current.text) < min => {
                    current.text.push_str("\n\n");
                    current.text.push_str(&block.text);
                    if block.heading.is_some() {
                        current.heading = block.heading;
                    }
                }
                Some(current) => {
                    merged.push(std::mem::replace(current, block));
                }
            }
        }

        if let Some(last) = buffer {
            merged.push(last);
        }
        merged
    }

    /// Phase 3: split any segment above the maximum chunk size at sentence
    /// boundaries, packing sentences greedily toward the target size and
    /// re-including roughly `overlap_tokens` worth of trailing sentences at
    /// the head of each subsequent window.
    fn split_large_segments(&self, segments: Vec<Block>) -> Vec<Block> {
        let mut out = Vec::new();

        for segment in segments {
            if estimate_tokens(&segment.text) <= self.config.max_chunk_tokens {
                out.push(segment);
                continue;
            }

            let sentences = split_sentences(&segment.text);
            let mut window: Vec<&str> = Vec::new();
            let mut window_tokens = 0usize;

            for sentence in sentences {
                let sentence_tokens = estimate_tokens(sentence);

                if window_tokens + sentence_tokens > self.config.target_chunk_tokens
                    && !window.is_empty()
                {
                    out.push(Block {
                        text: window.join(" "),
                        heading: segment.heading.clone(),
                        kind: segment.kind,
                        position: segment.position,
                    });

                    // Seed the next window with trailing sentences worth
                    // about `overlap_tokens`.
                    let mut overlap: Vec<&str> = Vec::new();
                    let mut overlap_tokens = 0usize;
                    for prev in window.iter().rev() {
                        if overlap_tokens >= self.config.overlap_tokens {
                            break;
                        }
                        overlap.push(prev);
                        overlap_tokens += estimate_tokens(prev);
                    }
                    overlap.reverse();
                    window = overlap;
                    window_tokens = overlap_tokens;
                }

                window_tokens += sentence_tokens;
                window.push(sentence);
            }

            if !window.is_empty() {
                out.push(Block {
                    text: window.join(" "),
                    heading: segment.heading.clone(),
                    kind: segment.kind,
                    position: segment.position,
                });
            }
        }

        out
    }
}

impl Default for Segmenter {
    fn default() -> Self {
        Self {
            config: SegmenterConfig::default(),
        }
    }
}

/// Split text at sentence boundaries: punctuation `.` `!` `?` followed by
/// whitespace and a capital letter. A text with no such boundary is one
/// sentence — an unsplittable leaf.
#[must_use]
pub fn split_sentences(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut sentences = Vec::new();
    let mut start = 0usize;
    let mut i = 0usize;

    while i < bytes.len() {
        if matches!(bytes[i], b'.' | b'!' | b'?') {
            let mut j = i + 1;
            while j < bytes.len() && bytes[j].is_ascii_whitespace() {
                j += 1;
            }
            if j > i + 1 && j < bytes.len() && bytes[j].is_ascii_uppercase() {
                sentences.push(&text[start..=i]);
                start = j;
                i = j;
                continue;
            }
        }
        i += 1;
    }

    if start < text.len() {
        sentences.push(&text[start..]);
    }
    sentences
}
