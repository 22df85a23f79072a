use crate::config::SourceMetadata;
use crate::types::{estimate_tokens, Chunk, ContentKind, ImageInfo};
use chrono::Utc;

/// Vision analysis output for one image, ready to be folded into a
/// document's chunk set.
#[derive(Debug, Clone, Default)]
pub struct ImageAnalysis {
    /// URL of the source image
    pub image_url: String,
    /// AI-generated caption
    pub caption: String,
    /// Text extracted by OCR
    pub ocr_text: String,
    /// Image tags
    pub tags: Vec<String>,
    /// Longer visual description, if the vision model produced one
    pub description: String,
    /// Vision embedding, if one was computed
    pub vision_embedding: Option<Vec<f32>>,
    /// Page the image appeared on, for paged sources
    pub page_number: Option<u32>,
}

/// Build a searchable text chunk from an image analysis.
///
/// The chunk text is the caption, OCR text, comma-joined tags, and visual
/// description, separated by blank lines, with empty parts omitted. An
/// analysis with no text at all still yields a chunk carrying the image
/// metadata, so the image stays addressable by id.
#[must_use]
pub fn build_image_chunk(analysis: &ImageAnalysis, index: usize, meta: &SourceMetadata) -> Chunk {
    let tag_line = analysis.tags.join(", ");
    let text = [
        analysis.caption.as_str(),
        analysis.ocr_text.as_str(),
        tag_line.as_str(),
        analysis.description.as_str(),
    ]
    .iter()
    .map(|part| part.trim())
    .filter(|part| !part.is_empty())
    .collect::<Vec<_>>()
    .join("\n\n");

    let parent_id = meta.parent_id_or_default();
    Chunk {
        chunk_id: format!("{parent_id}_chunk_{index}"),
        parent_id: parent_id.to_string(),
        chunk_index: index,
        total_chunks: index + 1,
        estimated_tokens: estimate_tokens(&text),
        text,
        heading: None,
        content_kind: ContentKind::Image,
        source_label: meta.source_label.clone(),
        source_url: meta.source_url.clone(),
        category: meta.category.clone(),
        has_overlap: false,
        overlap_tokens: 0,
        position: 0,
        page_number: analysis.page_number.or(meta.page_number),
        chunked_at: Utc::now(),
        image: Some(ImageInfo {
            image_url: analysis.image_url.clone(),
            caption: analysis.caption.clone(),
            ocr_text: analysis.ocr_text.clone(),
            tags: analysis.tags.clone(),
            vision_embedding: analysis.vision_embedding.clone(),
        }),
    }
}

/// Merge text and image chunks of one document into a single ordered set.
///
/// Chunks are ordered by page then by source position (stable, so chunks
/// on the same page keep their relative order), then re-indexed and
/// re-identified across the merged set.
#[must_use]
pub fn merge_text_and_image_chunks(text_chunks: Vec<Chunk>, image_chunks: Vec<Chunk>) -> Vec<Chunk> {
    let mut all = text_chunks;
    all.extend(image_chunks);
    all.sort_by_key(|chunk| (chunk.page_number.unwrap_or(0), chunk.position));

    let total = all.len();
    for (index, chunk) in all.iter_mut().enumerate() {
        chunk.restamp(index, total);
    }
    all
}
