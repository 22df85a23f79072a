//! # KB Segmenter
//!
//! Structure-aware document segmentation for retrieval pipelines.
//!
//! ## Philosophy
//!
//! The segmenter turns extracted text into bounded, overlapping chunks
//! that:
//! - Respect structural boundaries (headings, lists, tables, code blocks)
//! - Carry the governing heading and source metadata on every chunk
//! - Never exceed the configured size except for unsplittable sentences
//! - Share a sentence-level overlap window between adjacent chunks
//!
//! ## Architecture
//!
//! ```text
//! Extracted Text
//!     │
//!     ├──> Structural Split (blank-line boundaries)
//!     │    ├─> Classify block kind (prose/list/table/code/section)
//!     │    └─> Thread current heading through the blocks
//!     │
//!     ├──> Merge Small (consecutive blocks below min size)
//!     │
//!     └──> Split Large (sentence boundaries, overlap seeding)
//!          └─> Emit Chunk[] with ids, indices, token estimates
//! ```
//!
//! Image analyses are folded in separately via [`build_image_chunk`] and
//! [`merge_text_and_image_chunks`], which re-index the combined set.
//!
//! ## Example
//!
//! ```rust
//! use kb_segmenter::{Segmenter, SegmenterConfig, SourceMetadata};
//!
//! let segmenter = Segmenter::new(SegmenterConfig::default()).unwrap();
//! let meta = SourceMetadata {
//!     parent_id: Some("handbook".to_string()),
//!     source_label: "handbook.md".to_string(),
//!     category: "general".to_string(),
//!     ..SourceMetadata::default()
//! };
//!
//! let chunks = segmenter.chunk_document("# Welcome\n\nFirst section body.", &meta);
//! for chunk in &chunks {
//!     println!("{}: ~{} tokens", chunk.chunk_id, chunk.estimated_tokens);
//! }
//! ```

mod config;
mod error;
mod image;
mod segmenter;
mod structure;
mod types;

pub use config::{SegmenterConfig, SourceMetadata};
pub use error::{Result, SegmenterError};
pub use image::{build_image_chunk, merge_text_and_image_chunks, ImageAnalysis};
pub use segmenter::{split_sentences, Segmenter};
pub use structure::{detect_content_kind, extract_heading};
pub use types::{estimate_tokens, Chunk, ContentKind, ImageInfo, Page, CHARS_PER_TOKEN};
