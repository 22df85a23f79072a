use chrono::{DateTime, Utc};
use kb_segmenter::Chunk;
use serde::{Deserialize, Serialize};

/// Embedding lifecycle state of a stored document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbeddingStatus {
    /// Stored, embedding not yet attempted
    Pending,
    /// Embedding computed and attached
    Ready,
    /// Embedding failed; document remains keyword-searchable
    Error,
    /// Embedding intentionally skipped (e.g. empty text)
    Skipped,
}

impl EmbeddingStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Ready => "ready",
            Self::Error => "error",
            Self::Skipped => "skipped",
        }
    }
}

/// A dense vector together with its provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Embedding {
    pub vector: Vec<f32>,
    /// Identifier of the model that produced the vector
    pub model_id: String,
    /// Vector dimensionality, kept explicit for mismatch checks
    pub dimensions: usize,
}

impl Embedding {
    #[must_use]
    pub fn new(vector: Vec<f32>, model_id: impl Into<String>) -> Self {
        Self {
            dimensions: vector.len(),
            vector,
            model_id: model_id.into(),
        }
    }
}

/// A source document as stored, with its chunk roster and embedding state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParentDocument {
    pub document_id: String,
    pub title: String,
    /// Full extracted text, kept for re-segmentation and previews
    pub full_text: String,
    pub category: String,
    pub tags: Vec<String>,
    /// Source identifier (filename, URL, collection name)
    pub source: String,
    pub source_url: String,
    pub embedding_status: EmbeddingStatus,
    /// Ids of the chunks produced from this document, in order
    pub chunk_ids: Vec<String>,
    /// Document-level embedding, if one was computed
    pub embedding: Option<Embedding>,
    /// Editorial quality in `[0, 1]`, used as a rerank boost
    pub quality_score: f32,
    pub created_at: DateTime<Utc>,
}

impl ParentDocument {
    /// Create a pending document with a neutral quality score.
    #[must_use]
    pub fn new(document_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            document_id: document_id.into(),
            title: title.into(),
            full_text: String::new(),
            category: String::new(),
            tags: Vec::new(),
            source: String::new(),
            source_url: String::new(),
            embedding_status: EmbeddingStatus::Pending,
            chunk_ids: Vec::new(),
            embedding: None,
            quality_score: 0.5,
            created_at: Utc::now(),
        }
    }
}

/// One chunk as surfaced to the retrieval layer: the chunk itself, its
/// embedding (if any), and document-level fields the reranker needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub chunk: Chunk,
    pub embedding: Option<Embedding>,
    /// Title of the parent document
    pub title: String,
    /// Quality score inherited from the parent document
    pub quality_score: f32,
}

impl CandidateRecord {
    #[must_use]
    pub fn id(&self) -> &str {
        &self.chunk.chunk_id
    }
}
