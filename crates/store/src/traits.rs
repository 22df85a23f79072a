use crate::error::Result;
use crate::types::{CandidateRecord, Embedding, EmbeddingStatus, ParentDocument};
use async_trait::async_trait;
use kb_segmenter::Chunk;

/// Storage backend for documents and their chunks, keyed by collection.
///
/// Implementations must keep `query_by_collection` ordering stable for a
/// given store state so retrieval results are deterministic.
#[async_trait]
pub trait ChunkStore: Send + Sync {
    /// Insert or replace a parent document record.
    async fn insert_document(&self, collection: &str, document: ParentDocument) -> Result<()>;

    /// Insert the chunks of one document, each with its embedding state.
    async fn insert_chunks(
        &self,
        collection: &str,
        document_id: &str,
        chunks: Vec<(Chunk, Option<Embedding>)>,
    ) -> Result<()>;

    /// Fetch a document by id.
    async fn get_document(&self, collection: &str, document_id: &str) -> Result<ParentDocument>;

    /// All candidate chunks of a collection, optionally filtered by
    /// document category.
    async fn query_by_collection(
        &self,
        collection: &str,
        category_filter: Option<&str>,
    ) -> Result<Vec<CandidateRecord>>;

    /// Remove a document and every chunk derived from it. Removing an
    /// absent document is not an error.
    async fn delete_document_chunks(&self, collection: &str, document_id: &str) -> Result<()>;

    /// Attach a document-level embedding and update the lifecycle status.
    async fn set_document_embedding(
        &self,
        collection: &str,
        document_id: &str,
        embedding: Option<Embedding>,
        status: EmbeddingStatus,
    ) -> Result<()>;
}

/// Produces dense vectors for text.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed one text. Implementations may truncate oversized input.
    async fn generate_embedding(&self, text: &str) -> Result<Vec<f32>>;

    /// Identifier of the underlying model.
    fn model_id(&self) -> &str;

    /// Dimensionality of produced vectors.
    fn dimensions(&self) -> usize;
}
