use crate::error::{IngestError, Result};
use crate::quality::compute_quality_score;
use kb_classifier::{detect_file_type_full, ParserKind};
use kb_segmenter::{
    build_image_chunk, merge_text_and_image_chunks, Chunk, ImageAnalysis, Segmenter,
    SegmenterConfig, SourceMetadata,
};
use kb_store::{
    truncate_for_embedding, ChunkStore, Embedding, EmbeddingProvider, EmbeddingStatus,
    ParentDocument,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Ingestion tuning knobs.
#[derive(Debug, Clone)]
pub struct IngestorConfig {
    pub segmenter: SegmenterConfig,
    /// Pause between per-chunk embedding calls, to stay under provider
    /// rate limits. Zero disables throttling.
    pub embed_delay: Duration,
}

impl Default for IngestorConfig {
    fn default() -> Self {
        Self {
            segmenter: SegmenterConfig::default(),
            embed_delay: Duration::from_millis(100),
        }
    }
}

/// Caller-supplied description of the document being ingested.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngestRequest {
    /// Stable id; a fresh UUID is assigned when absent
    pub document_id: Option<String>,
    pub title: String,
    pub category: String,
    pub tags: Vec<String>,
    /// Source identifier (filename, URL, collection name)
    pub source_label: String,
    pub source_url: String,
    /// Overrides the computed quality score when set
    pub quality_score: Option<f32>,
}

/// Outcome of one ingestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestReport {
    pub document_id: String,
    pub chunk_count: usize,
    pub embedded_chunks: usize,
    pub failed_chunks: usize,
    pub embedding_status: EmbeddingStatus,
}

/// Drives the ingest pipeline: classify, segment, embed, store.
///
/// Re-ingesting a document id is delete-and-recreate: existing chunks are
/// removed before the new set is written, so a shrinking document never
/// leaves stale chunks behind.
pub struct Ingestor {
    store: Arc<dyn ChunkStore>,
    embedder: Option<Arc<dyn EmbeddingProvider>>,
    segmenter: Segmenter,
    embed_delay: Duration,
}

impl Ingestor {
    pub fn new(
        store: Arc<dyn ChunkStore>,
        embedder: Option<Arc<dyn EmbeddingProvider>>,
        config: IngestorConfig,
    ) -> Result<Self> {
        Ok(Self {
            store,
            embedder,
            segmenter: Segmenter::new(config.segmenter)?,
            embed_delay: config.embed_delay,
        })
    }

    /// Ingest raw bytes, classifying them first.
    ///
    /// Only plain-text formats are decoded here; container formats (PDF,
    /// Office, images) need an extraction step upstream and are rejected
    /// with [`IngestError::Unsupported`].
    pub async fn ingest_bytes(
        &self,
        collection: &str,
        bytes: &[u8],
        filename: Option<&str>,
        request: IngestRequest,
    ) -> Result<IngestReport> {
        let detected = detect_file_type_full(bytes, filename);
        log::debug!(
            "classified '{}' as {} ({:?}, {:?})",
            filename.unwrap_or("<unnamed>"),
            detected.kind.as_str(),
            detected.detected_by,
            detected.confidence
        );

        match detected.parser {
            Some(ParserKind::Text | ParserKind::Json | ParserKind::Csv) => {
                let text = String::from_utf8_lossy(bytes);
                self.ingest_text(collection, &text, request).await
            }
            _ => Err(IngestError::Unsupported {
                kind: detected.kind.as_str().to_string(),
            }),
        }
    }

    /// Ingest already-extracted text.
    pub async fn ingest_text(
        &self,
        collection: &str,
        text: &str,
        request: IngestRequest,
    ) -> Result<IngestReport> {
        if text.trim().is_empty() {
            return Err(IngestError::EmptyDocument);
        }
        let document_id = request
            .document_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let meta = SourceMetadata {
            parent_id: Some(document_id.clone()),
            source_label: request.source_label.clone(),
            source_url: request.source_url.clone(),
            category: request.category.clone(),
            page_number: None,
        };
        let chunks = self.segmenter.chunk_document(text, &meta);
        self.commit(collection, text, chunks, &document_id, request)
            .await
    }

    /// Ingest extracted text together with vision analyses of the
    /// document's images. Image chunks are folded into the text chunk set
    /// by page and position before storage.
    pub async fn ingest_text_with_images(
        &self,
        collection: &str,
        text: &str,
        images: &[ImageAnalysis],
        request: IngestRequest,
    ) -> Result<IngestReport> {
        if text.trim().is_empty() && images.is_empty() {
            return Err(IngestError::EmptyDocument);
        }
        let document_id = request
            .document_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let meta = SourceMetadata {
            parent_id: Some(document_id.clone()),
            source_label: request.source_label.clone(),
            source_url: request.source_url.clone(),
            category: request.category.clone(),
            page_number: None,
        };
        let text_chunks = self.segmenter.chunk_document(text, &meta);
        let image_chunks = images
            .iter()
            .enumerate()
            .map(|(i, analysis)| build_image_chunk(analysis, i, &meta))
            .collect();
        let merged = merge_text_and_image_chunks(text_chunks, image_chunks);
        self.commit(collection, text, merged, &document_id, request)
            .await
    }

    async fn commit(
        &self,
        collection: &str,
        full_text: &str,
        chunks: Vec<Chunk>,
        document_id: &str,
        request: IngestRequest,
    ) -> Result<IngestReport> {
        // Delete-and-recreate before writing the new chunk set.
        self.store
            .delete_document_chunks(collection, document_id)
            .await?;

        let quality_score = request
            .quality_score
            .unwrap_or_else(|| compute_quality_score(full_text));

        let mut document = ParentDocument::new(document_id, request.title);
        document.full_text = full_text.to_string();
        document.category = request.category;
        document.tags = request.tags;
        document.source = request.source_label;
        document.source_url = request.source_url;
        document.quality_score = quality_score;
        document.chunk_ids = chunks.iter().map(|c| c.chunk_id.clone()).collect();
        self.store.insert_document(collection, document).await?;

        let chunk_count = chunks.len();
        let mut embedded_chunks = 0usize;
        let mut failed_chunks = 0usize;
        let mut pairs = Vec::with_capacity(chunk_count);

        for chunk in chunks {
            let embedding = match &self.embedder {
                Some(embedder) if !chunk.text.trim().is_empty() => {
                    if !self.embed_delay.is_zero() && embedded_chunks + failed_chunks > 0 {
                        tokio::time::sleep(self.embed_delay).await;
                    }
                    match embedder.generate_embedding(&chunk.text).await {
                        Ok(vector) => {
                            embedded_chunks += 1;
                            Some(Embedding::new(vector, embedder.model_id()))
                        }
                        Err(err) => {
                            failed_chunks += 1;
                            log::warn!("embedding failed for chunk '{}': {err}", chunk.chunk_id);
                            None
                        }
                    }
                }
                _ => None,
            };
            pairs.push((chunk, embedding));
        }

        self.store
            .insert_chunks(collection, document_id, pairs)
            .await?;

        let (doc_embedding, embedding_status) = match &self.embedder {
            None => (None, EmbeddingStatus::Skipped),
            Some(embedder) => match embedder
                .generate_embedding(truncate_for_embedding(full_text))
                .await
            {
                Ok(vector) if failed_chunks == 0 => (
                    Some(Embedding::new(vector, embedder.model_id())),
                    EmbeddingStatus::Ready,
                ),
                Ok(vector) => (
                    Some(Embedding::new(vector, embedder.model_id())),
                    EmbeddingStatus::Error,
                ),
                Err(err) => {
                    log::warn!("document embedding failed for '{document_id}': {err}");
                    (None, EmbeddingStatus::Error)
                }
            },
        };
        self.store
            .set_document_embedding(collection, document_id, doc_embedding, embedding_status)
            .await?;

        log::info!(
            "ingested '{document_id}' into '{collection}': {chunk_count} chunks, \
             {embedded_chunks} embedded, {failed_chunks} failed"
        );
        Ok(IngestReport {
            document_id: document_id.to_string(),
            chunk_count,
            embedded_chunks,
            failed_chunks,
            embedding_status,
        })
    }
}
