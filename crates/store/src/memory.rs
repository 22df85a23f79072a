use crate::error::{Result, StoreError};
use crate::traits::ChunkStore;
use crate::types::{CandidateRecord, Embedding, EmbeddingStatus, ParentDocument};
use async_trait::async_trait;
use kb_segmenter::Chunk;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct StoredChunk {
    document_id: String,
    chunk: Chunk,
    embedding: Option<Embedding>,
}

#[derive(Debug, Default)]
struct CollectionState {
    documents: HashMap<String, ParentDocument>,
    /// Chunks in insertion order; queries preserve this order.
    chunks: Vec<StoredChunk>,
}

/// In-memory [`ChunkStore`] backend.
///
/// Chunks are returned in insertion order, so queries over an unchanged
/// store are deterministic. Suitable for tests and small corpora; larger
/// deployments put a database behind the same trait.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    collections: RwLock<HashMap<String, CollectionState>>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of chunks stored in a collection.
    pub async fn chunk_count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, |state| state.chunks.len())
    }
}

#[async_trait]
impl ChunkStore for InMemoryStore {
    async fn insert_document(&self, collection: &str, document: ParentDocument) -> Result<()> {
        let mut collections = self.collections.write().await;
        let state = collections.entry(collection.to_string()).or_default();
        state
            .documents
            .insert(document.document_id.clone(), document);
        Ok(())
    }

    async fn insert_chunks(
        &self,
        collection: &str,
        document_id: &str,
        chunks: Vec<(Chunk, Option<Embedding>)>,
    ) -> Result<()> {
        let mut collections = self.collections.write().await;
        let state = collections.entry(collection.to_string()).or_default();
        for (chunk, embedding) in chunks {
            state.chunks.push(StoredChunk {
                document_id: document_id.to_string(),
                chunk,
                embedding,
            });
        }
        Ok(())
    }

    async fn get_document(&self, collection: &str, document_id: &str) -> Result<ParentDocument> {
        self.collections
            .read()
            .await
            .get(collection)
            .and_then(|state| state.documents.get(document_id))
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("{collection}/{document_id}")))
    }

    async fn query_by_collection(
        &self,
        collection: &str,
        category_filter: Option<&str>,
    ) -> Result<Vec<CandidateRecord>> {
        let collections = self.collections.read().await;
        let Some(state) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        let records = state
            .chunks
            .iter()
            .filter(|stored| {
                category_filter.map_or(true, |category| stored.chunk.category == category)
            })
            .map(|stored| {
                let parent = state.documents.get(&stored.document_id);
                CandidateRecord {
                    chunk: stored.chunk.clone(),
                    embedding: stored.embedding.clone(),
                    title: parent.map_or_else(
                        || stored.chunk.source_label.clone(),
                        |doc| doc.title.clone(),
                    ),
                    quality_score: parent.map_or(0.5, |doc| doc.quality_score),
                }
            })
            .collect();
        Ok(records)
    }

    async fn delete_document_chunks(&self, collection: &str, document_id: &str) -> Result<()> {
        let mut collections = self.collections.write().await;
        if let Some(state) = collections.get_mut(collection) {
            let before = state.chunks.len();
            state.chunks.retain(|stored| stored.document_id != document_id);
            state.documents.remove(document_id);
            log::debug!(
                "removed document '{document_id}' and {} chunks from '{collection}'",
                before - state.chunks.len()
            );
        }
        Ok(())
    }

    async fn set_document_embedding(
        &self,
        collection: &str,
        document_id: &str,
        embedding: Option<Embedding>,
        status: EmbeddingStatus,
    ) -> Result<()> {
        let mut collections = self.collections.write().await;
        let document = collections
            .get_mut(collection)
            .and_then(|state| state.documents.get_mut(document_id))
            .ok_or_else(|| StoreError::NotFound(format!("{collection}/{document_id}")))?;
        document.embedding = embedding;
        document.embedding_status = status;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kb_segmenter::{Segmenter, SourceMetadata};
    use pretty_assertions::assert_eq;

    fn chunks_for(parent_id: &str, category: &str, text: &str) -> Vec<Chunk> {
        let segmenter = Segmenter::default();
        segmenter.chunk_document(
            text,
            &SourceMetadata {
                parent_id: Some(parent_id.to_string()),
                source_label: format!("{parent_id}.md"),
                source_url: String::new(),
                category: category.to_string(),
                page_number: None,
            },
        )
    }

    #[tokio::test]
    async fn insert_and_query_roundtrip() {
        let store = InMemoryStore::new();
        let mut doc = ParentDocument::new("doc-1", "Handbook");
        doc.quality_score = 0.8;
        store.insert_document("kb", doc).await.unwrap();

        let chunks = chunks_for("doc-1", "general", "Some handbook text content.");
        let pairs = chunks.into_iter().map(|c| (c, None)).collect();
        store.insert_chunks("kb", "doc-1", pairs).await.unwrap();

        let records = store.query_by_collection("kb", None).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Handbook");
        assert!((records[0].quality_score - 0.8).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn category_filter_narrows_results() {
        let store = InMemoryStore::new();
        store
            .insert_document("kb", ParentDocument::new("a", "A"))
            .await
            .unwrap();
        store
            .insert_document("kb", ParentDocument::new("b", "B"))
            .await
            .unwrap();

        let a = chunks_for("a", "podcast", "Podcast episode notes.");
        let b = chunks_for("b", "meeting", "Meeting summary notes.");
        store
            .insert_chunks("kb", "a", a.into_iter().map(|c| (c, None)).collect())
            .await
            .unwrap();
        store
            .insert_chunks("kb", "b", b.into_iter().map(|c| (c, None)).collect())
            .await
            .unwrap();

        let records = store
            .query_by_collection("kb", Some("podcast"))
            .await
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].chunk.parent_id, "a");
    }

    #[tokio::test]
    async fn delete_removes_document_and_chunks() {
        let store = InMemoryStore::new();
        store
            .insert_document("kb", ParentDocument::new("doc-1", "Old"))
            .await
            .unwrap();
        let chunks = chunks_for("doc-1", "general", "Original content.");
        store
            .insert_chunks("kb", "doc-1", chunks.into_iter().map(|c| (c, None)).collect())
            .await
            .unwrap();

        store.delete_document_chunks("kb", "doc-1").await.unwrap();
        assert_eq!(store.chunk_count("kb").await, 0);
        assert!(store.get_document("kb", "doc-1").await.is_err());

        // Deleting again is a no-op, not an error.
        store.delete_document_chunks("kb", "doc-1").await.unwrap();
    }

    #[tokio::test]
    async fn embedding_status_transitions() {
        let store = InMemoryStore::new();
        store
            .insert_document("kb", ParentDocument::new("doc-1", "Doc"))
            .await
            .unwrap();

        store
            .set_document_embedding(
                "kb",
                "doc-1",
                Some(Embedding::new(vec![0.1; 8], "stub")),
                EmbeddingStatus::Ready,
            )
            .await
            .unwrap();

        let doc = store.get_document("kb", "doc-1").await.unwrap();
        assert_eq!(doc.embedding_status, EmbeddingStatus::Ready);
        assert!(doc.embedding.is_some());
    }

    #[tokio::test]
    async fn unknown_collection_queries_empty() {
        let store = InMemoryStore::new();
        let records = store.query_by_collection("nope", None).await.unwrap();
        assert!(records.is_empty());
    }
}
