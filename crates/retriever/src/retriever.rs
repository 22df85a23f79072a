use crate::error::{Result, RetrieverError};
use crate::options::{DegradeMode, RetrievalOptions};
use crate::query_classifier::classify_query;
use crate::rerank::rerank_results;
use crate::result::{Retrieval, RetrievalResult};
use crate::scoring::{blend_scores, cosine_similarity, Bm25};
use crate::dedup::dedup_results;
use kb_store::{CandidateRecord, ChunkStore, EmbeddingProvider};
use std::sync::Arc;

/// Hybrid retriever blending vector similarity with BM25 keyword scores.
///
/// Every query performs a full scan of the candidate pool: score, floor,
/// rerank, dedup, truncate. There is no index and no implicit cap, which
/// is simple and exact but becomes a throughput bottleneck past a few
/// thousand chunks per collection.
pub struct HybridRetriever {
    store: Arc<dyn ChunkStore>,
    embedder: Option<Arc<dyn EmbeddingProvider>>,
}

impl HybridRetriever {
    pub fn new(store: Arc<dyn ChunkStore>, embedder: Option<Arc<dyn EmbeddingProvider>>) -> Self {
        Self { store, embedder }
    }

    /// Retrieve from one collection.
    pub async fn retrieve(
        &self,
        collection: &str,
        query: &str,
        options: &RetrievalOptions,
    ) -> Result<Retrieval> {
        self.retrieve_multi(&[collection], query, options).await
    }

    /// Retrieve across several collections; each result is tagged with
    /// the collection it came from.
    pub async fn retrieve_multi(
        &self,
        collections: &[&str],
        query: &str,
        options: &RetrievalOptions,
    ) -> Result<Retrieval> {
        if options.top_k == 0 {
            return Err(RetrieverError::InvalidOptions(
                "top_k must be at least 1".to_string(),
            ));
        }

        let query_type = classify_query(query);
        log::debug!("query classified as {}", query_type.as_str());

        let mut pool: Vec<(String, CandidateRecord)> = Vec::new();
        for collection in collections {
            let records = self
                .store
                .query_by_collection(collection, options.category.as_deref())
                .await?;
            pool.extend(
                records
                    .into_iter()
                    .map(|record| ((*collection).to_string(), record)),
            );
        }
        if pool.is_empty() {
            return Ok(Retrieval {
                results: Vec::new(),
                degraded: None,
            });
        }

        let mut degraded = None;
        let query_vector = match &self.embedder {
            None => None,
            Some(embedder) => match embedder.generate_embedding(query).await {
                Ok(vector) => Some(vector),
                Err(err) => {
                    log::warn!("query embedding failed: {err}");
                    match options.degrade_mode {
                        DegradeMode::Empty => {
                            return Ok(Retrieval {
                                results: Vec::new(),
                                degraded: Some(format!("query embedding failed: {err}")),
                            });
                        }
                        DegradeMode::KeywordOnly => {
                            degraded =
                                Some(format!("query embedding failed, keyword-only: {err}"));
                            None
                        }
                    }
                }
            },
        };

        let texts: Vec<&str> = pool
            .iter()
            .map(|(_, record)| record.chunk.text.as_str())
            .collect();
        let keyword_scores = Bm25::build(&texts).scores(query);

        let floor = options.similarity_floor(query);
        let mut results: Vec<RetrievalResult> = Vec::new();
        for ((collection, record), keyword_score) in pool.into_iter().zip(keyword_scores) {
            let semantic_score = match (&query_vector, &record.embedding) {
                (Some(qv), Some(embedding)) => {
                    if embedding.vector.len() != qv.len() {
                        log::warn!(
                            "skipping embedding of '{}': dimension {} != query {}",
                            record.chunk.chunk_id,
                            embedding.vector.len(),
                            qv.len()
                        );
                        None
                    } else {
                        cosine_similarity(qv, &embedding.vector)
                    }
                }
                _ => None,
            };

            // In keyword-only mode the raw BM25 score is the blended
            // score; rescaling it by the keyword weight would push every
            // candidate under the similarity floor.
            let blended_score = if query_vector.is_none() {
                keyword_score
            } else {
                blend_scores(semantic_score.unwrap_or(0.0), keyword_score)
            };
            if blended_score < floor {
                continue;
            }

            let chunk = record.chunk;
            results.push(RetrievalResult {
                chunk_id: chunk.chunk_id,
                parent_id: chunk.parent_id,
                chunk_index: chunk.chunk_index,
                title: record.title,
                text: chunk.text,
                heading: chunk.heading,
                category: chunk.category,
                collection,
                source_label: chunk.source_label,
                source_url: chunk.source_url,
                semantic_score,
                keyword_score,
                blended_score,
                final_score: blended_score,
                quality_score: record.quality_score,
            });
        }

        rerank_results(&mut results, query, options.category_hint.as_deref());
        let mut results = dedup_results(results);
        results.truncate(options.top_k);

        log::debug!(
            "retrieval returned {} results (floor {floor:.2}, degraded: {})",
            results.len(),
            degraded.is_some()
        );
        Ok(Retrieval { results, degraded })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use kb_store::{
        Embedding, EmbeddingStatus, InMemoryStore, ParentDocument, StoreError, StubEmbedder,
    };
    use kb_segmenter::{Segmenter, SourceMetadata};
    use pretty_assertions::assert_eq;

    async fn seed(store: &InMemoryStore, id: &str, title: &str, category: &str, text: &str) {
        let embedder = StubEmbedder::new(128);
        let mut doc = ParentDocument::new(id, title);
        doc.category = category.to_string();
        store.insert_document("kb", doc).await.unwrap();

        let chunks = Segmenter::default().chunk_document(
            text,
            &SourceMetadata {
                parent_id: Some(id.to_string()),
                source_label: format!("{id}.md"),
                source_url: String::new(),
                category: category.to_string(),
                page_number: None,
            },
        );
        let mut pairs = Vec::new();
        for chunk in chunks {
            let vector = embedder.generate_embedding(&chunk.text).await.unwrap();
            let model = embedder.model_id().to_string();
            pairs.push((chunk, Some(Embedding::new(vector, model))));
        }
        store.insert_chunks("kb", id, pairs).await.unwrap();
        store
            .set_document_embedding("kb", id, None, EmbeddingStatus::Ready)
            .await
            .unwrap();
    }

    fn retriever(store: Arc<InMemoryStore>) -> HybridRetriever {
        HybridRetriever::new(store, Some(Arc::new(StubEmbedder::new(128))))
    }

    #[tokio::test]
    async fn matching_document_ranks_first() {
        let store = Arc::new(InMemoryStore::new());
        seed(
            &store,
            "shift8",
            "Systemic Shift #8 Overview",
            "general",
            "Systemic Shift 8 describes the move toward continuous planning cycles.",
        )
        .await;
        seed(
            &store,
            "lunch",
            "Lunch Menu",
            "general",
            "The cafeteria serves soup and sandwiches on weekdays.",
        )
        .await;

        let retrieval = retriever(store)
            .retrieve("kb", "What is Systemic Shift 8?", &RetrievalOptions::default())
            .await
            .unwrap();

        assert!(!retrieval.is_degraded());
        assert!(!retrieval.results.is_empty());
        assert_eq!(retrieval.results[0].parent_id, "shift8");
        assert!(retrieval.results[0].similarity() > 0.3);
    }

    #[tokio::test]
    async fn empty_collection_returns_empty() {
        let store = Arc::new(InMemoryStore::new());
        let retrieval = retriever(store)
            .retrieve("kb", "anything", &RetrievalOptions::default())
            .await
            .unwrap();
        assert!(retrieval.results.is_empty());
        assert!(!retrieval.is_degraded());
    }

    #[tokio::test]
    async fn top_k_zero_is_rejected() {
        let store = Arc::new(InMemoryStore::new());
        let options = RetrievalOptions {
            top_k: 0,
            ..RetrievalOptions::default()
        };
        let result = retriever(store).retrieve("kb", "query", &options).await;
        assert!(matches!(result, Err(RetrieverError::InvalidOptions(_))));
    }

    #[tokio::test]
    async fn results_are_truncated_to_top_k() {
        let store = Arc::new(InMemoryStore::new());
        for i in 0..8 {
            seed(
                &store,
                &format!("doc{i}"),
                &format!("Pricing Notes {i}"),
                "general",
                &format!("Pricing details for plan number {i} and billing terms."),
            )
            .await;
        }

        let options = RetrievalOptions {
            top_k: 3,
            min_similarity: Some(0.0),
            ..RetrievalOptions::default()
        };
        let retrieval = retriever(store)
            .retrieve("kb", "pricing plan billing", &options)
            .await
            .unwrap();
        assert_eq!(retrieval.results.len(), 3);
    }

    struct BrokenEmbedder;

    #[async_trait]
    impl EmbeddingProvider for BrokenEmbedder {
        async fn generate_embedding(&self, _text: &str) -> kb_store::Result<Vec<f32>> {
            Err(StoreError::ProviderUnavailable("offline".to_string()))
        }
        fn model_id(&self) -> &str {
            "broken"
        }
        fn dimensions(&self) -> usize {
            128
        }
    }

    #[tokio::test]
    async fn keyword_only_degradation_still_finds_matches() {
        let store = Arc::new(InMemoryStore::new());
        seed(
            &store,
            "doc",
            "Billing FAQ",
            "general",
            "Invoices are issued monthly and billing questions go to finance.",
        )
        .await;

        let retriever = HybridRetriever::new(store, Some(Arc::new(BrokenEmbedder)));
        let retrieval = retriever
            .retrieve("kb", "billing invoices", &RetrievalOptions::default())
            .await
            .unwrap();

        assert!(retrieval.is_degraded());
        assert_eq!(retrieval.results.len(), 1);
        assert_eq!(retrieval.results[0].semantic_score, None);
        // Keyword-only mode ranks on the raw BM25 score.
        assert!(retrieval.results[0].similarity() > 0.9);
    }

    #[tokio::test]
    async fn empty_degrade_mode_returns_nothing() {
        let store = Arc::new(InMemoryStore::new());
        seed(&store, "doc", "Doc", "general", "Some content here.").await;

        let retriever = HybridRetriever::new(store, Some(Arc::new(BrokenEmbedder)));
        let options = RetrievalOptions {
            degrade_mode: DegradeMode::Empty,
            ..RetrievalOptions::default()
        };
        let retrieval = retriever
            .retrieve("kb", "content", &options)
            .await
            .unwrap();
        assert!(retrieval.results.is_empty());
        assert!(retrieval.is_degraded());
    }

    #[tokio::test]
    async fn mismatched_dimensions_are_skipped_not_fatal() {
        let store = Arc::new(InMemoryStore::new());
        let mut doc = ParentDocument::new("doc", "Mismatch");
        doc.category = "general".to_string();
        store.insert_document("kb", doc).await.unwrap();

        let chunks = Segmenter::default().chunk_document(
            "Mismatched embedding content about quarterly planning.",
            &SourceMetadata {
                parent_id: Some("doc".to_string()),
                source_label: "doc.md".to_string(),
                source_url: String::new(),
                category: "general".to_string(),
                page_number: None,
            },
        );
        let pairs = chunks
            .into_iter()
            .map(|c| (c, Some(Embedding::new(vec![0.5; 16], "tiny"))))
            .collect();
        store.insert_chunks("kb", "doc", pairs).await.unwrap();

        let options = RetrievalOptions {
            min_similarity: Some(0.0),
            ..RetrievalOptions::default()
        };
        let retrieval = retriever(store)
            .retrieve("kb", "quarterly planning", &options)
            .await
            .unwrap();

        // The chunk survives on its keyword score alone.
        assert_eq!(retrieval.results.len(), 1);
        assert_eq!(retrieval.results[0].semantic_score, None);
        assert!(retrieval.results[0].keyword_score > 0.0);
    }

    #[tokio::test]
    async fn multi_collection_results_are_tagged() {
        let store = Arc::new(InMemoryStore::new());
        seed(&store, "a", "KB Doc", "general", "Shared topic of onboarding.").await;

        let mut doc = ParentDocument::new("b", "Meeting Doc");
        doc.category = "meeting".to_string();
        store.insert_document("meetings", doc).await.unwrap();
        let chunks = Segmenter::default().chunk_document(
            "Shared topic of onboarding from the weekly meeting.",
            &SourceMetadata {
                parent_id: Some("b".to_string()),
                source_label: "b.md".to_string(),
                source_url: String::new(),
                category: "meeting".to_string(),
                page_number: None,
            },
        );
        let embedder = StubEmbedder::new(128);
        let mut pairs = Vec::new();
        for chunk in chunks {
            let v = embedder.generate_embedding(&chunk.text).await.unwrap();
            pairs.push((chunk, Some(Embedding::new(v, "stub-128"))));
        }
        store.insert_chunks("meetings", "b", pairs).await.unwrap();

        let options = RetrievalOptions {
            min_similarity: Some(0.0),
            ..RetrievalOptions::default()
        };
        let retrieval = retriever(store)
            .retrieve_multi(&["kb", "meetings"], "onboarding topic", &options)
            .await
            .unwrap();

        let collections: Vec<&str> = retrieval
            .results
            .iter()
            .map(|r| r.collection.as_str())
            .collect();
        assert!(collections.contains(&"kb"));
        assert!(collections.contains(&"meetings"));
    }

    #[tokio::test]
    async fn category_filter_is_forwarded() {
        let store = Arc::new(InMemoryStore::new());
        seed(&store, "p", "Pod", "podcast", "Episode notes on onboarding.").await;
        seed(&store, "g", "Gen", "general", "General notes on onboarding.").await;

        let options = RetrievalOptions {
            category: Some("podcast".to_string()),
            min_similarity: Some(0.0),
            ..RetrievalOptions::default()
        };
        let retrieval = retriever(store)
            .retrieve("kb", "onboarding notes", &options)
            .await
            .unwrap();
        assert!(retrieval.results.iter().all(|r| r.category == "podcast"));
        assert!(!retrieval.results.is_empty());
    }
}
