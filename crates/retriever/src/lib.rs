//! # KB Retriever
//!
//! Hybrid retrieval over the knowledge base: vector similarity blended
//! with BM25 keyword scoring, adaptive floors, reranking, deduplication,
//! and token-budgeted context assembly.
//!
//! ## Pipeline
//!
//! ```text
//! Query
//!     │
//!     ├──> Query Classifier (factual/analytical/creative/general)
//!     │
//!     ├──> Query Embedding (degrades to keyword-only on failure)
//!     │
//!     ├──> Candidate Scan (per collection, category pre-filter)
//!     │    ├─> cosine similarity (dimension mismatches skipped)
//!     │    ├─> BM25 over the pool, normalized by the pool max
//!     │    └─> blended = 0.65 · cosine + 0.35 · bm25
//!     │
//!     ├──> Similarity Floor (explicit or adaptive)
//!     ├──> Rerank (category rules + quality score)
//!     ├──> Dedup (adjacent siblings, near-identical text)
//!     └──> Truncate to top_k
//!              │
//!              └──> build_context_string (token-budgeted block)
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use kb_retriever::{build_context_string, ContextOptions, HybridRetriever, RetrievalOptions};
//! use kb_store::{InMemoryStore, StubEmbedder};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = Arc::new(InMemoryStore::new());
//!     let embedder = Arc::new(StubEmbedder::new(384));
//!     let retriever = HybridRetriever::new(store, Some(embedder));
//!
//!     let retrieval = retriever
//!         .retrieve("kb", "What is the refund policy?", &RetrievalOptions::default())
//!         .await?;
//!     let window = build_context_string(&retrieval.results, &ContextOptions::default());
//!
//!     println!("{}", window.context);
//!     Ok(())
//! }
//! ```

mod context;
mod dedup;
mod error;
mod options;
mod query_classifier;
mod rerank;
mod result;
mod retriever;
mod scoring;

pub use context::{build_context_string, ContextWindow};
pub use error::{Result, RetrieverError};
pub use options::{adaptive_similarity_threshold, ContextOptions, DegradeMode, RetrievalOptions};
pub use query_classifier::{classify_query, QueryType};
pub use rerank::hinted_category;
pub use result::{Retrieval, RetrievalResult};
pub use retriever::HybridRetriever;
pub use scoring::{
    blend_scores, cosine_similarity, tokenize, Bm25, KEYWORD_WEIGHT, VECTOR_WEIGHT,
};
