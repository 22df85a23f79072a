//! # KB Ingest
//!
//! Document ingestion for the knowledge base.
//!
//! ## Pipeline
//!
//! ```text
//! Bytes / Text (+ image analyses)
//!     │
//!     ├──> Classifier (magic bytes, content heuristics)
//!     │      └─> plain-text formats decoded, containers rejected
//!     │
//!     ├──> Segmenter
//!     │      └─> Chunk[] (text + image, merged by page/position)
//!     │
//!     └──> Store (delete-and-recreate per document id)
//!            ├─> per-chunk embeddings (throttled, failures tolerated)
//!            └─> document embedding + lifecycle status
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use kb_ingest::{Ingestor, IngestorConfig, IngestRequest};
//! use kb_store::{InMemoryStore, StubEmbedder};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = Arc::new(InMemoryStore::new());
//!     let embedder = Arc::new(StubEmbedder::new(384));
//!     let ingestor = Ingestor::new(store, Some(embedder), IngestorConfig::default())?;
//!
//!     let report = ingestor
//!         .ingest_text("kb", "# Handbook\n\nContent.", IngestRequest {
//!             title: "Handbook".to_string(),
//!             category: "general".to_string(),
//!             ..IngestRequest::default()
//!         })
//!         .await?;
//!
//!     println!("{} chunks stored", report.chunk_count);
//!     Ok(())
//! }
//! ```

mod error;
mod ingestor;
mod quality;

pub use error::{IngestError, Result};
pub use ingestor::{IngestReport, IngestRequest, Ingestor, IngestorConfig};
pub use quality::compute_quality_score;
