//! # KB Store
//!
//! Document and chunk storage with pluggable embedding providers.
//!
//! ## Features
//!
//! - **Collection-keyed storage** behind the [`ChunkStore`] trait
//! - **Embedding providers** behind [`EmbeddingProvider`]: an
//!   OpenAI-compatible HTTP client, a deterministic offline stub, an
//!   ordered fallback chain, and an LRU cache wrapper
//! - **Lifecycle tracking** via [`EmbeddingStatus`] on every document
//!
//! ## Architecture
//!
//! ```text
//! Chunk[] + ParentDocument
//!     │
//!     ├──> ChunkStore (InMemoryStore / custom backend)
//!     │      └─> CandidateRecord[] per collection query
//!     │
//!     └──> EmbeddingProvider
//!            ├─> OpenAiCompatibleEmbedder (HTTP)
//!            ├─> FallbackEmbedder (ordered chain)
//!            ├─> CachedEmbedder (LRU, sha256 keys)
//!            └─> StubEmbedder (deterministic, offline)
//! ```

mod embedding_cache;
mod embeddings;
mod error;
mod memory;
mod traits;
mod types;

pub use embedding_cache::CachedEmbedder;
pub use embeddings::{
    truncate_for_embedding, FallbackEmbedder, OpenAiCompatibleEmbedder, StubEmbedder,
    EMBED_INPUT_CHAR_LIMIT,
};
pub use error::{Result, StoreError};
pub use memory::InMemoryStore;
pub use traits::{ChunkStore, EmbeddingProvider};
pub use types::{CandidateRecord, Embedding, EmbeddingStatus, ParentDocument};
