use crate::error::Result;
use crate::traits::EmbeddingProvider;
use async_trait::async_trait;
use lru::LruCache;
use sha2::{Digest, Sha256};
use std::num::NonZeroUsize;
use tokio::sync::Mutex;

const DEFAULT_CACHE_CAPACITY: usize = 2048;

/// LRU cache wrapper around any [`EmbeddingProvider`].
///
/// Keys are `sha256(model_id | text)`, so a cache can safely sit in front
/// of provider chains whose model changes between runs.
pub struct CachedEmbedder {
    inner: Box<dyn EmbeddingProvider>,
    cache: Mutex<LruCache<[u8; 32], Vec<f32>>>,
}

impl CachedEmbedder {
    #[must_use]
    pub fn new(inner: Box<dyn EmbeddingProvider>) -> Self {
        Self::with_capacity(inner, DEFAULT_CACHE_CAPACITY)
    }

    #[must_use]
    pub fn with_capacity(inner: Box<dyn EmbeddingProvider>, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner,
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    fn cache_key(&self, text: &str) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(self.inner.model_id().as_bytes());
        hasher.update(b"|");
        hasher.update(text.as_bytes());
        hasher.finalize().into()
    }
}

#[async_trait]
impl EmbeddingProvider for CachedEmbedder {
    async fn generate_embedding(&self, text: &str) -> Result<Vec<f32>> {
        let key = self.cache_key(text);
        if let Some(hit) = self.cache.lock().await.get(&key) {
            log::debug!("embedding cache hit for '{}'", self.inner.model_id());
            return Ok(hit.clone());
        }

        let vector = self.inner.generate_embedding(text).await?;
        self.cache.lock().await.put(key, vector.clone());
        Ok(vector)
    }

    fn model_id(&self) -> &str {
        self.inner.model_id()
    }

    fn dimensions(&self) -> usize {
        self.inner.dimensions()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::StubEmbedder;
    use crate::error::StoreError;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingEmbedder {
        inner: StubEmbedder,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl EmbeddingProvider for CountingEmbedder {
        async fn generate_embedding(&self, text: &str) -> Result<Vec<f32>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.generate_embedding(text).await
        }
        fn model_id(&self) -> &str {
            self.inner.model_id()
        }
        fn dimensions(&self) -> usize {
            self.inner.dimensions()
        }
    }

    #[tokio::test]
    async fn repeated_texts_hit_the_cache() {
        let calls = Arc::new(AtomicUsize::new(0));
        let cached = CachedEmbedder::new(Box::new(CountingEmbedder {
            inner: StubEmbedder::new(32),
            calls: Arc::clone(&calls),
        }));

        let a = cached.generate_embedding("same text").await.unwrap();
        let b = cached.generate_embedding("same text").await.unwrap();
        assert_eq!(a, b);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        cached.generate_embedding("other text").await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        struct FlakyEmbedder {
            calls: Arc<AtomicUsize>,
        }

        #[async_trait]
        impl EmbeddingProvider for FlakyEmbedder {
            async fn generate_embedding(&self, text: &str) -> Result<Vec<f32>> {
                if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                    return Err(StoreError::ProviderUnavailable("first call".to_string()));
                }
                StubEmbedder::new(8).generate_embedding(text).await
            }
            fn model_id(&self) -> &str {
                "flaky"
            }
            fn dimensions(&self) -> usize {
                8
            }
        }

        let calls = Arc::new(AtomicUsize::new(0));
        let cached = CachedEmbedder::new(Box::new(FlakyEmbedder {
            calls: Arc::clone(&calls),
        }));

        assert!(cached.generate_embedding("text").await.is_err());
        assert!(cached.generate_embedding("text").await.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
