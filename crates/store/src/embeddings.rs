use crate::error::{Result, StoreError};
use crate::traits::EmbeddingProvider;
use async_trait::async_trait;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::time::Instant;

/// Maximum characters sent to an embedding provider; longer texts are
/// truncated at a char boundary. Embedding quality degrades slowly past
/// this point while cost grows linearly.
pub const EMBED_INPUT_CHAR_LIMIT: usize = 8000;

/// Truncate text to the provider input limit without splitting a char.
#[must_use]
pub fn truncate_for_embedding(text: &str) -> &str {
    if text.len() <= EMBED_INPUT_CHAR_LIMIT {
        return text;
    }
    let mut end = EMBED_INPUT_CHAR_LIMIT;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// Deterministic, offline embedder: a bag of hashed tokens, normalized to
/// unit length. Texts sharing words get similar vectors, so lexical
/// overlap stands in for semantic similarity. Stable across runs, no
/// model download, which is all tests and offline setups need.
#[derive(Debug, Clone)]
pub struct StubEmbedder {
    model_id: String,
    dimensions: usize,
}

impl StubEmbedder {
    #[must_use]
    pub fn new(dimensions: usize) -> Self {
        Self {
            model_id: format!("stub-{dimensions}"),
            dimensions,
        }
    }
}

#[async_trait]
impl EmbeddingProvider for StubEmbedder {
    async fn generate_embedding(&self, text: &str) -> Result<Vec<f32>> {
        let mut vector = vec![0.0_f32; self.dimensions];
        for token in truncate_for_embedding(text)
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let digest = Sha256::digest(token.to_lowercase().as_bytes());
            let bucket = usize::from(u16::from_be_bytes([digest[0], digest[1]])) % self.dimensions;
            vector[bucket] += 1.0;
        }
        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }
        Ok(vector)
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingDatum>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingDatum {
    embedding: Vec<f32>,
}

/// Embedder speaking the OpenAI-compatible `/embeddings` HTTP protocol.
#[derive(Debug, Clone)]
pub struct OpenAiCompatibleEmbedder {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model_id: String,
    dimensions: usize,
}

impl OpenAiCompatibleEmbedder {
    #[must_use]
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model_id: impl Into<String>,
        dimensions: usize,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
            model_id: model_id.into(),
            dimensions,
        }
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiCompatibleEmbedder {
    async fn generate_embedding(&self, text: &str) -> Result<Vec<f32>> {
        let url = format!("{}/embeddings", self.base_url.trim_end_matches('/'));
        let body = serde_json::json!({
            "model": self.model_id,
            "input": truncate_for_embedding(text),
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(StoreError::ProviderUnavailable(format!(
                "{}: {status} {detail}",
                self.model_id
            )));
        }

        let parsed: EmbeddingResponse = response.json().await?;
        let vector = parsed
            .data
            .into_iter()
            .next()
            .map(|datum| datum.embedding)
            .ok_or_else(|| {
                StoreError::EmbeddingError(format!("{}: empty embedding response", self.model_id))
            })?;

        if vector.len() != self.dimensions {
            return Err(StoreError::InvalidDimension {
                expected: self.dimensions,
                actual: vector.len(),
            });
        }
        Ok(vector)
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

/// Tries an ordered chain of providers, falling through on failure.
///
/// All providers must share one dimensionality; the chain presents a
/// composite model id so cache keys distinguish it from any single link.
pub struct FallbackEmbedder {
    providers: Vec<Box<dyn EmbeddingProvider>>,
    model_id: String,
    dimensions: usize,
}

impl FallbackEmbedder {
    pub fn new(providers: Vec<Box<dyn EmbeddingProvider>>) -> Result<Self> {
        let first = providers
            .first()
            .ok_or_else(|| StoreError::Other("fallback chain cannot be empty".to_string()))?;
        let dimensions = first.dimensions();
        for provider in &providers {
            if provider.dimensions() != dimensions {
                return Err(StoreError::InvalidDimension {
                    expected: dimensions,
                    actual: provider.dimensions(),
                });
            }
        }
        let model_id = providers
            .iter()
            .map(|p| p.model_id())
            .collect::<Vec<_>>()
            .join("|");
        Ok(Self {
            providers,
            model_id,
            dimensions,
        })
    }
}

#[async_trait]
impl EmbeddingProvider for FallbackEmbedder {
    async fn generate_embedding(&self, text: &str) -> Result<Vec<f32>> {
        let mut last_error = None;
        for provider in &self.providers {
            let started = Instant::now();
            match provider.generate_embedding(text).await {
                Ok(vector) => {
                    log::debug!(
                        "embedding via '{}' succeeded in {}ms",
                        provider.model_id(),
                        started.elapsed().as_millis()
                    );
                    return Ok(vector);
                }
                Err(err) => {
                    log::warn!(
                        "embedding via '{}' failed after {}ms: {err}",
                        provider.model_id(),
                        started.elapsed().as_millis()
                    );
                    last_error = Some(err);
                }
            }
        }
        Err(last_error.unwrap_or_else(|| {
            StoreError::ProviderUnavailable("all embedding providers failed".to_string())
        }))
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}
