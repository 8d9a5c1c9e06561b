//! # Embedding Module
//!
//! ## Purpose
//! Maps text to fixed-length numeric vectors for similarity retrieval. A remote
//! embedding service is consulted first when configured; any failure degrades
//! silently to a deterministic character-code fallback so the pipeline stays
//! operable without a model.
//!
//! ## Input/Output Specification
//! - **Input**: Arbitrary text
//! - **Output**: Vector of exactly [`EMBEDDING_DIM`] `f32` entries, never an error
//! - **Fallback**: First 384 characters mapped to their code points, zero-padded

use crate::config::EmbeddingConfig;
use crate::errors::{NavigatorError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Dimension of every vector produced by [`Embedder::embed`]
pub const EMBEDDING_DIM: usize = 384;

/// A remote embedding capability. Implementations may fail; the [`Embedder`]
/// absorbs those failures.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

/// HTTP-backed embedding provider
pub struct RemoteEmbedder {
    client: reqwest::Client,
    endpoint: String,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embedding: Vec<f32>,
}

impl RemoteEmbedder {
    pub fn new(endpoint: String, timeout_seconds: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .map_err(|e| NavigatorError::Network {
                details: e.to_string(),
            })?;

        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl EmbeddingProvider for RemoteEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&EmbedRequest { text })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(NavigatorError::Network {
                details: format!("embedding service returned HTTP {}", response.status()),
            });
        }

        let body: EmbedResponse = response.json().await?;
        Ok(body.embedding)
    }
}

/// Two-tier embedding strategy: an optional primary provider evaluated first,
/// then the character-code fallback. The fallback has no semantic meaning as a
/// similarity embedding.
pub struct Embedder {
    primary: Option<Box<dyn EmbeddingProvider>>,
}

impl Embedder {
    /// Build from configuration, wiring the remote provider when an endpoint is set
    pub fn from_config(config: &EmbeddingConfig) -> Result<Self> {
        let primary = match &config.endpoint {
            Some(endpoint) => Some(Box::new(RemoteEmbedder::new(
                endpoint.clone(),
                config.timeout_seconds,
            )?) as Box<dyn EmbeddingProvider>),
            None => None,
        };
        Ok(Self { primary })
    }

    /// Build with an explicit primary provider
    pub fn with_provider(provider: Box<dyn EmbeddingProvider>) -> Self {
        Self {
            primary: Some(provider),
        }
    }

    /// Build with the character-code fallback only
    pub fn fallback_only() -> Self {
        Self { primary: None }
    }

    /// Embed text into exactly [`EMBEDDING_DIM`] entries. Never fails: provider
    /// errors degrade to the fallback.
    pub async fn embed(&self, text: &str) -> Vec<f32> {
        if let Some(primary) = &self.primary {
            match primary.embed(text).await {
                Ok(vector) => return fit_dimension(vector),
                Err(e) => {
                    debug!("Embedding provider unavailable, using fallback: {}", e);
                }
            }
        }

        char_code_embedding(text)
    }
}

/// Deterministic fallback: first [`EMBEDDING_DIM`] characters mapped to their
/// code points, zero-padded to the full dimension.
fn char_code_embedding(text: &str) -> Vec<f32> {
    let mut vector: Vec<f32> = text
        .chars()
        .take(EMBEDDING_DIM)
        .map(|c| c as u32 as f32)
        .collect();
    vector.resize(EMBEDDING_DIM, 0.0);
    vector
}

/// Zero-pad or truncate a provider vector to the fixed dimension
fn fit_dimension(mut vector: Vec<f32>) -> Vec<f32> {
    vector.resize(EMBEDDING_DIM, 0.0);
    vector
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedProvider(Vec<f32>);

    #[async_trait]
    impl EmbeddingProvider for FixedProvider {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Ok(self.0.clone())
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl EmbeddingProvider for FailingProvider {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Err(NavigatorError::Network {
                details: "unreachable".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_dimension_invariant() {
        let embedder = Embedder::fallback_only();
        for text in ["", "a", "short text", &"x".repeat(5000)] {
            assert_eq!(embedder.embed(text).await.len(), EMBEDDING_DIM);
        }
    }

    #[tokio::test]
    async fn test_dimension_invariant_for_unicode() {
        let embedder = Embedder::fallback_only();
        let text = "§ 230 – coöperative ruling ✓".repeat(40);
        assert_eq!(embedder.embed(&text).await.len(), EMBEDDING_DIM);
    }

    #[tokio::test]
    async fn test_fallback_maps_code_points() {
        let embedder = Embedder::fallback_only();
        let vector = embedder.embed("AB").await;
        assert_eq!(vector[0], 65.0);
        assert_eq!(vector[1], 66.0);
        assert!(vector[2..].iter().all(|v| *v == 0.0));
    }

    #[tokio::test]
    async fn test_provider_vectors_fit_dimension() {
        let short = Embedder::with_provider(Box::new(FixedProvider(vec![1.0; 10])));
        assert_eq!(short.embed("q").await.len(), EMBEDDING_DIM);

        let long = Embedder::with_provider(Box::new(FixedProvider(vec![1.0; 800])));
        assert_eq!(long.embed("q").await.len(), EMBEDDING_DIM);
    }

    #[tokio::test]
    async fn test_provider_failure_degrades_to_fallback() {
        let embedder = Embedder::with_provider(Box::new(FailingProvider));
        let vector = embedder.embed("A").await;
        assert_eq!(vector.len(), EMBEDDING_DIM);
        assert_eq!(vector[0], 65.0);
    }
}
