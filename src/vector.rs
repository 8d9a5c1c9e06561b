//! # Vector Index Module
//!
//! ## Purpose
//! In-memory store of (text, embedding) pairs supporting nearest-neighbor
//! retrieval for the vector fallback path and uploaded-document queries.
//!
//! ## Input/Output Specification
//! - **Input**: Document text with fixed-length embedding vectors
//! - **Output**: Stored texts ranked by cosine similarity to a query vector
//! - **Ordering**: Ties broken by insertion order, earliest first
//!
//! ## Key Features
//! - Append-only store, no deduplication, no capacity limit
//! - Cosine similarity ranking (zero-norm vectors score 0.0)
//! - Empty index yields an empty result, never an error
//! - Appends serialized behind a mutex so concurrent writers stay safe

use parking_lot::Mutex;

/// A stored document with its embedding
#[derive(Debug, Clone)]
struct IndexedDocument {
    text: String,
    vector: Vec<f32>,
}

/// A retrieved document with its similarity score
#[derive(Debug, Clone)]
pub struct ScoredDocument {
    pub text: String,
    pub score: f32,
}

/// Append-only in-memory vector index
#[derive(Default)]
pub struct VectorIndex {
    documents: Mutex<Vec<IndexedDocument>>,
}

impl VectorIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a (text, vector) pair to the end of the store
    pub fn add_document(&self, text: impl Into<String>, vector: Vec<f32>) {
        self.documents.lock().push(IndexedDocument {
            text: text.into(),
            vector,
        });
    }

    /// Number of stored documents
    pub fn len(&self) -> usize {
        self.documents.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.lock().is_empty()
    }

    /// Return up to `top_k` stored texts ranked by cosine similarity of their
    /// vectors to `query_vector`. An empty index produces an empty sequence.
    pub fn query(&self, query_vector: &[f32], top_k: usize) -> impl Iterator<Item = ScoredDocument> {
        let documents = self.documents.lock();

        let mut scored: Vec<ScoredDocument> = documents
            .iter()
            .map(|doc| ScoredDocument {
                text: doc.text.clone(),
                score: cosine_similarity(&doc.vector, query_vector),
            })
            .collect();

        // Stable sort keeps insertion order for equal scores
        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(top_k);

        scored.into_iter()
    }
}

/// Cosine similarity between two vectors; 0.0 when either norm is zero
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}
