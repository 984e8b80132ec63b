//! Embedding Model for Text Vectorization
//!
//! This module provides text-to-vector conversion for fact retrieval. Facts
//! are short template sentences ("Rama is a parent of Luv."), so a local
//! lexical embedder is enough to find the ones that mention the people in a
//! question, with no model download and no network access.
//!
//! # Architecture
//!
//! - **EmbeddingModel**: trait for anything that maps text to a vector
//! - **HashingEmbeddingModel**: feature-hashed bag of words, L2-normalized
//!
//! # Examples
//!
//! ```rust
//! use kinship_store::embedding::{cosine_similarity, EmbeddingModel, HashingEmbeddingModel};
//!
//! let model = HashingEmbeddingModel::new(256);
//! let fact = model.embed("Rama is a parent of Luv.").unwrap();
//! let query = model.embed("Who is Luv's father?").unwrap();
//! let other = model.embed("Sita was born in 1905.").unwrap();
//!
//! assert!(cosine_similarity(&fact, &query) > cosine_similarity(&other, &query));
//! ```

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use thiserror::Error;

/// Default embedding dimension
pub const DEFAULT_DIMENSION: usize = 256;

/// Words that carry no information about who a fact is about
const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "did", "do", "does", "for", "from", "has",
    "have", "he", "her", "his", "how", "in", "is", "it", "its", "of", "on", "or", "she", "that",
    "the", "their", "them", "they", "this", "to", "was", "were", "what", "when", "where",
    "which", "who", "whom", "whose", "why", "with",
];

/// Errors that can occur during embedding generation
#[derive(Error, Debug)]
pub enum EmbeddingError {
    /// Invalid input text
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Model inference error
    #[error("Model inference failed: {0}")]
    InferenceFailed(String),
}

/// Trait for embedding models
pub trait EmbeddingModel {
    /// Generate an embedding vector for the given text
    ///
    /// # Parameters
    ///
    /// - `text`: Input text to embed
    ///
    /// # Returns
    ///
    /// A vector of f32 values representing the embedding
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Get the dimension of embeddings produced by this model
    fn dimension(&self) -> usize;
}

/// Feature-hashing bag-of-words embedder
///
/// Each content word is hashed to a bucket and a sign; bucket counts are then
/// normalized to unit length. Properties:
///
/// - **Deterministic**: same text, same vector (within one build)
/// - **Lexical**: texts sharing names and key words score higher
/// - **Normalized**: all non-zero vectors have unit length
pub struct HashingEmbeddingModel {
    dimension: usize,
}

impl HashingEmbeddingModel {
    /// Create a new hashing embedder
    ///
    /// # Parameters
    ///
    /// - `dimension`: Number of hash buckets; at least 1
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    /// Lower-cased alphanumeric tokens, stop words and single letters removed
    ///
    /// Falls back to every token when only stop words remain, so a query like
    /// "who is who" still embeds to something.
    pub fn tokenize(text: &str) -> Vec<String> {
        let all: Vec<String> = text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .map(|t| t.to_lowercase())
            .collect();

        let content: Vec<String> = all
            .iter()
            .filter(|t| t.chars().count() > 1 && !STOP_WORDS.contains(&t.as_str()))
            .cloned()
            .collect();

        if content.is_empty() {
            all
        } else {
            content
        }
    }

    fn bucket(&self, token: &str) -> (usize, f32) {
        let mut hasher = DefaultHasher::new();
        token.hash(&mut hasher);
        let hash = hasher.finish();
        let index = (hash % self.dimension as u64) as usize;
        let sign = if (hash >> 63) & 1 == 0 { 1.0 } else { -1.0 };
        (index, sign)
    }
}

impl Default for HashingEmbeddingModel {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSION)
    }
}

impl EmbeddingModel for HashingEmbeddingModel {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if text.trim().is_empty() {
            return Err(EmbeddingError::InvalidInput(
                "Empty text cannot be embedded".to_string(),
            ));
        }

        let mut embedding = vec![0.0f32; self.dimension];
        for token in Self::tokenize(text) {
            let (index, sign) = self.bucket(&token);
            embedding[index] += sign;
        }

        // Normalize to unit length for cosine similarity
        let magnitude: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if magnitude > 0.0 {
            for value in &mut embedding {
                *value /= magnitude;
            }
        }

        Ok(embedding)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

/// Calculate cosine similarity between two embedding vectors
///
/// # Returns
///
/// Cosine similarity in range [-1, 1]; 0.0 when either vector is all zeros
///
/// # Panics
///
/// Panics if vectors have different lengths
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    assert_eq!(a.len(), b.len(), "Vectors must have same length");

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let magnitude_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let magnitude_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        return 0.0;
    }

    dot_product / (magnitude_a * magnitude_b)
}
