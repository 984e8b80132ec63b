//! In-memory fact index for question answering
//!
//! Facts are embedded on ingest and kept in insertion order. Retrieval is a
//! linear cosine scan, which is plenty for a few hundred family members.

use crate::embedding::{cosine_similarity, EmbeddingError, EmbeddingModel, HashingEmbeddingModel};
use kinship_domain::traits::FactRetriever;
use std::collections::HashSet;
use tracing::debug;

/// A stored fact with its ordinal and embedding
#[derive(Debug, Clone)]
struct IndexedFact {
    ordinal: u64,
    text: String,
    embedding: Vec<f32>,
}

/// Fact store with top-k similarity retrieval
pub struct FactIndex<E: EmbeddingModel = HashingEmbeddingModel> {
    model: E,
    facts: Vec<IndexedFact>,
    seen: HashSet<String>,
    next_ordinal: u64,
}

impl FactIndex<HashingEmbeddingModel> {
    /// Create an empty index with the default hashing embedder
    pub fn new() -> Self {
        Self::with_model(HashingEmbeddingModel::default())
    }
}

impl Default for FactIndex<HashingEmbeddingModel> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: EmbeddingModel> FactIndex<E> {
    /// Create an empty index over a custom embedding model
    pub fn with_model(model: E) -> Self {
        Self {
            model,
            facts: Vec::new(),
            seen: HashSet::new(),
            next_ordinal: 1,
        }
    }

    /// Stored facts in ingest order
    pub fn facts(&self) -> impl Iterator<Item = &str> {
        self.facts.iter().map(|f| f.text.as_str())
    }

    /// Drop every stored fact; ordinals keep counting up
    pub fn clear(&mut self) {
        self.facts.clear();
        self.seen.clear();
    }
}

impl<E: EmbeddingModel> FactRetriever for FactIndex<E> {
    type Error = EmbeddingError;

    fn ingest(&mut self, facts: &[String]) -> Result<usize, Self::Error> {
        let mut added = 0;
        for fact in facts {
            let text = fact.trim();
            if text.is_empty() || self.seen.contains(text) {
                continue;
            }
            let embedding = self.model.embed(text)?;
            self.facts.push(IndexedFact {
                ordinal: self.next_ordinal,
                text: text.to_string(),
                embedding,
            });
            self.seen.insert(text.to_string());
            self.next_ordinal += 1;
            added += 1;
        }
        debug!("Ingested {} new facts ({} total)", added, self.facts.len());
        Ok(added)
    }

    fn retrieve(&self, query: &str, k: usize) -> Result<Vec<String>, Self::Error> {
        if k == 0 || self.facts.is_empty() {
            return Ok(Vec::new());
        }

        let query_embedding = self.model.embed(query)?;
        let mut scored: Vec<(f32, u64, &str)> = self
            .facts
            .iter()
            .map(|f| {
                (
                    cosine_similarity(&f.embedding, &query_embedding),
                    f.ordinal,
                    f.text.as_str(),
                )
            })
            .collect();

        // Best score first; earlier facts win ties
        scored.sort_by(|a, b| b.0.total_cmp(&a.0).then(a.1.cmp(&b.1)));

        Ok(scored
            .into_iter()
            .take(k)
            .map(|(_, _, text)| text.to_string())
            .collect())
    }

    fn len(&self) -> usize {
        self.facts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facts(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_ingest_skips_duplicates_and_blanks() {
        let mut index = FactIndex::new();
        let added = index
            .ingest(&facts(&["Rama is male.", "Rama is male.", "  "]))
            .unwrap();
        assert_eq!(added, 1);
        assert_eq!(index.len(), 1);

        assert_eq!(index.ingest(&facts(&["Rama is male."])).unwrap(), 0);
    }

    #[test]
    fn test_retrieve_empty_index() {
        let index = FactIndex::new();
        assert!(index.retrieve("Who is Rama?", 3).unwrap().is_empty());
        assert!(index.is_empty());
    }

    #[test]
    fn test_retrieve_zero_k() {
        let mut index = FactIndex::new();
        index.ingest(&facts(&["Rama is male."])).unwrap();
        assert!(index.retrieve("Rama", 0).unwrap().is_empty());
    }

    #[test]
    fn test_retrieve_ranks_matching_fact_first() {
        let mut index = FactIndex::new();
        index
            .ingest(&facts(&[
                "Sita was born in 1905.",
                "Kush died in 1990.",
                "Rama is a parent of Luv.",
            ]))
            .unwrap();

        let top = index.retrieve("Who is the parent of Luv?", 1).unwrap();
        assert_eq!(top, vec!["Rama is a parent of Luv.".to_string()]);
    }

    #[test]
    fn test_ties_keep_ingest_order() {
        let mut index = FactIndex::new();
        index
            .ingest(&facts(&["Alpha beta.", "Gamma delta.", "Epsilon zeta."]))
            .unwrap();

        // A query with no tokens embeds to zero, so every score ties
        let all = index.retrieve("?!", 3).unwrap();
        assert_eq!(all, facts(&["Alpha beta.", "Gamma delta.", "Epsilon zeta."]));
    }

    #[test]
    fn test_clear() {
        let mut index = FactIndex::new();
        index.ingest(&facts(&["Rama is male."])).unwrap();
        index.clear();
        assert!(index.is_empty());
        assert_eq!(index.ingest(&facts(&["Rama is male."])).unwrap(), 1);
        assert_eq!(index.facts().collect::<Vec<_>>(), vec!["Rama is male."]);
    }
}
