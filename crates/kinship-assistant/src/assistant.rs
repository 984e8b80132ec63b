//! Retrieval-augmented question answering

use crate::error::AssistantError;
use kinship_domain::traits::{FactRetriever, LlmProvider};
use kinship_domain::{facts, FamilyRecords};
use kinship_store::FactIndex;
use serde::Serialize;
use std::fmt::Display;
use tracing::{debug, info};

/// Facts retrieved per question
pub const DEFAULT_TOP_K: usize = 3;

/// A model answer and the facts it was given
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Answer {
    /// Trimmed model output
    pub text: String,
    /// Facts placed in the prompt, best match first
    pub context: Vec<String>,
}

/// Answers questions about the family from retrieved facts
pub struct Assistant<L, R = FactIndex>
where
    L: LlmProvider,
    R: FactRetriever,
{
    llm_provider: L,
    retriever: R,
    top_k: usize,
}

impl<L> Assistant<L, FactIndex>
where
    L: LlmProvider,
    L::Error: Display,
{
    /// Create an assistant over an empty in-memory fact index
    pub fn new(llm_provider: L) -> Self {
        Self::with_retriever(llm_provider, FactIndex::new())
    }
}

impl<L, R> Assistant<L, R>
where
    L: LlmProvider,
    R: FactRetriever,
    L::Error: Display,
    R::Error: Display,
{
    /// Create an assistant over a custom retriever
    pub fn with_retriever(llm_provider: L, retriever: R) -> Self {
        Self {
            llm_provider,
            retriever,
            top_k: DEFAULT_TOP_K,
        }
    }

    /// Change how many facts go into each prompt
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Name of the model answering questions
    pub fn model_name(&self) -> &str {
        self.llm_provider.model_name()
    }

    /// Number of facts available for retrieval
    pub fn fact_count(&self) -> usize {
        self.retriever.len()
    }

    /// Generate facts from `records` and add the ones not seen before
    pub fn ingest(&mut self, records: &FamilyRecords) -> Result<usize, AssistantError> {
        let facts = facts::generate(records);
        let added = self
            .retriever
            .ingest(&facts)
            .map_err(|e| AssistantError::Retrieval(e.to_string()))?;
        info!("Ingested {} of {} facts", added, facts.len());
        Ok(added)
    }

    /// Answer `question` from the most relevant facts
    ///
    /// With nothing ingested the model is still asked, with no context.
    pub fn ask(&self, question: &str) -> Result<Answer, AssistantError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(AssistantError::EmptyQuestion);
        }

        let context = if self.retriever.is_empty() {
            Vec::new()
        } else {
            self.retriever
                .retrieve(question, self.top_k)
                .map_err(|e| AssistantError::Retrieval(e.to_string()))?
        };
        debug!("Retrieved {} facts for '{}'", context.len(), question);

        let prompt = build_prompt(question, &context);
        let text = self
            .llm_provider
            .generate(&prompt)
            .map_err(|e| AssistantError::Llm(e.to_string()))?;

        Ok(Answer {
            text: text.trim().to_string(),
            context,
        })
    }
}

/// Prompt sent to the model for one question
pub fn build_prompt(question: &str, facts: &[String]) -> String {
    format!(
        "Based on the following information, answer the question:\n\n{}\n\nQuestion: {}\nAnswer:",
        facts.join("\n"),
        question
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use kinship_domain::NewPerson;
    use kinship_llm::MockProvider;

    #[test]
    fn test_build_prompt() {
        let facts = vec!["Rama is male.".to_string(), "Sita is female.".to_string()];
        assert_eq!(
            build_prompt("Who is Rama?", &facts),
            "Based on the following information, answer the question:\n\n\
             Rama is male.\nSita is female.\n\nQuestion: Who is Rama?\nAnswer:"
        );
    }

    #[test]
    fn test_new_uses_empty_fact_index() {
        let assistant = Assistant::new(MockProvider::new("unused"));
        assert_eq!(assistant.fact_count(), 0);
        assert_eq!(assistant.model_name(), "mock");
    }

    #[test]
    fn test_empty_question_rejected() {
        let llm = MockProvider::new("unused");
        let assistant = Assistant::new(llm.clone());
        assert!(matches!(
            assistant.ask("  "),
            Err(AssistantError::EmptyQuestion)
        ));
        assert_eq!(llm.call_count(), 0);
    }

    #[test]
    fn test_ask_with_empty_index_still_calls_model() {
        let llm = MockProvider::new("  I don't know.  ");
        let assistant = Assistant::new(llm.clone());

        let answer = assistant.ask("Who is Rama?").unwrap();
        assert_eq!(answer.text, "I don't know.");
        assert!(answer.context.is_empty());
        assert_eq!(
            llm.last_prompt().unwrap(),
            build_prompt("Who is Rama?", &[])
        );
    }

    #[test]
    fn test_ingest_skips_known_facts() {
        let mut records = FamilyRecords::new();
        records.add_person(NewPerson::named("Rama")).unwrap();

        let mut assistant = Assistant::new(MockProvider::default());
        assert_eq!(assistant.ingest(&records).unwrap(), 1);
        assert_eq!(assistant.ingest(&records).unwrap(), 0);

        records.add_person(NewPerson::named("Sita")).unwrap();
        assert_eq!(assistant.ingest(&records).unwrap(), 1);
        assert_eq!(assistant.fact_count(), 2);
    }

    #[test]
    fn test_llm_error_reported() {
        let mut llm = MockProvider::default();
        llm.add_error(build_prompt("Who is Rama?", &[]));
        let assistant = Assistant::new(llm);

        assert!(matches!(
            assistant.ask("Who is Rama?"),
            Err(AssistantError::Llm(_))
        ));
    }
}
