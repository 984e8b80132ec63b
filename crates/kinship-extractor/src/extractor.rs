//! Core Extractor implementation

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::parser::parse_llm_response;
use crate::plan;
use crate::prompt::PromptBuilder;
use crate::types::{ExtractedFamily, ExtractionPreview};
use kinship_domain::traits::LlmProvider;
use kinship_domain::FamilyRecords;
use tracing::{debug, info};

/// The Extractor turns free text into proposed people and relationships
pub struct Extractor<L>
where
    L: LlmProvider,
{
    llm_provider: L,
    config: ExtractorConfig,
}

impl<L> Extractor<L>
where
    L: LlmProvider,
    L::Error: std::fmt::Display,
{
    /// Create a new Extractor
    pub fn new(llm_provider: L, config: ExtractorConfig) -> Self {
        Self {
            llm_provider,
            config,
        }
    }

    /// Configuration in use
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Name of the model answering extraction prompts
    pub fn model_name(&self) -> &str {
        self.llm_provider.model_name()
    }

    /// Ask the model for the people and relationships mentioned in `text`
    ///
    /// People already in `records` are listed in the prompt so the model
    /// reuses their first names. Nothing is written to `records`.
    pub fn extract(
        &self,
        text: &str,
        records: &FamilyRecords,
    ) -> Result<ExtractedFamily, ExtractorError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ExtractorError::EmptyText);
        }

        let length = text.chars().count();
        if length > self.config.max_text_length {
            return Err(ExtractorError::TextTooLong(
                length,
                self.config.max_text_length,
            ));
        }

        info!(
            "Starting extraction with model '{}', text length {}",
            self.model_name(),
            length
        );

        let known: Vec<String> = records.people.iter().map(|p| p.full_name()).collect();
        let prompt = PromptBuilder::new(text)
            .with_known_people(known, self.config.known_people_limit)
            .build();

        debug!("Prompt length: {} chars", prompt.len());

        let response = self
            .llm_provider
            .generate(&prompt)
            .map_err(|e| ExtractorError::Llm(e.to_string()))?;

        debug!("LLM response length: {} chars", response.len());

        let family = parse_llm_response(&response)?;

        info!(
            "Parsed {} people and {} relationships ({} dropped)",
            family.people.len(),
            family.relationships.len(),
            family.dropped_entries
        );

        Ok(family)
    }

    /// Extract and work out what committing would change
    pub fn extract_preview(
        &self,
        text: &str,
        records: &FamilyRecords,
    ) -> Result<ExtractionPreview, ExtractorError> {
        let family = self.extract(text, records)?;
        Ok(plan::preview(&family, records))
    }
}
