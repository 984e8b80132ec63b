//! Ask command implementation.

use crate::cli::AskArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use crate::session::Session;
use kinship_assistant::{Answer, Assistant};
use kinship_domain::traits::LlmProvider;
use kinship_domain::FamilyRecords;
use kinship_llm::OllamaProvider;
use std::fmt::Display;
use std::time::Duration;

/// Execute the ask command.
pub fn execute_ask(
    args: AskArgs,
    session: &Session,
    config: &Config,
    formatter: &Formatter,
) -> Result<()> {
    let llm = OllamaProvider::new(config.llm.endpoint.clone(), config.llm.answer_model.clone())?
        .with_timeout(Duration::from_secs(config.llm.timeout_secs))
        .with_max_retries(config.llm.max_retries);

    let answer = answer_question(llm, session.records(), &args.question.join(" "))?;
    println!("{}", formatter.format_answer(&answer)?);
    Ok(())
}

/// Index the current facts and answer one question.
pub fn answer_question<L>(llm: L, records: &FamilyRecords, question: &str) -> Result<Answer>
where
    L: LlmProvider,
    L::Error: Display,
{
    let mut assistant = Assistant::new(llm);
    assistant.ingest(records)?;
    Ok(assistant.ask(question)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use kinship_assistant::AssistantError;
    use kinship_domain::NewPerson;
    use kinship_llm::MockProvider;

    #[test]
    fn test_answer_uses_current_records() {
        let mut records = FamilyRecords::new();
        let rama = records.add_person(NewPerson::named("Rama")).unwrap();
        let sita = records.add_person(NewPerson::named("Sita")).unwrap();
        records.add_spouse(rama, sita);

        let llm = MockProvider::new("Sita.");
        let answer = answer_question(llm.clone(), &records, "Who is Rama married to?").unwrap();

        assert_eq!(answer.text, "Sita.");
        assert!(answer
            .context
            .contains(&"Rama and Sita are married.".to_string()));
        assert!(llm.last_prompt().unwrap().contains("Question: Who is Rama married to?"));
    }

    #[test]
    fn test_blank_question() {
        let result = answer_question(MockProvider::default(), &FamilyRecords::new(), " ");
        assert!(matches!(
            result,
            Err(CliError::Assistant(AssistantError::EmptyQuestion))
        ));
    }
}
