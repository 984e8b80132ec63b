//! Extract command implementation.

use crate::cli::ExtractArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::session::Session;
use kinship_domain::traits::LlmProvider;
use kinship_extractor::{Extractor, ExtractorConfig};
use kinship_llm::OllamaProvider;
use std::fmt::Display;
use std::fs;

/// Execute the extract command.
pub fn execute_extract(
    args: ExtractArgs,
    session: &mut Session,
    config: &Config,
    formatter: &Formatter,
) -> Result<()> {
    let text = read_text(&args)?;

    let llm = OllamaProvider::new(config.llm.endpoint.clone(), config.llm.extraction_model.clone())?
        .with_timeout(config.extractor.extraction_timeout())
        .with_max_retries(config.llm.max_retries);

    let output = run_extract(
        llm,
        config.extractor.clone(),
        &text,
        args.commit,
        session,
        formatter,
    )?;
    println!("{}", output);
    Ok(())
}

/// Preview the extraction and, when asked, apply it to the session.
pub fn run_extract<L>(
    llm: L,
    extractor_config: ExtractorConfig,
    text: &str,
    commit: bool,
    session: &mut Session,
    formatter: &Formatter,
) -> Result<String>
where
    L: LlmProvider,
    L::Error: Display,
{
    let extractor = Extractor::new(llm, extractor_config);
    let preview = extractor.extract_preview(text, session.records())?;
    let mut output = formatter.format_preview(&preview)?;

    if commit {
        let summary = session.commit_extraction(preview)?;
        output.push('\n');
        output.push_str(&formatter.commit_summary(&summary));
    } else if !preview.is_empty() && preview.dropped_entries == 0 {
        output.push('\n');
        output.push_str(&formatter.info("Run again with --commit to store these"));
    }

    Ok(output)
}

fn read_text(args: &ExtractArgs) -> Result<String> {
    let text = match &args.file {
        Some(path) => fs::read_to_string(path)?,
        None => args.text.join(" "),
    };
    if text.trim().is_empty() {
        return Err(CliError::InvalidInput("No text to extract from".to_string()));
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use kinship_extractor::ExtractorError;
    use kinship_llm::MockProvider;
    use tempfile::TempDir;

    const RESPONSE: &str = r#"{
        "people": [{"firstname": "Rama"}, {"firstname": "Sita"}],
        "relationships": [{"type": "spouse", "person1": "Rama", "person2": "Sita"}]
    }"#;

    fn formatter() -> Formatter {
        Formatter::new(OutputFormat::Table, false)
    }

    #[test]
    fn test_preview_does_not_change_session() {
        let dir = TempDir::new().unwrap();
        let mut session = Session::open(dir.path());

        let output = run_extract(
            MockProvider::new(RESPONSE),
            ExtractorConfig::default(),
            "Rama married Sita.",
            false,
            &mut session,
            &formatter(),
        )
        .unwrap();

        assert!(output.contains("+ Rama"));
        assert!(output.contains("+ spouse: Rama & Sita"));
        assert!(output.contains("--commit"));
        assert!(session.records().is_empty());
        assert!(!session.is_dirty());
    }

    #[test]
    fn test_commit_adds_to_session() {
        let dir = TempDir::new().unwrap();
        let mut session = Session::open(dir.path());

        let output = run_extract(
            MockProvider::new(RESPONSE),
            ExtractorConfig::default(),
            "Rama married Sita.",
            true,
            &mut session,
            &formatter(),
        )
        .unwrap();

        assert!(output.contains("Added 2 person(s) and 1 relationship(s)"));
        assert_eq!(session.records().people.len(), 2);
        assert!(session.is_dirty());
    }

    #[test]
    fn test_invalid_model_output_commits_nothing() {
        let dir = TempDir::new().unwrap();
        let mut session = Session::open(dir.path());

        let result = run_extract(
            MockProvider::new("I could not find anyone."),
            ExtractorConfig::default(),
            "Rama married Sita.",
            true,
            &mut session,
            &formatter(),
        );

        assert!(matches!(result, Err(CliError::Extractor(_))));
        assert!(session.records().is_empty());
    }

    #[test]
    fn test_dropped_entries_block_commit() {
        let dir = TempDir::new().unwrap();
        let mut session = Session::open(dir.path());

        let result = run_extract(
            MockProvider::new(r#"{"people": [{"firstname": "Rama"}, {"surname": "Raghav"}]}"#),
            ExtractorConfig::default(),
            "Rama and someone else.",
            true,
            &mut session,
            &formatter(),
        );

        assert!(matches!(
            result,
            Err(CliError::Extractor(ExtractorError::IncompleteOutput(1)))
        ));
        assert!(session.records().is_empty());
        assert!(!session.is_dirty());
    }

    #[test]
    fn test_read_text_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "Luv is the son of Rama.").unwrap();

        let args = ExtractArgs {
            text: Vec::new(),
            file: Some(path),
            commit: false,
        };
        assert_eq!(read_text(&args).unwrap(), "Luv is the son of Rama.");
    }
}
