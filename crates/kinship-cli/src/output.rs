//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use kinship_assistant::Answer;
use kinship_domain::{FamilyRecords, Person, Relationship};
use kinship_extractor::{CommitSummary, ExtractionPreview};
use kinship_store::MigrationReport;
use serde_json::json;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Output format in use.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format the people list.
    pub fn format_people(&self, people: &[Person]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let rows: Vec<serde_json::Value> = people.iter().map(person_json).collect();
                Ok(serde_json::to_string_pretty(&rows)?)
            }
            OutputFormat::Table => Ok(self.format_people_table(people)),
            OutputFormat::Quiet => Ok(people
                .iter()
                .map(|p| p.id.to_string())
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    fn format_people_table(&self, people: &[Person]) -> String {
        if people.is_empty() {
            return self.colorize("No people recorded.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["ID", "Name", "Gender", "Born", "Died", "Married"]);

        for person in people {
            builder.push_record([
                person.id.to_string(),
                person.full_name(),
                person.gender_str().to_string(),
                person.birth_year.clone(),
                person.death_year.clone(),
                person.marriage_year.clone(),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// Format the relationships list with names in place of ids.
    pub fn format_relationships(&self, records: &FamilyRecords) -> Result<String> {
        let relationships = &records.relationships;
        match self.format {
            OutputFormat::Json => {
                let rows: Vec<serde_json::Value> = relationships
                    .iter()
                    .map(|r| {
                        let (a, b) = r.endpoints();
                        json!({
                            "type": r.kind().as_str(),
                            "from_id": a.to_string(),
                            "from": records.display_name(a),
                            "to_id": b.to_string(),
                            "to": records.display_name(b),
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&rows)?)
            }
            OutputFormat::Table => {
                if relationships.is_empty() {
                    return Ok(self.colorize("No relationships recorded.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["Type", "From", "To"]);
                for rel in relationships {
                    let (a, b) = rel.endpoints();
                    builder.push_record([
                        rel.kind().as_str().to_string(),
                        format!("{} ({})", records.display_name(a), a),
                        format!("{} ({})", records.display_name(b), b),
                    ]);
                }

                let mut table = builder.build();
                table
                    .with(Style::rounded())
                    .with(Modify::new(Rows::first()).with(Alignment::center()));
                Ok(table.to_string())
            }
            OutputFormat::Quiet => Ok(relationships
                .iter()
                .map(relationship_line)
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    /// Format what an extraction would change.
    pub fn format_preview(&self, preview: &ExtractionPreview) -> Result<String> {
        if matches!(self.format, OutputFormat::Json) {
            let value = json!({
                "new_people": preview.new_people.iter().map(|p| json!({
                    "firstname": p.firstname,
                    "surname": p.surname,
                    "gender": p.gender.map(|g| g.as_str()).unwrap_or(""),
                    "birth_year": p.birth_year,
                    "death_year": p.death_year,
                    "marriage_year": p.marriage_year,
                })).collect::<Vec<_>>(),
                "duplicate_people": preview.duplicate_people,
                "relationships": preview.relationships.iter().map(|r| r.to_string()).collect::<Vec<_>>(),
                "skipped_relationships": preview.skipped_relationships,
                "unresolved": preview.unresolved,
                "cleared_marriage_years": preview.cleared_marriage_years,
                "dropped_entries": preview.dropped_entries,
            });
            return Ok(serde_json::to_string_pretty(&value)?);
        }

        let mut lines = Vec::new();
        if preview.new_people.is_empty() {
            lines.push(self.info("No new people"));
        } else {
            lines.push(self.info(&format!("New people ({}):", preview.new_people.len())));
            for person in &preview.new_people {
                let name = format!("{} {}", person.firstname, person.surname);
                lines.push(format!("  + {}", name.trim()));
            }
        }
        if !preview.duplicate_people.is_empty() {
            lines.push(format!(
                "  already recorded: {}",
                preview.duplicate_people.join(", ")
            ));
        }

        if preview.relationships.is_empty() {
            lines.push(self.info("No new relationships"));
        } else {
            lines.push(self.info(&format!(
                "New relationships ({}):",
                preview.relationships.len()
            )));
            for rel in &preview.relationships {
                lines.push(format!("  + {}", rel));
            }
        }
        if preview.skipped_relationships > 0 {
            lines.push(format!(
                "  skipped {} duplicate relationship(s)",
                preview.skipped_relationships
            ));
        }

        for unresolved in &preview.unresolved {
            lines.push(self.warning(&format!("Could not resolve {}", unresolved)));
        }
        if preview.cleared_marriage_years > 0 {
            lines.push(self.warning(&format!(
                "Cleared {} marriage year(s) that were not four digits",
                preview.cleared_marriage_years
            )));
        }
        if preview.dropped_entries > 0 {
            lines.push(self.warning(&format!(
                "Dropped {} unusable model entries; this result cannot be committed",
                preview.dropped_entries
            )));
        }

        Ok(lines.join("\n"))
    }

    /// Format the outcome of committing an extraction.
    pub fn commit_summary(&self, summary: &CommitSummary) -> String {
        self.success(&format!(
            "Added {} person(s) and {} relationship(s)",
            summary.people_added.len(),
            summary.relationships_added
        ))
    }

    /// Format an answer and the facts behind it.
    pub fn format_answer(&self, answer: &Answer) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(answer)?),
            OutputFormat::Quiet => Ok(answer.text.clone()),
            OutputFormat::Table => {
                let mut out = answer.text.clone();
                if !answer.context.is_empty() {
                    out.push_str("\n\n");
                    out.push_str(&self.colorize("Based on:", "cyan"));
                    for fact in &answer.context {
                        out.push_str(&format!("\n  - {}", fact));
                    }
                }
                Ok(out)
            }
        }
    }

    /// Format a migration report.
    pub fn migration_report(&self, report: &MigrationReport) -> String {
        if !report.unresolved.is_empty() {
            let mut out = self.error(&format!(
                "Migration aborted: {} relationship(s) name unknown people; nothing was changed",
                report.unresolved.len()
            ));
            for entry in &report.unresolved {
                out.push_str(&format!("\n  {}", entry));
            }
            return out;
        }
        if report.is_noop() {
            return self.info("Relationships are already id-keyed; nothing to migrate");
        }
        self.success(&format!(
            "Migrated {} relationship(s), removed {} duplicate(s)",
            report.converted, report.duplicates
        ))
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

fn person_json(person: &Person) -> serde_json::Value {
    json!({
        "id": person.id.to_string(),
        "firstname": person.firstname,
        "surname": person.surname,
        "gender": person.gender_str(),
        "birth_year": person.birth_year,
        "death_year": person.death_year,
        "marriage_year": person.marriage_year,
    })
}

fn relationship_line(rel: &Relationship) -> String {
    let (a, b) = rel.endpoints();
    format!("{} {} {}", rel.kind(), a, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kinship_domain::{Gender, NewPerson};

    fn records() -> FamilyRecords {
        let mut records = FamilyRecords::new();
        let rama = records.add_person(NewPerson {
            gender: Some(Gender::Male),
            ..NewPerson::named("Rama")
        }).unwrap();
        let sita = records.add_person(NewPerson::named("Sita")).unwrap();
        records.add_spouse(rama, sita);
        records
    }

    #[test]
    fn test_people_json_format() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_people(&records().people).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value[0]["id"], "1");
        assert_eq!(value[0]["gender"], "Male");
        assert_eq!(value[1]["firstname"], "Sita");
    }

    #[test]
    fn test_people_quiet_format() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let output = formatter.format_people(&records().people).unwrap();
        assert_eq!(output, "1\n2");
    }

    #[test]
    fn test_people_table_format() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_people(&records().people).unwrap();
        assert!(output.contains("Name"));
        assert!(output.contains("Rama"));
    }

    #[test]
    fn test_empty_people() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_people(&[]).unwrap();
        assert!(output.contains("No people recorded"));
    }

    #[test]
    fn test_relationships_show_names() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_relationships(&records()).unwrap();
        assert!(output.contains("Rama (1)"));
        assert!(output.contains("Sita (2)"));
    }

    #[test]
    fn test_relationships_unknown_id() {
        let mut records = records();
        records.relationships.push(Relationship::parent(
            kinship_domain::PersonId::new(1),
            kinship_domain::PersonId::new(7),
        ));
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_relationships(&records).unwrap();
        assert!(output.contains("person #7"));
    }

    #[test]
    fn test_answer_quiet_is_text_only() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let answer = Answer {
            text: "Sita.".to_string(),
            context: vec!["Rama and Sita are married.".to_string()],
        };
        assert_eq!(formatter.format_answer(&answer).unwrap(), "Sita.");
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let msg = formatter.success("test");
        assert_eq!(msg, "✓ test");
    }

    #[test]
    fn test_migration_report_unresolved() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let report = MigrationReport {
            unresolved: vec!["parent: Rama -> Kush".to_string()],
            ..MigrationReport::default()
        };
        let output = formatter.migration_report(&report);
        assert!(output.contains("nothing was changed"));
        assert!(output.contains("parent: Rama -> Kush"));
    }
}
