//! Parse LLM output into family candidates

use crate::error::ExtractorError;
use crate::types::{ExtractedFamily, PersonCandidate, RelationshipCandidate};
use kinship_domain::person::is_valid_marriage_year;
use serde_json::{Map, Value};
use tracing::warn;

/// Parse the LLM response into people and relationship candidates
///
/// The top level must be a JSON object. Missing `people` or `relationships`
/// arrays count as empty. Entries that cannot be used are dropped with a
/// warning and counted; a plan built from such output can be previewed but
/// not committed.
pub fn parse_llm_response(response: &str) -> Result<ExtractedFamily, ExtractorError> {
    // LLMs sometimes wrap JSON in markdown code blocks or chatter around it
    let json_str = extract_json(response)?;

    let json: Value = serde_json::from_str(&json_str)
        .map_err(|e| ExtractorError::InvalidFormat(format!("JSON parse error: {}", e)))?;

    let obj = json
        .as_object()
        .ok_or_else(|| ExtractorError::InvalidFormat("Expected a JSON object".to_string()))?;

    let mut family = ExtractedFamily::default();

    for (idx, entry) in array_field(obj, "people")?.iter().enumerate() {
        match parse_person(entry) {
            Ok(mut person) => {
                if !is_valid_marriage_year(&person.marriage_year) {
                    warn!(
                        "Clearing marriage year '{}' for {}",
                        person.marriage_year, person.firstname
                    );
                    person.marriage_year.clear();
                    family.cleared_marriage_years += 1;
                }
                family.people.push(person);
            }
            Err(e) => {
                warn!("Dropping person {}: {}", idx, e);
                family.dropped_entries += 1;
            }
        }
    }

    for (idx, entry) in array_field(obj, "relationships")?.iter().enumerate() {
        match parse_relationship(entry) {
            Ok(rel) => family.relationships.push(rel),
            Err(e) => {
                warn!("Dropping relationship {}: {}", idx, e);
                family.dropped_entries += 1;
            }
        }
    }

    Ok(family)
}

/// Extract JSON from response, handling markdown code blocks
fn extract_json(response: &str) -> Result<String, ExtractorError> {
    let trimmed = response.trim();

    // Check if wrapped in markdown code block
    if trimmed.starts_with("```") {
        let lines: Vec<&str> = trimmed.lines().collect();
        if lines.len() < 2 {
            return Err(ExtractorError::InvalidFormat("Empty code block".to_string()));
        }

        // Skip first line (```json or ```) and the closing fence if present
        let end = if lines[lines.len() - 1].trim().starts_with("```") {
            lines.len() - 1
        } else {
            lines.len()
        };
        return Ok(lines[1..end].join("\n"));
    }

    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        return Ok(trimmed.to_string());
    }

    // Prose around a single object: keep the outermost braces
    match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if end > start => Ok(trimmed[start..=end].to_string()),
        _ => Ok(trimmed.to_string()),
    }
}

fn array_field<'a>(obj: &'a Map<String, Value>, key: &str) -> Result<&'a [Value], ExtractorError> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(&[]),
        Some(Value::Array(items)) => Ok(items.as_slice()),
        Some(_) => Err(ExtractorError::InvalidFormat(format!(
            "'{}' must be an array",
            key
        ))),
    }
}

/// Text value of a field; numbers become their decimal form
fn text_field(obj: &Map<String, Value>, key: &str) -> String {
    match obj.get(key) {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn parse_person(json: &Value) -> Result<PersonCandidate, String> {
    let obj = json
        .as_object()
        .ok_or_else(|| "Person is not a JSON object".to_string())?;

    let firstname = text_field(obj, "firstname");
    if firstname.is_empty() {
        return Err("Missing or empty 'firstname'".to_string());
    }

    // Some models say "lastname" despite the schema
    let mut surname = text_field(obj, "surname");
    if surname.is_empty() {
        surname = text_field(obj, "lastname");
    }

    Ok(PersonCandidate {
        firstname,
        surname,
        gender: text_field(obj, "gender"),
        birth_year: text_field(obj, "birth_year"),
        death_year: text_field(obj, "death_year"),
        marriage_year: text_field(obj, "marriage_year"),
    })
}

fn parse_relationship(json: &Value) -> Result<RelationshipCandidate, String> {
    let obj = json
        .as_object()
        .ok_or_else(|| "Relationship is not a JSON object".to_string())?;

    let required = |key: &str| {
        let value = text_field(obj, key);
        if value.is_empty() {
            Err(format!("Missing or empty '{}'", key))
        } else {
            Ok(value)
        }
    };

    match text_field(obj, "type").to_lowercase().as_str() {
        "spouse" => Ok(RelationshipCandidate::Spouse {
            person1: required("person1")?,
            person2: required("person2")?,
        }),
        "parent" => Ok(RelationshipCandidate::Parent {
            parent: required("parent")?,
            child: required("child")?,
        }),
        other => Err(format!("Unknown relationship type '{}'", other)),
    }
}
