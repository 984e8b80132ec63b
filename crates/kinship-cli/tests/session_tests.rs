use kinship_cli::commands::extract::run_extract;
use kinship_cli::commands::tree::render_tree;
use kinship_cli::config::OutputFormat;
use kinship_cli::{CliError, Formatter, Session};
use kinship_domain::{AddOutcome, Gender, NewPerson};
use kinship_extractor::ExtractorConfig;
use kinship_graph::LabelStyle;
use kinship_llm::MockProvider;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_manual_entry_survives_reopen_and_renders() {
    let dir = TempDir::new().unwrap();

    {
        let mut session = Session::open(dir.path());
        let rama = session
            .add_person(NewPerson {
                gender: Some(Gender::Male),
                ..NewPerson::named("Rama")
            })
            .unwrap();
        let sita = session
            .add_person(NewPerson {
                gender: Some(Gender::Female),
                ..NewPerson::named("Sita")
            })
            .unwrap();
        let luv = session.add_person(NewPerson::named("Luv")).unwrap();

        assert_eq!(session.add_spouse(rama, sita).unwrap(), AddOutcome::Added);
        assert_eq!(session.add_spouse(sita, rama).unwrap(), AddOutcome::Duplicate);
        assert_eq!(session.add_parent(rama, luv).unwrap(), AddOutcome::Added);
        session.save().unwrap();
    }

    let session = Session::open(dir.path());
    assert_eq!(session.records().people.len(), 3);
    assert_eq!(session.records().relationships.len(), 2);

    let rendered = render_tree(session.records(), true, LabelStyle::Plain).unwrap();
    let json: serde_json::Value = serde_json::from_str(&rendered.to_json().unwrap()).unwrap();
    assert_eq!(json["nodes"][0]["id"], "1_2");
    assert_eq!(json["nodes"][0]["label"], "Rama & Sita");
    assert_eq!(json["nodes"][1]["id"], "3");
    assert_eq!(json["edges"][0]["from"], "1_2");
    assert_eq!(json["edges"][0]["to"], "3");
    assert_eq!(json["edges"][0]["label"], "parent");
}

#[test]
fn test_extraction_commit_then_save() {
    let dir = TempDir::new().unwrap();
    let mut session = Session::open(dir.path());
    let formatter = Formatter::new(OutputFormat::Table, false);

    let llm = MockProvider::new(
        r#"```json
        {"people": [{"firstname": "Rama"}, {"firstname": "Luv"}],
         "relationships": [{"type": "parent", "parent": "Rama", "child": "Luv"}]}
        ```"#,
    );
    run_extract(
        llm,
        ExtractorConfig::default(),
        "Luv is Rama's son.",
        true,
        &mut session,
        &formatter,
    )
    .unwrap();
    session.save().unwrap();

    let people = fs::read_to_string(dir.path().join("people_only.json")).unwrap();
    assert!(people.contains("\"firstname\": \"Luv\""));
    let relationships = fs::read_to_string(dir.path().join("relationships_only.json")).unwrap();
    assert!(relationships.contains("\"parent_id\": \"1\""));
    assert!(relationships.contains("\"child_id\": \"2\""));
}

#[test]
fn test_html_tree_written() {
    let dir = TempDir::new().unwrap();
    let mut session = Session::open(dir.path());
    let rama = session.add_person(NewPerson::named("Rama")).unwrap();
    let sita = session.add_person(NewPerson::named("Sita")).unwrap();
    session.add_spouse(rama, sita).unwrap();

    let html = render_tree(session.records(), true, LabelStyle::Html)
        .unwrap()
        .to_html("Family Tree")
        .unwrap();
    assert!(html.contains("vis-network"));
    assert!(html.contains("<title>Family Tree</title>"));
}

#[test]
fn test_legacy_data_is_not_overwritten() {
    let dir = TempDir::new().unwrap();
    let people = r#"[{"id": "1", "firstname": "Rama"}, {"id": "2", "firstname": "Sita"}, {"id": "3", "firstname": "Luv"}]"#;
    let legacy = r#"[{"type": "spouse", "person1": "Rama", "person2": "Sita"}]"#;
    fs::write(dir.path().join("people_only.json"), people).unwrap();
    fs::write(dir.path().join("relationships_only.json"), legacy).unwrap();

    let mut session = Session::open(dir.path());
    assert!(session.add_person(NewPerson::named("Kush")).is_err());
    assert!(matches!(session.save(), Err(CliError::NotPermitted(_))));

    assert_eq!(fs::read_to_string(dir.path().join("people_only.json")).unwrap(), people);
    assert_eq!(
        fs::read_to_string(dir.path().join("relationships_only.json")).unwrap(),
        legacy
    );
}

#[test]
fn test_person_with_non_numeric_id_survives_save() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("people_only.json"),
        r#"[{"id": "abc", "firstname": "Urmila"}, {"id": "1", "firstname": "Rama"}]"#,
    )
    .unwrap();

    let mut session = Session::open(dir.path());
    let kush = session.add_person(NewPerson::named("Kush")).unwrap();
    assert_eq!(kush.to_string(), "2");
    session.save().unwrap();

    let people = fs::read_to_string(dir.path().join("people_only.json")).unwrap();
    assert!(people.contains("\"firstname\": \"Urmila\""));
    assert!(people.contains("\"id\": \"abc\""));
    assert_eq!(Session::open(dir.path()).records().people.len(), 2);
}
