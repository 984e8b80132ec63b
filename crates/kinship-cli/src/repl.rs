//! Interactive REPL (Read-Eval-Print Loop) mode.

use crate::cli::Command;
use crate::commands;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::session::Session;
use clap::Parser;
use rustyline::config::Configurer;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;

/// One REPL line parsed with the same grammar as the command line.
#[derive(Debug, Parser)]
#[command(no_binary_name = true, disable_help_subcommand = true)]
struct ReplLine {
    #[command(subcommand)]
    command: Command,
}

/// REPL command type.
#[derive(Debug)]
enum ReplCommand {
    Exit,
    Help,
    Save,
    Command(Command),
}

/// Run the interactive REPL.
pub fn run_repl(session: &mut Session, config: &Config, formatter: &Formatter) -> Result<()> {
    println!(
        "{}",
        formatter.info("Kinship REPL - Type 'help' for commands, 'exit' to quit")
    );
    println!(
        "{}",
        formatter.info(&format!(
            "{} people and {} relationships loaded from {}",
            session.records().people.len(),
            session.records().relationships.len(),
            session.data_dir().display()
        ))
    );
    if let Some(reason) = session.load_error() {
        println!(
            "{}",
            formatter.warning(&format!(
                "Existing data could not be loaded ({}); changes are disabled until `migrate` succeeds",
                reason
            ))
        );
    }
    println!();

    let mut editor = DefaultEditor::new()
        .map_err(|e| CliError::Io(std::io::Error::other(format!("Failed to initialize editor: {}", e))))?;
    editor
        .set_max_history_size(config.settings.history_size)
        .ok();

    let history_path = get_history_path()?;
    let _ = editor.load_history(&history_path);

    loop {
        let prompt = if session.is_dirty() {
            "kinship*> "
        } else {
            "kinship> "
        };

        match editor.readline(prompt) {
            Ok(line) => {
                let line = line.trim();

                if line.is_empty() {
                    continue;
                }

                editor.add_history_entry(line).ok();

                match parse_repl_command(line) {
                    Ok(ReplCommand::Exit) => {
                        if confirm_exit(&mut editor, session, formatter) {
                            println!("{}", formatter.info("Goodbye!"));
                            break;
                        }
                    }
                    Ok(ReplCommand::Help) => {
                        print_help(formatter);
                    }
                    Ok(ReplCommand::Save) => match session.save() {
                        Ok(()) => println!("{}", formatter.success("Saved")),
                        Err(e) => eprintln!("{}", formatter.error(&e.to_string())),
                    },
                    Ok(ReplCommand::Command(cmd)) => {
                        if let Err(e) = commands::execute(cmd, session, config, formatter) {
                            eprintln!("{}", formatter.error(&e.to_string()));
                        }
                    }
                    Err(e) => {
                        eprintln!("{}", formatter.error(&e.to_string()));
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", formatter.info("Use 'exit' to quit"));
            }
            Err(ReadlineError::Eof) => {
                if session.is_dirty() {
                    eprintln!(
                        "{}",
                        formatter.warning("Unsaved changes were discarded")
                    );
                }
                break;
            }
            Err(err) => {
                eprintln!("{}", formatter.error(&format!("Error: {}", err)));
                break;
            }
        }
    }

    editor.save_history(&history_path).ok();

    Ok(())
}

/// Ask before dropping unsaved changes; returns whether to leave.
fn confirm_exit(editor: &mut DefaultEditor, session: &mut Session, formatter: &Formatter) -> bool {
    if !session.is_dirty() {
        return true;
    }

    match editor.readline("Save changes before exiting? [y/n/c] ") {
        Ok(answer) => match answer.trim().to_lowercase().as_str() {
            "y" | "yes" => match session.save() {
                Ok(()) => {
                    println!("{}", formatter.success("Saved"));
                    true
                }
                Err(e) => {
                    eprintln!("{}", formatter.error(&e.to_string()));
                    false
                }
            },
            "n" | "no" => true,
            _ => false,
        },
        Err(_) => false,
    }
}

/// Parse a REPL command line.
fn parse_repl_command(line: &str) -> Result<ReplCommand> {
    let parts = split_line(line)?;

    if parts.is_empty() {
        return Err(CliError::InvalidInput("Empty command".to_string()));
    }

    match parts[0].as_str() {
        "exit" | "quit" | "q" => Ok(ReplCommand::Exit),
        "help" | "?" => Ok(ReplCommand::Help),
        "save" => Ok(ReplCommand::Save),
        _ => match ReplLine::try_parse_from(&parts) {
            Ok(ReplLine {
                command: Command::Repl,
            }) => Err(CliError::NotPermitted(
                "already in interactive mode".to_string(),
            )),
            Ok(parsed) => Ok(ReplCommand::Command(parsed.command)),
            Err(e) => Err(CliError::InvalidInput(
                e.to_string().trim_end().to_string(),
            )),
        },
    }
}

/// Split on whitespace, keeping double-quoted runs together.
fn split_line(line: &str) -> Result<Vec<String>> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut has_token = false;

    for c in line.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                has_token = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if has_token {
                    parts.push(std::mem::take(&mut current));
                    has_token = false;
                }
            }
            c => {
                current.push(c);
                has_token = true;
            }
        }
    }

    if in_quotes {
        return Err(CliError::InvalidInput("Unclosed quote".to_string()));
    }
    if has_token {
        parts.push(current);
    }
    Ok(parts)
}

fn get_history_path() -> Result<PathBuf> {
    let dir = Config::home_dir()?;
    std::fs::create_dir_all(&dir)?;
    Ok(dir.join("history.txt"))
}

fn print_help(formatter: &Formatter) {
    println!("{}", formatter.info("Available commands:"));
    println!();
    println!("  people                              - List everyone recorded");
    println!("  add-person <first> [--surname s] [--gender male|female]");
    println!("             [--born y] [--died y] [--married yyyy]");
    println!("  spouse <id> <id>                    - Record two people as spouses");
    println!("  parent <parent-id> <child-id>       - Record a parent of a child");
    println!("  relationships                       - List relationships");
    println!("  tree [--output f] [--json] [--lenient] - Render the family tree");
    println!("  extract <text> | --file f [--commit] - Propose people from text");
    println!("  ask <question>                      - Ask about the family");
    println!("  migrate                             - Convert name-keyed relationships");
    println!("  save                                - Write changes to disk");
    println!("  help, ?                             - Show this help");
    println!("  exit, quit, q                       - Exit REPL");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_commands() {
        assert!(matches!(parse_repl_command("exit"), Ok(ReplCommand::Exit)));
        assert!(matches!(parse_repl_command("q"), Ok(ReplCommand::Exit)));
        assert!(matches!(parse_repl_command("?"), Ok(ReplCommand::Help)));
        assert!(matches!(parse_repl_command("save"), Ok(ReplCommand::Save)));
    }

    #[test]
    fn test_commands_use_cli_grammar() {
        match parse_repl_command("add-person Sita --gender female") {
            Ok(ReplCommand::Command(Command::AddPerson(args))) => {
                assert_eq!(args.firstname, "Sita");
            }
            other => panic!("Expected AddPerson, got {:?}", other),
        }

        assert!(matches!(
            parse_repl_command("spouse 1 2"),
            Ok(ReplCommand::Command(Command::Spouse(_)))
        ));
    }

    #[test]
    fn test_quoted_text() {
        match parse_repl_command(r#"extract "Rama married Sita." --commit"#) {
            Ok(ReplCommand::Command(Command::Extract(args))) => {
                assert_eq!(args.text, vec!["Rama married Sita.".to_string()]);
                assert!(args.commit);
            }
            other => panic!("Expected Extract, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_command() {
        assert!(matches!(
            parse_repl_command("forget 1"),
            Err(CliError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_nested_repl_refused() {
        assert!(matches!(
            parse_repl_command("repl"),
            Err(CliError::NotPermitted(_))
        ));
    }

    #[test]
    fn test_split_line() {
        assert_eq!(
            split_line(r#"ask "who is  Luv"  now"#).unwrap(),
            vec!["ask", "who is  Luv", "now"]
        );
        assert_eq!(split_line(r#"add-person "" x"#).unwrap(), vec!["add-person", "", "x"]);
        assert!(split_line(r#"ask "open"#).is_err());
    }
}
