//! Command implementations.

pub mod ask;
pub mod extract;
pub mod migrate;
pub mod people;
pub mod relationships;
pub mod tree;

pub use self::ask::execute_ask;
pub use self::extract::execute_extract;
pub use self::migrate::execute_migrate;
pub use self::people::{execute_add_person, execute_people};
pub use self::relationships::{execute_parent, execute_relationships, execute_spouse};
pub use self::tree::execute_tree;

use crate::cli::Command;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::session::Session;

/// Run one command against the session.
pub fn execute(
    command: Command,
    session: &mut Session,
    config: &Config,
    formatter: &Formatter,
) -> Result<()> {
    match command {
        Command::People => execute_people(session, formatter),
        Command::AddPerson(args) => execute_add_person(args, session, formatter),
        Command::Spouse(args) => execute_spouse(args, session, formatter),
        Command::Parent(args) => execute_parent(args, session, formatter),
        Command::Relationships => execute_relationships(session, formatter),
        Command::Tree(args) => execute_tree(args, session, config, formatter),
        Command::Extract(args) => execute_extract(args, session, config, formatter),
        Command::Ask(args) => execute_ask(args, session, config, formatter),
        Command::Migrate => execute_migrate(session, formatter),
        Command::Repl => Err(CliError::NotPermitted(
            "already in interactive mode".to_string(),
        )),
    }
}
