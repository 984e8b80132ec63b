//! Relationship commands.

use crate::cli::{ParentArgs, SpouseArgs};
use crate::error::Result;
use crate::output::Formatter;
use crate::session::Session;
use kinship_domain::{AddOutcome, PersonId};

/// Execute the spouse command.
pub fn execute_spouse(args: SpouseArgs, session: &mut Session, formatter: &Formatter) -> Result<()> {
    let (a, b) = (PersonId::new(args.person1), PersonId::new(args.person2));
    let outcome = session.add_spouse(a, b)?;
    let description = format!(
        "{} and {} as spouses",
        session.records().display_name(a),
        session.records().display_name(b)
    );
    println!("{}", outcome_message(formatter, outcome, &description));
    Ok(())
}

/// Execute the parent command.
pub fn execute_parent(args: ParentArgs, session: &mut Session, formatter: &Formatter) -> Result<()> {
    let (parent, child) = (PersonId::new(args.parent), PersonId::new(args.child));
    let outcome = session.add_parent(parent, child)?;
    let description = format!(
        "{} as a parent of {}",
        session.records().display_name(parent),
        session.records().display_name(child)
    );
    println!("{}", outcome_message(formatter, outcome, &description));
    Ok(())
}

/// Execute the relationships command.
pub fn execute_relationships(session: &Session, formatter: &Formatter) -> Result<()> {
    println!("{}", formatter.format_relationships(session.records())?);
    Ok(())
}

/// Duplicates and self-links are reported, not treated as failures.
fn outcome_message(formatter: &Formatter, outcome: AddOutcome, description: &str) -> String {
    match outcome {
        AddOutcome::Added => formatter.success(&format!("Recorded {}", description)),
        AddOutcome::Duplicate => formatter.info(&format!("Already recorded: {}", description)),
        AddOutcome::SelfReference => {
            formatter.warning("A person cannot be related to themselves")
        }
    }
}
