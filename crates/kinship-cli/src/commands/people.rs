//! People commands.

use crate::cli::AddPersonArgs;
use crate::error::Result;
use crate::output::Formatter;
use crate::session::Session;
use kinship_domain::NewPerson;

/// Execute the people command.
pub fn execute_people(session: &Session, formatter: &Formatter) -> Result<()> {
    println!("{}", formatter.format_people(&session.records().people)?);
    Ok(())
}

/// Execute the add-person command.
pub fn execute_add_person(
    args: AddPersonArgs,
    session: &mut Session,
    formatter: &Formatter,
) -> Result<()> {
    let person = new_person(args);
    let name = format!("{} {}", person.firstname.trim(), person.surname.trim());
    let id = session.add_person(person)?;

    println!(
        "{}",
        formatter.success(&format!("Added {} with id {}", name.trim(), id))
    );
    Ok(())
}

fn new_person(args: AddPersonArgs) -> NewPerson {
    NewPerson {
        firstname: args.firstname,
        surname: args.surname.trim().to_string(),
        gender: args.gender.map(Into::into),
        birth_year: args.born.trim().to_string(),
        death_year: args.died.trim().to_string(),
        marriage_year: args.married.trim().to_string(),
    }
}
