//! Migrate command implementation.

use crate::error::Result;
use crate::output::Formatter;
use crate::session::Session;

/// Execute the migrate command.
pub fn execute_migrate(session: &mut Session, formatter: &Formatter) -> Result<()> {
    let report = session.migrate()?;
    println!("{}", formatter.migration_report(&report));
    Ok(())
}
