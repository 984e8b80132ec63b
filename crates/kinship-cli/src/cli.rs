//! CLI command definitions and argument parsing.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Kinship - record a family, draw its tree and ask questions about it.
#[derive(Debug, Parser)]
#[command(name = "kinship")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "KINSHIP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Data directory, overriding the configured one
    #[arg(short, long, global = true, env = "KINSHIP_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (ids only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List everyone recorded
    People,

    /// Record a new person
    AddPerson(AddPersonArgs),

    /// Record two people as spouses
    Spouse(SpouseArgs),

    /// Record a parent of a child
    Parent(ParentArgs),

    /// List relationships with names
    Relationships,

    /// Render the family tree
    Tree(TreeArgs),

    /// Propose people and relationships from free text
    Extract(ExtractArgs),

    /// Ask a question about the family
    Ask(AskArgs),

    /// Convert name-keyed relationships to ids
    Migrate,

    /// Enter interactive REPL mode
    Repl,
}

/// Arguments for the add-person command.
#[derive(Debug, Parser)]
pub struct AddPersonArgs {
    /// First name
    pub firstname: String,

    /// Family name
    #[arg(short, long, default_value = "")]
    pub surname: String,

    /// Gender
    #[arg(short, long, value_enum)]
    pub gender: Option<GenderArg>,

    /// Year of birth
    #[arg(long, default_value = "")]
    pub born: String,

    /// Year of death
    #[arg(long, default_value = "")]
    pub died: String,

    /// Year of marriage (four digits)
    #[arg(long, default_value = "")]
    pub married: String,
}

/// Arguments for the spouse command.
#[derive(Debug, Parser)]
pub struct SpouseArgs {
    /// Id of one spouse
    pub person1: u64,

    /// Id of the other spouse
    pub person2: u64,
}

/// Arguments for the parent command.
#[derive(Debug, Parser)]
pub struct ParentArgs {
    /// Id of the parent
    pub parent: u64,

    /// Id of the child
    pub child: u64,
}

/// Arguments for the tree command.
#[derive(Debug, Parser)]
pub struct TreeArgs {
    /// HTML file to write
    #[arg(short, long, default_value = "family_tree.html")]
    pub output: PathBuf,

    /// Print node and edge lists as JSON instead of writing HTML
    #[arg(long)]
    pub json: bool,

    /// Draw blank nodes for unknown ids instead of failing
    #[arg(long)]
    pub lenient: bool,
}

/// Arguments for the extract command.
#[derive(Debug, Parser)]
pub struct ExtractArgs {
    /// Text describing the family
    #[arg(required_unless_present = "file")]
    pub text: Vec<String>,

    /// Read the text from a file
    #[arg(long, conflicts_with = "text")]
    pub file: Option<PathBuf>,

    /// Store the proposed people and relationships
    #[arg(long)]
    pub commit: bool,
}

/// Arguments for the ask command.
#[derive(Debug, Parser)]
pub struct AskArgs {
    /// Question text
    #[arg(required = true)]
    pub question: Vec<String>,
}

/// Gender argument.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum GenderArg {
    /// Male
    Male,
    /// Female
    Female,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

impl From<GenderArg> for kinship_domain::Gender {
    fn from(gender: GenderArg) -> Self {
        match gender {
            GenderArg::Male => kinship_domain::Gender::Male,
            GenderArg::Female => kinship_domain::Gender::Female,
        }
    }
}

impl Command {
    /// Whether running this command can change the records.
    pub fn is_mutating(&self) -> bool {
        match self {
            Command::AddPerson(_) | Command::Spouse(_) | Command::Parent(_) => true,
            Command::Extract(args) => args.commit,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_command_means_repl() {
        let cli = Cli::parse_from(["kinship"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_add_person_command() {
        let cli = Cli::parse_from([
            "kinship",
            "add-person",
            "Sita",
            "--gender",
            "female",
            "--married",
            "1925",
        ]);
        match cli.command {
            Some(Command::AddPerson(args)) => {
                assert_eq!(args.firstname, "Sita");
                assert!(matches!(args.gender, Some(GenderArg::Female)));
                assert_eq!(args.married, "1925");
                assert_eq!(args.surname, "");
            }
            _ => panic!("Expected AddPerson command"),
        }
    }

    #[test]
    fn test_spouse_requires_numeric_ids() {
        assert!(Cli::try_parse_from(["kinship", "spouse", "1", "2"]).is_ok());
        assert!(Cli::try_parse_from(["kinship", "spouse", "Rama", "Sita"]).is_err());
    }

    #[test]
    fn test_extract_text_or_file() {
        let cli = Cli::parse_from(["kinship", "extract", "Rama", "married", "Sita."]);
        match cli.command {
            Some(Command::Extract(args)) => {
                assert_eq!(args.text.join(" "), "Rama married Sita.");
                assert!(!args.commit);
            }
            _ => panic!("Expected Extract command"),
        }

        assert!(Cli::try_parse_from(["kinship", "extract", "--file", "notes.txt"]).is_ok());
        assert!(Cli::try_parse_from(["kinship", "extract"]).is_err());
    }

    #[test]
    fn test_verbosity_counts() {
        let cli = Cli::parse_from(["kinship", "-vv", "people"]);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_mutating_commands() {
        let cli = Cli::parse_from(["kinship", "parent", "1", "3"]);
        assert!(cli.command.unwrap().is_mutating());

        let cli = Cli::parse_from(["kinship", "extract", "text"]);
        assert!(!cli.command.unwrap().is_mutating());

        let cli = Cli::parse_from(["kinship", "extract", "text", "--commit"]);
        assert!(cli.command.unwrap().is_mutating());
    }

    #[test]
    fn test_gender_conversion() {
        let gender: kinship_domain::Gender = GenderArg::Male.into();
        assert_eq!(gender, kinship_domain::Gender::Male);
    }
}
