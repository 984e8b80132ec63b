//! Kinship CLI library.
//!
//! This library provides the core functionality for the `kinship` command-line
//! interface, including configuration, the in-memory session, command
//! execution and output formatting.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod repl;
pub mod session;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
pub use session::Session;
