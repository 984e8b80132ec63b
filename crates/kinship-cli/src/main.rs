//! Kinship CLI - record a family, draw its tree and ask questions about it.

use anyhow::Context;
use clap::Parser;
use kinship_cli::{commands, logging, repl};
use kinship_cli::{Cli, Command, Config, Formatter, Session};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config_path = match cli.config {
        Some(path) => path,
        None => Config::path()?,
    };
    let mut config = Config::load_from(&config_path)
        .with_context(|| format!("failed to load config from {}", config_path.display()))?;

    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }

    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    let mut session = Session::open(&config.data_dir);

    match cli.command {
        None | Some(Command::Repl) => {
            repl::run_repl(&mut session, &config, &formatter)?;
        }
        Some(cmd) => {
            let mutating = cmd.is_mutating();
            commands::execute(cmd, &mut session, &config, &formatter)?;
            if mutating && session.is_dirty() {
                session
                    .save()
                    .with_context(|| format!("failed to save to {}", session.data_dir().display()))?;
            }
        }
    }

    Ok(())
}
