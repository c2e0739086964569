//! Cuepack CLI - validate, install and manage sound packs from untrusted
//! archives.

mod cli;
mod commands;
mod error;
mod output;
mod progress;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use cli::Commands;
use output::OutputFormatter;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(&cli.log_level);

    let formatter = output::create_formatter(cli.json, cli.verbose, cli.quiet);

    match run(&cli, &*formatter) {
        Ok(code) => code,
        Err(e) => {
            formatter.format_error(&e);
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so stdout stays parseable.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

fn run(cli: &Cli, formatter: &dyn OutputFormatter) -> Result<ExitCode> {
    match &cli.command {
        Commands::Validate(args) => {
            let passed = commands::validate::execute(args, formatter)?;
            return Ok(if passed { ExitCode::SUCCESS } else { ExitCode::FAILURE });
        }
        Commands::List(args) => commands::list::execute(args, formatter)?,
        Commands::Completion(args) => commands::completion::execute(args.shell),
        Commands::Install(args) => {
            let store = commands::open_store(cli)?;
            let show_progress = !cli.json && !cli.quiet;
            commands::install::execute(args, &store, formatter, show_progress)?;
        }
        Commands::Add(args) => {
            commands::add::execute(args, &commands::open_store(cli)?, formatter)?;
        }
        Commands::Packs => commands::packs::execute(&commands::open_store(cli)?, formatter)?,
        Commands::Sounds(args) => {
            commands::sounds::execute(args, &commands::open_store(cli)?, formatter)?;
        }
        Commands::Pick(args) => {
            commands::pick::execute(args, &commands::open_store(cli)?, formatter)?;
        }
        Commands::Remove(args) => {
            commands::remove::execute(args, &commands::open_store(cli)?, formatter)?;
        }
    }
    Ok(ExitCode::SUCCESS)
}
