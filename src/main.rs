//! mdextract - Structured extraction from Markdown documents
//!
//! mdextract provides:
//! - Heading extraction up to a level, with optional body content
//! - Bold/italic extraction with heading context and section filtering
//! - Regex search with context windows, optionally scoped to a section
//! - Output as markdown, plain text or JSON

use clap::Parser;
use std::io::IsTerminal;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

mod cli;
mod core;
mod document;
mod extractors;

use crate::cli::Verbosity;
use crate::core::error::ExtractError;
use crate::core::model::Status;

/// Exit code for a successful run that found nothing
const EXIT_NO_MATCHES: u8 = 2;

fn init_logging(verbosity: Verbosity, color: bool) {
    let filter = EnvFilter::builder()
        .with_default_directive(verbosity.level().into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(color && std::io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .init();
}

fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    init_logging(cli.verbosity(), !cli.no_color);

    match cli::run(cli) {
        Ok(Status::Success) => ExitCode::SUCCESS,
        Ok(Status::NoMatches) => ExitCode::from(EXIT_NO_MATCHES),
        Err(err) => {
            let kind = err.downcast_ref::<ExtractError>().map(ExtractError::kind);
            error!(kind = kind.unwrap_or("other"), "{:#}", err);
            ExitCode::FAILURE
        }
    }
}
