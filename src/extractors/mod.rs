//! Extractors - The operations a single invocation can run
//!
//! - Headings: top-level headings up to a depth
//! - Emphasis: bold/italic spans with heading context
//! - Search: regex matches with surrounding lines
//!
//! Each extractor exposes a pure function over a document (or raw text) and a
//! `run_*` entry point that reads the file, renders and delivers the report.

pub mod emphasis;
pub mod headings;
pub mod search;

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use tracing::info;

use crate::core::model::{Report, Status};
use crate::core::render::{OutputFormat, RenderConfig, Renderer};

/// Where and how a report is written
#[derive(Debug, Clone, Default)]
pub struct RunConfig {
    pub render: RenderConfig,
    /// Write to this file instead of stdout
    pub output: Option<PathBuf>,
}

impl RunConfig {
    pub fn new(render: RenderConfig, output: Option<PathBuf>) -> Self {
        Self { render, output }
    }
}

/// Render `report` and write it to the configured destination
///
/// An empty report is only written in JSON, where it still carries the
/// `no_matches` status; other formats write nothing.
pub fn deliver(report: &Report, config: &RunConfig) -> Result<Status> {
    let status = report.status();

    if status == Status::NoMatches {
        info!("No matches found");
        if config.render.format != OutputFormat::Json {
            return Ok(status);
        }
    } else {
        info!(
            "{}: found {} result(s)",
            report.operation().as_str(),
            report.count()
        );
    }

    let output = Renderer::with_config(config.render).render(report);

    match &config.output {
        Some(path) => {
            fs::write(path, &output)
                .with_context(|| format!("Error writing to file {}", path.display()))?;
            info!("Output written to {}", path.display());
        }
        None => println!("{}", output),
    }

    Ok(status)
}
