//! Renderer module
//!
//! Renders a Report to different output formats: markdown, text, json

use serde::Serialize;

use crate::core::model::{
    EmphasisRecord, HeadingRecord, Operation, Parameters, Report, Results, SearchMatch, Status,
};

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Markdown,
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "md" | "markdown" => Ok(OutputFormat::Markdown),
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

/// Render configuration combining format and options
#[derive(Debug, Clone, Copy)]
pub struct RenderConfig {
    pub format: OutputFormat,
    /// Indent JSON output
    pub pretty: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::new(OutputFormat::default())
    }
}

impl RenderConfig {
    /// Create a new render config with default options
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            pretty: true,
        }
    }

    /// Create a new render config with pretty option
    pub fn with_pretty(format: OutputFormat, pretty: bool) -> Self {
        Self { format, pretty }
    }
}

/// JSON document wrapping a report; field order is part of the output contract
#[derive(Serialize)]
struct Envelope<'a> {
    operation: Operation,
    file: &'a str,
    parameters: &'a Parameters,
    results: &'a Results,
    count: usize,
    status: Status,
}

/// Renderer for reports
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    /// Create a new renderer with render config
    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Render a report to a string
    pub fn render(&self, report: &Report) -> String {
        match self.config.format {
            OutputFormat::Json => self.render_json(report),
            OutputFormat::Text => self.render_text(&report.results),
            OutputFormat::Markdown => self.render_markdown(&report.results),
        }
    }

    /// Render as a single JSON object with metadata
    ///
    /// Non-ASCII characters are written as-is, not escaped.
    fn render_json(&self, report: &Report) -> String {
        let envelope = Envelope {
            operation: report.operation(),
            file: &report.file,
            parameters: &report.parameters,
            results: &report.results,
            count: report.count(),
            status: report.status(),
        };

        let rendered = if self.config.pretty {
            serde_json::to_string_pretty(&envelope)
        } else {
            serde_json::to_string(&envelope)
        };
        rendered.unwrap_or_else(|_| "{}".to_string())
    }

    /// Render as plain text
    fn render_text(&self, results: &Results) -> String {
        let mut lines = Vec::new();

        match results {
            Results::Headings(items) => {
                for item in items {
                    lines.push(text_heading(item));
                }
            }
            Results::Emphasis(items) => {
                for item in items {
                    let mut line = wrap_emphasis(item);
                    if let Some(context) = &item.heading_context {
                        line.push_str(&format!(" (under: {})", context));
                    }
                    lines.push(line);
                }
            }
            Results::Matches(items) => {
                for item in items {
                    lines.push(format!("Line {}: {}", item.line_number, item.matched_text));
                    if !item.context.is_empty() {
                        lines.push(format!("Context:\n{}", item.context));
                        lines.push(String::new());
                    }
                }
            }
        }

        lines.join("\n")
    }

    /// Render as Markdown, preserving original formatting
    fn render_markdown(&self, results: &Results) -> String {
        let mut lines = Vec::new();

        match results {
            Results::Headings(items) => {
                for item in items {
                    lines.push(item.raw.clone());
                }
            }
            Results::Emphasis(items) => {
                for item in items {
                    let mut entry = wrap_emphasis(item);
                    if let Some(context) = &item.heading_context {
                        entry.push_str(&format!("\n*(under: {})*", context));
                    }
                    lines.push(entry);
                }
            }
            Results::Matches(items) => {
                for item in items {
                    render_match_md(&mut lines, item);
                }
            }
        }

        lines.join("\n")
    }
}

/// Heading text indented two spaces per level below 1
fn text_heading(item: &HeadingRecord) -> String {
    let indent = "  ".repeat(usize::from(item.level.saturating_sub(1)));
    format!("{}{}", indent, item.text)
}

fn wrap_emphasis(item: &EmphasisRecord) -> String {
    let marker = item.kind.marker();
    format!("{}{}{}", marker, item.text, marker)
}

fn render_match_md(lines: &mut Vec<String>, item: &SearchMatch) {
    lines.push(format!(
        "**Match on line {}:** `{}`",
        item.line_number, item.matched_text
    ));
    if !item.context.is_empty() {
        lines.push("```".to_string());
        lines.push(item.context.clone());
        lines.push("```".to_string());
        lines.push(String::new());
    }
}
