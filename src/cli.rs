//! CLI module - Command-line interface definitions and handlers

use anyhow::{bail, Result};
use clap::{ArgGroup, Parser};
use std::path::PathBuf;
use tracing::Level;

use crate::core::file_reader::validate_file;
use crate::core::model::{EmphasisFilter, EmphasisQuery, HeadingQuery, SearchQuery, Status};
use crate::core::render::{OutputFormat, RenderConfig};
use crate::extractors::RunConfig;

/// mdextract - extract headings, emphasized text and pattern matches from Markdown.
#[derive(Parser, Debug)]
#[command(name = "mdextract")]
#[command(
    author,
    version,
    about,
    long_about = r####"mdextract extracts structured information from a Markdown file: headings up
to a level, emphasized (bold/italic) text with the heading it appears under,
and regex matches with surrounding lines.

Results go to stdout (or --output); status messages go to stderr.

Output formats:
- markdown: preserves Markdown formatting (default)
- text: plain text with hierarchical indentation
- json: one object with operation, file, parameters, results, count, status

Exit codes:
- 0: success
- 1: error (file not found, invalid parameters, invalid regex, ...)
- 2: no matches found

Examples:
    mdextract document.md --headings 3
    mdextract document.md --emphasized-bold --emphasized-under "Section 3"
    mdextract document.md --find "### 1.1" --lines-after 5
    mdextract document.md --find '"CIF"' --within-section "6. DEFINITIONS" --lines-after 1
    mdextract document.md --headings 2 --format json --output headings.json
"####
)]
#[command(group(
    ArgGroup::new("operation")
        .required(true)
        .multiple(true)
        .args(["headings", "emphasized", "emphasized_bold", "emphasized_italic", "find"])
))]
pub struct Cli {
    /// Path to the Markdown file to process.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Extract headings up to level N (1-6).
    #[arg(
        long,
        value_name = "LEVELS",
        allow_negative_numbers = true,
        conflicts_with_all = ["emphasized", "emphasized_bold", "emphasized_italic", "find"],
        help_heading = "Heading Extraction",
        long_help = "Extract headings up to level N (1-6).\n\n\
Example: --headings 3 extracts levels 1, 2 and 3. Only top-level headings are\n\
considered; headings inside quotes or list items are skipped."
    )]
    pub headings: Option<i64>,

    /// Include N lines of content after headings at the deepest extracted level.
    #[arg(
        long,
        value_name = "N",
        requires = "headings",
        help_heading = "Heading Extraction",
        long_help = "Include N lines of content after headings at the deepest extracted level.\n\n\
Example: --headings 3 --include-content-lines 2 attaches two lines to each level 3\n\
heading. Takes precedence over --include-content-chars."
    )]
    pub include_content_lines: Option<usize>,

    /// Include N characters of content after headings at the deepest extracted level.
    #[arg(
        long,
        value_name = "N",
        requires = "headings",
        help_heading = "Heading Extraction"
    )]
    pub include_content_chars: Option<usize>,

    /// Extract all emphasized text (bold and italic).
    #[arg(long, help_heading = "Emphasized Text Extraction")]
    pub emphasized: bool,

    /// Extract only bold text (**text**). `--emphasized` wins when both are given.
    #[arg(long, help_heading = "Emphasized Text Extraction")]
    pub emphasized_bold: bool,

    /// Extract only italic text (*text* or _text_).
    #[arg(long, help_heading = "Emphasized Text Extraction")]
    pub emphasized_italic: bool,

    /// Only keep emphasized text under a heading containing this text.
    #[arg(
        long,
        value_name = "HEADING",
        help_heading = "Emphasized Text Extraction",
        long_help = "Only keep emphasized text appearing under a heading whose text contains\n\
HEADING (case-insensitive). Subsections of a matching heading are included."
    )]
    pub emphasized_under: Option<String>,

    /// Find a regex pattern and extract its context.
    #[arg(
        long,
        value_name = "TEXT",
        allow_hyphen_values = true,
        conflicts_with_all = ["emphasized", "emphasized_bold", "emphasized_italic"],
        help_heading = "Text Search"
    )]
    pub find: Option<String>,

    /// Number of lines to extract after each match.
    #[arg(long, value_name = "N", default_value_t = 0, help_heading = "Text Search")]
    pub lines_after: usize,

    /// Number of lines to extract before each match.
    #[arg(long, value_name = "N", default_value_t = 0, help_heading = "Text Search")]
    pub lines_before: usize,

    /// Case-sensitive search (default: case-insensitive).
    #[arg(long, help_heading = "Text Search")]
    pub case_sensitive: bool,

    /// Limit the search to the section under this heading.
    #[arg(
        long,
        value_name = "HEADING",
        help_heading = "Text Search",
        long_help = "Limit the search to the section under the heading with exactly this text\n\
(case-insensitive), up to the next heading at the same or a shallower level.\n\n\
If no such heading exists, the whole document is searched and a warning is logged."
    )]
    pub within_section: Option<String>,

    /// Write output to a file instead of stdout.
    #[arg(short, long, value_name = "FILE", help_heading = "Output Options")]
    pub output: Option<PathBuf>,

    /// Output format (markdown/text/json).
    #[arg(
        long,
        default_value = "markdown",
        value_name = "FORMAT",
        env = "MDEXTRACT_FORMAT",
        help_heading = "Output Options",
        long_help = "Select the output format.\n\n\
Supported values:\n\
- markdown (default, alias: md)\n\
- text (alias: txt)\n\
- json"
    )]
    pub format: OutputFormat,

    /// Emit JSON on a single line instead of pretty-printing it.
    #[arg(long, help_heading = "Output Options")]
    pub compact: bool,

    /// Disable colored diagnostics.
    #[arg(long, help_heading = "Verbosity")]
    pub no_color: bool,

    /// Show detailed operation messages.
    #[arg(short, long, conflicts_with = "quiet", help_heading = "Verbosity")]
    pub verbose: bool,

    /// Suppress status messages (only show results and errors).
    #[arg(short, long, help_heading = "Verbosity")]
    pub quiet: bool,
}

/// How much diagnostic output goes to stderr
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    Quiet,
    #[default]
    Normal,
    Verbose,
}

impl Verbosity {
    /// Default log level, overridable through `RUST_LOG`
    pub fn level(&self) -> Level {
        match self {
            Verbosity::Quiet => Level::ERROR,
            Verbosity::Normal => Level::INFO,
            Verbosity::Verbose => Level::DEBUG,
        }
    }
}

/// The single operation selected on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Headings(HeadingQuery),
    Emphasis(EmphasisQuery),
    Search(SearchQuery),
}

impl Cli {
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else if self.verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        }
    }

    fn command(&self) -> Option<Command> {
        if let Some(max_level) = self.headings {
            let mut query = HeadingQuery::new(max_level);
            // Content is attached to the deepest extracted level
            if self.include_content_lines.is_some() || self.include_content_chars.is_some() {
                query = query.with_content(
                    max_level,
                    self.include_content_lines,
                    self.include_content_chars,
                );
            }
            return Some(Command::Headings(query));
        }

        let filter = if self.emphasized {
            Some(EmphasisFilter::All)
        } else if self.emphasized_bold {
            Some(EmphasisFilter::Bold)
        } else if self.emphasized_italic {
            Some(EmphasisFilter::Italic)
        } else {
            None
        };
        if let Some(filter) = filter {
            let mut query = EmphasisQuery::new(filter);
            if let Some(heading) = &self.emphasized_under {
                query = query.under(heading.as_str());
            }
            return Some(Command::Emphasis(query));
        }

        self.find.as_ref().map(|pattern| {
            let mut query = SearchQuery::new(pattern.as_str())
                .with_context(self.lines_before, self.lines_after)
                .case_sensitive(self.case_sensitive);
            if let Some(section) = &self.within_section {
                query = query.within(section.as_str());
            }
            Command::Search(query)
        })
    }
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<Status> {
    let render_config = RenderConfig::with_pretty(cli.format, !cli.compact);
    let config = RunConfig::new(render_config, cli.output.clone());

    validate_file(&cli.file)?;

    let Some(command) = cli.command() else {
        bail!("No operation specified. Use --headings, --emphasized, or --find");
    };

    match command {
        Command::Headings(query) => {
            crate::extractors::headings::run_headings(&cli.file, query, &config)
        }
        Command::Emphasis(query) => {
            crate::extractors::emphasis::run_emphasized(&cli.file, query, &config)
        }
        Command::Search(query) => crate::extractors::search::run_search(&cli.file, query, &config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["mdextract", "doc.md"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_headings_command() {
        let cli = parse(&["--headings", "3"]);
        assert_eq!(cli.command(), Some(Command::Headings(HeadingQuery::new(3))));
    }

    #[test]
    fn test_headings_with_content_targets_deepest_level() {
        let cli = parse(&["--headings", "2", "--include-content-chars", "40"]);
        assert_eq!(
            cli.command(),
            Some(Command::Headings(
                HeadingQuery::new(2).with_content(2, None, Some(40))
            ))
        );
    }

    #[test]
    fn test_negative_heading_level_parses() {
        let cli = parse(&["--headings", "-1"]);
        assert_eq!(cli.headings, Some(-1));
    }

    #[test]
    fn test_emphasis_commands() {
        let cli = parse(&["--emphasized-italic", "--emphasized-under", "Intro"]);
        assert_eq!(
            cli.command(),
            Some(Command::Emphasis(
                EmphasisQuery::new(EmphasisFilter::Italic).under("Intro")
            ))
        );

        let cli = parse(&["--emphasized"]);
        assert_eq!(
            cli.command(),
            Some(Command::Emphasis(EmphasisQuery::new(EmphasisFilter::All)))
        );
    }

    #[test]
    fn test_search_command() {
        let cli = parse(&[
            "--find",
            "Term",
            "--lines-before",
            "1",
            "--lines-after",
            "2",
            "--case-sensitive",
            "--within-section",
            "Defs",
        ]);
        assert_eq!(
            cli.command(),
            Some(Command::Search(
                SearchQuery::new("Term")
                    .with_context(1, 2)
                    .case_sensitive(true)
                    .within("Defs")
            ))
        );
    }

    #[test]
    fn test_long_about_keeps_examples() {
        let cmd = <Cli as CommandFactory>::command();
        let about = cmd.get_long_about().unwrap().to_string();
        assert!(about.contains(r####"--find "### 1.1" --lines-after 5"####));
        assert!(about.contains(r#"--within-section "6. DEFINITIONS""#));
        assert!(about.contains("--format json --output headings.json"));
    }

    #[test]
    fn test_emphasis_flags_combine_with_all_first() {
        let cli = parse(&["--emphasized-bold", "--emphasized"]);
        assert_eq!(
            cli.command(),
            Some(Command::Emphasis(EmphasisQuery::new(EmphasisFilter::All)))
        );

        let cli = parse(&["--emphasized-italic", "--emphasized-bold"]);
        assert_eq!(
            cli.command(),
            Some(Command::Emphasis(EmphasisQuery::new(EmphasisFilter::Bold)))
        );
    }

    #[test]
    fn test_operation_required() {
        assert!(Cli::try_parse_from(["mdextract", "doc.md"]).is_err());
    }

    #[test]
    fn test_operations_are_exclusive() {
        let result = Cli::try_parse_from(["mdextract", "doc.md", "--headings", "2", "--find", "x"]);
        assert!(result.is_err());

        let result =
            Cli::try_parse_from(["mdextract", "doc.md", "--emphasized", "--find", "x"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!(parse(&["--emphasized"]).format, OutputFormat::Markdown);
        assert_eq!(
            parse(&["--emphasized", "--format", "json"]).format,
            OutputFormat::Json
        );
        assert!(Cli::try_parse_from(["mdextract", "doc.md", "--emphasized", "--format", "xml"]).is_err());
    }

    #[test]
    fn test_verbosity() {
        assert_eq!(parse(&["--emphasized"]).verbosity(), Verbosity::Normal);
        assert_eq!(parse(&["--emphasized", "-v"]).verbosity(), Verbosity::Verbose);
        assert_eq!(parse(&["--emphasized", "-q"]).verbosity(), Verbosity::Quiet);
        assert_eq!(Verbosity::Quiet.level(), Level::ERROR);
        assert_eq!(Verbosity::Verbose.level(), Level::DEBUG);
    }
}
