//! Extraction Result Model
//!
//! Every extractor maps its findings to one of the record types below before
//! rendering. The records, the query structs (echoed back as `parameters`)
//! and the [`Report`] envelope are the contract between extraction and
//! presentation.

use serde::{Deserialize, Serialize};

use crate::core::error::{ExtractError, Result};

/// Highest heading level Markdown can express
pub const MAX_HEADING_LEVEL: i64 = 6;

/// Which extractor produced a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    ExtractHeadings,
    ExtractEmphasized,
    FindAndExtract,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::ExtractHeadings => "extract_headings",
            Operation::ExtractEmphasized => "extract_emphasized",
            Operation::FindAndExtract => "find_and_extract",
        }
    }
}

/// A heading found at the top level of a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingRecord {
    pub level: u8,
    pub text: String,

    /// Reconstructed Markdown heading line, followed by the attached content
    /// when there is any
    pub raw: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl HeadingRecord {
    pub fn new(level: u8, text: impl Into<String>) -> Self {
        let text = text.into();
        let raw = format!("{} {}", "#".repeat(level as usize), text);
        Self {
            level,
            text,
            raw,
            content: None,
        }
    }

    /// Attach body content, appending it to `raw` on a new line
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        let content = content.into();
        self.raw.push('\n');
        self.raw.push_str(&content);
        self.content = Some(content);
        self
    }
}

/// Kind of an emphasized span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmphasisKind {
    Bold,
    Italic,
}

impl EmphasisKind {
    /// Markdown marker wrapping a span of this kind
    pub fn marker(&self) -> &'static str {
        match self {
            EmphasisKind::Bold => "**",
            EmphasisKind::Italic => "*",
        }
    }
}

/// A bold or italic span with the innermost heading it appears under
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmphasisRecord {
    #[serde(rename = "type")]
    pub kind: EmphasisKind,
    pub text: String,
    pub heading_context: Option<String>,
}

/// One matching line and its context window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchMatch {
    /// First substring of the line matched by the pattern
    #[serde(rename = "match")]
    pub matched_text: String,

    /// 1-indexed
    pub line_number: usize,

    /// `context_lines` joined with newlines, trailing newlines trimmed
    pub context: String,

    pub context_lines: Vec<String>,
}

impl SearchMatch {
    pub fn new(matched_text: impl Into<String>, line_number: usize, context_lines: Vec<String>) -> Self {
        let context = context_lines.join("\n").trim_end_matches('\n').to_string();
        Self {
            matched_text: matched_text.into(),
            line_number,
            context,
            context_lines,
        }
    }
}

/// Records produced by one extractor run, in document order
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Results {
    Headings(Vec<HeadingRecord>),
    Emphasis(Vec<EmphasisRecord>),
    Matches(Vec<SearchMatch>),
}

impl Results {
    pub fn operation(&self) -> Operation {
        match self {
            Results::Headings(_) => Operation::ExtractHeadings,
            Results::Emphasis(_) => Operation::ExtractEmphasized,
            Results::Matches(_) => Operation::FindAndExtract,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Results::Headings(items) => items.len(),
            Results::Emphasis(items) => items.len(),
            Results::Matches(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Options for heading extraction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingQuery {
    /// Headings deeper than this are skipped
    pub max_level: i64,

    /// Attach trailing body content to headings at exactly this level
    #[serde(
        rename = "include_content_for_level",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub include_level: Option<i64>,

    #[serde(
        rename = "include_content_lines",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub include_lines: Option<usize>,

    #[serde(
        rename = "include_content_chars",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub include_chars: Option<usize>,
}

impl HeadingQuery {
    pub fn new(max_level: i64) -> Self {
        Self {
            max_level,
            include_level: None,
            include_lines: None,
            include_chars: None,
        }
    }

    /// Attach content to headings at `level`; `lines` wins over `chars`
    pub fn with_content(mut self, level: i64, lines: Option<usize>, chars: Option<usize>) -> Self {
        self.include_level = Some(level);
        self.include_lines = lines;
        self.include_chars = chars;
        self
    }

    /// Reject levels outside 1..=6
    pub fn validate(&self) -> Result<()> {
        check_level(self.max_level)?;
        if let Some(level) = self.include_level {
            check_level(level)?;
        }
        Ok(())
    }
}

fn check_level(level: i64) -> Result<()> {
    if !(1..=MAX_HEADING_LEVEL).contains(&level) {
        return Err(ExtractError::Validation(format!(
            "Heading level must be between 1 and {}, got {}",
            MAX_HEADING_LEVEL, level
        )));
    }
    Ok(())
}

/// Which emphasis kinds to collect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmphasisFilter {
    #[default]
    All,
    Bold,
    Italic,
}

impl EmphasisFilter {
    pub fn accepts(&self, kind: EmphasisKind) -> bool {
        match self {
            EmphasisFilter::All => true,
            EmphasisFilter::Bold => kind == EmphasisKind::Bold,
            EmphasisFilter::Italic => kind == EmphasisKind::Italic,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EmphasisFilter::All => "all",
            EmphasisFilter::Bold => "bold",
            EmphasisFilter::Italic => "italic",
        }
    }
}

/// Options for emphasis extraction
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EmphasisQuery {
    #[serde(rename = "type")]
    pub filter: EmphasisFilter,

    /// Case-insensitive substring matched against every open heading
    pub heading_filter: Option<String>,
}

impl EmphasisQuery {
    pub fn new(filter: EmphasisFilter) -> Self {
        Self {
            filter,
            heading_filter: None,
        }
    }

    pub fn under(mut self, heading: impl Into<String>) -> Self {
        self.heading_filter = Some(heading.into());
        self
    }
}

/// Options for pattern search
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SearchQuery {
    pub pattern: String,
    pub lines_before: usize,
    pub lines_after: usize,
    pub case_sensitive: bool,

    /// Heading text bounding the search; the whole document is searched
    /// when no such heading exists
    pub within_section: Option<String>,
}

impl SearchQuery {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            ..Default::default()
        }
    }

    pub fn with_context(mut self, lines_before: usize, lines_after: usize) -> Self {
        self.lines_before = lines_before;
        self.lines_after = lines_after;
        self
    }

    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    pub fn within(mut self, section: impl Into<String>) -> Self {
        self.within_section = Some(section.into());
        self
    }
}

/// Effective options of an operation, echoed in JSON output
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Parameters {
    Headings(HeadingQuery),
    Emphasis(EmphasisQuery),
    Search(SearchQuery),
}

/// Overall outcome of an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Success,
    NoMatches,
}

/// Everything the formatter needs: results plus the metadata describing them
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    /// Source identifier as given by the caller
    pub file: String,
    pub parameters: Parameters,
    pub results: Results,
}

impl Report {
    pub fn new(file: impl Into<String>, parameters: Parameters, results: Results) -> Self {
        Self {
            file: file.into(),
            parameters,
            results,
        }
    }

    pub fn operation(&self) -> Operation {
        self.results.operation()
    }

    pub fn count(&self) -> usize {
        self.results.len()
    }

    pub fn status(&self) -> Status {
        if self.results.is_empty() {
            Status::NoMatches
        } else {
            Status::Success
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_record_raw() {
        let record = HeadingRecord::new(3, "Details");
        assert_eq!(record.raw, "### Details");
        assert!(record.content.is_none());
    }

    #[test]
    fn test_heading_record_with_content() {
        let record = HeadingRecord::new(2, "Sub").with_content("body line");
        assert_eq!(record.raw, "## Sub\nbody line");
        assert_eq!(record.content.as_deref(), Some("body line"));
    }

    #[test]
    fn test_heading_record_serialization_omits_content() {
        let json = serde_json::to_string(&HeadingRecord::new(1, "Title")).unwrap();
        assert_eq!(json, r##"{"level":1,"text":"Title","raw":"# Title"}"##);
    }

    #[test]
    fn test_emphasis_record_serialization() {
        let record = EmphasisRecord {
            kind: EmphasisKind::Bold,
            text: "word".to_string(),
            heading_context: None,
        };
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"type":"bold","text":"word","heading_context":null}"#);
    }

    #[test]
    fn test_search_match_context() {
        let m = SearchMatch::new(
            "Term",
            4,
            vec!["y Term z".to_string(), "".to_string()],
        );
        assert_eq!(m.context, "y Term z");
        assert_eq!(m.context_lines.len(), 2);

        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["match"], "Term");
        assert_eq!(json["line_number"], 4);
    }

    #[test]
    fn test_heading_query_validate() {
        assert!(HeadingQuery::new(1).validate().is_ok());
        assert!(HeadingQuery::new(6).validate().is_ok());

        let err = HeadingQuery::new(0).validate().unwrap_err();
        assert_eq!(err.kind(), "validation");
        assert!(err.to_string().contains("got 0"));

        assert!(HeadingQuery::new(7).validate().is_err());
        assert!(HeadingQuery::new(3)
            .with_content(9, Some(1), None)
            .validate()
            .is_err());
    }

    #[test]
    fn test_heading_query_parameters_echo() {
        let plain = serde_json::to_string(&HeadingQuery::new(2)).unwrap();
        assert_eq!(plain, r#"{"max_level":2}"#);

        let with_content = serde_json::to_string(&HeadingQuery::new(3).with_content(3, Some(2), None)).unwrap();
        assert_eq!(
            with_content,
            r#"{"max_level":3,"include_content_for_level":3,"include_content_lines":2}"#
        );
    }

    #[test]
    fn test_emphasis_filter_accepts() {
        assert!(EmphasisFilter::All.accepts(EmphasisKind::Bold));
        assert!(EmphasisFilter::All.accepts(EmphasisKind::Italic));
        assert!(EmphasisFilter::Bold.accepts(EmphasisKind::Bold));
        assert!(!EmphasisFilter::Bold.accepts(EmphasisKind::Italic));
        assert!(!EmphasisFilter::Italic.accepts(EmphasisKind::Bold));
    }

    #[test]
    fn test_search_query_echo_order() {
        let query = SearchQuery::new("Term").with_context(1, 2).within("A");
        let json = serde_json::to_string(&query).unwrap();
        assert_eq!(
            json,
            r#"{"pattern":"Term","lines_before":1,"lines_after":2,"case_sensitive":false,"within_section":"A"}"#
        );
    }

    #[test]
    fn test_report_status() {
        let empty = Report::new(
            "doc.md",
            Parameters::Headings(HeadingQuery::new(2)),
            Results::Headings(Vec::new()),
        );
        assert_eq!(empty.status(), Status::NoMatches);
        assert_eq!(empty.count(), 0);
        assert_eq!(empty.operation(), Operation::ExtractHeadings);

        let found = Report::new(
            "doc.md",
            Parameters::Headings(HeadingQuery::new(2)),
            Results::Headings(vec![HeadingRecord::new(1, "Title")]),
        );
        assert_eq!(found.status(), Status::Success);
    }
}
