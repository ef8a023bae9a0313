//! Heading extraction - Top-level headings up to a depth, with optional body content

use anyhow::Result;
use std::path::Path;
use tracing::{debug, info};

use crate::core::file_reader::read_source;
use crate::core::model::{HeadingQuery, HeadingRecord, Parameters, Report, Results, Status};
use crate::core::util::{truncate_chars, truncate_lines};
use crate::document::{Document, NodeId};
use crate::extractors::{deliver, RunConfig};

/// How much collected body content to keep
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ContentLimit {
    Lines(usize),
    Chars(usize),
}

impl ContentLimit {
    /// Lines win over chars; zero means "not selected"
    fn select(lines: Option<usize>, chars: Option<usize>) -> Option<Self> {
        match (lines, chars) {
            (Some(n), _) if n > 0 => Some(ContentLimit::Lines(n)),
            (_, Some(n)) if n > 0 => Some(ContentLimit::Chars(n)),
            _ => None,
        }
    }

    fn apply(self, content: &str) -> String {
        match self {
            ContentLimit::Lines(n) => truncate_lines(content, n),
            ContentLimit::Chars(n) => truncate_chars(content, n),
        }
    }
}

/// Collect headings at the top level of `doc` whose level is at most `query.max_level`
///
/// Records keep document order. Headings nested in other blocks (quotes,
/// list items) are not considered.
pub fn extract_headings(doc: &Document, query: &HeadingQuery) -> Vec<HeadingRecord> {
    debug!("Extracting headings up to level {}", query.max_level);

    let limit = query
        .include_level
        .and_then(|_| ContentLimit::select(query.include_lines, query.include_chars));
    if let (Some(level), Some(limit)) = (query.include_level, limit) {
        debug!("Including {:?} of content for level {} headings", limit, level);
    }

    let children = doc.children();
    let mut headings = Vec::new();

    for (index, &id) in children.iter().enumerate() {
        let node = doc.node(id);
        let Some(level) = node.level.filter(|_| node.is_heading()) else {
            continue;
        };
        if i64::from(level) > query.max_level {
            continue;
        }

        let mut record = HeadingRecord::new(level, doc.text(id).trim());

        if query.include_level == Some(i64::from(level)) {
            if let Some(limit) = limit {
                if let Some(content) = content_after(doc, &children[index + 1..], level) {
                    record = record.with_content(limit.apply(&content));
                }
            }
        }

        headings.push(record);
    }

    debug!("Found {} headings", headings.len());
    headings
}

/// Text of the blocks following a heading, up to the next heading at the same
/// or a shallower level
///
/// Deeper headings belong to the section, so their text is collected like
/// any other block.
fn content_after(doc: &Document, following: &[NodeId], level: u8) -> Option<String> {
    let mut parts = Vec::new();

    for &id in following {
        let node = doc.node(id);
        if node.is_heading() && node.level.is_some_and(|l| l <= level) {
            break;
        }

        let text = doc.text(id);
        let text = text.trim();
        if !text.is_empty() {
            parts.push(text.to_string());
        }
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("\n"))
    }
}

/// Run heading extraction on a file
pub fn run_headings(path: &Path, query: HeadingQuery, config: &RunConfig) -> Result<Status> {
    query.validate()?;
    info!("Extracting headings up to level {}...", query.max_level);

    let doc = Document::from_bytes(read_source(path)?)?;
    let headings = extract_headings(&doc, &query);

    let report = Report::new(
        path.display().to_string(),
        Parameters::Headings(query),
        Results::Headings(headings),
    );
    deliver(&report, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "# Title\n## Sub\nBold **word** here.";

    fn levels(records: &[HeadingRecord]) -> Vec<u8> {
        records.iter().map(|r| r.level).collect()
    }

    #[test]
    fn test_extract_two_levels() {
        let doc = Document::parse(SAMPLE);
        let headings = extract_headings(&doc, &HeadingQuery::new(2));

        assert_eq!(
            headings,
            vec![HeadingRecord::new(1, "Title"), HeadingRecord::new(2, "Sub")]
        );
        assert_eq!(headings[0].raw, "# Title");
        assert_eq!(headings[1].raw, "## Sub");
    }

    #[test]
    fn test_max_level_filters_deeper_headings() {
        let doc = Document::parse("# A\n### C\n## B\n#### D\n# E");
        let headings = extract_headings(&doc, &HeadingQuery::new(2));
        assert_eq!(levels(&headings), vec![1, 2, 1]);

        let all = extract_headings(&doc, &HeadingQuery::new(6));
        assert_eq!(levels(&all), vec![1, 3, 2, 4, 1]);

        for max in 1..6 {
            let some = extract_headings(&doc, &HeadingQuery::new(max));
            assert!(all.len() >= some.len());
            assert!(some.iter().all(|h| i64::from(h.level) <= max));
        }
    }

    #[test]
    fn test_out_of_range_levels_filter_without_panicking() {
        let doc = Document::parse(SAMPLE);
        assert!(extract_headings(&doc, &HeadingQuery::new(0)).is_empty());
        assert!(extract_headings(&doc, &HeadingQuery::new(-3)).is_empty());
        assert_eq!(extract_headings(&doc, &HeadingQuery::new(42)).len(), 2);
    }

    #[test]
    fn test_nested_headings_are_ignored() {
        let doc = Document::parse("> # Quoted\n\n- # In a list\n\n# Top");
        let headings = extract_headings(&doc, &HeadingQuery::new(6));
        assert_eq!(headings, vec![HeadingRecord::new(1, "Top")]);
    }

    #[test]
    fn test_no_headings() {
        let doc = Document::parse("Just some text with **bold** and *italic*.");
        assert!(extract_headings(&doc, &HeadingQuery::new(6)).is_empty());
    }

    #[test]
    fn test_only_headings() {
        let doc = Document::parse("# Heading 1\n## Heading 2\n### Heading 3");
        assert_eq!(extract_headings(&doc, &HeadingQuery::new(6)).len(), 3);
    }

    #[test]
    fn test_include_content_lines() {
        let doc = Document::parse(
            "# Top\n\n## First\n\nline a\nline b\n\nsecond para\n\n### Deeper\n\ndeep text\n\n## Second\n\nother",
        );
        let query = HeadingQuery::new(2).with_content(2, Some(2), None);
        let headings = extract_headings(&doc, &query);

        assert_eq!(headings.len(), 3);
        assert!(headings[0].content.is_none());
        assert_eq!(headings[1].content.as_deref(), Some("line a\nline b"));
        assert_eq!(headings[1].raw, "## First\nline a\nline b");
        assert_eq!(headings[2].content.as_deref(), Some("other"));
    }

    #[test]
    fn test_deeper_heading_text_is_collected() {
        let doc = Document::parse("## First\n\n### Deeper\n\ndeep text\n\n## Second");
        let query = HeadingQuery::new(2).with_content(2, Some(10), None);
        let headings = extract_headings(&doc, &query);

        assert_eq!(headings[0].content.as_deref(), Some("Deeper\ndeep text"));
        assert!(headings[1].content.is_none());
        assert_eq!(headings[1].raw, "## Second");
    }

    #[test]
    fn test_include_content_chars() {
        let doc = Document::parse("## Intro\n\nThe quick brown fox");
        let query = HeadingQuery::new(2).with_content(2, None, Some(9));
        let headings = extract_headings(&doc, &query);

        assert_eq!(headings[0].content.as_deref(), Some("The quick"));
        assert_eq!(headings[0].raw, "## Intro\nThe quick");
    }

    #[test]
    fn test_lines_take_precedence_over_chars() {
        let doc = Document::parse("## Intro\n\nfirst line\nsecond line");
        let query = HeadingQuery::new(2).with_content(2, Some(1), Some(3));
        let headings = extract_headings(&doc, &query);
        assert_eq!(headings[0].content.as_deref(), Some("first line"));
    }

    #[test]
    fn test_zero_limits_attach_nothing() {
        let doc = Document::parse("## Intro\n\nbody");
        let query = HeadingQuery::new(2).with_content(2, Some(0), Some(0));
        let headings = extract_headings(&doc, &query);
        assert!(headings[0].content.is_none());
        assert_eq!(headings[0].raw, "## Intro");
    }

    #[test]
    fn test_content_only_for_selected_level() {
        let doc = Document::parse("# Top\n\ntop body\n\n## Sub\n\nsub body");
        let query = HeadingQuery::new(2).with_content(2, Some(5), None);
        let headings = extract_headings(&doc, &query);

        assert!(headings[0].content.is_none());
        assert_eq!(headings[1].content.as_deref(), Some("sub body"));
    }

    #[test]
    fn test_content_from_quotes_and_code() {
        let doc = Document::parse("## Setup\n\n> quoted line\n\n```\ncargo run\n```\n");
        let query = HeadingQuery::new(2).with_content(2, Some(10), None);
        let headings = extract_headings(&doc, &query);
        assert_eq!(headings[0].content.as_deref(), Some("quoted line\ncargo run"));
    }
}
