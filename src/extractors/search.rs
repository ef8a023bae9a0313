//! Pattern search - Regex matches over raw lines, with context windows
//!
//! Works on the raw text rather than the parsed tree so line numbers and
//! context lines are exactly what the file contains.

use anyhow::Result;
use regex::{Regex, RegexBuilder};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::core::error::{ExtractError, Result as ExtractResult};
use crate::core::file_reader::read_markdown;
use crate::core::model::{Parameters, Report, Results, SearchMatch, SearchQuery, Status};
use crate::core::util::split_lines;
use crate::extractors::{deliver, RunConfig};

/// Line range governed by a heading: `start_line..end_line`, 0-indexed, end exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionBound {
    pub start_line: usize,
    pub end_line: usize,
}

impl SectionBound {
    pub fn contains(&self, index: usize) -> bool {
        (self.start_line..self.end_line).contains(&index)
    }
}

/// Number of leading `#` characters
fn heading_level(line: &str) -> usize {
    line.len() - line.trim_start_matches('#').len()
}

/// Locate the section opened by the heading whose text is `heading`
///
/// The heading text is compared case-insensitively against whole heading
/// lines. The section runs until the next line starting with `#` at the same
/// or a shallower level, or to the end of the document.
pub fn resolve_section(lines: &[&str], heading: &str) -> Option<SectionBound> {
    let pattern = format!(r"^#+\s+{}\s*$", regex::escape(heading));
    let section_re = match RegexBuilder::new(&pattern).case_insensitive(true).build() {
        Ok(re) => re,
        Err(e) => {
            warn!("Cannot build section matcher for '{}': {}", heading, e);
            return None;
        }
    };

    let start = lines
        .iter()
        .position(|line| section_re.is_match(line.trim()))?;
    let level = heading_level(lines[start].trim());
    debug!("Found section starting at line {}", start + 1);

    let end = lines[start + 1..]
        .iter()
        .position(|line| {
            let trimmed = line.trim();
            trimmed.starts_with('#') && heading_level(trimmed) <= level
        })
        .map(|offset| start + 1 + offset)
        .unwrap_or(lines.len());
    debug!("Section ends before line {}", end + 1);

    Some(SectionBound {
        start_line: start,
        end_line: end,
    })
}

/// Compile the search pattern, honouring case sensitivity
pub fn compile_pattern(pattern: &str, case_sensitive: bool) -> ExtractResult<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(!case_sensitive)
        .build()
        .map_err(|e| ExtractError::Pattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })
}

/// Find every line matching `query.pattern` and slice its context window
///
/// Each matching line yields one record carrying the first match on that
/// line. Windows of neighbouring matches may overlap and are not merged.
///
/// When `within_section` names a heading that does not exist, the whole
/// document is searched instead of failing or returning nothing.
pub fn find_and_extract(text: &str, query: &SearchQuery) -> ExtractResult<Vec<SearchMatch>> {
    debug!("Searching for pattern: {}", query.pattern);
    debug!(
        "Case sensitive: {}, Context: {} before, {} after",
        query.case_sensitive, query.lines_before, query.lines_after
    );

    let lines = split_lines(text);

    // An empty heading name selects no section
    let heading = query.within_section.as_deref().filter(|h| !h.is_empty());
    let section = heading.and_then(|heading| {
        debug!("Limiting search to section: {}", heading);
        let bound = resolve_section(&lines, heading);
        if bound.is_none() {
            warn!(
                "Section '{}' not found, searching entire document",
                heading
            );
        }
        bound
    });

    let regex = compile_pattern(&query.pattern, query.case_sensitive)?;

    let mut matches = Vec::new();
    for (index, line) in lines.iter().enumerate() {
        if section.is_some_and(|bound| !bound.contains(index)) {
            continue;
        }

        let Some(found) = regex.find(line) else {
            continue;
        };

        let start = index.saturating_sub(query.lines_before);
        let end = lines
            .len()
            .min(index.saturating_add(1).saturating_add(query.lines_after));
        let context_lines = lines[start..end].iter().map(|l| l.to_string()).collect();

        matches.push(SearchMatch::new(found.as_str(), index + 1, context_lines));
    }

    debug!("Found {} matches", matches.len());
    Ok(matches)
}

/// Run pattern search on a file
pub fn run_search(path: &Path, query: SearchQuery, config: &RunConfig) -> Result<Status> {
    info!("Searching for pattern: {}", query.pattern);
    if let Some(section) = query.within_section.as_deref().filter(|s| !s.is_empty()) {
        info!("Limiting search to section: {}", section);
    }

    let text = read_markdown(path)?;
    let matches = find_and_extract(&text, &query)?;

    let report = Report::new(
        path.display().to_string(),
        Parameters::Search(query),
        Results::Matches(matches),
    );
    deliver(&report, config)
}
