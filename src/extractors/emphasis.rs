//! Emphasis extraction - Bold and italic spans with their heading context

use anyhow::Result;
use std::path::Path;
use tracing::{debug, info};

use crate::core::file_reader::read_source;
use crate::core::model::{
    EmphasisKind, EmphasisQuery, EmphasisRecord, Parameters, Report, Results, Status,
};
use crate::document::{Document, NodeKind};
use crate::extractors::{deliver, RunConfig};

/// A heading whose section is still open during a walk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenHeading {
    pub level: u8,
    pub text: String,
}

/// Chain of open sections, outermost first
///
/// Levels strictly increase from bottom to top: entering a heading closes
/// every open section at the same or a deeper level.
#[derive(Debug, Clone, Default)]
pub struct HeadingStack {
    entries: Vec<OpenHeading>,
}

impl HeadingStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enter(&mut self, level: u8, text: impl Into<String>) {
        while self.entries.last().is_some_and(|h| h.level >= level) {
            self.entries.pop();
        }
        self.entries.push(OpenHeading {
            level,
            text: text.into(),
        });
    }

    /// Text of the innermost open heading
    pub fn innermost(&self) -> Option<&str> {
        self.entries.last().map(|h| h.text.as_str())
    }

    /// Whether any open heading contains `needle`, which must already be lowercase
    pub fn any_contains(&self, needle: &str) -> bool {
        self.entries
            .iter()
            .any(|h| h.text.to_lowercase().contains(needle))
    }

    pub fn entries(&self) -> &[OpenHeading] {
        &self.entries
    }
}

/// Collect bold/italic spans from the whole tree in document order
///
/// With a heading filter, a span is kept when the filter appears in any
/// enclosing heading, so filtering by a section also yields its subsections.
pub fn extract_emphasized(doc: &Document, query: &EmphasisQuery) -> Vec<EmphasisRecord> {
    debug!("Extracting emphasized text (type: {})", query.filter.as_str());
    // An empty filter matches everything, including spans before any heading
    let needle = query
        .heading_filter
        .as_deref()
        .filter(|f| !f.is_empty())
        .map(str::to_lowercase);
    if let Some(filter) = &needle {
        debug!("Filtering by heading: {}", filter);
    }

    let mut stack = HeadingStack::new();
    let mut found = Vec::new();

    for id in doc.descendants(Document::ROOT) {
        let node = doc.node(id);
        let kind = match node.kind {
            NodeKind::Heading => {
                let text = doc.text(id).trim().to_string();
                let level = node.level.unwrap_or(1);
                debug!("Entering heading section: {} (level {})", text, level);
                stack.enter(level, text);
                debug!(depth = stack.entries().len(), "Heading stack updated");
                continue;
            }
            NodeKind::Strong => EmphasisKind::Bold,
            NodeKind::Emphasis => EmphasisKind::Italic,
            _ => continue,
        };

        if !query.filter.accepts(kind) {
            continue;
        }
        if let Some(needle) = &needle {
            if !stack.any_contains(needle) {
                continue;
            }
        }

        found.push(EmphasisRecord {
            kind,
            text: doc.text(id),
            heading_context: stack.innermost().map(str::to_string),
        });
    }

    debug!("Found {} emphasized text items", found.len());
    found
}

/// Run emphasis extraction on a file
pub fn run_emphasized(path: &Path, query: EmphasisQuery, config: &RunConfig) -> Result<Status> {
    info!("Extracting {} emphasized text...", query.filter.as_str());

    let doc = Document::from_bytes(read_source(path)?)?;
    let items = extract_emphasized(&doc, &query);

    let report = Report::new(
        path.display().to_string(),
        Parameters::Emphasis(query),
        Results::Emphasis(items),
    );
    deliver(&report, config)
}
