//! Document model
//!
//! Folds the pulldown-cmark event stream into an arena of nodes rooted at a
//! document node whose children are the top-level blocks in source order.
//! Extractors only ever read the tree; walks are iterative so deeply nested
//! documents cannot exhaust the call stack.

use pulldown_cmark::{Event, Options, Parser, Tag};

use crate::core::error::Result;
use crate::core::file_reader::decode_utf8;

/// Index of a node inside its [`Document`]
pub type NodeId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Document,
    Heading,
    Paragraph,
    /// `**bold**`
    Strong,
    /// `*italic*`
    Emphasis,
    Text,
    Other,
}

#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    /// Heading level (1-6), headings only
    pub level: Option<u8>,
    pub children: Vec<NodeId>,
    /// Literal text carried by leaves (text, inline code, raw html, breaks)
    literal: Option<String>,
}

impl Node {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            level: None,
            children: Vec::new(),
            literal: None,
        }
    }

    fn leaf(kind: NodeKind, literal: impl Into<String>) -> Self {
        Self {
            literal: Some(literal.into()),
            ..Self::new(kind)
        }
    }

    pub fn is_heading(&self) -> bool {
        self.kind == NodeKind::Heading
    }
}

/// A parsed Markdown document
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Document {
    pub const ROOT: NodeId = 0;

    /// Build the tree for `text`
    ///
    /// Never fails: any input, including the empty string, yields a tree.
    pub fn parse(text: &str) -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);

        let mut builder = TreeBuilder::new();
        for (event, range) in Parser::new_ext(text, options).into_offset_iter() {
            builder.process_event(event, text.get(range).unwrap_or_default());
        }
        builder.finish()
    }

    /// Decode `bytes` as UTF-8 and build the tree
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        let text = decode_utf8(bytes)?;
        Ok(Self::parse(&text))
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    /// Top-level blocks in source order
    pub fn children(&self) -> &[NodeId] {
        &self.nodes[Self::ROOT].children
    }

    /// Concatenated text of all descendants of `id`, in document order
    ///
    /// Only leaf literals contribute, so a heading's text never includes its
    /// `#` markers.
    pub fn text(&self, id: NodeId) -> String {
        self.descendants(id)
            .filter_map(|n| self.nodes[n].literal.as_deref())
            .collect()
    }

    /// Pre-order walk of `id` and everything beneath it
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            doc: self,
            pending: vec![id],
        }
    }
}

/// Iterator returned by [`Document::descendants`]
pub struct Descendants<'a> {
    doc: &'a Document,
    pending: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.pending.pop()?;
        self.pending
            .extend(self.doc.nodes[id].children.iter().rev().copied());
        Some(id)
    }
}

/// Whether a heading's source starts with `#`, past any quote markers
fn is_atx(source: &str) -> bool {
    source
        .trim_start_matches(|c: char| c == '>' || c.is_whitespace())
        .starts_with('#')
}

/// Tracks the chain of open nodes while consuming events
struct TreeBuilder {
    nodes: Vec<Node>,
    open: Vec<NodeId>,
}

impl TreeBuilder {
    fn new() -> Self {
        Self {
            nodes: vec![Node::new(NodeKind::Document)],
            open: vec![Document::ROOT],
        }
    }

    fn attach(&mut self, node: Node) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(node);
        let parent = self.open.last().copied().unwrap_or(Document::ROOT);
        self.nodes[parent].children.push(id);
        id
    }

    /// `source` is the slice of input the event was parsed from
    fn process_event(&mut self, event: Event, source: &str) {
        match event {
            Event::Start(tag) => {
                let node = match tag {
                    // Only `#` headings open sections; setext underlines stay paragraphs
                    Tag::Heading { level, .. } if is_atx(source) => Node {
                        level: Some(level as u8),
                        ..Node::new(NodeKind::Heading)
                    },
                    Tag::Heading { .. } => Node::new(NodeKind::Paragraph),
                    Tag::Paragraph => Node::new(NodeKind::Paragraph),
                    Tag::Strong => Node::new(NodeKind::Strong),
                    Tag::Emphasis => Node::new(NodeKind::Emphasis),
                    _ => Node::new(NodeKind::Other),
                };
                let id = self.attach(node);
                self.open.push(id);
            }
            Event::End(_) => {
                // The root stays open
                if self.open.len() > 1 {
                    self.open.pop();
                }
            }
            Event::Text(text)
            | Event::Code(text)
            | Event::InlineMath(text)
            | Event::DisplayMath(text) => {
                self.attach(Node::leaf(NodeKind::Text, text.into_string()));
            }
            Event::Html(html) | Event::InlineHtml(html) => {
                self.attach(Node::leaf(NodeKind::Other, html.into_string()));
            }
            Event::SoftBreak | Event::HardBreak => {
                self.attach(Node::leaf(NodeKind::Text, "\n"));
            }
            _ => {
                self.attach(Node::new(NodeKind::Other));
            }
        }
    }

    fn finish(self) -> Document {
        Document { nodes: self.nodes }
    }
}
