//! Body-level content: paragraphs, hyperlinks and unknown nodes

use super::run::{Run, RunContent};
use super::table::Table;

/// A top-level (or table cell level) content node
#[derive(Debug, Clone)]
pub enum BodyElement {
    /// A `w:p` paragraph
    Paragraph(Paragraph),

    /// A `w:tbl` table
    Table(Table),

    /// Any other node, carrying its element name
    Other(String),
}

impl BodyElement {
    /// Source element name, used in diagnostics
    pub fn type_name(&self) -> &str {
        match self {
            BodyElement::Paragraph(_) => "p",
            BodyElement::Table(_) => "tbl",
            BodyElement::Other(name) => name,
        }
    }
}

/// A paragraph with its properties and inline content
#[derive(Debug, Clone, Default)]
pub struct Paragraph {
    /// Paragraph properties (`w:pPr`)
    pub properties: Option<ParagraphProperties>,

    /// Runs, hyperlinks and other inline nodes in source order
    pub content: Vec<ParagraphContent>,
}

impl Paragraph {
    /// Create a paragraph from runs without properties
    pub fn from_runs(runs: Vec<Run>) -> Self {
        Self {
            properties: None,
            content: runs.into_iter().map(ParagraphContent::Run).collect(),
        }
    }

    /// Named style id referenced by the paragraph
    pub fn style_id(&self) -> Option<&str> {
        self.properties.as_ref()?.style.as_deref()
    }

    /// Whether the paragraph has at least one direct run
    pub fn has_runs(&self) -> bool {
        self.content
            .iter()
            .any(|c| matches!(c, ParagraphContent::Run(_)))
    }

    /// Concatenated text of all direct runs
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|c| match c {
                ParagraphContent::Run(run) => Some(run),
                _ => None,
            })
            .flat_map(|run| run.content.iter())
            .filter_map(|c| match c {
                RunContent::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// Inline content of a paragraph
#[derive(Debug, Clone)]
pub enum ParagraphContent {
    /// A `w:r` run
    Run(Run),

    /// A `w:hyperlink` wrapper
    Hyperlink(Hyperlink),

    /// Any other node, carrying its element name
    Other(String),
}

/// A hyperlink wrapper around runs
#[derive(Debug, Clone, Default)]
pub struct Hyperlink {
    /// Relationship id of an external target
    pub relationship_id: Option<String>,

    /// Bookmark name of an internal target
    pub anchor: Option<String>,

    /// Wrapped content
    pub content: Vec<ParagraphContent>,
}

/// Paragraph properties (`w:pPr`)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParagraphProperties {
    /// Named paragraph style id (`w:pStyle`)
    pub style: Option<String>,

    /// Raw justification value (`w:jc`), e.g. `both`
    pub justification: Option<String>,

    /// Indentation (`w:ind`)
    pub indentation: Option<Indentation>,

    /// List numbering reference (`w:numPr`)
    pub numbering: Option<NumberingReference>,

    /// Keep with next paragraph (`w:keepNext`)
    pub keep_next: bool,

    /// Line spacing in 240ths of a line or twips (`w:spacing/@w:line`)
    pub line_spacing: Option<i64>,

    /// Whether the paragraph is placed in a text frame (`w:framePr`)
    pub frame: bool,
}

/// Paragraph indentation in twips
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Indentation {
    /// Left (start) indentation
    pub left: Option<i64>,

    /// Hanging indentation
    pub hanging: Option<i64>,

    /// First line indentation
    pub first_line: Option<i64>,
}

/// Reference from a paragraph to a numbering definition
///
/// Both values are kept as written so malformed input can be handled by
/// the converter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NumberingReference {
    /// Numbering id (`w:numId`)
    pub num_id: Option<String>,

    /// Level (`w:ilvl`)
    pub level: Option<String>,
}
