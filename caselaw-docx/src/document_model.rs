//! Output document model
//!
//! The converter turns the source node tree into a flat list of
//! [`DocumentElement`]s which the border number post-processor then nests.
//! Every element renders itself to inline-styled HTML markup.

use crate::diagnostics::Diagnostics;

// Submodules
mod border_number;
mod image;
mod numbering;
mod paragraph;
mod table;

// Re-export public types
pub use border_number::BorderNumber;
pub use image::{FloatSide, ImageElement};
pub use numbering::{
    NumberFormat, NumberingList, NumberingListEntry, NumberingListEntryIndex, NumberingSuffix,
};
pub use paragraph::{Alignment, ParagraphElement, RunElement, TextElement, VerticalAlign};
pub use table::{
    BorderLine, CellBorder, CellBorders, Conformance, Side, TableCellElement, TableElement,
    TableRowElement,
};

/// Color used for visible error markers
const ERROR_COLOR: &str = "#FF0000";

/// A node of the output tree
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentElement {
    /// A paragraph of runs
    Paragraph(ParagraphElement),
    /// A table
    Table(TableElement),
    /// Consecutive list entries grouped by the post-processor
    NumberingList(NumberingList),
    /// A paragraph carrying list numbering, before grouping
    NumberingListEntry(NumberingListEntry),
    /// A marginal paragraph number with its nested content
    BorderNumber(BorderNumber),
    /// A visible marker for content that could not be converted
    Error(ErrorElement),
}

impl DocumentElement {
    /// Render the element as HTML
    pub fn to_html(&self) -> String {
        match self {
            DocumentElement::Paragraph(paragraph) => paragraph.to_html(),
            DocumentElement::Table(table) => table.to_html(),
            DocumentElement::NumberingList(list) => list.to_html(),
            DocumentElement::NumberingListEntry(entry) => {
                NumberingList::new(vec![entry.clone()]).to_html()
            }
            DocumentElement::BorderNumber(border_number) => border_number.to_html(),
            DocumentElement::Error(error) => format!("<p>{}</p>", error.to_html()),
        }
    }

    /// The paragraph this element stands for, if any
    ///
    /// A single-entry numbering list counts as its paragraph.
    pub fn as_paragraph(&self) -> Option<&ParagraphElement> {
        match self {
            DocumentElement::Paragraph(paragraph) => Some(paragraph),
            DocumentElement::NumberingListEntry(entry) => Some(&entry.paragraph),
            DocumentElement::NumberingList(list) if list.entries.len() == 1 => {
                Some(&list.entries[0].paragraph)
            }
            _ => None,
        }
    }
}

/// Inline marker for an unrecognised or unconvertible construct
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorElement {
    /// Text shown in the marker, usually the source type name
    pub message: String,
}

impl ErrorElement {
    /// Create an error marker
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Render as a red inline span
    pub fn to_html(&self) -> String {
        format!(
            "<span style=\"color: {};\">{}</span>",
            ERROR_COLOR,
            escape_html(&self.message)
        )
    }
}

/// Result of converting one document
#[derive(Debug, Clone, Default)]
pub struct ConvertedDocument {
    /// Top-level elements after post-processing
    pub elements: Vec<DocumentElement>,
    /// Unhandled elements and warnings collected during conversion
    pub diagnostics: Diagnostics,
}

impl ConvertedDocument {
    /// Render all elements as one HTML fragment
    pub fn to_html_string(&self) -> String {
        self.elements.iter().map(DocumentElement::to_html).collect()
    }

    /// Number of border numbers at top level
    pub fn border_number_count(&self) -> usize {
        self.elements
            .iter()
            .filter(|e| matches!(e, DocumentElement::BorderNumber(_)))
            .count()
    }
}

/// Escape text for HTML content and attribute values
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
