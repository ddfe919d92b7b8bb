//! Source model: the logical OOXML node tree
//!
//! This module defines the structures the loader produces from a `.docx`
//! package and the converter consumes: the body content (paragraphs, runs,
//! tables, drawings) plus the document-scoped registries for named styles,
//! numbering definitions and embedded images. Registries are read-only once
//! loaded and may be shared between conversions.

// Submodules
mod drawing;
mod images;
mod numbering;
mod paragraph;
mod run;
mod styles;
mod table;

// Re-export public types
pub use drawing::{
    AnchorImage, Drawing, DrawingItem, Extent, GraphicData, HorizontalPosition, InlineImage,
    Picture, PictureItem, VmlShape, Wrap,
};
pub use images::{ImagePart, ImageRegistry};
pub use numbering::{AbstractNumbering, LevelDefinition, NumberingInstance, NumberingRegistry};
pub use paragraph::{
    BodyElement, Hyperlink, Indentation, NumberingReference, Paragraph, ParagraphContent,
    ParagraphProperties,
};
pub use run::{Run, RunContent, RunProperties};
pub use styles::{NamedStyle, StyleKind, StyleRegistry, TableStyleOverride};
pub use table::{
    Border, BorderSet, CellWidth, Shading, Table, TableCell, TableCellProperties, TableLook,
    TableProperties, TableRow, TableRowProperties,
};

/// A loaded word-processing package
#[derive(Debug, Clone, Default)]
pub struct DocxPackage {
    /// Top-level body content in document order
    pub body: Vec<BodyElement>,

    /// Named styles keyed by style id
    pub styles: StyleRegistry,

    /// Numbering definitions keyed by numbering id
    pub numbering: NumberingRegistry,

    /// Embedded image parts keyed by relationship id
    pub images: ImageRegistry,
}

impl DocxPackage {
    /// Create a package from body content with empty registries
    pub fn from_body(body: Vec<BodyElement>) -> Self {
        Self {
            body,
            ..Self::default()
        }
    }
}
