//! Named style registry (`word/styles.xml`)

use super::paragraph::ParagraphProperties;
use super::run::RunProperties;
use super::table::{BorderSet, TableCellProperties, TableProperties};
use std::collections::HashMap;

/// Upper bound on `basedOn` chain length, guards against cycles
const MAX_STYLE_DEPTH: usize = 16;

/// Kind of a named style (`w:style/@w:type`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StyleKind {
    #[default]
    Paragraph,
    Character,
    Table,
    Numbering,
    Other,
}

impl StyleKind {
    /// Parse the `w:type` attribute value
    pub fn parse(value: &str) -> Self {
        match value {
            "paragraph" => StyleKind::Paragraph,
            "character" => StyleKind::Character,
            "table" => StyleKind::Table,
            "numbering" => StyleKind::Numbering,
            _ => StyleKind::Other,
        }
    }
}

/// A named style definition
#[derive(Debug, Clone, Default)]
pub struct NamedStyle {
    /// Style id referenced from `w:pStyle`, `w:rStyle` and `w:tblStyle`
    pub id: String,
    /// Display name
    pub name: Option<String>,
    /// Style kind
    pub kind: StyleKind,
    /// Parent style id
    pub based_on: Option<String>,
    /// `w:pPr`
    pub paragraph_properties: Option<ParagraphProperties>,
    /// `w:rPr`
    pub run_properties: Option<RunProperties>,
    /// `w:tblPr` of table styles
    pub table_properties: Option<TableProperties>,
    /// `w:tcPr` of table styles
    pub cell_properties: Option<TableCellProperties>,
    /// `w:tblStylePr` conditional blocks of table styles
    pub region_overrides: Vec<TableStyleOverride>,
}

/// A conditional formatting block of a table style (`w:tblStylePr`)
#[derive(Debug, Clone, Default)]
pub struct TableStyleOverride {
    /// Raw region type, e.g. `firstRow` or `band1Horz`
    pub region: String,
    /// `w:pPr`
    pub paragraph_properties: Option<ParagraphProperties>,
    /// `w:rPr`
    pub run_properties: Option<RunProperties>,
    /// `w:tcPr`
    pub cell_properties: Option<TableCellProperties>,
}

/// All named styles of a document keyed by style id
#[derive(Debug, Clone, Default)]
pub struct StyleRegistry {
    styles: HashMap<String, NamedStyle>,
}

impl StyleRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a style
    pub fn insert(&mut self, style: NamedStyle) {
        self.styles.insert(style.id.clone(), style);
    }

    /// Look up a style by id
    pub fn get(&self, id: &str) -> Option<&NamedStyle> {
        self.styles.get(id)
    }

    /// Number of registered styles
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// The style and its `basedOn` ancestors, nearest first
    ///
    /// Unknown ids yield an empty chain.
    fn chain(&self, id: &str) -> Vec<&NamedStyle> {
        let mut chain: Vec<&NamedStyle> = Vec::new();
        let mut next = self.styles.get(id);
        while let Some(style) = next {
            if chain.len() >= MAX_STYLE_DEPTH || chain.iter().any(|s| s.id == style.id) {
                break;
            }
            chain.push(style);
            next = style
                .based_on
                .as_deref()
                .and_then(|parent| self.styles.get(parent));
        }
        chain
    }

    /// Run properties of a style with inherited values filled in
    pub fn run_properties(&self, id: &str) -> Option<RunProperties> {
        let mut resolved: Option<RunProperties> = None;
        for style in self.chain(id) {
            if let Some(props) = &style.run_properties {
                match resolved.as_mut() {
                    Some(current) => current.fill_from(props),
                    None => resolved = Some(props.clone()),
                }
            }
        }
        resolved
    }

    /// Justification of a paragraph style, inherited if unset
    pub fn justification(&self, id: &str) -> Option<String> {
        self.chain(id).into_iter().find_map(|style| {
            style
                .paragraph_properties
                .as_ref()
                .and_then(|p| p.justification.clone())
        })
    }

    /// Table-wide borders of a table style, inherited if unset
    pub fn table_borders(&self, id: &str) -> Option<BorderSet> {
        self.chain(id).into_iter().find_map(|style| {
            style
                .table_properties
                .as_ref()
                .and_then(|t| t.borders.clone())
        })
    }

    /// Conditional blocks of a table style
    ///
    /// A region defined on the style itself hides the same region on its
    /// ancestors.
    pub fn region_overrides(&self, id: &str) -> Vec<&TableStyleOverride> {
        let mut overrides: Vec<&TableStyleOverride> = Vec::new();
        for style in self.chain(id) {
            for region in &style.region_overrides {
                if !overrides.iter().any(|o| o.region == region.region) {
                    overrides.push(region);
                }
            }
        }
        overrides
    }
}
