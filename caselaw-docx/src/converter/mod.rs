//! Document conversion: source node tree to output elements
//!
//! [`DocumentConverter`] walks the top-level body content once, classifies
//! every paragraph as a border number, a list entry or a plain paragraph,
//! converts tables, and finally hands the flat element sequence to the
//! border number post-processor which groups list entries and nests
//! paragraphs under their border numbers.
//!
//! All per-document state lives in a [`ConversionContext`] created for one
//! call of [`DocumentConverter::convert`]. The registries of the package are
//! only read, so one package may be converted concurrently with others.

mod border_number;
mod classify;
mod hyphenation;
mod image;
mod numbering;
mod paragraph;
mod run;
mod table;

pub use border_number::{group_lists, nest_border_numbers, number_border_numbers, post_process};
pub use classify::{is_heuristic_border_number, ParagraphKind};
pub use hyphenation::reconstruct_hyphens;

use crate::converter_config::{ConverterConfig, NumberingFallback};
use crate::diagnostics::{Diagnostics, UnhandledKind};
use crate::document_model::{
    BorderNumber, ConvertedDocument, DocumentElement, ErrorElement, NumberingListEntry,
    NumberingListEntryIndex,
};
use crate::error::ConverterError;
use crate::source_model::{
    BodyElement, DocxPackage, ImageRegistry, NumberingRegistry, Paragraph, StyleRegistry,
};
use std::collections::BTreeSet;
use table::RegionStyle;

/// Converts loaded packages with one configuration
#[derive(Debug, Clone, Default)]
pub struct DocumentConverter {
    config: ConverterConfig,
}

impl DocumentConverter {
    /// Create a converter
    pub fn new(config: ConverterConfig) -> Self {
        Self { config }
    }

    /// The configuration in use
    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Convert a package into output elements
    ///
    /// # Parameters
    /// * `package` - Loaded package with body content and registries
    ///
    /// # Returns
    /// * `Ok(ConvertedDocument)` - Elements and diagnostics
    /// * `Err(ConverterError)` - A drawing violated a structural requirement
    pub fn convert(&self, package: &DocxPackage) -> Result<ConvertedDocument, ConverterError> {
        let mut ctx = ConversionContext::new(package, &self.config);
        let mut elements = Vec::with_capacity(package.body.len());

        for (index, element) in package.body.iter().enumerate() {
            let converted = match element {
                BodyElement::Paragraph(paragraph) => {
                    ctx.location = format!("paragraph {}", index + 1);
                    convert_top_level_paragraph(paragraph, &mut ctx)?
                }
                BodyElement::Table(table) => {
                    ctx.location = format!("table {}", index + 1);
                    DocumentElement::Table(table::convert_table(table, &mut ctx)?)
                }
                BodyElement::Other(name) => {
                    ctx.location = format!("body element {}", index + 1);
                    unhandled_block(name, UnhandledKind::Body, &mut ctx)
                }
            };
            elements.push(converted);
        }

        let elements = post_process(elements, &mut ctx.diagnostics);
        log::debug!(
            "Converted {} body elements into {} output elements",
            package.body.len(),
            elements.len()
        );

        Ok(ConvertedDocument {
            elements,
            diagnostics: ctx.diagnostics,
        })
    }
}

/// Convert a package with the given configuration
pub fn convert(
    package: &DocxPackage,
    config: &ConverterConfig,
) -> Result<ConvertedDocument, ConverterError> {
    DocumentConverter::new(config.clone()).convert(package)
}

/// Registries, configuration and mutable state of one conversion
pub(crate) struct ConversionContext<'a> {
    pub styles: &'a StyleRegistry,
    pub numbering: &'a NumberingRegistry,
    pub images: &'a ImageRegistry,
    pub config: &'a ConverterConfig,
    pub border_number_styles: BTreeSet<String>,
    pub diagnostics: Diagnostics,
    /// Label of the body element being converted, used in diagnostics
    pub location: String,
}

impl<'a> ConversionContext<'a> {
    pub fn new(package: &'a DocxPackage, config: &'a ConverterConfig) -> Self {
        Self {
            styles: &package.styles,
            numbering: &package.numbering,
            images: &package.images,
            config,
            border_number_styles: config.border_number_styles(),
            diagnostics: Diagnostics::new(),
            location: String::new(),
        }
    }
}

fn convert_top_level_paragraph(
    paragraph: &Paragraph,
    ctx: &mut ConversionContext,
) -> Result<DocumentElement, ConverterError> {
    let mut paragraph = paragraph.clone();
    reconstruct_hyphens(&mut paragraph);

    match classify::classify(&paragraph, ctx) {
        ParagraphKind::BorderNumber => {
            let numbering_id = paragraph
                .properties
                .as_ref()
                .and_then(|p| p.numbering.as_ref())
                .and_then(|n| n.num_id.clone());
            log::debug!("{} is a border number", ctx.location);
            Ok(DocumentElement::BorderNumber(BorderNumber::new(
                paragraph.text().trim(),
                numbering_id,
            )))
        }
        ParagraphKind::ListEntry(index) => list_entry(&paragraph, index, None, ctx),
        ParagraphKind::Plain => Ok(DocumentElement::Paragraph(paragraph::convert_paragraph(
            &paragraph, None, ctx,
        )?)),
    }
}

/// Convert a paragraph that cannot be a border number
fn convert_nested_paragraph(
    paragraph: &Paragraph,
    region: Option<&RegionStyle>,
    ctx: &mut ConversionContext,
) -> Result<DocumentElement, ConverterError> {
    let mut paragraph = paragraph.clone();
    reconstruct_hyphens(&mut paragraph);

    match list_index(&paragraph, ctx) {
        Some(index) => list_entry(&paragraph, index, region, ctx),
        None => Ok(DocumentElement::Paragraph(paragraph::convert_paragraph(
            &paragraph, region, ctx,
        )?)),
    }
}

fn list_entry(
    paragraph: &Paragraph,
    index: NumberingListEntryIndex,
    region: Option<&RegionStyle>,
    ctx: &mut ConversionContext,
) -> Result<DocumentElement, ConverterError> {
    Ok(DocumentElement::NumberingListEntry(NumberingListEntry {
        paragraph: paragraph::convert_paragraph(paragraph, region, ctx)?,
        index,
    }))
}

/// Resolve the list level of a numbered paragraph
///
/// Returns `None` for paragraphs without numbering, for numbering id `0`
/// (the number is part of the paragraph text) and, depending on the
/// configured fallback, for levels that cannot be resolved.
pub(crate) fn list_index(
    paragraph: &Paragraph,
    ctx: &mut ConversionContext,
) -> Option<NumberingListEntryIndex> {
    let reference = paragraph.properties.as_ref()?.numbering.as_ref()?;
    if reference.num_id.as_deref() == Some("0") {
        return None;
    }
    if let Some(index) = numbering::resolve_index(reference, ctx) {
        return Some(index);
    }
    match ctx.config.numbering_fallback() {
        NumberingFallback::AlwaysWrap => Some(NumberingListEntryIndex {
            level: reference.level.clone().unwrap_or_else(|| "0".to_string()),
            ..NumberingListEntryIndex::default()
        }),
        NumberingFallback::RequireLevelDefinition => None,
    }
}

/// Convert the content of a table cell
pub(crate) fn convert_cell_content(
    content: &[BodyElement],
    region: Option<&RegionStyle>,
    ctx: &mut ConversionContext,
) -> Result<Vec<DocumentElement>, ConverterError> {
    let mut elements = Vec::with_capacity(content.len());
    for element in content {
        let converted = match element {
            BodyElement::Paragraph(paragraph) => convert_nested_paragraph(paragraph, region, ctx)?,
            BodyElement::Table(table) => {
                DocumentElement::Table(table::convert_table(table, ctx)?)
            }
            BodyElement::Other(name) => unhandled_block(name, UnhandledKind::Table, ctx),
        };
        elements.push(converted);
    }
    Ok(group_lists(elements))
}

fn unhandled_block(name: &str, kind: UnhandledKind, ctx: &mut ConversionContext) -> DocumentElement {
    ctx.diagnostics.unhandled(ctx.location.clone(), name, kind);
    DocumentElement::Error(ErrorElement::new(name))
}
