//! Paragraph classification

use super::ConversionContext;
use crate::document_model::NumberingListEntryIndex;
use crate::source_model::{Paragraph, ParagraphProperties};

/// Line spacing of a single-spaced paragraph in 240ths of a line
const SINGLE_LINE_SPACING: i64 = 240;

/// What a top-level paragraph turns into
#[derive(Debug, Clone, PartialEq)]
pub enum ParagraphKind {
    /// A border number (Randnummer)
    BorderNumber,
    /// A list entry with its resolved level
    ListEntry(NumberingListEntryIndex),
    /// An ordinary paragraph
    Plain,
}

/// Classify a top-level paragraph, first match wins
pub(crate) fn classify(paragraph: &Paragraph, ctx: &mut ConversionContext) -> ParagraphKind {
    if is_border_number(paragraph, ctx) {
        return ParagraphKind::BorderNumber;
    }
    match super::list_index(paragraph, ctx) {
        Some(index) => ParagraphKind::ListEntry(index),
        None => ParagraphKind::Plain,
    }
}

fn is_border_number(paragraph: &Paragraph, ctx: &ConversionContext) -> bool {
    if !paragraph.has_runs() {
        return false;
    }
    let Some(properties) = &paragraph.properties else {
        return false;
    };
    match properties.style.as_deref() {
        Some(style) if ctx.border_number_styles.contains(style) => true,
        Some(style) if style == ctx.config.framed_border_number_style && properties.frame => true,
        _ => is_heuristic_border_number(properties, &paragraph.text()),
    }
}

/// Border number without a recognised style
///
/// All three markers are required: keep with next, single line spacing and
/// text that is a plain integer.
pub fn is_heuristic_border_number(properties: &ParagraphProperties, text: &str) -> bool {
    properties.keep_next
        && properties.line_spacing == Some(SINGLE_LINE_SPACING)
        && text.parse::<i32>().is_ok()
}
