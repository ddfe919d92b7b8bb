//! Numbering level resolution

use super::run::css_color;
use super::ConversionContext;
use crate::document_model::{NumberFormat, NumberingListEntryIndex, NumberingSuffix};
use crate::source_model::NumberingReference;

/// Resolve the level definition referenced by a paragraph
///
/// Returns `None` when the numbering id or the level is unknown. Picture
/// bullets are not supported and fall back to the default bullet glyph.
pub(crate) fn resolve_index(
    reference: &NumberingReference,
    ctx: &mut ConversionContext,
) -> Option<NumberingListEntryIndex> {
    let num_id = reference.num_id.as_deref()?;
    let written_level = reference.level.clone().unwrap_or_else(|| "0".to_string());
    let level = written_level.trim().parse::<u32>().unwrap_or(0);
    let definition = ctx.numbering.level(num_id, level)?;

    let mut index = NumberingListEntryIndex {
        format: definition
            .format
            .as_deref()
            .map(NumberFormat::parse)
            .unwrap_or_default(),
        suffix: definition
            .suffix
            .as_deref()
            .map(NumberingSuffix::parse)
            .unwrap_or(NumberingSuffix::Tab),
        justification: definition.justification.clone(),
        level_text: definition.text.clone().unwrap_or_default(),
        start: definition.start.unwrap_or(1),
        restart: definition.restart,
        legal: definition.legal,
        level: written_level,
        ..NumberingListEntryIndex::default()
    };

    if let Some(properties) = &definition.run_properties {
        index.color = properties.color.as_deref().and_then(css_color);
        index.font_size = properties.size.map(|half_points| half_points as f32 / 2.0);
        index.font_family = properties.font.clone();
    }

    if definition.picture_bullet_id.is_some() {
        ctx.diagnostics.warn(format!(
            "Picture bullets are not supported ({}, numbering {} level {}), using the default bullet",
            ctx.location, num_id, level
        ));
        index.format = NumberFormat::Bullet;
        index.font_family = None;
    }

    Some(index)
}
