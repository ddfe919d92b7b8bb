//! Table conversion
//!
//! Borders are resolved per cell edge. Table-wide inside borders and table
//! style regions are inherited, the cell's own borders are declared and
//! always win. Inherited borders on the outer edges of the table are
//! removed afterwards, the table draws its outer border itself.

use super::{convert_cell_content, ConversionContext};
use crate::diagnostics::Diagnostics;
use crate::document_model::{
    Alignment, BorderLine, CellBorders, Conformance, Side, TableCellElement, TableElement,
    TableRowElement,
};
use crate::error::ConverterError;
use crate::source_model::{
    Border, BorderSet, RunProperties, Shading, Table, TableCell, TableLook, TableStyleOverride,
};
use crate::units::{point_to_pixel, twip_to_pixel};

/// Border width in eighths of a point when none is declared
const DEFAULT_BORDER_SIZE: u32 = 4;

/// Table style regions from lowest to highest priority
///
/// `None` marks the whole table region which applies to every cell.
const REGION_PRIORITY: [(&str, Option<Conformance>); 13] = [
    ("wholeTable", None),
    ("band1Vert", Some(Conformance::ODD_V_BAND)),
    ("band2Vert", Some(Conformance::EVEN_V_BAND)),
    ("band1Horz", Some(Conformance::ODD_H_BAND)),
    ("band2Horz", Some(Conformance::EVEN_H_BAND)),
    ("firstCol", Some(Conformance::FIRST_COLUMN)),
    ("lastCol", Some(Conformance::LAST_COLUMN)),
    ("firstRow", Some(Conformance::FIRST_ROW)),
    ("lastRow", Some(Conformance::LAST_ROW)),
    ("nwCell", Some(Conformance::FIRST_ROW_FIRST_COLUMN)),
    ("neCell", Some(Conformance::FIRST_ROW_LAST_COLUMN)),
    ("swCell", Some(Conformance::LAST_ROW_FIRST_COLUMN)),
    ("seCell", Some(Conformance::LAST_ROW_LAST_COLUMN)),
];

// `w:tblLook/@w:val` bits
const LOOK_FIRST_ROW: u16 = 0x0020;
const LOOK_LAST_ROW: u16 = 0x0040;
const LOOK_FIRST_COLUMN: u16 = 0x0080;
const LOOK_LAST_COLUMN: u16 = 0x0100;
const LOOK_NO_H_BAND: u16 = 0x0200;
const LOOK_NO_V_BAND: u16 = 0x0400;

/// Paragraph and run formatting a table style region gives a cell
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct RegionStyle {
    pub run_properties: Option<RunProperties>,
    pub alignment: Option<Alignment>,
}

impl RegionStyle {
    /// Merge a higher priority region's run properties
    fn merge_run_properties(&mut self, properties: &RunProperties) {
        let mut merged = properties.clone();
        if let Some(lower) = &self.run_properties {
            merged.fill_from(lower);
        }
        self.run_properties = Some(merged);
    }
}

/// A table style region with the conformance bit it requires
struct Region<'s> {
    bit: Option<Conformance>,
    style: &'s TableStyleOverride,
}

/// Table-wide data shared by all cells
struct TableLayout<'s> {
    column_widths: Vec<i64>,
    borders: Option<BorderSet>,
    regions: Vec<Region<'s>>,
    look: Conformance,
}

/// Where a cell sits in the table
#[derive(Debug, Clone, Copy)]
struct CellPosition {
    column: usize,
    first_row: bool,
    last_row: bool,
    first_column: bool,
    last_column: bool,
}

/// Convert a table
pub(crate) fn convert_table(
    table: &Table,
    ctx: &mut ConversionContext,
) -> Result<TableElement, ConverterError> {
    let styles = ctx.styles;
    let properties = table.properties.clone().unwrap_or_default();
    let style_id = properties.style.as_deref();

    let layout = TableLayout {
        column_widths: table.grid.iter().map(|w| twip_to_pixel(*w)).collect(),
        borders: properties
            .borders
            .clone()
            .or_else(|| style_id.and_then(|id| styles.table_borders(id))),
        regions: style_id
            .map(|id| ordered_regions(styles.region_overrides(id), &mut ctx.diagnostics))
            .unwrap_or_default(),
        look: look_mask(properties.look.as_ref()),
    };

    let mut element = TableElement {
        column_widths: layout.column_widths.clone(),
        ..TableElement::default()
    };
    if let Some(borders) = &layout.borders {
        for (side, border) in outer_sides(borders) {
            let line = border_line(border, &mut ctx.diagnostics);
            element.style.set(side.css_property(), line.to_css());
        }
    }
    if let Some(color) = properties
        .shading
        .as_ref()
        .and_then(|s| shading_color(s, &mut ctx.diagnostics))
    {
        element.style.set("background-color", color);
    }

    let row_count = table.rows.len();
    for (row_index, row) in table.rows.iter().enumerate() {
        let row_conformance = row
            .properties
            .as_ref()
            .and_then(|p| p.conformance.as_deref())
            .and_then(Conformance::parse);
        let cell_count = row.cells.len();
        let mut cells = Vec::with_capacity(cell_count);
        let mut column = 0;

        for (cell_index, cell) in row.cells.iter().enumerate() {
            let position = CellPosition {
                column,
                first_row: row_index == 0,
                last_row: row_index + 1 == row_count,
                first_column: cell_index == 0,
                last_column: cell_index + 1 == cell_count,
            };
            let converted = convert_cell(cell, row_conformance, position, &layout, ctx)?;
            column += converted.column_span as usize;
            cells.push(converted);
        }
        element.rows.push(TableRowElement { cells });
    }

    Ok(element)
}

fn convert_cell(
    cell: &TableCell,
    row_conformance: Option<Conformance>,
    position: CellPosition,
    layout: &TableLayout,
    ctx: &mut ConversionContext,
) -> Result<TableCellElement, ConverterError> {
    let properties = cell.properties.clone().unwrap_or_default();
    let cell_conformance = properties
        .conformance
        .as_deref()
        .and_then(Conformance::parse);
    let conformance = match (row_conformance, cell_conformance) {
        (None, None) => None,
        (row, cell) => Some((row.unwrap_or_default() | cell.unwrap_or_default()) & layout.look),
    };

    let column_span = properties.grid_span.unwrap_or(1).max(1);
    let width = match &properties.width {
        Some(width) if width.kind.as_deref() == Some("dxa") => Some(twip_to_pixel(width.value)),
        _ if position.column < layout.column_widths.len() => Some(
            layout
                .column_widths
                .iter()
                .skip(position.column)
                .take(column_span as usize)
                .sum(),
        ),
        _ => None,
    };

    let mut borders = CellBorders::default();
    if let Some(set) = &layout.borders {
        let inner = [
            (Side::Top, !position.first_row, &set.inside_h),
            (Side::Bottom, !position.last_row, &set.inside_h),
            (Side::Left, !position.first_column, &set.inside_v),
            (Side::Right, !position.last_column, &set.inside_v),
        ];
        for (side, applies, border) in inner {
            if let (true, Some(border)) = (applies, border) {
                borders.inherit(side, border_line(border, &mut ctx.diagnostics));
            }
        }
    }

    let mut region_style = RegionStyle::default();
    let mut background = None;
    let mut vertical_align = None;

    for region in &layout.regions {
        let applies = match region.bit {
            None => true,
            Some(bit) => conformance.is_some_and(|c| c.contains(bit)),
        };
        if !applies {
            continue;
        }
        if let Some(cell_properties) = &region.style.cell_properties {
            if let Some(set) = &cell_properties.borders {
                for (side, border) in outer_sides(set) {
                    borders.inherit(side, border_line(border, &mut ctx.diagnostics));
                }
            }
            if let Some(shading) = &cell_properties.shading {
                background = shading_color(shading, &mut ctx.diagnostics);
            }
            if let Some(align) = &cell_properties.vertical_align {
                vertical_align = Some(align.clone());
            }
        }
        if let Some(run_properties) = &region.style.run_properties {
            region_style.merge_run_properties(run_properties);
        }
        if let Some(alignment) = region
            .style
            .paragraph_properties
            .as_ref()
            .and_then(|p| p.justification.as_deref())
            .and_then(Alignment::from_justification)
        {
            region_style.alignment = Some(alignment);
        }
    }

    if let Some(set) = &properties.borders {
        for (side, border) in outer_sides(set) {
            borders.declare(side, border_line(border, &mut ctx.diagnostics));
        }
    }
    if let Some(shading) = &properties.shading {
        background = shading_color(shading, &mut ctx.diagnostics);
    }
    if let Some(align) = &properties.vertical_align {
        vertical_align = Some(align.clone());
    }

    let outer = [
        (Side::Top, position.first_row),
        (Side::Bottom, position.last_row),
        (Side::Left, position.first_column),
        (Side::Right, position.last_column),
    ];
    for (side, on_edge) in outer {
        if on_edge {
            borders.clear_inherited(side);
        }
    }

    let content = convert_cell_content(&cell.content, Some(&region_style), ctx)?;

    Ok(TableCellElement {
        content,
        column_span,
        width,
        borders,
        background_color: background,
        vertical_align: vertical_align.map(|v| css_vertical_align(&v)),
        conformance,
    })
}

/// Known regions of a table style, sorted by priority
fn ordered_regions<'s>(
    overrides: Vec<&'s TableStyleOverride>,
    diagnostics: &mut Diagnostics,
) -> Vec<Region<'s>> {
    let mut regions: Vec<(usize, Region<'s>)> = Vec::new();
    for style in overrides {
        match REGION_PRIORITY
            .iter()
            .position(|(name, _)| *name == style.region)
        {
            Some(priority) => regions.push((
                priority,
                Region {
                    bit: REGION_PRIORITY[priority].1,
                    style,
                },
            )),
            None => diagnostics.warn(format!(
                "Unsupported table style region '{}' ignored",
                style.region
            )),
        }
    }
    regions.sort_by_key(|(priority, _)| *priority);
    regions.into_iter().map(|(_, region)| region).collect()
}

/// Regions enabled by `w:tblLook`; everything is enabled without one
fn look_mask(look: Option<&TableLook>) -> Conformance {
    let Some(look) = look else {
        return Conformance::all();
    };
    let bits = look
        .value
        .as_deref()
        .and_then(|v| u16::from_str_radix(v, 16).ok())
        .unwrap_or(0);
    let flag = |explicit: Option<bool>, bit: u16| explicit.unwrap_or(bits & bit != 0);

    let first_row = flag(look.first_row, LOOK_FIRST_ROW);
    let last_row = flag(look.last_row, LOOK_LAST_ROW);
    let first_column = flag(look.first_column, LOOK_FIRST_COLUMN);
    let last_column = flag(look.last_column, LOOK_LAST_COLUMN);
    let no_h_band = flag(look.no_h_band, LOOK_NO_H_BAND);
    let no_v_band = flag(look.no_v_band, LOOK_NO_V_BAND);

    let mut mask = Conformance::all();
    mask.set(Conformance::FIRST_ROW, first_row);
    mask.set(Conformance::LAST_ROW, last_row);
    mask.set(Conformance::FIRST_COLUMN, first_column);
    mask.set(Conformance::LAST_COLUMN, last_column);
    mask.set(
        Conformance::ODD_H_BAND | Conformance::EVEN_H_BAND,
        !no_h_band,
    );
    mask.set(
        Conformance::ODD_V_BAND | Conformance::EVEN_V_BAND,
        !no_v_band,
    );
    mask.set(
        Conformance::FIRST_ROW_FIRST_COLUMN,
        first_row && first_column,
    );
    mask.set(Conformance::FIRST_ROW_LAST_COLUMN, first_row && last_column);
    mask.set(Conformance::LAST_ROW_FIRST_COLUMN, last_row && first_column);
    mask.set(Conformance::LAST_ROW_LAST_COLUMN, last_row && last_column);
    mask
}

/// The four outer sides of a border set that are declared
fn outer_sides(set: &BorderSet) -> Vec<(Side, &Border)> {
    [
        (Side::Top, &set.top),
        (Side::Right, &set.right),
        (Side::Bottom, &set.bottom),
        (Side::Left, &set.left),
    ]
    .into_iter()
    .filter_map(|(side, border)| border.as_ref().map(|b| (side, b)))
    .collect()
}

/// Resolve a source border; unsupported styles are drawn solid
fn border_line(border: &Border, diagnostics: &mut Diagnostics) -> BorderLine {
    let style = match border.style.as_str() {
        "nil" | "none" => return BorderLine::none(),
        "single" | "thick" => "solid",
        "double" => "double",
        "dotted" => "dotted",
        "dashed" => "dashed",
        other => {
            diagnostics.warn(format!("Unsupported border style '{}', using solid", other));
            "solid"
        }
    };
    let color = match border.color.as_deref() {
        None | Some("auto") => "#000000".to_string(),
        Some(hex) => format!("#{}", hex),
    };
    BorderLine {
        width: point_to_pixel(border.size.unwrap_or(DEFAULT_BORDER_SIZE) as f32),
        style: style.to_string(),
        color,
    }
}

/// CSS background of a shading declaration; unsupported patterns are white
fn shading_color(shading: &Shading, diagnostics: &mut Diagnostics) -> Option<String> {
    let color = |value: Option<&str>| match value {
        None | Some("auto") => None,
        Some(hex) => Some(format!("#{}", hex)),
    };
    match shading.pattern.as_deref() {
        Some("clear") | None => color(shading.fill.as_deref()),
        Some("solid") => color(shading.color.as_deref()),
        Some("nil") => None,
        Some(other) => {
            diagnostics.warn(format!("Unsupported shading '{}', using white", other));
            Some("#FFFFFF".to_string())
        }
    }
}

fn css_vertical_align(value: &str) -> String {
    match value {
        "center" => "middle".to_string(),
        other => other.to_string(),
    }
}
