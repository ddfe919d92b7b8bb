//! Table nodes and their properties

use super::paragraph::BodyElement;

/// A `w:tbl` table
#[derive(Debug, Clone, Default)]
pub struct Table {
    /// Table properties (`w:tblPr`)
    pub properties: Option<TableProperties>,

    /// Column widths in twips (`w:tblGrid/w:gridCol`)
    pub grid: Vec<i64>,

    /// Rows in source order
    pub rows: Vec<TableRow>,
}

/// Table properties (`w:tblPr`)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableProperties {
    /// Named table style id (`w:tblStyle`)
    pub style: Option<String>,

    /// Table-wide borders (`w:tblBorders`)
    pub borders: Option<BorderSet>,

    /// Conditional formatting switches (`w:tblLook`)
    pub look: Option<TableLook>,

    /// Table-wide shading (`w:shd`)
    pub shading: Option<Shading>,
}

/// Borders for the sides of a table or cell
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BorderSet {
    /// `w:top`
    pub top: Option<Border>,
    /// `w:left` (or `w:start`)
    pub left: Option<Border>,
    /// `w:bottom`
    pub bottom: Option<Border>,
    /// `w:right` (or `w:end`)
    pub right: Option<Border>,
    /// Between rows (`w:insideH`)
    pub inside_h: Option<Border>,
    /// Between columns (`w:insideV`)
    pub inside_v: Option<Border>,
}

/// A single border declaration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Border {
    /// Line style (`w:val`), e.g. `single`
    pub style: String,
    /// Width in eighths of a point (`w:sz`)
    pub size: Option<u32>,
    /// Hex color or `auto`
    pub color: Option<String>,
}

/// `w:tblLook`
///
/// Word writes either the legacy hex `val` or the individual attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableLook {
    /// Legacy hex bitmask
    pub value: Option<String>,
    /// `w:firstRow`
    pub first_row: Option<bool>,
    /// `w:lastRow`
    pub last_row: Option<bool>,
    /// `w:firstColumn`
    pub first_column: Option<bool>,
    /// `w:lastColumn`
    pub last_column: Option<bool>,
    /// `w:noHBand`
    pub no_h_band: Option<bool>,
    /// `w:noVBand`
    pub no_v_band: Option<bool>,
}

/// A `w:tr` row
#[derive(Debug, Clone, Default)]
pub struct TableRow {
    /// Row properties (`w:trPr`)
    pub properties: Option<TableRowProperties>,
    /// Cells in source order
    pub cells: Vec<TableCell>,
}

/// Row properties (`w:trPr`)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableRowProperties {
    /// Region conformance (`w:cnfStyle/@w:val`), a 12 digit binary string
    pub conformance: Option<String>,
}

/// A `w:tc` cell
#[derive(Debug, Clone, Default)]
pub struct TableCell {
    /// Cell properties (`w:tcPr`)
    pub properties: Option<TableCellProperties>,
    /// Paragraphs and nested tables
    pub content: Vec<BodyElement>,
}

/// Cell properties (`w:tcPr`), also used by table style regions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableCellProperties {
    /// Preferred width (`w:tcW`)
    pub width: Option<CellWidth>,
    /// Number of grid columns spanned (`w:gridSpan`)
    pub grid_span: Option<u32>,
    /// Cell borders (`w:tcBorders`)
    pub borders: Option<BorderSet>,
    /// Cell shading (`w:shd`)
    pub shading: Option<Shading>,
    /// Vertical alignment (`w:vAlign`)
    pub vertical_align: Option<String>,
    /// Region conformance (`w:cnfStyle/@w:val`)
    pub conformance: Option<String>,
}

/// `w:tcW`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellWidth {
    /// Width value, unit given by `kind`
    pub value: i64,
    /// `dxa` (twips), `pct`, `auto` or `nil`
    pub kind: Option<String>,
}

/// `w:shd`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Shading {
    /// Pattern (`w:val`), e.g. `clear`
    pub pattern: Option<String>,
    /// Pattern color (`w:color`)
    pub color: Option<String>,
    /// Background fill (`w:fill`)
    pub fill: Option<String>,
}
