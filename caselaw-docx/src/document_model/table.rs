//! Table elements, cell borders and region conformance

use super::DocumentElement;
use crate::style::StyleMap;
use bitflags::bitflags;

bitflags! {
    /// Table style regions a cell belongs to
    ///
    /// Bit order follows the `w:cnfStyle` binary string, first character is
    /// bit 0.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Conformance: u16 {
        const FIRST_ROW = 1 << 0;
        const LAST_ROW = 1 << 1;
        const FIRST_COLUMN = 1 << 2;
        const LAST_COLUMN = 1 << 3;
        const ODD_V_BAND = 1 << 4;
        const EVEN_V_BAND = 1 << 5;
        const ODD_H_BAND = 1 << 6;
        const EVEN_H_BAND = 1 << 7;
        const FIRST_ROW_FIRST_COLUMN = 1 << 8;
        const FIRST_ROW_LAST_COLUMN = 1 << 9;
        const LAST_ROW_FIRST_COLUMN = 1 << 10;
        const LAST_ROW_LAST_COLUMN = 1 << 11;
    }
}

impl Conformance {
    /// Parse a `w:cnfStyle` value such as `100000000000`
    ///
    /// Returns `None` for strings containing anything but `0`/`1` or longer
    /// than twelve digits. Shorter strings leave the trailing bits unset.
    pub fn parse(value: &str) -> Option<Self> {
        if value.is_empty() || value.len() > 12 {
            return None;
        }
        let mut bits = 0u16;
        for (position, c) in value.chars().enumerate() {
            match c {
                '1' => bits |= 1 << position,
                '0' => {}
                _ => return None,
            }
        }
        Some(Conformance::from_bits_truncate(bits))
    }
}

/// A resolved border line
#[derive(Debug, Clone, PartialEq)]
pub struct BorderLine {
    /// Width in pixels
    pub width: f32,
    /// CSS border style, `none` for cleared borders
    pub style: String,
    /// CSS color
    pub color: String,
}

impl BorderLine {
    /// An explicitly cleared border
    pub fn none() -> Self {
        Self {
            width: 0.0,
            style: "none".to_string(),
            color: String::new(),
        }
    }

    /// CSS shorthand value
    pub fn to_css(&self) -> String {
        if self.style == "none" {
            "none".to_string()
        } else {
            format!("{}px {} {}", self.width, self.style, self.color)
        }
    }
}

/// A border on one side of a cell
#[derive(Debug, Clone, PartialEq)]
pub struct CellBorder {
    /// The line to draw
    pub line: BorderLine,
    /// Declared on the cell itself; never replaced by inherited borders
    pub self_declared: bool,
}

/// Side of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    /// All sides in CSS order
    pub const ALL: [Side; 4] = [Side::Top, Side::Right, Side::Bottom, Side::Left];

    /// CSS border property of this side
    pub fn css_property(self) -> &'static str {
        match self {
            Side::Top => "border-top",
            Side::Right => "border-right",
            Side::Bottom => "border-bottom",
            Side::Left => "border-left",
        }
    }
}

/// Borders of a cell, per side
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellBorders {
    pub top: Option<CellBorder>,
    pub right: Option<CellBorder>,
    pub bottom: Option<CellBorder>,
    pub left: Option<CellBorder>,
}

impl CellBorders {
    /// The border on `side`
    pub fn get(&self, side: Side) -> Option<&CellBorder> {
        match side {
            Side::Top => self.top.as_ref(),
            Side::Right => self.right.as_ref(),
            Side::Bottom => self.bottom.as_ref(),
            Side::Left => self.left.as_ref(),
        }
    }

    fn slot(&mut self, side: Side) -> &mut Option<CellBorder> {
        match side {
            Side::Top => &mut self.top,
            Side::Right => &mut self.right,
            Side::Bottom => &mut self.bottom,
            Side::Left => &mut self.left,
        }
    }

    /// Set a border declared on the cell itself
    pub fn declare(&mut self, side: Side, line: BorderLine) {
        *self.slot(side) = Some(CellBorder {
            line,
            self_declared: true,
        });
    }

    /// Set an inherited border unless the side is self-declared
    pub fn inherit(&mut self, side: Side, line: BorderLine) {
        let slot = self.slot(side);
        if slot.as_ref().is_some_and(|b| b.self_declared) {
            return;
        }
        *slot = Some(CellBorder {
            line,
            self_declared: false,
        });
    }

    /// Remove an inherited border; self-declared borders stay
    pub fn clear_inherited(&mut self, side: Side) {
        let slot = self.slot(side);
        if slot.as_ref().is_some_and(|b| !b.self_declared) {
            *slot = None;
        }
    }

    /// Add the border declarations to a style map
    pub fn apply_to(&self, style: &mut StyleMap) {
        for side in Side::ALL {
            if let Some(border) = self.get(side) {
                style.set(side.css_property(), border.line.to_css());
            }
        }
    }
}

/// A converted table cell
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableCellElement {
    /// Cell content
    pub content: Vec<DocumentElement>,
    /// Number of grid columns spanned
    pub column_span: u32,
    /// Width in pixels
    pub width: Option<i64>,
    /// Resolved borders
    pub borders: CellBorders,
    /// CSS background color
    pub background_color: Option<String>,
    /// CSS vertical-align value
    pub vertical_align: Option<String>,
    /// Regions the cell belongs to; `None` when nothing was declared
    pub conformance: Option<Conformance>,
}

impl TableCellElement {
    /// Computed inline style
    pub fn style(&self) -> StyleMap {
        let mut style = StyleMap::new();
        if let Some(width) = self.width {
            style.set("width", format!("{}px", width));
        }
        self.borders.apply_to(&mut style);
        if let Some(color) = &self.background_color {
            style.set("background-color", color.clone());
        }
        if let Some(align) = &self.vertical_align {
            style.set("vertical-align", align.clone());
        }
        style
    }

    /// Render as a `<td>` element
    pub fn to_html(&self) -> String {
        let colspan = if self.column_span > 1 {
            format!(" colspan=\"{}\"", self.column_span)
        } else {
            String::new()
        };
        let content: String = self.content.iter().map(DocumentElement::to_html).collect();
        format!("<td{}{}>{}</td>", colspan, self.style().to_attribute(), content)
    }
}

/// A converted table row
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableRowElement {
    pub cells: Vec<TableCellElement>,
}

/// A converted table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableElement {
    /// Rows in source order
    pub rows: Vec<TableRowElement>,
    /// Grid column widths in pixels
    pub column_widths: Vec<i64>,
    /// Table-level style, including the outer border
    pub style: StyleMap,
}

impl TableElement {
    /// Render as a `<table>` element
    pub fn to_html(&self) -> String {
        let mut style = self.style.clone();
        style.set_if_absent("border-collapse", "collapse");
        let mut html = format!("<table{}>", style.to_attribute());
        for row in &self.rows {
            html.push_str("<tr>");
            for cell in &row.cells {
                html.push_str(&cell.to_html());
            }
            html.push_str("</tr>");
        }
        html.push_str("</table>");
        html
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid() -> BorderLine {
        BorderLine {
            width: 1.0,
            style: "solid".into(),
            color: "#000000".into(),
        }
    }

    #[test]
    fn test_parse_conformance() {
        let parsed = Conformance::parse("100000000000").unwrap();
        assert_eq!(parsed, Conformance::FIRST_ROW);
        let corner = Conformance::parse("000000001000").unwrap();
        assert_eq!(corner, Conformance::FIRST_ROW_FIRST_COLUMN);
        assert!(Conformance::parse("10x").is_none());
        assert!(Conformance::parse("").is_none());
    }

    #[test]
    fn test_self_declared_border_wins() {
        let mut borders = CellBorders::default();
        borders.declare(Side::Top, BorderLine::none());
        borders.inherit(Side::Top, solid());
        borders.clear_inherited(Side::Top);
        assert_eq!(borders.top.as_ref().unwrap().line.style, "none");
    }

    #[test]
    fn test_clear_inherited_border() {
        let mut borders = CellBorders::default();
        borders.inherit(Side::Left, solid());
        borders.clear_inherited(Side::Left);
        assert!(borders.left.is_none());
    }

    #[test]
    fn test_cell_rendering() {
        let mut cell = TableCellElement {
            column_span: 2,
            width: Some(100),
            vertical_align: Some("middle".into()),
            ..TableCellElement::default()
        };
        cell.borders.inherit(Side::Bottom, solid());
        assert_eq!(
            cell.to_html(),
            "<td colspan=\"2\" style=\"width: 100px; border-bottom: 1px solid #000000; vertical-align: middle;\"></td>"
        );
    }
}
