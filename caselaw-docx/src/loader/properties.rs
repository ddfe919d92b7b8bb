//! Property blocks shared by the document, styles and numbering parts

use super::xml::{attr, on_off, wml, wml_bool, wml_val};
use crate::source_model::{
    Border, BorderSet, CellWidth, Indentation, NumberingReference, ParagraphProperties,
    RunProperties, Shading, TableCellProperties, TableLook, TableProperties,
};
use roxmltree::Node;

/// Parse `w:pPr`
pub fn paragraph_properties(ppr: Node) -> ParagraphProperties {
    let indentation = wml(ppr, "ind").map(|ind| Indentation {
        left: attr(ind, "left")
            .or_else(|| attr(ind, "start"))
            .and_then(|v| v.parse().ok()),
        hanging: attr(ind, "hanging").and_then(|v| v.parse().ok()),
        first_line: attr(ind, "firstLine").and_then(|v| v.parse().ok()),
    });
    let numbering = wml(ppr, "numPr").map(|num| NumberingReference {
        num_id: wml_val(num, "numId").map(str::to_string),
        level: wml_val(num, "ilvl").map(str::to_string),
    });

    ParagraphProperties {
        style: wml_val(ppr, "pStyle").map(str::to_string),
        justification: wml_val(ppr, "jc").map(str::to_string),
        indentation,
        numbering,
        keep_next: wml_bool(ppr, "keepNext").unwrap_or(false),
        line_spacing: wml(ppr, "spacing")
            .and_then(|s| attr(s, "line"))
            .and_then(|v| v.parse().ok()),
        frame: wml(ppr, "framePr").is_some(),
    }
}

/// Parse `w:rPr`
pub fn run_properties(rpr: Node) -> RunProperties {
    let strike = match (wml_bool(rpr, "strike"), wml_bool(rpr, "dstrike")) {
        (Some(true), _) | (_, Some(true)) => Some(true),
        (Some(false), _) | (_, Some(false)) => Some(false),
        (None, None) => None,
    };
    let font = wml(rpr, "rFonts").and_then(|fonts| {
        attr(fonts, "ascii")
            .or_else(|| attr(fonts, "hAnsi"))
            .or_else(|| attr(fonts, "cs"))
            .map(str::to_string)
    });

    RunProperties {
        style: wml_val(rpr, "rStyle").map(str::to_string),
        bold: wml_bool(rpr, "b"),
        italic: wml_bool(rpr, "i"),
        strike,
        underline: wml_val(rpr, "u").map(str::to_string),
        vertical_align: wml_val(rpr, "vertAlign").map(str::to_string),
        size: wml_val(rpr, "sz").and_then(|v| v.parse().ok()),
        color: wml_val(rpr, "color").map(str::to_string),
        font,
    }
}

fn border(node: Node) -> Border {
    Border {
        style: attr(node, "val").unwrap_or("single").to_string(),
        size: attr(node, "sz").and_then(|v| v.parse().ok()),
        color: attr(node, "color").map(str::to_string),
    }
}

/// Parse `w:tblBorders` or `w:tcBorders`
pub fn border_set(node: Node) -> BorderSet {
    let side = |names: &[&str]| names.iter().find_map(|name| wml(node, name)).map(border);
    BorderSet {
        top: side(&["top"]),
        left: side(&["left", "start"]),
        bottom: side(&["bottom"]),
        right: side(&["right", "end"]),
        inside_h: side(&["insideH"]),
        inside_v: side(&["insideV"]),
    }
}

/// Parse `w:shd`
pub fn shading(node: Node) -> Shading {
    Shading {
        pattern: attr(node, "val").map(str::to_string),
        color: attr(node, "color").map(str::to_string),
        fill: attr(node, "fill").map(str::to_string),
    }
}

/// Parse `w:tblLook`
pub fn table_look(node: Node) -> TableLook {
    let flag = |name: &str| attr(node, name).map(|v| on_off(Some(v)));
    TableLook {
        value: attr(node, "val").map(str::to_string),
        first_row: flag("firstRow"),
        last_row: flag("lastRow"),
        first_column: flag("firstColumn"),
        last_column: flag("lastColumn"),
        no_h_band: flag("noHBand"),
        no_v_band: flag("noVBand"),
    }
}

/// Parse `w:tblPr`
pub fn table_properties(tblpr: Node) -> TableProperties {
    TableProperties {
        style: wml_val(tblpr, "tblStyle").map(str::to_string),
        borders: wml(tblpr, "tblBorders").map(border_set),
        look: wml(tblpr, "tblLook").map(table_look),
        shading: wml(tblpr, "shd").map(shading),
    }
}

/// Parse `w:tcPr`
pub fn cell_properties(tcpr: Node) -> TableCellProperties {
    TableCellProperties {
        width: wml(tcpr, "tcW").and_then(|w| {
            Some(CellWidth {
                value: attr(w, "w")?.parse().ok()?,
                kind: attr(w, "type").map(str::to_string),
            })
        }),
        grid_span: wml_val(tcpr, "gridSpan").and_then(|v| v.parse().ok()),
        borders: wml(tcpr, "tcBorders").map(border_set),
        shading: wml(tcpr, "shd").map(shading),
        vertical_align: wml_val(tcpr, "vAlign").map(str::to_string),
        conformance: wml_val(tcpr, "cnfStyle").map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::xml::WML_NS;

    fn with_root<T>(body: &str, f: impl FnOnce(Node) -> T) -> T {
        let xml = format!(r#"<w:root xmlns:w="{}">{}</w:root>"#, WML_NS, body);
        let doc = roxmltree::Document::parse(&xml).unwrap();
        let result = f(doc.root_element().first_element_child().unwrap());
        result
    }

    #[test]
    fn test_paragraph_properties() {
        let props = with_root(
            r#"<w:pPr><w:pStyle w:val="RandNummer"/><w:keepNext/><w:spacing w:line="240"/>
               <w:jc w:val="center"/><w:ind w:left="720"/><w:numPr><w:ilvl w:val="1"/><w:numId w:val="3"/></w:numPr></w:pPr>"#,
            paragraph_properties,
        );
        assert_eq!(props.style.as_deref(), Some("RandNummer"));
        assert!(props.keep_next);
        assert_eq!(props.line_spacing, Some(240));
        assert_eq!(props.justification.as_deref(), Some("center"));
        assert_eq!(props.indentation.unwrap().left, Some(720));
        let numbering = props.numbering.unwrap();
        assert_eq!(numbering.num_id.as_deref(), Some("3"));
        assert_eq!(numbering.level.as_deref(), Some("1"));
        assert!(!props.frame);
    }

    #[test]
    fn test_run_properties() {
        let props = with_root(
            r#"<w:rPr><w:b/><w:i w:val="false"/><w:dstrike/><w:u w:val="double"/>
               <w:sz w:val="21"/><w:color w:val="1F3864"/><w:rFonts w:ascii="Arial"/></w:rPr>"#,
            run_properties,
        );
        assert_eq!(props.bold, Some(true));
        assert_eq!(props.italic, Some(false));
        assert_eq!(props.strike, Some(true));
        assert_eq!(props.underline.as_deref(), Some("double"));
        assert_eq!(props.size, Some(21));
        assert_eq!(props.color.as_deref(), Some("1F3864"));
        assert_eq!(props.font.as_deref(), Some("Arial"));
    }

    #[test]
    fn test_cell_properties() {
        let props = with_root(
            r#"<w:tcPr><w:cnfStyle w:val="100000000000"/><w:tcW w:w="2400" w:type="dxa"/>
               <w:gridSpan w:val="2"/><w:tcBorders><w:start w:val="nil"/></w:tcBorders>
               <w:shd w:val="clear" w:fill="D9D9D9"/><w:vAlign w:val="center"/></w:tcPr>"#,
            cell_properties,
        );
        assert_eq!(props.width.unwrap().value, 2400);
        assert_eq!(props.grid_span, Some(2));
        assert_eq!(props.borders.unwrap().left.unwrap().style, "nil");
        assert_eq!(props.shading.unwrap().fill.as_deref(), Some("D9D9D9"));
        assert_eq!(props.vertical_align.as_deref(), Some("center"));
        assert_eq!(props.conformance.as_deref(), Some("100000000000"));
    }
}
