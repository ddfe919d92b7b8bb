//! Style definitions part (`word/styles.xml`)

use super::properties::{cell_properties, paragraph_properties, run_properties, table_properties};
use super::xml::{attr, is_wml, wml, wml_val};
use crate::source_model::{NamedStyle, StyleKind, StyleRegistry, TableStyleOverride};
use roxmltree::Node;

/// Parse the style definitions part into a registry
pub fn parse_styles(xml: &str) -> Result<StyleRegistry, roxmltree::Error> {
    let doc = roxmltree::Document::parse(xml)?;
    let mut registry = StyleRegistry::new();
    for node in doc.root_element().children().filter(|n| is_wml(*n, "style")) {
        if let Some(style) = named_style(node) {
            registry.insert(style);
        }
    }
    Ok(registry)
}

fn named_style(node: Node) -> Option<NamedStyle> {
    let id = attr(node, "styleId")?;
    let region_overrides = node
        .children()
        .filter(|n| is_wml(*n, "tblStylePr"))
        .filter_map(|region| {
            Some(TableStyleOverride {
                region: attr(region, "type")?.to_string(),
                paragraph_properties: wml(region, "pPr").map(paragraph_properties),
                run_properties: wml(region, "rPr").map(run_properties),
                cell_properties: wml(region, "tcPr").map(cell_properties),
            })
        })
        .collect();

    Some(NamedStyle {
        id: id.to_string(),
        name: wml_val(node, "name").map(str::to_string),
        kind: attr(node, "type").map(StyleKind::parse).unwrap_or_default(),
        based_on: wml_val(node, "basedOn").map(str::to_string),
        paragraph_properties: wml(node, "pPr").map(paragraph_properties),
        run_properties: wml(node, "rPr").map(run_properties),
        table_properties: wml(node, "tblPr").map(table_properties),
        cell_properties: wml(node, "tcPr").map(cell_properties),
        region_overrides,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::xml::WML_NS;

    #[test]
    fn test_parse_styles() {
        let xml = format!(
            r#"<w:styles xmlns:w="{}">
                 <w:style w:type="paragraph" w:styleId="Heading"><w:name w:val="heading 1"/>
                   <w:pPr><w:jc w:val="center"/></w:pPr><w:rPr><w:b/></w:rPr></w:style>
                 <w:style w:type="paragraph" w:styleId="SubHeading"><w:basedOn w:val="Heading"/></w:style>
                 <w:style w:type="table" w:styleId="Grid">
                   <w:tblPr><w:tblBorders><w:top w:val="single" w:sz="4"/></w:tblBorders></w:tblPr>
                   <w:tblStylePr w:type="firstRow"><w:rPr><w:i/></w:rPr></w:tblStylePr>
                 </w:style>
               </w:styles>"#,
            WML_NS
        );
        let registry = parse_styles(&xml).unwrap();
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.justification("SubHeading").as_deref(), Some("center"));
        assert_eq!(registry.run_properties("SubHeading").unwrap().bold, Some(true));
        assert_eq!(registry.get("Grid").unwrap().kind, StyleKind::Table);
        assert_eq!(registry.region_overrides("Grid")[0].region, "firstRow");
        assert_eq!(registry.table_borders("Grid").unwrap().top.unwrap().size, Some(4));
    }
}
