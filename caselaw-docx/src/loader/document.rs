//! Main document part (`word/document.xml`)

use super::properties::{cell_properties, paragraph_properties, run_properties, table_properties};
use super::xml::{
    attr, child, descendant, is_element, is_wml, local_name, wml, wml_val, DML_NS, MC_NS, REL_NS,
    VML_NS, WML_NS, WPD_NS,
};
use crate::source_model::{
    AnchorImage, BodyElement, Drawing, DrawingItem, Extent, GraphicData, HorizontalPosition,
    Hyperlink, InlineImage, Paragraph, ParagraphContent, Picture, PictureItem, Run, RunContent,
    Table, TableCell, TableRow, TableRowProperties, VmlShape, Wrap,
};
use roxmltree::Node;

/// Paragraph children without content of their own
const PARAGRAPH_MARKUP: [&str; 7] = [
    "pPr",
    "bookmarkStart",
    "bookmarkEnd",
    "proofErr",
    "permStart",
    "permEnd",
    "commentRangeStart",
];

/// Parse the body of the main document part
///
/// # Parameters
/// * `xml` - Content of `word/document.xml`
///
/// # Returns
/// * `Ok(Vec<BodyElement>)` - Body content in document order
/// * `Err(roxmltree::Error)` - The part is not well-formed
pub fn parse_document(xml: &str) -> Result<Vec<BodyElement>, roxmltree::Error> {
    let doc = roxmltree::Document::parse(xml)?;
    let body = wml(doc.root_element(), "body");
    Ok(body.map(block_content).unwrap_or_default())
}

/// Paragraphs and tables of a body or table cell
fn block_content(parent: Node) -> Vec<BodyElement> {
    let mut elements = Vec::new();
    for node in parent.children().filter(Node::is_element) {
        match node.tag_name().name() {
            _ if node.tag_name().namespace() != Some(WML_NS) => {
                elements.push(BodyElement::Other(local_name(node)));
            }
            "p" => elements.push(BodyElement::Paragraph(paragraph(node))),
            "tbl" => elements.push(BodyElement::Table(table(node))),
            "sdt" => {
                if let Some(content) = wml(node, "sdtContent") {
                    elements.extend(block_content(content));
                }
            }
            "sectPr" | "tcPr" | "bookmarkStart" | "bookmarkEnd" | "proofErr" => {}
            _ => elements.push(BodyElement::Other(local_name(node))),
        }
    }
    elements
}

fn paragraph(node: Node) -> Paragraph {
    Paragraph {
        properties: wml(node, "pPr").map(paragraph_properties),
        content: paragraph_content(node),
    }
}

fn paragraph_content(parent: Node) -> Vec<ParagraphContent> {
    let mut content = Vec::new();
    for node in parent.children().filter(Node::is_element) {
        if is_wml(node, "r") {
            content.push(ParagraphContent::Run(run(node)));
        } else if is_wml(node, "hyperlink") {
            content.push(ParagraphContent::Hyperlink(Hyperlink {
                relationship_id: node.attribute((REL_NS, "id")).map(str::to_string),
                anchor: attr(node, "anchor").map(str::to_string),
                content: paragraph_content(node),
            }));
        } else if node.tag_name().namespace() == Some(WML_NS)
            && PARAGRAPH_MARKUP.contains(&node.tag_name().name())
        {
            continue;
        } else {
            content.push(ParagraphContent::Other(local_name(node)));
        }
    }
    content
}

fn run(node: Node) -> Run {
    Run {
        properties: wml(node, "rPr").map(run_properties),
        content: node
            .children()
            .filter(|n| n.is_element() && !is_wml(*n, "rPr"))
            .map(run_content)
            .collect(),
    }
}

fn run_content(node: Node) -> RunContent {
    if is_element(node, MC_NS, "AlternateContent") {
        return alternate_content(node);
    }
    if node.tag_name().namespace() != Some(WML_NS) {
        return RunContent::Other(local_name(node));
    }
    match node.tag_name().name() {
        "t" => RunContent::Text(node.text().unwrap_or_default().to_string()),
        "tab" => RunContent::Tab,
        "br" => RunContent::Break,
        "cr" => RunContent::CarriageReturn,
        "noBreakHyphen" => RunContent::NoBreakHyphen,
        "softHyphen" => RunContent::SoftHyphen,
        "drawing" => RunContent::Drawing(drawing(node)),
        "pict" => RunContent::Picture(picture(node)),
        "fldChar" => RunContent::FieldChar,
        "instrText" => RunContent::InstrText(node.text().unwrap_or_default().to_string()),
        "lastRenderedPageBreak" => RunContent::LastRenderedPageBreak,
        name => RunContent::Other(name.to_string()),
    }
}

/// Take the first choice of `mc:AlternateContent`, else the fallback
fn alternate_content(node: Node) -> RunContent {
    let branch = child(node, MC_NS, "Choice").or_else(|| child(node, MC_NS, "Fallback"));
    branch
        .and_then(|b| b.children().find(Node::is_element))
        .map(run_content)
        .unwrap_or_else(|| RunContent::Other(local_name(node)))
}

fn drawing(node: Node) -> Drawing {
    let items = node
        .children()
        .filter_map(|n| {
            if is_element(n, WPD_NS, "inline") {
                Some(DrawingItem::Inline(InlineImage {
                    extent: extent(n),
                    graphic: graphic_data(n),
                }))
            } else if is_element(n, WPD_NS, "anchor") {
                Some(DrawingItem::Anchor(AnchorImage {
                    extent: extent(n),
                    graphic: graphic_data(n),
                    horizontal_position: horizontal_position(n),
                    wrap: wrap(n),
                }))
            } else {
                None
            }
        })
        .collect();
    Drawing { items }
}

fn extent(node: Node) -> Option<Extent> {
    let extent = child(node, WPD_NS, "extent")?;
    Some(Extent {
        cx: extent.attribute("cx")?.parse().ok()?,
        cy: extent.attribute("cy")?.parse().ok()?,
    })
}

fn graphic_data(node: Node) -> Option<GraphicData> {
    let data = child(node, DML_NS, "graphic").and_then(|g| child(g, DML_NS, "graphicData"))?;
    Some(GraphicData {
        embed_id: descendant(data, DML_NS, "blip")
            .and_then(|blip| blip.attribute((REL_NS, "embed")))
            .map(str::to_string),
        rotation: descendant(data, DML_NS, "xfrm")
            .and_then(|xfrm| xfrm.attribute("rot"))
            .and_then(|v| v.parse().ok()),
        description: child(node, WPD_NS, "docPr")
            .and_then(|pr| pr.attribute("descr"))
            .map(str::to_string),
    })
}

fn horizontal_position(node: Node) -> Option<HorizontalPosition> {
    let position = child(node, WPD_NS, "positionH")?;
    Some(HorizontalPosition {
        relative_from: position.attribute("relativeFrom").map(str::to_string),
        align: child(position, WPD_NS, "align")
            .and_then(|a| a.text())
            .map(|t| t.trim().to_string()),
        offset: child(position, WPD_NS, "posOffset")
            .and_then(|o| o.text())
            .and_then(|t| t.trim().parse().ok()),
    })
}

fn wrap(node: Node) -> Option<Wrap> {
    node.children().find_map(|n| {
        if n.tag_name().namespace() != Some(WPD_NS) {
            return None;
        }
        let side = || n.attribute("wrapText").map(str::to_string);
        match n.tag_name().name() {
            "wrapSquare" => Some(Wrap::Square(side())),
            "wrapTight" => Some(Wrap::Tight(side())),
            "wrapThrough" => Some(Wrap::Through(side())),
            "wrapTopAndBottom" => Some(Wrap::TopAndBottom),
            "wrapNone" => Some(Wrap::None),
            _ => None,
        }
    })
}

fn picture(node: Node) -> Picture {
    let items = node
        .children()
        .filter(Node::is_element)
        .map(|n| {
            if is_element(n, VML_NS, "shape") {
                PictureItem::Shape(VmlShape {
                    style: n.attribute("style").map(str::to_string),
                    image_id: child(n, VML_NS, "imagedata")
                        .and_then(|d| d.attribute((REL_NS, "id")))
                        .map(str::to_string),
                })
            } else if is_element(n, VML_NS, "shapetype") {
                PictureItem::ShapeType
            } else {
                PictureItem::Other(local_name(n))
            }
        })
        .collect();
    Picture { items }
}

fn table(node: Node) -> Table {
    let grid = wml(node, "tblGrid")
        .map(|grid| {
            grid.children()
                .filter(|n| is_wml(*n, "gridCol"))
                .filter_map(|col| attr(col, "w").and_then(|w| w.parse().ok()))
                .collect()
        })
        .unwrap_or_default();

    let rows = node
        .children()
        .filter(|n| is_wml(*n, "tr"))
        .map(|tr| TableRow {
            properties: wml(tr, "trPr").map(|trpr| TableRowProperties {
                conformance: wml_val(trpr, "cnfStyle").map(str::to_string),
            }),
            cells: tr
                .children()
                .filter(|n| is_wml(*n, "tc"))
                .map(|tc| TableCell {
                    properties: wml(tc, "tcPr").map(cell_properties),
                    content: block_content(tc),
                })
                .collect(),
        })
        .collect();

    Table {
        properties: wml(node, "tblPr").map(table_properties),
        grid,
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(body: &str) -> Vec<BodyElement> {
        let xml = format!(
            r#"<w:document xmlns:w="{}" xmlns:wp="{}" xmlns:a="{}" xmlns:r="{}" xmlns:v="{}"><w:body>{}<w:sectPr/></w:body></w:document>"#,
            WML_NS, WPD_NS, DML_NS, REL_NS, VML_NS, body
        );
        parse_document(&xml).unwrap()
    }

    fn only_paragraph(body: &str) -> Paragraph {
        match document(body).into_iter().next() {
            Some(BodyElement::Paragraph(paragraph)) => paragraph,
            other => panic!("expected paragraph, got {:?}", other),
        }
    }

    #[test]
    fn test_section_properties_are_skipped() {
        let body = document("<w:p/>");
        assert_eq!(body.len(), 1);
    }

    #[test]
    fn test_run_content_kinds() {
        let paragraph = only_paragraph(
            r#"<w:p><w:bookmarkStart/><w:r><w:t xml:space="preserve">a </w:t><w:tab/><w:br/><w:softHyphen/><w:sym/></w:r></w:p>"#,
        );
        assert_eq!(paragraph.content.len(), 1);
        let ParagraphContent::Run(run) = &paragraph.content[0] else {
            panic!("expected run");
        };
        let names: Vec<&str> = run.content.iter().map(RunContent::type_name).collect();
        assert_eq!(names, vec!["t", "tab", "br", "softHyphen", "sym"]);
        assert!(matches!(&run.content[0], RunContent::Text(t) if t == "a "));
    }

    #[test]
    fn test_hyperlink_children() {
        let paragraph = only_paragraph(
            r#"<w:p><w:hyperlink r:id="rId5"><w:r><w:t>link</w:t></w:r></w:hyperlink></w:p>"#,
        );
        let ParagraphContent::Hyperlink(link) = &paragraph.content[0] else {
            panic!("expected hyperlink");
        };
        assert_eq!(link.relationship_id.as_deref(), Some("rId5"));
        assert_eq!(link.content.len(), 1);
    }

    #[test]
    fn test_anchored_drawing() {
        let paragraph = only_paragraph(
            r#"<w:p><w:r><w:drawing><wp:anchor>
                 <wp:positionH relativeFrom="column"><wp:align>right</wp:align></wp:positionH>
                 <wp:extent cx="952500" cy="476250"/>
                 <wp:wrapSquare wrapText="bothSides"/>
                 <wp:docPr id="1" descr="Logo"/>
                 <a:graphic><a:graphicData><a:pic><a:blipFill><a:blip r:embed="rId7"/></a:blipFill>
                 <a:spPr><a:xfrm rot="5400000"/></a:spPr></a:pic></a:graphicData></a:graphic>
               </wp:anchor></w:drawing></w:r></w:p>"#,
        );
        let ParagraphContent::Run(run) = &paragraph.content[0] else {
            panic!("expected run");
        };
        let RunContent::Drawing(drawing) = &run.content[0] else {
            panic!("expected drawing");
        };
        let DrawingItem::Anchor(anchor) = &drawing.items[0] else {
            panic!("expected anchor");
        };
        assert_eq!(anchor.extent, Some(Extent { cx: 952500, cy: 476250 }));
        let graphic = anchor.graphic.as_ref().unwrap();
        assert_eq!(graphic.embed_id.as_deref(), Some("rId7"));
        assert_eq!(graphic.rotation, Some(5400000));
        assert_eq!(graphic.description.as_deref(), Some("Logo"));
        assert_eq!(
            anchor.horizontal_position.as_ref().unwrap().align.as_deref(),
            Some("right")
        );
        assert_eq!(anchor.wrap, Some(Wrap::Square(Some("bothSides".into()))));
    }

    #[test]
    fn test_vml_picture() {
        let paragraph = only_paragraph(
            r#"<w:p><w:r><w:pict><v:shapetype/><v:shape style="width:72pt;height:36pt"><v:imagedata r:id="rId9"/></v:shape></w:pict></w:r></w:p>"#,
        );
        let ParagraphContent::Run(run) = &paragraph.content[0] else {
            panic!("expected run");
        };
        let RunContent::Picture(picture) = &run.content[0] else {
            panic!("expected picture");
        };
        assert!(matches!(picture.items[0], PictureItem::ShapeType));
        let PictureItem::Shape(shape) = &picture.items[1] else {
            panic!("expected shape");
        };
        assert_eq!(shape.image_id.as_deref(), Some("rId9"));
    }

    #[test]
    fn test_table_structure() {
        let body = document(
            r#"<w:tbl><w:tblPr><w:tblStyle w:val="Grid"/><w:tblLook w:firstRow="1"/></w:tblPr>
               <w:tblGrid><w:gridCol w:w="1500"/><w:gridCol w:w="3000"/></w:tblGrid>
               <w:tr><w:trPr><w:cnfStyle w:val="100000000000"/></w:trPr>
                 <w:tc><w:tcPr><w:gridSpan w:val="2"/></w:tcPr><w:p><w:r><w:t>x</w:t></w:r></w:p></w:tc></w:tr>
               </w:tbl>"#,
        );
        let BodyElement::Table(table) = &body[0] else {
            panic!("expected table");
        };
        assert_eq!(table.grid, vec![1500, 3000]);
        let properties = table.properties.as_ref().unwrap();
        assert_eq!(properties.style.as_deref(), Some("Grid"));
        assert_eq!(properties.look.as_ref().unwrap().first_row, Some(true));
        let row = &table.rows[0];
        assert_eq!(
            row.properties.as_ref().unwrap().conformance.as_deref(),
            Some("100000000000")
        );
        assert_eq!(row.cells[0].content.len(), 1);
        assert_eq!(row.cells[0].properties.as_ref().unwrap().grid_span, Some(2));
    }

    #[test]
    fn test_unknown_body_element() {
        let body = document("<w:customXml/>");
        assert_eq!(body[0].type_name(), "customXml");
    }
}
