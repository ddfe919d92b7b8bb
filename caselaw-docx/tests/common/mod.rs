//! In-memory `.docx` packages for integration tests

#![allow(dead_code)]

use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

pub const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Default Extension="png" ContentType="image/png"/>
<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
</Types>"#;

const NAMESPACES: &str = concat!(
    r#"xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" "#,
    r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" "#,
    r#"xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing" "#,
    r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
    r#"xmlns:pic="http://schemas.openxmlformats.org/drawingml/2006/picture" "#,
    r#"xmlns:v="urn:schemas-microsoft-com:vml""#,
);

/// Builder for a minimal WordprocessingML package
#[derive(Debug, Default)]
pub struct DocxBuilder {
    body: String,
    styles: Option<String>,
    numbering: Option<String>,
    images: Vec<(String, String, Vec<u8>)>,
}

impl DocxBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append raw body markup
    pub fn body(mut self, xml: &str) -> Self {
        self.body.push_str(xml);
        self
    }

    /// Inner markup of `w:styles`
    pub fn styles(mut self, xml: &str) -> Self {
        self.styles = Some(xml.to_string());
        self
    }

    /// Inner markup of `w:numbering`
    pub fn numbering(mut self, xml: &str) -> Self {
        self.numbering = Some(xml.to_string());
        self
    }

    /// An image part under `word/media/` referenced by `id`
    pub fn image(mut self, id: &str, file_name: &str, bytes: Vec<u8>) -> Self {
        self.images
            .push((id.to_string(), file_name.to_string(), bytes));
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();

        add(&mut zip, options, "[Content_Types].xml", CONTENT_TYPES.as_bytes());
        let document = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document {}><w:body>{}<w:sectPr/></w:body></w:document>"#,
            NAMESPACES, self.body
        );
        add(&mut zip, options, "word/document.xml", document.as_bytes());

        if let Some(styles) = &self.styles {
            let xml = format!(r#"<w:styles xmlns:w="{}">{}</w:styles>"#, W_NS, styles);
            add(&mut zip, options, "word/styles.xml", xml.as_bytes());
        }
        if let Some(numbering) = &self.numbering {
            let xml = format!(r#"<w:numbering xmlns:w="{}">{}</w:numbering>"#, W_NS, numbering);
            add(&mut zip, options, "word/numbering.xml", xml.as_bytes());
        }
        if !self.images.is_empty() {
            let mut rels = String::from(
                r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
            );
            for (id, file_name, bytes) in &self.images {
                rels.push_str(&format!(
                    r#"<Relationship Id="{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="media/{}"/>"#,
                    id, file_name
                ));
                add(&mut zip, options, &format!("word/media/{}", file_name), bytes);
            }
            rels.push_str("</Relationships>");
            add(&mut zip, options, "word/_rels/document.xml.rels", rels.as_bytes());
        }

        zip.finish().unwrap().into_inner()
    }
}

fn add(zip: &mut ZipWriter<Cursor<Vec<u8>>>, options: SimpleFileOptions, name: &str, bytes: &[u8]) {
    zip.start_file(name, options).unwrap();
    zip.write_all(bytes).unwrap();
}

/// A paragraph with one text run and optional properties markup
pub fn paragraph(properties: &str, text: &str) -> String {
    format!(
        r#"<w:p><w:pPr>{}</w:pPr><w:r><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#,
        properties, text
    )
}

/// A paragraph styled as `style`
pub fn styled(style: &str, text: &str) -> String {
    paragraph(&format!(r#"<w:pStyle w:val="{}"/>"#, style), text)
}

/// A paragraph with numbering `num_id` at `level`
pub fn numbered(num_id: &str, level: u32, text: &str) -> String {
    paragraph(
        &format!(
            r#"<w:numPr><w:ilvl w:val="{}"/><w:numId w:val="{}"/></w:numPr>"#,
            level, num_id
        ),
        text,
    )
}

/// An inline drawing of `cx` x `cy` EMU showing relationship `id`
pub fn inline_drawing(id: &str, cx: i64, cy: i64, rotation: Option<i64>) -> String {
    let xfrm = rotation
        .map(|rot| format!(r#"<a:xfrm rot="{}"/>"#, rot))
        .unwrap_or_default();
    format!(
        r#"<w:drawing><wp:inline><wp:extent cx="{cx}" cy="{cy}"/><wp:docPr id="1" descr="Lageplan"/><a:graphic><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/picture"><pic:pic><pic:blipFill><a:blip r:embed="{id}"/></pic:blipFill><pic:spPr>{xfrm}</pic:spPr></pic:pic></a:graphicData></a:graphic></wp:inline></w:drawing>"#,
        cx = cx,
        cy = cy,
        id = id,
        xfrm = xfrm
    )
}

/// A decimal numbering definition with id `num_id`
pub fn decimal_numbering(num_id: &str) -> String {
    format!(
        r#"<w:abstractNum w:abstractNumId="0">
<w:lvl w:ilvl="0"><w:start w:val="1"/><w:numFmt w:val="decimal"/><w:lvlText w:val="%1."/><w:lvlJc w:val="left"/></w:lvl>
<w:lvl w:ilvl="1"><w:start w:val="1"/><w:numFmt w:val="lowerLetter"/><w:lvlText w:val="%2)"/><w:lvlJc w:val="left"/></w:lvl>
</w:abstractNum>
<w:num w:numId="{}"><w:abstractNumId w:val="0"/></w:num>"#,
        num_id
    )
}
