//! Package loader: reads a `.docx` file into the source model
//!
//! Opens the OPC ZIP container, parses the main document, styles and
//! numbering parts with roxmltree, and collects the image parts referenced
//! by the main document's relationships. Styles, numbering and
//! relationships are optional; a package without a main document part is
//! rejected.

mod document;
mod numbering;
mod properties;
mod styles;
mod xml;

pub use document::parse_document;
pub use numbering::parse_numbering;
pub use styles::parse_styles;

use crate::error::LoadError;
use crate::source_model::{DocxPackage, ImagePart, ImageRegistry};
use std::collections::HashMap;
use std::fs::File;
use std::io::{Cursor, Read, Seek};
use std::path::Path;
use zip::ZipArchive;

const DOCUMENT_PART: &str = "word/document.xml";
const STYLES_PART: &str = "word/styles.xml";
const NUMBERING_PART: &str = "word/numbering.xml";
const DOCUMENT_RELS_PART: &str = "word/_rels/document.xml.rels";
const CONTENT_TYPES_PART: &str = "[Content_Types].xml";

/// Relationship type suffix of image parts
const IMAGE_RELATIONSHIP: &str = "/image";

/// Load a `.docx` file
///
/// # Parameters
/// * `path` - Path to the package
///
/// # Returns
/// * `Ok(DocxPackage)` - Body content and registries
/// * `Err(LoadError)` - The file cannot be read or is not a usable package
pub fn load_docx<P: AsRef<Path>>(path: P) -> Result<DocxPackage, LoadError> {
    let file = File::open(path.as_ref())?;
    load_from_reader(file)
}

/// Load a `.docx` package held in memory
pub fn load_docx_bytes(bytes: &[u8]) -> Result<DocxPackage, LoadError> {
    load_from_reader(Cursor::new(bytes))
}

/// Load a `.docx` package from any seekable reader
pub fn load_from_reader<R: Read + Seek>(reader: R) -> Result<DocxPackage, LoadError> {
    let mut zip = ZipArchive::new(reader)?;

    let document_xml = read_zip_text(&mut zip, DOCUMENT_PART)
        .ok_or_else(|| LoadError::MissingDocument(DOCUMENT_PART.to_string()))?;
    let body = parse_document(&document_xml).map_err(|source| LoadError::Xml {
        part: DOCUMENT_PART.to_string(),
        source,
    })?;

    let styles = match read_zip_text(&mut zip, STYLES_PART) {
        Some(xml) => optional_part(STYLES_PART, parse_styles(&xml)),
        None => Default::default(),
    };
    let numbering = match read_zip_text(&mut zip, NUMBERING_PART) {
        Some(xml) => optional_part(NUMBERING_PART, parse_numbering(&xml)),
        None => Default::default(),
    };
    let images = load_images(&mut zip);

    log::debug!(
        "Loaded package: {} body elements, {} styles, {} images",
        body.len(),
        styles.len(),
        images.len()
    );

    Ok(DocxPackage {
        body,
        styles,
        numbering,
        images,
    })
}

/// Malformed optional parts are logged and treated as missing
fn optional_part<T: Default>(part: &str, parsed: Result<T, roxmltree::Error>) -> T {
    parsed.unwrap_or_else(|e| {
        log::warn!("Ignoring malformed part {}: {}", part, e);
        T::default()
    })
}

fn read_zip_text<R: Read + Seek>(zip: &mut ZipArchive<R>, name: &str) -> Option<String> {
    let mut file = zip.by_name(name).ok()?;
    let mut content = String::new();
    file.read_to_string(&mut content).ok()?;
    Some(content)
}

fn read_zip_bytes<R: Read + Seek>(zip: &mut ZipArchive<R>, name: &str) -> Option<Vec<u8>> {
    let mut file = zip.by_name(name).ok()?;
    let mut content = Vec::new();
    file.read_to_end(&mut content).ok()?;
    Some(content)
}

/// Image parts keyed by relationship id
fn load_images<R: Read + Seek>(zip: &mut ZipArchive<R>) -> ImageRegistry {
    let mut registry = ImageRegistry::new();
    let Some(rels) = read_zip_text(zip, DOCUMENT_RELS_PART) else {
        return registry;
    };
    let content_types = read_zip_text(zip, CONTENT_TYPES_PART)
        .map(|xml| ContentTypes::parse(&xml))
        .unwrap_or_default();

    for (id, target) in image_relationships(&rels) {
        let part_name = resolve_target(&target);
        match read_zip_bytes(zip, &part_name) {
            Some(bytes) => registry.insert(
                id,
                ImagePart {
                    content_type: content_types.lookup(&part_name),
                    bytes,
                },
            ),
            None => log::warn!("Image part {} referenced by {} is missing", part_name, id),
        }
    }
    registry
}

/// `(id, target)` of internal image relationships
fn image_relationships(xml: &str) -> Vec<(String, String)> {
    let Ok(doc) = roxmltree::Document::parse(xml) else {
        log::warn!("Ignoring malformed part {}", DOCUMENT_RELS_PART);
        return Vec::new();
    };
    doc.root_element()
        .children()
        .filter(|n| n.tag_name().name() == "Relationship")
        .filter(|n| n.attribute("TargetMode") != Some("External"))
        .filter(|n| {
            n.attribute("Type")
                .is_some_and(|t| t.ends_with(IMAGE_RELATIONSHIP))
        })
        .filter_map(|n| Some((n.attribute("Id")?.to_string(), n.attribute("Target")?.to_string())))
        .collect()
}

/// Part name of a relationship target relative to `word/`
fn resolve_target(target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }
    let mut segments: Vec<&str> = vec!["word"];
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}

/// `[Content_Types].xml` defaults and overrides
#[derive(Debug, Default)]
struct ContentTypes {
    defaults: HashMap<String, String>,
    overrides: HashMap<String, String>,
}

impl ContentTypes {
    fn parse(xml: &str) -> Self {
        let mut types = ContentTypes::default();
        let Ok(doc) = roxmltree::Document::parse(xml) else {
            return types;
        };
        for node in doc.root_element().children().filter(|n| n.is_element()) {
            let Some(content_type) = node.attribute("ContentType") else {
                continue;
            };
            match node.tag_name().name() {
                "Default" => {
                    if let Some(extension) = node.attribute("Extension") {
                        types
                            .defaults
                            .insert(extension.to_lowercase(), content_type.to_string());
                    }
                }
                "Override" => {
                    if let Some(part) = node.attribute("PartName") {
                        types.overrides.insert(
                            part.trim_start_matches('/').to_string(),
                            content_type.to_string(),
                        );
                    }
                }
                _ => {}
            }
        }
        types
    }

    fn lookup(&self, part_name: &str) -> String {
        if let Some(content_type) = self.overrides.get(part_name) {
            return content_type.clone();
        }
        let extension = part_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .unwrap_or_default();
        self.defaults
            .get(&extension)
            .cloned()
            .unwrap_or_else(|| content_type_for_extension(&extension).to_string())
    }
}

fn content_type_for_extension(extension: &str) -> &'static str {
    match extension {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "svg" => "image/svg+xml",
        "emf" => "image/x-emf",
        "wmf" => "image/x-wmf",
        _ => "application/octet-stream",
    }
}
