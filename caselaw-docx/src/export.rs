//! HTML export for converted documents
//!
//! A converted document renders itself as a fragment. This module wraps
//! that fragment in a standalone page with the stylesheet for the custom
//! `border-number`, `number` and `content` elements.

use crate::document_model::{escape_html, ConvertedDocument};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while writing HTML output
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)]
pub enum ExportError {
    /// IO error when writing the output file
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Render a converted document as a standalone HTML page
///
/// # Parameters
/// * `document` - The converted document
/// * `title` - Page title, usually the input file stem
///
/// # Returns
/// * The complete HTML page
pub fn to_html_page(document: &ConvertedDocument, title: &str) -> String {
    let mut output = String::new();
    write_html_header(&mut output, title);
    output.push_str(&document.to_html_string());
    output.push('\n');
    write_html_footer(&mut output);
    output
}

/// Write a converted document to an HTML file
///
/// Parent directories are created as needed.
///
/// # Parameters
/// * `document` - The converted document
/// * `title` - Page title, ignored for fragments
/// * `output_path` - Path of the HTML file to write
/// * `fragment` - Write the bare element markup instead of a full page
///
/// # Returns
/// * `Ok(())` - Successfully wrote the HTML file
/// * `Err(ExportError)` - Error creating directories or writing the file
pub fn write_html(
    document: &ConvertedDocument,
    title: &str,
    output_path: &Path,
    fragment: bool,
) -> Result<(), ExportError> {
    let html = if fragment {
        document.to_html_string()
    } else {
        to_html_page(document, title)
    };

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(output_path, html)?;

    log::info!("Wrote {}", output_path.display());
    Ok(())
}

fn write_html_header(output: &mut String, title: &str) {
    output.push_str("<!DOCTYPE html>\n");
    output.push_str("<html lang=\"de\">\n");
    output.push_str("<head>\n");
    output.push_str("<meta charset=\"UTF-8\">\n");
    output.push_str(
        "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
    );
    output.push_str(&format!("<title>{}</title>\n", escape_html(title)));
    output.push_str("<style>\n");
    output.push_str(CSS_STYLES);
    output.push_str("</style>\n");
    output.push_str("</head>\n");
    output.push_str("<body>\n");
    output.push_str("<div class=\"container\">\n");
}

fn write_html_footer(output: &mut String) {
    output.push_str("</div>\n");
    output.push_str("</body>\n");
    output.push_str("</html>\n");
}

const CSS_STYLES: &str = r#"
body {
    font-family: 'Times New Roman', Times, serif;
    line-height: 1.5;
    color: #000;
    background-color: #f5f5f5;
    padding: 20px;
}

.container {
    max-width: 900px;
    margin: 0 auto;
    background: white;
    padding: 40px 60px;
}

p {
    margin: 0 0 0.6em 0;
}

border-number {
    display: flex;
    align-items: flex-start;
    margin-bottom: 0.6em;
}

border-number > number {
    flex: 0 0 3em;
    margin-left: -3.5em;
    text-align: right;
    padding-right: 0.5em;
    color: #555;
}

border-number > content {
    display: block;
    flex: 1 1 auto;
}

table {
    border-collapse: collapse;
    margin: 0.6em 0;
}

td {
    padding: 2px 6px;
}

ol, ul {
    margin: 0 0 0.6em 0;
}

img {
    max-width: 100%;
}
"#;
