//! Error types for package loading and conversion

use thiserror::Error;

/// Errors that abort the conversion of a whole document
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConverterError {
    /// A drawing must carry exactly one inline or anchored graphic
    #[error("Drawing must contain exactly one graphic payload, but found {count}")]
    MultipleGraphicPayloads {
        /// Number of payloads found
        count: usize,
    },

    /// An inline or anchored drawing without graphic data
    #[error("Missing graphic data in {placement} drawing")]
    MissingGraphicData {
        /// `inline` or `anchor`
        placement: &'static str,
    },
}

/// Errors that can occur while reading a `.docx` package
#[derive(Error, Debug)]
pub enum LoadError {
    /// IO error when reading the file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not a valid ZIP container
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// A package part is not well-formed XML
    #[error("XML error in {part}: {source}")]
    Xml {
        /// Part name inside the package
        part: String,
        /// Parser error
        source: roxmltree::Error,
    },

    /// The package has no main document part
    #[error("Package has no main document part ({0})")]
    MissingDocument(String),
}
