//! caselaw-docx - court decision converter
//!
//! Converts court decisions stored as Word documents into a structured
//! element tree that renders to inline-styled HTML. Marginal paragraph
//! numbers (border numbers) become `<border-number>` elements that own the
//! paragraphs following them.
//!
//! The library is organised along the conversion stages:
//! 1. [`loader`] reads a `.docx` package into the [`source_model`]
//! 2. [`converter`] builds the [`document_model`] tree and nests border numbers
//! 3. [`export`] writes HTML pages or fragments
//!
//! [`pipeline`] runs these stages for batches of files.

#![deny(unsafe_code)]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(clippy::all))]
// Allow some pedantic lints that are too strict for this project
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::enum_variant_names)]

pub mod converter;
pub mod converter_config;
pub mod diagnostics;
pub mod document_model;
pub mod error;
pub mod export;
pub mod images;
pub mod loader;
pub mod pipeline;
pub mod source_model;
pub mod style;
pub mod units;

pub use converter::{convert, DocumentConverter};
pub use converter_config::{ConverterConfig, Profile};
pub use diagnostics::Diagnostics;
pub use document_model::{ConvertedDocument, DocumentElement};
pub use error::{ConverterError, LoadError};
pub use loader::{load_docx, load_docx_bytes};
