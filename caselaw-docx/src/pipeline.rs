//! Batch conversion pipeline
//!
//! This module drives the three stages for every input document:
//! 1. **Loading**: Read the package parts into the source model
//! 2. **Conversion**: Build and post-process the output element tree
//! 3. **Export**: Write the HTML page or fragment
//!
//! Documents are independent of each other, so a batch is processed in
//! parallel when the `parallel` feature is enabled.

use crate::converter;
use crate::converter_config::ConverterConfig;
use crate::document_model::ConvertedDocument;
use crate::error::{ConverterError, LoadError};
use crate::export::{self, ExportError};
use crate::loader::load_docx;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Prefix of the lock files Word keeps next to open documents
const LOCK_FILE_PREFIX: &str = "~$";

/// A discovered input document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
    /// Path of the `.docx` file
    pub path: PathBuf,
    /// Path relative to the directory it was found in, or the file name
    pub relative: PathBuf,
}

/// One input document and where its output goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionJob {
    pub input: PathBuf,
    pub output: PathBuf,
}

/// Outcome of one job
#[derive(Debug)]
pub struct JobResult {
    pub job: ConversionJob,
    pub result: Result<ConvertedDocument, PipelineError>,
}

/// Collect the `.docx` files named by the inputs
///
/// Directories are searched recursively. Word lock files (`~$name.docx`)
/// are skipped.
///
/// # Parameters
/// * `inputs` - Files or directories given on the command line
///
/// # Returns
/// * `Ok(Vec<InputFile>)` - Discovered documents, sorted per directory
/// * `Err(PipelineError)` - An input does not exist
pub fn discover_inputs(inputs: &[PathBuf]) -> Result<Vec<InputFile>, PipelineError> {
    let mut files = Vec::new();

    for input in inputs {
        if input.is_file() {
            let relative = input
                .file_name()
                .map(PathBuf::from)
                .unwrap_or_else(|| input.clone());
            files.push(InputFile {
                path: input.clone(),
                relative,
            });
        } else if input.is_dir() {
            let mut found: Vec<InputFile> = WalkDir::new(input)
                .follow_links(false)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.path().is_file() && is_docx(e.path()))
                .map(|e| InputFile {
                    path: e.path().to_path_buf(),
                    relative: e
                        .path()
                        .strip_prefix(input)
                        .unwrap_or(e.path())
                        .to_path_buf(),
                })
                .collect();
            found.sort_by(|a, b| a.path.cmp(&b.path));
            log::debug!("Found {} documents in {}", found.len(), input.display());
            files.extend(found);
        } else {
            return Err(PipelineError::MissingInput(input.clone()));
        }
    }

    Ok(files)
}

fn is_docx(path: &Path) -> bool {
    let has_extension = path
        .extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("docx"));
    let is_lock_file = path
        .file_name()
        .and_then(|s| s.to_str())
        .is_some_and(|name| name.starts_with(LOCK_FILE_PREFIX));
    has_extension && !is_lock_file
}

/// Decide where each document's HTML goes
///
/// Without an output path every document is written next to its input.
/// A single document is written to the output path itself unless that is
/// an existing directory; several documents go below the output directory,
/// keeping their relative paths.
pub fn plan_jobs(files: &[InputFile], output: Option<&Path>) -> Vec<ConversionJob> {
    let into_directory = files.len() > 1 || output.is_some_and(Path::is_dir);

    files
        .iter()
        .map(|file| {
            let target = match output {
                None => file.path.with_extension("html"),
                Some(out) if into_directory => out.join(&file.relative).with_extension("html"),
                Some(out) => out.to_path_buf(),
            };
            ConversionJob {
                input: file.path.clone(),
                output: target,
            }
        })
        .collect()
}

/// Load and convert one document
///
/// # Parameters
/// * `path` - Path of the `.docx` file
/// * `config` - Converter configuration
///
/// # Returns
/// * `Ok(ConvertedDocument)` - The converted document with its diagnostics
/// * `Err(PipelineError)` - Error loading the package or a fatal conversion error
pub fn convert_file(
    path: &Path,
    config: &ConverterConfig,
) -> Result<ConvertedDocument, PipelineError> {
    let package =
        load_docx(path).map_err(|e| PipelineError::LoadError(path.to_path_buf(), Box::new(e)))?;

    let document = converter::convert(&package, config)
        .map_err(|e| PipelineError::ConvertError(path.to_path_buf(), e))?;

    log::info!(
        "Converted {}: {} elements, {} border numbers, {} unhandled",
        path.display(),
        document.elements.len(),
        document.border_number_count(),
        document.diagnostics.unhandled.len()
    );
    Ok(document)
}

/// Convert one job and write its output
pub fn run_job(
    job: &ConversionJob,
    config: &ConverterConfig,
    fragment: bool,
) -> Result<ConvertedDocument, PipelineError> {
    let document = convert_file(&job.input, config)?;
    let title = job
        .input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("document");
    export::write_html(&document, title, &job.output, fragment)
        .map_err(|e| PipelineError::ExportError(job.output.clone(), e))?;
    Ok(document)
}

/// Run all jobs, each independently of the others
///
/// A failing document does not stop the batch; its error is part of the
/// returned results, which keep the job order.
pub fn run_jobs(
    jobs: Vec<ConversionJob>,
    config: &ConverterConfig,
    fragment: bool,
) -> Vec<JobResult> {
    #[cfg(feature = "parallel")]
    let results: Vec<JobResult> = jobs
        .into_par_iter()
        .map(|job| {
            let result = run_job(&job, config, fragment);
            JobResult { job, result }
        })
        .collect();

    #[cfg(not(feature = "parallel"))]
    let results: Vec<JobResult> = jobs
        .into_iter()
        .map(|job| {
            let result = run_job(&job, config, fragment);
            JobResult { job, result }
        })
        .collect();

    results
}

/// Pipeline errors
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)]
pub enum PipelineError {
    #[error("Input does not exist: {path}", path = .0.display())]
    MissingInput(PathBuf),

    #[error("Error loading {path}: {source}", path = .0.display(), source = .1)]
    LoadError(PathBuf, #[source] Box<LoadError>),

    #[error("Error converting {path}: {source}", path = .0.display(), source = .1)]
    ConvertError(PathBuf, #[source] ConverterError),

    #[error("Error writing {path}: {source}", path = .0.display(), source = .1)]
    ExportError(PathBuf, #[source] ExportError),
}
