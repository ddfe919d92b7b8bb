//! caselaw-docx - court decision converter
//!
//! A CLI tool for converting court decisions written in Word into
//! structured HTML with nested border numbers.

#![deny(unsafe_code)]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(clippy::all))]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

mod cli;

use anyhow::{Context, Result};
use caselaw_docx::converter_config::{ConverterConfig, CONFIG_FILE_NAME};
use caselaw_docx::pipeline;
use clap::Parser;
use cli::{Cli, Commands, ProfileArg};
use std::path::{Path, PathBuf};

/// Main entry point for the caselaw-docx CLI application
fn main() {
    match run() {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {:?}", e);
            std::process::exit(1);
        }
    }
}

/// Run the CLI application
///
/// # Returns
/// * `Ok(i32)` - Process exit code
/// * `Err(anyhow::Error)` - A command failed
fn run() -> Result<i32> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            inputs,
            output,
            config,
            profile,
            fragment,
            verbose,
        } => {
            init_logging(verbose);
            handle_convert_command(inputs, output, config, profile, fragment)
        }

        Commands::Check {
            input,
            config,
            verbose,
        } => {
            init_logging(verbose);
            handle_check_command(input, config)
        }

        Commands::InitConfig { path, force } => {
            handle_init_config_command(path, force)?;
            Ok(0)
        }
    }
}

/// Initialize logging from `RUST_LOG`, raised to info when verbose
fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::from_default_env();
    if verbose {
        builder.filter_level(log::LevelFilter::Info);
    }
    builder.init();
}

/// Load the configuration file, falling back to the defaults
///
/// Without an explicit path, `caselaw-docx.toml` in the working directory
/// is used when it exists.
fn load_config(path: Option<&Path>) -> Result<ConverterConfig> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => {
            let default_path = PathBuf::from(CONFIG_FILE_NAME);
            if !default_path.is_file() {
                log::debug!("No {} found, using defaults", CONFIG_FILE_NAME);
                return Ok(ConverterConfig::default());
            }
            default_path
        }
    };

    let config = ConverterConfig::load(&path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    log::info!("Loaded configuration from {}", path.display());
    Ok(config)
}

/// Handle the convert command
fn handle_convert_command(
    inputs: Vec<PathBuf>,
    output: Option<PathBuf>,
    config_path: Option<PathBuf>,
    profile: Option<ProfileArg>,
    fragment: bool,
) -> Result<i32> {
    let mut config = load_config(config_path.as_deref())?;
    if let Some(profile) = profile {
        config.profile = profile.into();
    }

    let files = pipeline::discover_inputs(&inputs).context("Failed to collect input documents")?;
    if files.is_empty() {
        anyhow::bail!("No .docx files found");
    }

    println!("Converting {} documents...", files.len());
    let jobs = pipeline::plan_jobs(&files, output.as_deref());
    let results = pipeline::run_jobs(jobs, &config, fragment);

    let mut failed = 0;
    for job_result in &results {
        match &job_result.result {
            Ok(document) => println!(
                "✓ {} -> {} ({} border numbers, {} unhandled)",
                job_result.job.input.display(),
                job_result.job.output.display(),
                document.border_number_count(),
                document.diagnostics.unhandled.len()
            ),
            Err(e) => {
                failed += 1;
                eprintln!("✗ {}", e);
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} documents failed", failed, results.len());
    }
    Ok(0)
}

/// Handle the check command
///
/// Exits with code 1 when the document contains unhandled elements.
fn handle_check_command(input: PathBuf, config_path: Option<PathBuf>) -> Result<i32> {
    let config = load_config(config_path.as_deref())?;
    let document = pipeline::convert_file(&input, &config)
        .with_context(|| format!("Failed to convert {}", input.display()))?;

    let diagnostics = &document.diagnostics;
    println!("Document: {}", input.display());
    println!("  - {} top-level elements", document.elements.len());
    println!("  - {} border numbers", document.border_number_count());

    if !diagnostics.warnings.is_empty() {
        println!("\nWarnings:");
        for warning in &diagnostics.warnings {
            println!("  {}", warning);
        }
    }

    if diagnostics.unhandled.is_empty() {
        println!("\n✓ No unhandled elements");
        return Ok(0);
    }

    println!("\nUnhandled elements:");
    for element in &diagnostics.unhandled {
        println!("  {}", element);
    }
    Ok(1)
}

/// Handle the init-config command
fn handle_init_config_command(path: Option<PathBuf>, force: bool) -> Result<()> {
    let path = path.unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));

    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite it",
            path.display()
        );
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
    }

    ConverterConfig::default()
        .save(&path)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("✓ Wrote default configuration to {}", path.display());
    Ok(())
}
