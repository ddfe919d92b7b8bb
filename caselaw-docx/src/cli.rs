//! Command-line interface definitions for caselaw-docx

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use caselaw_docx::converter_config::Profile;

/// Conversion policy selectable on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ProfileArg {
    /// RandNummer/ListParagraph border numbers, numbered paragraphs always listed
    Standard,
    /// RandNummer/Randziffern border numbers, list levels must be defined
    Alternative,
}

impl From<ProfileArg> for Profile {
    fn from(arg: ProfileArg) -> Self {
        match arg {
            ProfileArg::Standard => Profile::Standard,
            ProfileArg::Alternative => Profile::Alternative,
        }
    }
}

/// CLI structure for the caselaw-docx application
#[derive(Parser)]
#[command(name = "caselaw-docx")]
#[command(version)]
#[command(about = "Convert court decisions from DOCX to structured HTML", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands for caselaw-docx
#[derive(Subcommand)]
pub enum Commands {
    /// Convert .docx files to HTML
    Convert {
        /// Input .docx files or directories to search
        #[arg(value_name = "INPUT", required = true)]
        inputs: Vec<PathBuf>,

        /// Output file for a single input, output directory for several
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Configuration file (defaults to caselaw-docx.toml if present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override the conversion profile of the configuration
        #[arg(long, value_enum)]
        profile: Option<ProfileArg>,

        /// Write the bare element markup instead of a full HTML page
        #[arg(long)]
        fragment: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Convert without writing output and report unhandled elements
    Check {
        /// Input .docx file
        input: PathBuf,

        /// Configuration file (defaults to caselaw-docx.toml if present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Write a default configuration file
    InitConfig {
        /// Target path (defaults to ./caselaw-docx.toml)
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}
