//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--debug`: Enable debug output
//! - `--quiet` / `-q`: Minimal output

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// specmeta - Metadata tooling for hyper-spectral imaging samples
#[derive(Parser, Debug)]
#[command(name = "spm")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug output
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add spreadsheet metadata to global metadata files
    #[command(
        name = "add",
        long_about = "Add (global) metadata stored in a spreadsheet to metadata JSON \
            files (ext: .global).\n\n\
            The spreadsheet's sample-id column is matched against the sample_id field \
            of each .global file found under the directory; matching files get every \
            selected column written as a global field and are saved back in place. \
            Files without a match are left untouched.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Apply measurements.csv to all samples under ./scans
    spm add -p scans -s measurements.csv

    # Recurse into subdirectories, pretty-print with 2 spaces
    spm add -p scans -s measurements.csv -r -I 2

    # Sample ids live in column 3; ingest only columns 4-6
    spm add -p scans -s measurements.csv -i 3 -m 4-6

COLUMN SELECTORS:
    Columns are addressed 1-based. An index is 'first', 'last', or a
    number; a range is a comma-separated list of indices and inclusive
    spans, e.g. 'first-last' or '2,4-6'. The sample-id column is
    excluded from the metadata range automatically."
    )]
    Add {
        /// The directory with the metadata files (ext: .global)
        #[arg(short, long, value_name = "DIR")]
        path: PathBuf,

        /// The spreadsheet with the metadata to add (csv/tsv)
        #[arg(short, long, value_name = "FILE")]
        spreadsheet: PathBuf,

        /// Look for metadata files recursively
        #[arg(short, long)]
        recursive: bool,

        /// The column with the sample ID (1-based index)
        #[arg(short = 'i', long, value_name = "INDEX", default_value = "first")]
        sample_id_col: String,

        /// The range of columns with sample data (1-based indices)
        #[arg(short = 'm', long, value_name = "RANGE", default_value = "first-last")]
        meta_cols: String,

        /// The indentation for pretty-printing the JSON files
        #[arg(short = 'I', long, value_name = "INT")]
        indent: Option<usize>,
    },

    /// Show the metadata stored for a sample
    #[command(
        name = "show",
        long_about = "Show the metadata stored for a sample.\n\n\
            The argument is used as a filename template: <base>.global and \
            <base>.pixels are derived from it, so any of the sample's files \
            (or the extension-less base) names the sample. Pixel metadata is \
            only loaded with --full; without it the pixel store is reported \
            as not loaded.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Show global metadata for a sample
    spm show scans/sample1.global

    # Also load the pixel file and report its size
    spm show scans/sample1 --full"
    )]
    Show {
        /// Filename template of the sample (any extension)
        template: PathBuf,

        /// Also load the pixel metadata
        #[arg(long)]
        full: bool,
    },

    /// Generate shell completion scripts
    #[command(name = "completion")]
    Completion {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
