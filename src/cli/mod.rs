//! cli
//!
//! Command-line interface layer.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Delegate to command handlers
//! - Does NOT touch metadata files directly
//!
//! # Architecture
//!
//! The CLI layer is thin. It parses arguments via clap and dispatches to
//! the handlers in [`commands`], which drive the [`crate::ingest`],
//! [`crate::walk`], and [`crate::core`] layers. This is the only place
//! where errors are caught broadly; everything below fails fast.

pub mod args;
pub mod commands;

pub use args::{Cli, Command};

use anyhow::Result;

use crate::ui::output::Verbosity;

/// Execution context shared by command handlers.
#[derive(Debug, Clone, Copy)]
pub struct Context {
    /// Output verbosity derived from the global flags.
    pub verbosity: Verbosity,
}

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();

    let ctx = Context {
        verbosity: Verbosity::from_flags(cli.quiet, cli.debug),
    };

    commands::dispatch(cli.command, &ctx)
}
