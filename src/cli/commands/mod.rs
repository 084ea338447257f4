//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Validates command-specific arguments
//! 2. Drives the ingest/walk/core layers
//! 3. Formats and displays output

mod add;
mod completion;
mod show;

// Re-export command functions for testing and direct invocation
pub use add::add;
pub use completion::completion;
pub use show::show;

use anyhow::Result;

use crate::cli::args::Command;
use crate::cli::Context;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Add {
            path,
            spreadsheet,
            recursive,
            sample_id_col,
            meta_cols,
            indent,
        } => add::add(
            ctx,
            &path,
            &spreadsheet,
            recursive,
            &sample_id_col,
            &meta_cols,
            indent,
        ),
        Command::Show { template, full } => show::show(ctx, &template, full),
        Command::Completion { shell } => completion::completion(shell),
    }
}
