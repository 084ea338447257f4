//! add command - Apply spreadsheet metadata to .global files
//!
//! Wires the ingest and walk layers together: spreadsheet in, updated
//! metadata files out, one line of reporting per visited file.

use std::path::Path;

use anyhow::{Context as _, Result};

use crate::cli::Context;
use crate::core::config::Config;
use crate::ingest::columns::{ColumnIndex, ColumnRange};
use crate::ingest::{build_lookup, SpreadsheetTable};
use crate::ui::output;
use crate::walk::{apply_updates, WalkOptions};

/// Apply spreadsheet metadata to the `.global` files under a directory.
///
/// # Arguments
///
/// * `ctx` - Execution context
/// * `path` - Directory holding the metadata files
/// * `spreadsheet` - CSV/TSV file with the metadata to add
/// * `recursive` - Recurse into subdirectories
/// * `sample_id_col` - 1-based selector of the sample-id column
/// * `meta_cols` - 1-based range of metadata columns
/// * `indent` - Indent width for files written back
///
/// The `recursive` flag and `indent` fall back to the user configuration
/// when not given on the command line.
pub fn add(
    ctx: &Context,
    path: &Path,
    spreadsheet: &Path,
    recursive: bool,
    sample_id_col: &str,
    meta_cols: &str,
    indent: Option<usize>,
) -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;
    let recursive = recursive || config.recursive.unwrap_or(false);
    let indent = indent.or(config.indent);

    let sample_id: ColumnIndex = sample_id_col
        .parse()
        .context("Invalid sample-id column selector")?;
    let metadata: ColumnRange = meta_cols
        .parse()
        .context("Invalid metadata column range")?;

    output::debug(
        format!("reading spreadsheet: {}", spreadsheet.display()),
        ctx.verbosity,
    );
    let table = SpreadsheetTable::read(spreadsheet)?;
    let lookup = build_lookup(&table, &sample_id, &metadata)?;
    output::debug(
        format!("spreadsheet has metadata for {} sample(s)", lookup.len()),
        ctx.verbosity,
    );

    output::print(format!("Dir: {}", path.display()), ctx.verbosity);
    let options = WalkOptions { recursive, indent };
    let reports = apply_updates(path, &lookup, &options)?;

    for report in &reports {
        let status = if report.updated {
            "updated"
        } else {
            "no meta-data"
        };
        output::print(
            format!("- {}: {}", report.path.display(), status),
            ctx.verbosity,
        );
    }

    let updated = reports.iter().filter(|r| r.updated).count();
    output::print(
        format!("{updated} of {} file(s) updated", reports.len()),
        ctx.verbosity,
    );
    Ok(())
}
