//! show command - Display a sample's metadata

use std::path::Path;

use anyhow::Result;

use crate::cli::Context;
use crate::core::sample::SampleMetadata;
use crate::ui::output;

/// Show the metadata stored for a sample.
///
/// Loads the global store; the pixel store is only loaded with `full`, so
/// a plain `show` reports it as not loaded rather than reading a
/// potentially large file.
pub fn show(ctx: &Context, template: &Path, full: bool) -> Result<()> {
    let mut meta = SampleMetadata::load(template)?;

    meta.global_data()?;
    if full {
        meta.pixel_data()?;
    }

    output::print(&meta, ctx.verbosity);
    Ok(())
}
