//! spm - specmeta command-line entry point.
//!
//! All work happens in [`specmeta::cli::run`]; this shim only maps the
//! result onto a process exit code, printing the error chain on failure.

use std::process::ExitCode;

fn main() -> ExitCode {
    match specmeta::cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            specmeta::ui::output::error(format!("{err:?}"));
            ExitCode::FAILURE
        }
    }
}
