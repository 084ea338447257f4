//! core::paths
//!
//! Filename derivation for the two metadata files.
//!
//! # Layout
//!
//! Each sample is stored as a pair of files sharing a base name:
//! - `<base>.global` - global metadata (mandatory)
//! - `<base>.pixels` - pixel metadata (optional)
//!
//! Derivation is extension-agnostic: any extension on the template is
//! replaced, and a template without one gets the extension appended.
//!
//! # Example
//!
//! ```
//! use specmeta::core::paths;
//! use std::path::{Path, PathBuf};
//!
//! let template = Path::new("data/sample1.hdr");
//! assert_eq!(paths::global_path(template), PathBuf::from("data/sample1.global"));
//! assert_eq!(paths::pixels_path(template), PathBuf::from("data/sample1.pixels"));
//! ```

use std::path::{Path, PathBuf};

/// Extension of global metadata files.
pub const GLOBAL_EXT: &str = "global";

/// Extension of pixel metadata files.
pub const PIXELS_EXT: &str = "pixels";

/// Derive the global metadata path from a template.
pub fn global_path(template: &Path) -> PathBuf {
    template.with_extension(GLOBAL_EXT)
}

/// Derive the pixel metadata path from a template.
pub fn pixels_path(template: &Path) -> PathBuf {
    template.with_extension(PIXELS_EXT)
}

/// Derive the file pair for a sample saved under a directory.
pub fn sample_paths(directory: &Path, sample_id: &str) -> (PathBuf, PathBuf) {
    (
        directory.join(format!("{sample_id}.{GLOBAL_EXT}")),
        directory.join(format!("{sample_id}.{PIXELS_EXT}")),
    )
}

/// Whether a path names a global metadata file.
pub fn is_global_file(path: &Path) -> bool {
    path.extension().map_or(false, |ext| ext == GLOBAL_EXT)
}
