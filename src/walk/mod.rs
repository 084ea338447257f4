//! walk
//!
//! Directory pass that applies ingested metadata to `.global` files.
//!
//! # Behavior
//!
//! The walker enumerates `*.global` files under a root (recursing into
//! subdirectories when asked), loads each as a [`SampleMetadata`], and for
//! samples whose id appears in the lookup, sets every field and writes the
//! global file back in place. Pixel files are never touched.
//!
//! Entries are visited in path order so runs are deterministic. Failures
//! propagate immediately; there is no partial-success accounting beyond
//! the files already written.
//!
//! [`SampleMetadata`]: crate::core::sample::SampleMetadata

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::paths::is_global_file;
use crate::core::sample::{MetadataError, SampleMetadata};
use crate::ingest::Lookup;

/// Errors from the directory pass.
#[derive(Debug, Error)]
pub enum WalkError {
    /// A directory could not be enumerated.
    #[error("failed to read directory '{path}': {source}")]
    ReadDir {
        /// The unreadable directory
        path: PathBuf,
        /// The underlying I/O error
        source: std::io::Error,
    },

    /// A metadata file failed to load or save.
    #[error(transparent)]
    Metadata(#[from] MetadataError),
}

/// Options for a directory pass.
#[derive(Debug, Clone, Default)]
pub struct WalkOptions {
    /// Recurse into subdirectories.
    pub recursive: bool,
    /// Indent width for files written back; `None` writes compact JSON.
    pub indent: Option<usize>,
}

/// Outcome for one visited `.global` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    /// The file visited.
    pub path: PathBuf,
    /// Whether the spreadsheet had metadata for this sample.
    pub updated: bool,
}

/// Apply per-sample updates to every `.global` file under `root`.
///
/// Returns a report per visited file, in visit order.
pub fn apply_updates(
    root: &Path,
    lookup: &Lookup,
    options: &WalkOptions,
) -> Result<Vec<FileReport>, WalkError> {
    let mut reports = Vec::new();
    visit(root, lookup, options, &mut reports)?;
    Ok(reports)
}

fn visit(
    dir: &Path,
    lookup: &Lookup,
    options: &WalkOptions,
    reports: &mut Vec<FileReport>,
) -> Result<(), WalkError> {
    let entries = fs::read_dir(dir).map_err(|source| WalkError::ReadDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| WalkError::ReadDir {
            path: dir.to_path_buf(),
            source,
        })?;
        paths.push(entry.path());
    }
    paths.sort();

    for path in paths {
        if path.is_dir() {
            if options.recursive {
                visit(&path, lookup, options, reports)?;
            }
            continue;
        }
        if !is_global_file(&path) {
            continue;
        }

        let mut meta = SampleMetadata::load(&path)?;
        let sample_id = meta.sample_id()?;

        match lookup.get(&sample_id) {
            Some(updates) => {
                for (field, value) in updates {
                    meta.set(field, value.clone(), None, None)?;
                }
                meta.save_global(&path, options.indent)?;
                reports.push(FileReport {
                    path,
                    updated: true,
                });
            }
            None => reports.push(FileReport {
                path,
                updated: false,
            }),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::MetaValue;
    use std::collections::BTreeMap;

    fn write_global(dir: &Path, name: &str, sample_id: &str) -> PathBuf {
        let path = dir.join(format!("{name}.global"));
        let json = format!(r#"{{"filename": "{name}.hdr", "sample_id": "{sample_id}"}}"#);
        fs::write(&path, json).unwrap();
        path
    }

    fn lookup_with(sample_id: &str, field: &str, value: MetaValue) -> Lookup {
        let mut fields = BTreeMap::new();
        fields.insert(field.to_string(), value);
        let mut lookup = Lookup::new();
        lookup.insert(sample_id.to_string(), fields);
        lookup
    }

    #[test]
    fn updates_matching_sample() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_global(dir.path(), "a", "S1");

        let lookup = lookup_with("S1", "crop", "wheat".into());
        let reports = apply_updates(dir.path(), &lookup, &WalkOptions::default()).unwrap();

        assert_eq!(reports.len(), 1);
        assert!(reports[0].updated);

        let mut meta = SampleMetadata::load(&path).unwrap();
        assert_eq!(
            meta.get("crop", None, None).unwrap(),
            Some(MetaValue::from("wheat"))
        );
    }

    #[test]
    fn skips_unmatched_sample() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_global(dir.path(), "a", "S1");
        let before = fs::read_to_string(&path).unwrap();

        let lookup = lookup_with("OTHER", "crop", "wheat".into());
        let reports = apply_updates(dir.path(), &lookup, &WalkOptions::default()).unwrap();

        assert_eq!(reports.len(), 1);
        assert!(!reports[0].updated);
        assert_eq!(fs::read_to_string(&path).unwrap(), before);
    }

    #[test]
    fn recursion_is_opt_in() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("nested");
        fs::create_dir(&sub).unwrap();
        write_global(&sub, "a", "S1");

        let lookup = lookup_with("S1", "crop", "wheat".into());

        let flat = apply_updates(dir.path(), &lookup, &WalkOptions::default()).unwrap();
        assert!(flat.is_empty());

        let deep = apply_updates(
            dir.path(),
            &lookup,
            &WalkOptions {
                recursive: true,
                indent: None,
            },
        )
        .unwrap();
        assert_eq!(deep.len(), 1);
        assert!(deep[0].updated);
    }

    #[test]
    fn ignores_non_global_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("readme.txt"), "x").unwrap();
        fs::write(dir.path().join("a.pixels"), r#"{"type": "row-wise"}"#).unwrap();

        let reports =
            apply_updates(dir.path(), &Lookup::new(), &WalkOptions::default()).unwrap();
        assert!(reports.is_empty());
    }

    #[test]
    fn broken_global_file_fails_fast() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bad.global"), "{not json").unwrap();

        let result = apply_updates(dir.path(), &Lookup::new(), &WalkOptions::default());
        assert!(matches!(result, Err(WalkError::Metadata(_))));
    }
}
