//! core::source
//!
//! Metadata source contract and its two implementations.
//!
//! # Design
//!
//! Global and pixel metadata arrive either as a JSON file on disk or as an
//! already-built document in memory. Both satisfy one load contract,
//! [`MetadataSource`], so the store never cares which it owns:
//!
//! - [`PathSource`] reads, parses, and validates a JSON file on every
//!   `load` call (the store caches, so this happens once).
//! - [`MemorySource`] hands out a copy of its document.
//!
//! Required-key validation happens here for path-backed sources, against the
//! raw JSON object before it is typed, so a missing key surfaces as
//! [`StoreError::MissingKey`] rather than a parse failure.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::store::{Document, StoreError};

/// Errors from constructing a source.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SourceError {
    /// The path argument was empty.
    #[error("source path cannot be empty")]
    EmptyPath,
}

/// Contract shared by path-backed and memory-backed metadata sources.
pub trait MetadataSource<D> {
    /// Materialize the document.
    fn load(&self) -> Result<D, StoreError>;

    /// Human-readable origin for diagnostics.
    fn origin(&self) -> String;
}

/// A source backed by a JSON file on disk.
///
/// # Example
///
/// ```no_run
/// use specmeta::core::global::GlobalData;
/// use specmeta::core::source::{MetadataSource, PathSource};
///
/// let source = PathSource::new("data/sample1.global").unwrap();
/// let data: GlobalData = source.load().unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct PathSource {
    path: PathBuf,
}

impl PathSource {
    /// Create a path-backed source.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::EmptyPath`] for an empty path.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, SourceError> {
        let path = path.into();
        if path.as_os_str().is_empty() {
            return Err(SourceError::EmptyPath);
        }
        Ok(Self { path })
    }

    /// The backing path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<D: Document> MetadataSource<D> for PathSource {
    fn load(&self) -> Result<D, StoreError> {
        if !self.path.exists() {
            return Err(StoreError::NotFound {
                path: self.path.clone(),
            });
        }

        let text = fs::read_to_string(&self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;

        let origin = self.path.display().to_string();
        let value: serde_json::Value =
            serde_json::from_str(&text).map_err(|e| StoreError::Parse {
                origin: origin.clone(),
                message: e.to_string(),
            })?;

        let serde_json::Value::Object(object) = value else {
            return Err(StoreError::Parse {
                origin,
                message: "top level must be a JSON object".to_string(),
            });
        };

        for key in D::REQUIRED_KEYS {
            if !object.contains_key(*key) {
                return Err(StoreError::MissingKey {
                    key: (*key).to_string(),
                    origin,
                });
            }
        }

        D::from_object(object, &origin)
    }

    fn origin(&self) -> String {
        self.path.display().to_string()
    }
}

/// A source backed by an in-memory document.
///
/// `load` hands out a copy; the store caches it, so the copy is made once.
#[derive(Debug, Clone)]
pub struct MemorySource<D> {
    data: D,
}

impl<D> MemorySource<D> {
    /// Wrap an in-memory document.
    pub fn new(data: D) -> Self {
        Self { data }
    }
}

impl<D: Clone> MetadataSource<D> for MemorySource<D> {
    fn load(&self) -> Result<D, StoreError> {
        Ok(self.data.clone())
    }

    fn origin(&self) -> String {
        "in-memory data".to_string()
    }
}
