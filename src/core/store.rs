//! core::store
//!
//! Lazy metadata store over a single source.
//!
//! # Architecture
//!
//! A [`MetadataStore`] wraps one [`MetadataSource`] — either a JSON file on
//! disk or an in-memory document — and materializes the document on first
//! access. Once loaded, the document is cached for the store's lifetime and
//! never re-validated. Mutation happens on the cached document only;
//! persistence is the caller's responsibility.
//!
//! # State Machine
//!
//! `UNLOADED → LOADED`, one-way, triggered by the first [`data`] or
//! [`data_mut`] access. A failed load leaves the store unloaded.
//!
//! [`data`]: MetadataStore::data
//! [`data_mut`]: MetadataStore::data_mut
//!
//! # Example
//!
//! ```
//! use specmeta::core::global::GlobalData;
//! use specmeta::core::store::MetadataStore;
//!
//! let mut store = MetadataStore::from_data(GlobalData::new("none", "S1"));
//! assert!(!store.is_loaded());
//!
//! let data = store.data().unwrap();
//! assert_eq!(data.get("sample_id").unwrap().as_str(), Some("S1"));
//! assert!(store.is_loaded());
//! ```

use std::path::PathBuf;

use thiserror::Error;

use crate::core::source::{MemorySource, MetadataSource, PathSource, SourceError};
use crate::core::types::TypeError;

/// Errors from loading and validating metadata documents.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing file does not exist.
    #[error("metadata file does not exist: {path}")]
    NotFound {
        /// The missing path
        path: PathBuf,
    },

    /// The backing file could not be read.
    #[error("failed to read metadata file '{path}': {source}")]
    Io {
        /// The unreadable path
        path: PathBuf,
        /// The underlying I/O error
        source: std::io::Error,
    },

    /// The document is not well-formed.
    #[error("failed to parse metadata from {origin}: {message}")]
    Parse {
        /// Human-readable origin (path or "in-memory data")
        origin: String,
        /// What went wrong
        message: String,
    },

    /// A required key is absent from the loaded document.
    #[error("missing meta-data key '{key}' in {origin}")]
    MissingKey {
        /// The absent key
        key: String,
        /// Human-readable origin
        origin: String,
    },

    /// A field holds a value outside the primitive set.
    #[error("invalid value for '{field}' in {origin}: {source}")]
    InvalidValue {
        /// The offending field
        field: String,
        /// Human-readable origin
        origin: String,
        /// The underlying conversion error
        source: TypeError,
    },

    /// Invalid source argument.
    #[error(transparent)]
    Source(#[from] SourceError),
}

/// A typed metadata document.
///
/// Implemented by the two document kinds — global and pixel metadata. The
/// contract covers what a [`MetadataSource`] needs to materialize a document
/// from raw JSON and what a store needs to write one back out.
pub trait Document: Sized {
    /// Keys that must be present in the raw JSON object.
    ///
    /// Path-backed sources check these after parsing and before typing;
    /// absence is a [`StoreError::MissingKey`].
    const REQUIRED_KEYS: &'static [&'static str];

    /// Build the document from a parsed JSON object.
    ///
    /// `origin` is a human-readable description of where the object came
    /// from, used in error messages.
    fn from_object(
        object: serde_json::Map<String, serde_json::Value>,
        origin: &str,
    ) -> Result<Self, StoreError>;

    /// Render the document as a JSON value for serialization.
    fn to_value(&self) -> serde_json::Value;
}

/// Serialize a JSON value as UTF-8 text.
///
/// `indent = None` produces compact output; `Some(n)` pretty-prints with
/// n-space indentation.
pub fn to_json_text(
    value: &serde_json::Value,
    indent: Option<usize>,
) -> Result<String, serde_json::Error> {
    match indent {
        None => serde_json::to_string(value),
        Some(width) => {
            let indent = vec![b' '; width];
            let formatter = serde_json::ser::PrettyFormatter::with_indent(&indent);
            let mut buf = Vec::new();
            let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
            serde::Serialize::serialize(value, &mut ser)?;
            // The formatter only ever emits UTF-8
            Ok(String::from_utf8_lossy(&buf).into_owned())
        }
    }
}

/// Lazy store over a single metadata source.
///
/// See the module docs for the load contract. The store is generic over the
/// document type; required-key validation is intrinsic to the document
/// (see [`Document::REQUIRED_KEYS`]).
pub struct MetadataStore<D> {
    source: Box<dyn MetadataSource<D>>,
    cache: Option<D>,
}

impl<D: Document + 'static> MetadataStore<D> {
    /// Create a store backed by a JSON file.
    ///
    /// The file is not touched here; reading and validation happen on first
    /// access.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::EmptyPath`] for an empty path.
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self, SourceError> {
        Ok(Self::with_source(Box::new(PathSource::new(path)?)))
    }
}

impl<D: Clone + 'static> MetadataStore<D> {
    /// Create a store backed by an in-memory document.
    ///
    /// The document is materialized lazily like any other source: the store
    /// reports unloaded until the first data access.
    pub fn from_data(data: D) -> Self {
        Self::with_source(Box::new(MemorySource::new(data)))
    }
}

impl<D> MetadataStore<D> {
    /// Create a store over an explicit source.
    pub fn with_source(source: Box<dyn MetadataSource<D>>) -> Self {
        Self {
            source,
            cache: None,
        }
    }

    /// Access the document, loading it if necessary.
    ///
    /// # Errors
    ///
    /// Propagates the source's load failure. A failed load leaves the store
    /// unloaded; a later access retries.
    pub fn data(&mut self) -> Result<&D, StoreError> {
        self.data_mut().map(|doc| &*doc)
    }

    /// Mutable access to the document, loading it if necessary.
    pub fn data_mut(&mut self) -> Result<&mut D, StoreError> {
        if self.cache.is_none() {
            let doc = self.source.load()?;
            self.cache = Some(doc);
        }
        match self.cache.as_mut() {
            Some(doc) => Ok(doc),
            None => unreachable!("cache populated above"),
        }
    }

    /// Whether the document has been materialized.
    ///
    /// Never triggers loading.
    pub fn is_loaded(&self) -> bool {
        self.cache.is_some()
    }

    /// The cached document, if loaded.
    ///
    /// Never triggers loading; inspection stays side-effect free.
    pub fn cached(&self) -> Option<&D> {
        self.cache.as_ref()
    }

    /// Human-readable description of the store's origin.
    pub fn origin(&self) -> String {
        self.source.origin()
    }
}

impl<D: std::fmt::Debug> std::fmt::Debug for MetadataStore<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetadataStore")
            .field("origin", &self.source.origin())
            .field("cache", &self.cache)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::global::GlobalData;

    #[test]
    fn memory_store_is_lazy() {
        let store = MetadataStore::from_data(GlobalData::new("none", "S1"));
        assert!(!store.is_loaded());
        assert!(store.cached().is_none());
    }

    #[test]
    fn load_transition_is_one_way() {
        let mut store = MetadataStore::from_data(GlobalData::new("none", "S1"));
        store.data().unwrap();
        assert!(store.is_loaded());

        // Mutation keeps the store loaded
        store.data_mut().unwrap().set("field", 1.into());
        assert!(store.is_loaded());
    }

    #[test]
    fn empty_path_rejected() {
        let result = MetadataStore::<GlobalData>::from_path("");
        assert!(matches!(result, Err(SourceError::EmptyPath)));
    }

    #[test]
    fn missing_file_fails_on_access_not_construction() {
        let mut store =
            MetadataStore::<GlobalData>::from_path("/nonexistent/sample.global").unwrap();
        assert!(!store.is_loaded());

        let result = store.data();
        assert!(matches!(result, Err(StoreError::NotFound { .. })));

        // Failed load must not mark the store as loaded
        assert!(!store.is_loaded());
    }

    #[test]
    fn compact_and_pretty_json() {
        let value = serde_json::json!({"a": 1, "b": {"c": 2}});

        let compact = to_json_text(&value, None).unwrap();
        assert!(!compact.contains('\n'));

        let pretty = to_json_text(&value, Some(2)).unwrap();
        assert!(pretty.contains("\n  \"a\": 1"));

        let wide = to_json_text(&value, Some(4)).unwrap();
        assert!(wide.contains("\n    \"a\": 1"));
    }
}
