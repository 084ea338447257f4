//! core::sample
//!
//! Per-sample metadata container and the addressing/fallback algorithm.
//!
//! # Architecture
//!
//! A [`SampleMetadata`] composes two lazy stores: one for global metadata
//! (required keys `filename`, `sample_id`) and one for pixel metadata
//! (required key `type`). All reads and writes go through [`get`] and
//! [`set`], which route on whether a pixel address is supplied.
//!
//! # Fallback Resolution
//!
//! A pixel query resolves through up to four layers, most to least
//! specific:
//!
//! 1. the exact pixel cell,
//! 2. the global `default` table's entry for the field,
//! 3. the global flat field,
//! 4. the caller (an `Ok(None)` return; `unwrap_or` supplies a default).
//!
//! A global query checks only the flat field. Resolution never errors on a
//! plain miss; errors are reserved for broken stores and an unresolvable
//! layout tag.
//!
//! [`get`]: SampleMetadata::get
//! [`set`]: SampleMetadata::set
//!
//! # Example
//!
//! ```
//! use specmeta::core::sample::{SampleMetadata, SampleIdSource};
//! use specmeta::core::types::{Layout, MetaValue};
//!
//! struct FixedId;
//! impl SampleIdSource for FixedId {
//!     fn next_id(&self) -> String { "S1".to_string() }
//! }
//!
//! let mut meta = SampleMetadata::empty(Layout::RowWise, &FixedId);
//! meta.set("mask", MetaValue::Int(1), Some(3), Some(7)).unwrap();
//! assert_eq!(
//!     meta.get("mask", Some(3), Some(7)).unwrap(),
//!     Some(MetaValue::Int(1))
//! );
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use thiserror::Error;
use uuid::Uuid;

use crate::core::global::{GlobalData, FILENAME, SAMPLE_ID};
use crate::core::paths;
use crate::core::pixels::PixelData;
use crate::core::source::SourceError;
use crate::core::store::{to_json_text, Document, MetadataStore, StoreError};
use crate::core::types::{Layout, MetaValue, COLUMN_WISE, ROW_WISE};

/// Errors from sample metadata operations.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// The pixel document's layout tag is unrecognized.
    #[error(
        "pixel data must be either stored in '{}' or '{}' fashion, got: '{tag}'",
        ROW_WISE,
        COLUMN_WISE
    )]
    InvalidLayout {
        /// The offending tag
        tag: String,
    },

    /// Output filenames cannot be derived without a sample id.
    #[error("no sample ID available, cannot generate output filenames automatically")]
    NoSampleId,

    /// A metadata file could not be written.
    #[error("failed to write metadata file '{path}': {source}")]
    Write {
        /// The target path
        path: PathBuf,
        /// The underlying I/O error
        source: std::io::Error,
    },

    /// A document could not be serialized.
    #[error("failed to serialize metadata for '{path}': {source}")]
    Serialize {
        /// The target path
        path: PathBuf,
        /// The underlying serializer error
        source: serde_json::Error,
    },

    /// A store failed to load or validate.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A source was invalid at construction.
    #[error(transparent)]
    Source(#[from] SourceError),
}

/// Supplier of fresh sample identifiers.
///
/// Injected into [`SampleMetadata::empty`] so the core stays deterministic
/// under test; production callers pass one of the shipped implementations.
pub trait SampleIdSource {
    /// Produce the next identifier.
    fn next_id(&self) -> String;
}

/// Wall-clock identifiers (local time, RFC3339-like with microseconds).
pub struct TimestampIds;

impl SampleIdSource for TimestampIds {
    fn next_id(&self) -> String {
        Local::now().format("%Y-%m-%d %H:%M:%S%.6f").to_string()
    }
}

/// Random UUIDv4 identifiers.
pub struct UuidIds;

impl SampleIdSource for UuidIds {
    fn next_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Metadata container for one hyper-spectral sample.
///
/// Owns its two stores exclusively; no sharing of mutable state across
/// instances is supported.
#[derive(Debug)]
pub struct SampleMetadata {
    global: MetadataStore<GlobalData>,
    pixels: MetadataStore<PixelData>,
}

impl SampleMetadata {
    /// Compose a container from two prepared stores.
    ///
    /// This is the general dual-source constructor; the other constructors
    /// are conveniences over it.
    pub fn new(global: MetadataStore<GlobalData>, pixels: MetadataStore<PixelData>) -> Self {
        Self { global, pixels }
    }

    /// Construct from two file paths.
    ///
    /// The files are not read here; loading is lazy.
    ///
    /// # Errors
    ///
    /// Fails for empty paths.
    pub fn from_paths(
        global: impl Into<PathBuf>,
        pixels: impl Into<PathBuf>,
    ) -> Result<Self, MetadataError> {
        Ok(Self::new(
            MetadataStore::from_path(global)?,
            MetadataStore::from_path(pixels)?,
        ))
    }

    /// Construct from two in-memory documents.
    pub fn from_data(global: GlobalData, pixels: PixelData) -> Self {
        Self::new(MetadataStore::from_data(global), MetadataStore::from_data(pixels))
    }

    /// Create a fresh instance with a generated sample id.
    ///
    /// The global document starts as `{filename: "none", sample_id: <id>}`;
    /// the pixel document is empty with the requested layout.
    pub fn empty(layout: Layout, ids: &dyn SampleIdSource) -> Self {
        Self::from_data(GlobalData::new("none", &ids.next_id()), PixelData::new(layout))
    }

    /// Load a sample using the filename as a template for the file pair.
    ///
    /// Derives `<base>.global` and `<base>.pixels`. The pixels file is
    /// optional: when absent, the pixel store starts fresh as row-wise.
    ///
    /// # Errors
    ///
    /// Fails with [`StoreError::NotFound`] if the global file is absent.
    pub fn load(template: impl AsRef<Path>) -> Result<Self, MetadataError> {
        let template = template.as_ref();
        let global = paths::global_path(template);
        let pixels = paths::pixels_path(template);

        if !global.exists() {
            return Err(StoreError::NotFound { path: global }.into());
        }

        let global_store = MetadataStore::from_path(global)?;
        let pixel_store = if pixels.exists() {
            MetadataStore::from_path(pixels)?
        } else {
            MetadataStore::from_data(PixelData::new(Layout::RowWise))
        };

        Ok(Self::new(global_store, pixel_store))
    }

    /// Resolve the pixel document's layout tag.
    fn layout(&mut self) -> Result<Layout, MetadataError> {
        let data = self.pixels.data()?;
        data.layout().ok_or_else(|| MetadataError::InvalidLayout {
            tag: data.layout_tag().to_string(),
        })
    }

    /// Look up a field.
    ///
    /// With `row` or `col` absent this is a global query: the flat field or
    /// `None`. With both present it is a pixel query resolved through the
    /// fallback chain (see the module docs). A plain miss is `Ok(None)`;
    /// callers supply their own default with `unwrap_or`.
    ///
    /// # Errors
    ///
    /// - [`MetadataError::InvalidLayout`] for an unrecognized layout tag
    /// - [`MetadataError::Store`] if a backing store fails to load
    pub fn get(
        &mut self,
        field: &str,
        row: Option<u32>,
        col: Option<u32>,
    ) -> Result<Option<MetaValue>, MetadataError> {
        let (row, col) = match (row, col) {
            (Some(r), Some(c)) => (r, c),
            _ => return Ok(self.global.data()?.get(field).cloned()),
        };

        let layout = self.layout()?;
        if let Some(value) = self.pixels.data()?.value(layout, field, row, col) {
            return Ok(Some(value.clone()));
        }

        let global = self.global.data()?;
        if let Some(value) = global.default_for(field) {
            return Ok(Some(value.clone()));
        }
        Ok(global.get(field).cloned())
    }

    /// Set a field.
    ///
    /// With `row` or `col` absent the value goes to the global flat map;
    /// with both present it goes to the pixel cell, creating intermediate
    /// maps on demand. Mutation is in-memory only.
    ///
    /// # Errors
    ///
    /// Same as [`get`](Self::get).
    pub fn set(
        &mut self,
        field: &str,
        value: MetaValue,
        row: Option<u32>,
        col: Option<u32>,
    ) -> Result<(), MetadataError> {
        let (row, col) = match (row, col) {
            (Some(r), Some(c)) => (r, c),
            _ => {
                self.global.data_mut()?.set(field, value);
                return Ok(());
            }
        };

        let layout = self.layout()?;
        self.pixels
            .data_mut()?
            .set_value(layout, field, value, row, col);
        Ok(())
    }

    /// The sample's data file name, empty string if unset.
    pub fn filename(&mut self) -> Result<String, MetadataError> {
        self.text_field(FILENAME)
    }

    /// Set the sample's data file name.
    pub fn set_filename(&mut self, value: &str) -> Result<(), MetadataError> {
        self.set(FILENAME, value.into(), None, None)
    }

    /// The sample identifier, empty string if unset.
    pub fn sample_id(&mut self) -> Result<String, MetadataError> {
        self.text_field(SAMPLE_ID)
    }

    /// Set the sample identifier.
    pub fn set_sample_id(&mut self, value: &str) -> Result<(), MetadataError> {
        self.set(SAMPLE_ID, value.into(), None, None)
    }

    /// Read a global field as text with empty-string default.
    fn text_field(&mut self, field: &str) -> Result<String, MetadataError> {
        Ok(self
            .get(field, None, None)?
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default())
    }

    /// The global store (for load-state observation).
    pub fn global_store(&self) -> &MetadataStore<GlobalData> {
        &self.global
    }

    /// The pixel store (for load-state observation).
    pub fn pixel_store(&self) -> &MetadataStore<PixelData> {
        &self.pixels
    }

    /// The global document, loading it if necessary.
    pub fn global_data(&mut self) -> Result<&GlobalData, MetadataError> {
        Ok(self.global.data()?)
    }

    /// Mutable access to the global document (e.g. the default table).
    pub fn global_data_mut(&mut self) -> Result<&mut GlobalData, MetadataError> {
        Ok(self.global.data_mut()?)
    }

    /// The pixel document, loading it if necessary.
    pub fn pixel_data(&mut self) -> Result<&PixelData, MetadataError> {
        Ok(self.pixels.data()?)
    }

    /// Save the global document to a file.
    ///
    /// `indent = None` writes compact JSON, `Some(n)` pretty-prints with
    /// n-space indentation. UTF-8 text, no write-through semantics — this
    /// is the only way mutations reach disk.
    pub fn save_global(
        &mut self,
        path: impl AsRef<Path>,
        indent: Option<usize>,
    ) -> Result<(), MetadataError> {
        let value = self.global.data()?.to_value();
        write_document(&value, path.as_ref(), indent)
    }

    /// Save the pixel document to a file.
    pub fn save_pixels(
        &mut self,
        path: impl AsRef<Path>,
        indent: Option<usize>,
    ) -> Result<(), MetadataError> {
        let value = self.pixels.data()?.to_value();
        write_document(&value, path.as_ref(), indent)
    }

    /// Save both documents under a directory, named by sample id.
    ///
    /// Writes `<sample_id>.global` and `<sample_id>.pixels`.
    ///
    /// # Errors
    ///
    /// Fails with [`MetadataError::NoSampleId`] when the sample id is unset
    /// or empty — the output filenames cannot be derived.
    pub fn save(
        &mut self,
        directory: impl AsRef<Path>,
        indent: Option<usize>,
    ) -> Result<(), MetadataError> {
        let sample_id = self.sample_id()?;
        if sample_id.is_empty() {
            return Err(MetadataError::NoSampleId);
        }

        let (global, pixels) = paths::sample_paths(directory.as_ref(), &sample_id);
        self.save_global(global, indent)?;
        self.save_pixels(pixels, indent)
    }
}

/// Serialize a document value and write it as UTF-8 text.
fn write_document(
    value: &serde_json::Value,
    path: &Path,
    indent: Option<usize>,
) -> Result<(), MetadataError> {
    let text = to_json_text(value, indent).map_err(|source| MetadataError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, text).map_err(|source| MetadataError::Write {
        path: path.to_path_buf(),
        source,
    })
}

impl std::fmt::Display for SampleMetadata {
    /// Render the global document and the pixel-store size.
    ///
    /// Inspection must stay side-effect free, so unloaded stores are shown
    /// as such rather than loaded.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.global.cached() {
            Some(data) => writeln!(f, "global: {}", data)?,
            None => writeln!(f, "global: unknown (not loaded yet)")?,
        }
        match self.pixels.cached() {
            Some(data) => write!(f, "pixels: size={}", data.outer_len()),
            None => write!(f, "pixels: size=unknown (not loaded yet)"),
        }
    }
}
