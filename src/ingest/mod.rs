//! ingest
//!
//! Spreadsheet ingestion: tabular files in, per-sample field maps out.
//!
//! # Responsibilities
//!
//! - Read CSV/TSV files into a table of rows x named columns
//! - Resolve 1-based column selectors against the table
//! - Build the `sample-id -> field -> value` lookup the walker consumes
//!
//! The core only ever sees the lookup; everything here is I/O glue in
//! front of repeated [`SampleMetadata::set`] calls.
//!
//! [`SampleMetadata::set`]: crate::core::sample::SampleMetadata::set

pub mod columns;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::types::MetaValue;
use self::columns::{ColumnIndex, ColumnRange, SelectorError};

/// Per-sample field updates, keyed by sample id.
pub type Lookup = BTreeMap<String, BTreeMap<String, MetaValue>>;

/// Errors from spreadsheet ingestion.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The file extension names no supported format.
    #[error("unsupported spreadsheet file format: {path}")]
    UnsupportedFormat {
        /// The offending path
        path: PathBuf,
    },

    /// The file could not be read or parsed as delimited text.
    #[error("failed to read spreadsheet '{path}': {source}")]
    Read {
        /// The offending path
        path: PathBuf,
        /// The underlying reader error
        source: csv::Error,
    },

    /// A column selector failed to parse or resolve.
    #[error(transparent)]
    Selector(#[from] SelectorError),
}

/// A fully-read spreadsheet: header row plus typed cell rows.
#[derive(Debug, Clone)]
pub struct SpreadsheetTable {
    headers: Vec<String>,
    rows: Vec<Vec<MetaValue>>,
}

impl SpreadsheetTable {
    /// Read a spreadsheet file.
    ///
    /// The delimiter follows the extension: `,` for `.csv`, tab for `.tsv`
    /// and `.tab`. A header row is required; cells are typed best-effort
    /// (see [`parse_cell`]).
    pub fn read(path: &Path) -> Result<Self, IngestError> {
        let delimiter = match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("csv") => b',',
            Some("tsv") | Some("tab") => b'\t',
            _ => {
                return Err(IngestError::UnsupportedFormat {
                    path: path.to_path_buf(),
                })
            }
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .delimiter(delimiter)
            .from_path(path)
            .map_err(|source| IngestError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        let headers = reader
            .headers()
            .map_err(|source| IngestError::Read {
                path: path.to_path_buf(),
                source,
            })?
            .iter()
            .map(str::to_string)
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|source| IngestError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            rows.push(record.iter().map(parse_cell).collect());
        }

        Ok(Self { headers, rows })
    }

    /// The column names from the header row.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Number of data rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// The cell at (row, column), if within bounds.
    pub fn cell(&self, row: usize, column: usize) -> Option<&MetaValue> {
        self.rows.get(row).and_then(|r| r.get(column))
    }
}

/// Type a raw cell.
///
/// Empty cells become `Null`; `true`/`false`, integers, and floats are
/// recognized; everything else stays text.
fn parse_cell(text: &str) -> MetaValue {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return MetaValue::Null;
    }
    match trimmed {
        "true" => return MetaValue::Bool(true),
        "false" => return MetaValue::Bool(false),
        _ => {}
    }
    if let Ok(i) = trimmed.parse::<i64>() {
        return MetaValue::Int(i);
    }
    if let Ok(f) = trimmed.parse::<f64>() {
        return MetaValue::Float(f);
    }
    MetaValue::Text(trimmed.to_string())
}

/// Build the per-sample lookup from a table.
///
/// `sample_id` selects the column holding sample ids; `metadata` selects
/// the columns to ingest. The sample-id column is excluded from the
/// metadata columns automatically. Later rows win on duplicate sample ids.
pub fn build_lookup(
    table: &SpreadsheetTable,
    sample_id: &ColumnIndex,
    metadata: &ColumnRange,
) -> Result<Lookup, IngestError> {
    let count = table.column_count();
    let id_column = sample_id.resolve(count)?;
    let mut meta_columns = metadata.resolve(count)?;
    meta_columns.retain(|&c| c != id_column);

    let mut lookup = Lookup::new();
    for row in 0..table.row_count() {
        let Some(id_cell) = table.cell(row, id_column) else {
            continue;
        };
        let sid = id_cell.to_string();

        let mut fields = BTreeMap::new();
        for &column in &meta_columns {
            if let Some(value) = table.cell(row, column) {
                fields.insert(table.headers[column].clone(), value.clone());
            }
        }
        lookup.insert(sid, fields);
    }
    Ok(lookup)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".csv")
            .tempfile()
            .unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn reads_csv_with_typed_cells() {
        let file = write_csv("sample,crop,height,good\nS1,wheat,1.5,true\nS2,barley,2,\n");
        let table = SpreadsheetTable::read(file.path()).unwrap();

        assert_eq!(table.headers(), &["sample", "crop", "height", "good"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.cell(0, 2), Some(&MetaValue::Float(1.5)));
        assert_eq!(table.cell(0, 3), Some(&MetaValue::Bool(true)));
        assert_eq!(table.cell(1, 2), Some(&MetaValue::Int(2)));
        assert_eq!(table.cell(1, 3), Some(&MetaValue::Null));
    }

    #[test]
    fn unsupported_extension_rejected() {
        let result = SpreadsheetTable::read(Path::new("meta.xlsx"));
        assert!(matches!(result, Err(IngestError::UnsupportedFormat { .. })));
    }

    #[test]
    fn lookup_excludes_sample_id_column() {
        let file = write_csv("sample,crop,height\nS1,wheat,1.5\n");
        let table = SpreadsheetTable::read(file.path()).unwrap();

        let lookup = build_lookup(
            &table,
            &"first".parse().unwrap(),
            &"first-last".parse().unwrap(),
        )
        .unwrap();

        let fields = &lookup["S1"];
        assert!(!fields.contains_key("sample"));
        assert_eq!(fields["crop"], MetaValue::from("wheat"));
        assert_eq!(fields["height"], MetaValue::Float(1.5));
    }

    #[test]
    fn numeric_sample_ids_stringified() {
        let file = write_csv("sample,crop\n17,wheat\n");
        let table = SpreadsheetTable::read(file.path()).unwrap();

        let lookup = build_lookup(
            &table,
            &"first".parse().unwrap(),
            &"first-last".parse().unwrap(),
        )
        .unwrap();

        assert!(lookup.contains_key("17"));
    }

    #[test]
    fn later_duplicate_rows_win() {
        let file = write_csv("sample,crop\nS1,wheat\nS1,barley\n");
        let table = SpreadsheetTable::read(file.path()).unwrap();

        let lookup = build_lookup(
            &table,
            &"first".parse().unwrap(),
            &"first-last".parse().unwrap(),
        )
        .unwrap();

        assert_eq!(lookup["S1"]["crop"], MetaValue::from("barley"));
    }

    #[test]
    fn out_of_range_selector_propagates() {
        let file = write_csv("sample,crop\nS1,wheat\n");
        let table = SpreadsheetTable::read(file.path()).unwrap();

        let result = build_lookup(
            &table,
            &"5".parse().unwrap(),
            &"first-last".parse().unwrap(),
        );
        assert!(matches!(result, Err(IngestError::Selector(_))));
    }
}
