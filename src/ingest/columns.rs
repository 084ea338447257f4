//! ingest::columns
//!
//! 1-based column selectors for spreadsheet ingestion.
//!
//! # Grammar
//!
//! - [`ColumnIndex`]: `first`, `last`, or a 1-based number (`3`)
//! - [`ColumnRange`]: comma-separated parts, each a single index or an
//!   inclusive span (`first-last`, `2-4`, `2,5,7`)
//!
//! Selectors are parsed up front and resolved against a concrete column
//! count later, so out-of-range indices fail with the table in hand.
//!
//! # Example
//!
//! ```
//! use specmeta::ingest::columns::{ColumnIndex, ColumnRange};
//!
//! let id: ColumnIndex = "first".parse().unwrap();
//! assert_eq!(id.resolve(5).unwrap(), 0);
//!
//! let range: ColumnRange = "2-4".parse().unwrap();
//! assert_eq!(range.resolve(5).unwrap(), vec![1, 2, 3]);
//! ```

use std::str::FromStr;

use thiserror::Error;

/// Errors from parsing or resolving column selectors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectorError {
    /// The selector text is not part of the grammar.
    #[error("invalid column selector: '{0}'")]
    Invalid(String),

    /// Column numbers are 1-based; zero never names a column.
    #[error("column numbers are 1-based, got 0")]
    Zero,

    /// The resolved index does not exist in the table.
    #[error("column {index} out of range, table has {count} column(s)")]
    OutOfRange {
        /// 1-based requested index
        index: usize,
        /// Number of columns in the table
        count: usize,
    },

    /// A span's lower bound exceeds its upper bound.
    #[error("empty column span: {from} comes after {to}")]
    EmptySpan {
        /// 1-based lower bound
        from: usize,
        /// 1-based upper bound
        to: usize,
    },
}

/// A single 1-based column selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnIndex {
    /// The first column
    First,
    /// The last column
    Last,
    /// An explicit 1-based column number
    Number(usize),
}

impl ColumnIndex {
    /// Resolve to a 0-based index against a concrete column count.
    pub fn resolve(&self, count: usize) -> Result<usize, SelectorError> {
        match self {
            ColumnIndex::First => {
                if count == 0 {
                    return Err(SelectorError::OutOfRange { index: 1, count });
                }
                Ok(0)
            }
            ColumnIndex::Last => {
                if count == 0 {
                    return Err(SelectorError::OutOfRange { index: 1, count });
                }
                Ok(count - 1)
            }
            ColumnIndex::Number(n) => {
                if *n == 0 {
                    return Err(SelectorError::Zero);
                }
                if *n > count {
                    return Err(SelectorError::OutOfRange {
                        index: *n,
                        count,
                    });
                }
                Ok(n - 1)
            }
        }
    }
}

impl FromStr for ColumnIndex {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "first" => Ok(ColumnIndex::First),
            "last" => Ok(ColumnIndex::Last),
            text => match text.parse::<usize>() {
                Ok(0) => Err(SelectorError::Zero),
                Ok(n) => Ok(ColumnIndex::Number(n)),
                Err(_) => Err(SelectorError::Invalid(s.to_string())),
            },
        }
    }
}

/// One part of a column range: a single index or an inclusive span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RangePart {
    Single(ColumnIndex),
    Span(ColumnIndex, ColumnIndex),
}

/// A comma-separated list of indices and inclusive spans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRange {
    parts: Vec<RangePart>,
}

impl ColumnRange {
    /// Resolve to a sorted, deduplicated list of 0-based indices.
    pub fn resolve(&self, count: usize) -> Result<Vec<usize>, SelectorError> {
        let mut indices = Vec::new();
        for part in &self.parts {
            match part {
                RangePart::Single(index) => indices.push(index.resolve(count)?),
                RangePart::Span(from, to) => {
                    let from = from.resolve(count)?;
                    let to = to.resolve(count)?;
                    if from > to {
                        return Err(SelectorError::EmptySpan {
                            from: from + 1,
                            to: to + 1,
                        });
                    }
                    indices.extend(from..=to);
                }
            }
        }
        indices.sort_unstable();
        indices.dedup();
        Ok(indices)
    }
}

impl FromStr for ColumnRange {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(SelectorError::Invalid(s.to_string()));
        }

        let mut parts = Vec::new();
        for piece in s.split(',') {
            let piece = piece.trim();
            match piece.split_once('-') {
                Some((from, to)) => {
                    parts.push(RangePart::Span(from.parse()?, to.parse()?));
                }
                None => parts.push(RangePart::Single(piece.parse()?)),
            }
        }
        Ok(Self { parts })
    }
}
