//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`MetaValue`] - Primitive metadata value (int, float, string, bool, null)
//! - [`Layout`] - Physical orientation of pixel metadata
//!
//! # Validation
//!
//! `MetaValue` enforces the primitive-only value policy at construction time:
//! nested JSON structures cannot be represented, so a store can never hold
//! one. Conversions from arbitrary JSON go through [`TryFrom`] and fail with
//! [`TypeError`].
//!
//! # Examples
//!
//! ```
//! use specmeta::core::types::{Layout, MetaValue};
//!
//! let v = MetaValue::from(42);
//! assert_eq!(v.to_string(), "42");
//!
//! // Nested structures are rejected at the conversion boundary
//! let nested = serde_json::json!({"a": 1});
//! assert!(MetaValue::try_from(nested).is_err());
//!
//! assert_eq!(Layout::from_tag("row-wise"), Some(Layout::RowWise));
//! assert_eq!(Layout::ColumnWise.tag(), "column-wise");
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Layout tag for row-major pixel metadata.
pub const ROW_WISE: &str = "row-wise";

/// Layout tag for column-major pixel metadata.
pub const COLUMN_WISE: &str = "column-wise";

/// Errors from value conversion.
#[derive(Debug, Error, PartialEq)]
pub enum TypeError {
    /// The JSON value is not in the primitive set.
    #[error("only accepting int/float/str/bool/null values, but got: {found}")]
    Unsupported {
        /// Description of the offending value's type
        found: String,
    },

    /// Integer literal outside the representable range.
    #[error("integer out of range: {0}")]
    IntOutOfRange(String),
}

/// A primitive metadata value.
///
/// Values stored against a field are restricted to this set; arrays and
/// objects are rejected when converting from JSON. `Null` is a legal stored
/// value and is distinct from an absent field.
///
/// # Example
///
/// ```
/// use specmeta::core::types::MetaValue;
///
/// let v: MetaValue = "wheat".into();
/// assert_eq!(v, MetaValue::Text("wheat".to_string()));
///
/// let roundtrip: MetaValue = serde_json::from_str("3.5").unwrap();
/// assert_eq!(roundtrip, MetaValue::Float(3.5));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Value", into = "serde_json::Value")]
pub enum MetaValue {
    /// JSON null
    Null,
    /// Boolean
    Bool(bool),
    /// Signed integer
    Int(i64),
    /// Floating point number
    Float(f64),
    /// String
    Text(String),
}

impl MetaValue {
    /// View the value as a string slice, if it is text.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetaValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// View the value as an integer, if it is one.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            MetaValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Check for JSON null.
    pub fn is_null(&self) -> bool {
        matches!(self, MetaValue::Null)
    }
}

impl TryFrom<serde_json::Value> for MetaValue {
    type Error = TypeError;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        match value {
            serde_json::Value::Null => Ok(MetaValue::Null),
            serde_json::Value::Bool(b) => Ok(MetaValue::Bool(b)),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(MetaValue::Int(i))
                } else if n.is_u64() {
                    Err(TypeError::IntOutOfRange(n.to_string()))
                } else if let Some(f) = n.as_f64() {
                    Ok(MetaValue::Float(f))
                } else {
                    Err(TypeError::Unsupported {
                        found: n.to_string(),
                    })
                }
            }
            serde_json::Value::String(s) => Ok(MetaValue::Text(s)),
            serde_json::Value::Array(_) => Err(TypeError::Unsupported {
                found: "array".to_string(),
            }),
            serde_json::Value::Object(_) => Err(TypeError::Unsupported {
                found: "object".to_string(),
            }),
        }
    }
}

impl From<MetaValue> for serde_json::Value {
    fn from(value: MetaValue) -> Self {
        match value {
            MetaValue::Null => serde_json::Value::Null,
            MetaValue::Bool(b) => serde_json::Value::Bool(b),
            MetaValue::Int(i) => serde_json::Value::from(i),
            MetaValue::Float(f) => serde_json::Value::from(f),
            MetaValue::Text(s) => serde_json::Value::String(s),
        }
    }
}

impl From<bool> for MetaValue {
    fn from(b: bool) -> Self {
        MetaValue::Bool(b)
    }
}

impl From<i64> for MetaValue {
    fn from(i: i64) -> Self {
        MetaValue::Int(i)
    }
}

impl From<i32> for MetaValue {
    fn from(i: i32) -> Self {
        MetaValue::Int(i64::from(i))
    }
}

impl From<f64> for MetaValue {
    fn from(f: f64) -> Self {
        MetaValue::Float(f)
    }
}

impl From<&str> for MetaValue {
    fn from(s: &str) -> Self {
        MetaValue::Text(s.to_string())
    }
}

impl From<String> for MetaValue {
    fn from(s: String) -> Self {
        MetaValue::Text(s)
    }
}

impl std::fmt::Display for MetaValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetaValue::Null => write!(f, "null"),
            MetaValue::Bool(b) => write!(f, "{}", b),
            MetaValue::Int(i) => write!(f, "{}", i),
            MetaValue::Float(x) => write!(f, "{}", x),
            MetaValue::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Physical orientation of pixel metadata.
///
/// Row-wise documents key the outer map by row and the inner map by column;
/// column-wise documents swap the axes. The orientation of a document never
/// changes after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Outer key is the row index
    RowWise,
    /// Outer key is the column index
    ColumnWise,
}

impl Layout {
    /// Resolve a wire tag to a layout.
    ///
    /// Returns `None` for anything other than `"row-wise"` or
    /// `"column-wise"`. Callers turn that into their configuration error.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            ROW_WISE => Some(Layout::RowWise),
            COLUMN_WISE => Some(Layout::ColumnWise),
            _ => None,
        }
    }

    /// The wire tag for this layout.
    pub fn tag(&self) -> &'static str {
        match self {
            Layout::RowWise => ROW_WISE,
            Layout::ColumnWise => COLUMN_WISE,
        }
    }
}

impl std::fmt::Display for Layout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod meta_value {
        use super::*;

        #[test]
        fn primitives_convert() {
            assert_eq!(
                MetaValue::try_from(serde_json::json!(null)).unwrap(),
                MetaValue::Null
            );
            assert_eq!(
                MetaValue::try_from(serde_json::json!(true)).unwrap(),
                MetaValue::Bool(true)
            );
            assert_eq!(
                MetaValue::try_from(serde_json::json!(-7)).unwrap(),
                MetaValue::Int(-7)
            );
            assert_eq!(
                MetaValue::try_from(serde_json::json!(1.25)).unwrap(),
                MetaValue::Float(1.25)
            );
            assert_eq!(
                MetaValue::try_from(serde_json::json!("x")).unwrap(),
                MetaValue::Text("x".to_string())
            );
        }

        #[test]
        fn nested_structures_rejected() {
            let arr = serde_json::json!([1, 2]);
            assert!(matches!(
                MetaValue::try_from(arr),
                Err(TypeError::Unsupported { .. })
            ));

            let obj = serde_json::json!({"k": "v"});
            assert!(matches!(
                MetaValue::try_from(obj),
                Err(TypeError::Unsupported { .. })
            ));
        }

        #[test]
        fn huge_unsigned_rejected() {
            let big = serde_json::json!(u64::MAX);
            assert!(matches!(
                MetaValue::try_from(big),
                Err(TypeError::IntOutOfRange(_))
            ));
        }

        #[test]
        fn json_roundtrip() {
            for v in [
                MetaValue::Null,
                MetaValue::Bool(false),
                MetaValue::Int(12),
                MetaValue::Float(0.5),
                MetaValue::Text("sample".to_string()),
            ] {
                let json = serde_json::to_string(&v).unwrap();
                let back: MetaValue = serde_json::from_str(&json).unwrap();
                assert_eq!(v, back);
            }
        }

        #[test]
        fn display_forms() {
            assert_eq!(MetaValue::Null.to_string(), "null");
            assert_eq!(MetaValue::Int(3).to_string(), "3");
            assert_eq!(MetaValue::Text("a b".into()).to_string(), "a b");
        }
    }

    mod layout {
        use super::*;

        #[test]
        fn known_tags() {
            assert_eq!(Layout::from_tag("row-wise"), Some(Layout::RowWise));
            assert_eq!(Layout::from_tag("column-wise"), Some(Layout::ColumnWise));
        }

        #[test]
        fn unknown_tag_is_none() {
            assert_eq!(Layout::from_tag("diagonal"), None);
            assert_eq!(Layout::from_tag(""), None);
            assert_eq!(Layout::from_tag("Row-Wise"), None);
        }

        #[test]
        fn tag_roundtrip() {
            for layout in [Layout::RowWise, Layout::ColumnWise] {
                assert_eq!(Layout::from_tag(layout.tag()), Some(layout));
            }
        }
    }
}
