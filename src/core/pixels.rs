//! core::pixels
//!
//! Per-pixel metadata document with dual physical layouts.
//!
//! # Wire Format
//!
//! A JSON object. The key `type` is required and holds the layout tag;
//! every other top-level key is a decimal-string axis index mapping to an
//! object keyed by the other axis, mapping to flat field objects:
//!
//! ```json
//! {
//!     "type": "row-wise",
//!     "0": { "0": { "mask": 1 }, "1": { "mask": 0 } },
//!     "3": { "7": { "label": "leaf" } }
//! }
//! ```
//!
//! # Index Convention
//!
//! Axis indices are `u32` in memory and base-10 strings on the wire (JSON
//! object keys are always strings). Loading rejects non-numeric index keys;
//! saving emits plain decimal, so indices round-trip exactly.
//!
//! # Addressing
//!
//! Row-wise documents nest `row → col`; column-wise documents nest
//! `col → row`. Callers address cells as `(row, col)` regardless — the
//! document swaps the axes internally. The layout tag is kept as a raw
//! string so that a document carrying an unrecognized tag can be loaded
//! and inspected; resolving the tag happens at each pixel-addressed access.

use std::collections::BTreeMap;

use crate::core::store::{Document, StoreError};
use crate::core::types::{Layout, MetaValue};

/// Key of the layout tag.
pub const TYPE_KEY: &str = "type";

/// Flat field map for one pixel cell.
pub type FieldMap = BTreeMap<String, MetaValue>;

/// Pixel metadata: a two-level ordered map of cells plus the layout tag.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelData {
    layout_tag: String,
    cells: BTreeMap<u32, BTreeMap<u32, FieldMap>>,
}

impl PixelData {
    /// Create an empty document with the given layout.
    pub fn new(layout: Layout) -> Self {
        Self {
            layout_tag: layout.tag().to_string(),
            cells: BTreeMap::new(),
        }
    }

    /// Create an empty document with a raw layout tag.
    ///
    /// The tag is not validated here; an unrecognized tag fails on the
    /// first pixel-addressed access.
    pub fn with_tag(tag: impl Into<String>) -> Self {
        Self {
            layout_tag: tag.into(),
            cells: BTreeMap::new(),
        }
    }

    /// The raw layout tag.
    pub fn layout_tag(&self) -> &str {
        &self.layout_tag
    }

    /// Resolve the layout tag.
    ///
    /// Returns `None` for an unrecognized tag; callers turn that into
    /// their configuration error.
    pub fn layout(&self) -> Option<Layout> {
        Layout::from_tag(&self.layout_tag)
    }

    /// Map caller axes onto the physical (outer, inner) nesting.
    fn axes(layout: Layout, row: u32, col: u32) -> (u32, u32) {
        match layout {
            Layout::RowWise => (row, col),
            Layout::ColumnWise => (col, row),
        }
    }

    /// Look up a field at a cell.
    ///
    /// Any missing level of the nested path is not-found, never an error.
    pub fn value(&self, layout: Layout, field: &str, row: u32, col: u32) -> Option<&MetaValue> {
        let (outer, inner) = Self::axes(layout, row, col);
        self.cells
            .get(&outer)
            .and_then(|inner_map| inner_map.get(&inner))
            .and_then(|fields| fields.get(field))
    }

    /// Set a field at a cell, creating intermediate maps on demand.
    pub fn set_value(
        &mut self,
        layout: Layout,
        field: impl Into<String>,
        value: MetaValue,
        row: u32,
        col: u32,
    ) {
        let (outer, inner) = Self::axes(layout, row, col);
        self.cells
            .entry(outer)
            .or_default()
            .entry(inner)
            .or_default()
            .insert(field.into(), value);
    }

    /// The full field map at a cell, if any.
    pub fn cell(&self, layout: Layout, row: u32, col: u32) -> Option<&FieldMap> {
        let (outer, inner) = Self::axes(layout, row, col);
        self.cells.get(&outer).and_then(|m| m.get(&inner))
    }

    /// Number of populated outer-axis entries.
    pub fn outer_len(&self) -> usize {
        self.cells.len()
    }

    /// Whether no cells are populated.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl Document for PixelData {
    const REQUIRED_KEYS: &'static [&'static str] = &[TYPE_KEY];

    fn from_object(
        object: serde_json::Map<String, serde_json::Value>,
        origin: &str,
    ) -> Result<Self, StoreError> {
        let mut layout_tag = String::new();
        let mut cells = BTreeMap::new();

        for (key, value) in object {
            if key == TYPE_KEY {
                let serde_json::Value::String(tag) = value else {
                    return Err(StoreError::Parse {
                        origin: origin.to_string(),
                        message: format!("'{TYPE_KEY}' must be a string"),
                    });
                };
                layout_tag = tag;
                continue;
            }

            let outer = parse_index(&key, origin)?;
            let serde_json::Value::Object(inner_object) = value else {
                return Err(StoreError::Parse {
                    origin: origin.to_string(),
                    message: format!("index '{key}' must map to a JSON object"),
                });
            };

            let mut inner_map = BTreeMap::new();
            for (inner_key, fields_value) in inner_object {
                let inner = parse_index(&inner_key, origin)?;
                let serde_json::Value::Object(fields_object) = fields_value else {
                    return Err(StoreError::Parse {
                        origin: origin.to_string(),
                        message: format!("cell '{key}/{inner_key}' must map to a JSON object"),
                    });
                };

                let mut fields = FieldMap::new();
                for (field, raw) in fields_object {
                    let value =
                        MetaValue::try_from(raw).map_err(|source| StoreError::InvalidValue {
                            field: field.clone(),
                            origin: origin.to_string(),
                            source,
                        })?;
                    fields.insert(field, value);
                }
                inner_map.insert(inner, fields);
            }
            cells.insert(outer, inner_map);
        }

        Ok(Self { layout_tag, cells })
    }

    fn to_value(&self) -> serde_json::Value {
        let mut object = serde_json::Map::new();
        object.insert(
            TYPE_KEY.to_string(),
            serde_json::Value::String(self.layout_tag.clone()),
        );
        for (outer, inner_map) in &self.cells {
            let mut inner_object = serde_json::Map::new();
            for (inner, fields) in inner_map {
                let fields_object: serde_json::Map<String, serde_json::Value> = fields
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone().into()))
                    .collect();
                inner_object.insert(
                    inner.to_string(),
                    serde_json::Value::Object(fields_object),
                );
            }
            object.insert(outer.to_string(), serde_json::Value::Object(inner_object));
        }
        serde_json::Value::Object(object)
    }
}

/// Parse a decimal-string axis index.
fn parse_index(key: &str, origin: &str) -> Result<u32, StoreError> {
    key.parse::<u32>().map_err(|_| StoreError::Parse {
        origin: origin.to_string(),
        message: format!("'{key}' is not a valid axis index"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_json(json: &str) -> Result<PixelData, StoreError> {
        let value: serde_json::Value = serde_json::from_str(json).unwrap();
        let serde_json::Value::Object(object) = value else {
            panic!("test input must be an object");
        };
        PixelData::from_object(object, "test")
    }

    #[test]
    fn new_carries_layout_tag() {
        let data = PixelData::new(Layout::RowWise);
        assert_eq!(data.layout_tag(), "row-wise");
        assert_eq!(data.layout(), Some(Layout::RowWise));
        assert!(data.is_empty());
    }

    #[test]
    fn unrecognized_tag_resolves_to_none() {
        let data = PixelData::with_tag("diagonal");
        assert_eq!(data.layout(), None);
        assert_eq!(data.layout_tag(), "diagonal");
    }

    #[test]
    fn set_creates_intermediate_levels() {
        let mut data = PixelData::new(Layout::RowWise);
        data.set_value(Layout::RowWise, "mask", 1.into(), 3, 7);

        assert_eq!(
            data.value(Layout::RowWise, "mask", 3, 7).unwrap().as_int(),
            Some(1)
        );
        assert_eq!(data.outer_len(), 1);
    }

    #[test]
    fn missing_levels_are_not_found() {
        let mut data = PixelData::new(Layout::RowWise);
        data.set_value(Layout::RowWise, "mask", 1.into(), 3, 7);

        assert!(data.value(Layout::RowWise, "mask", 4, 7).is_none());
        assert!(data.value(Layout::RowWise, "mask", 3, 8).is_none());
        assert!(data.value(Layout::RowWise, "other", 3, 7).is_none());
    }

    #[test]
    fn column_wise_swaps_physical_axes() {
        let mut data = PixelData::new(Layout::ColumnWise);
        data.set_value(Layout::ColumnWise, "mask", 1.into(), 3, 7);

        // Caller-facing addressing is unchanged
        assert_eq!(
            data.value(Layout::ColumnWise, "mask", 3, 7)
                .unwrap()
                .as_int(),
            Some(1)
        );

        // Physically the column is the outer key
        let value = data.to_value();
        assert!(value.get("7").is_some());
        assert!(value.get("3").is_none());
        assert!(value["7"]["3"]["mask"].is_number());
    }

    #[test]
    fn parse_nested_document() {
        let data = from_json(
            r#"{
                "type": "row-wise",
                "0": { "0": { "mask": 1 }, "1": { "mask": 0 } },
                "3": { "7": { "label": "leaf" } }
            }"#,
        )
        .unwrap();

        assert_eq!(data.layout(), Some(Layout::RowWise));
        assert_eq!(
            data.value(Layout::RowWise, "mask", 0, 1).unwrap().as_int(),
            Some(0)
        );
        assert_eq!(
            data.value(Layout::RowWise, "label", 3, 7)
                .unwrap()
                .as_str(),
            Some("leaf")
        );
        assert_eq!(data.outer_len(), 2);
    }

    #[test]
    fn non_numeric_index_rejected() {
        let result = from_json(r#"{"type": "row-wise", "abc": {}}"#);
        assert!(matches!(result, Err(StoreError::Parse { .. })));

        let result = from_json(r#"{"type": "row-wise", "-1": {}}"#);
        assert!(matches!(result, Err(StoreError::Parse { .. })));
    }

    #[test]
    fn non_string_type_rejected() {
        let result = from_json(r#"{"type": 5}"#);
        assert!(matches!(result, Err(StoreError::Parse { .. })));
    }

    #[test]
    fn nested_cell_value_rejected() {
        let result = from_json(r#"{"type": "row-wise", "0": {"0": {"bad": {"x": 1}}}}"#);
        assert!(matches!(result, Err(StoreError::InvalidValue { .. })));
    }

    #[test]
    fn indices_roundtrip_as_decimal_strings() {
        let mut data = PixelData::new(Layout::RowWise);
        data.set_value(Layout::RowWise, "mask", 1.into(), 0, 0);
        data.set_value(Layout::RowWise, "mask", 2.into(), 10, 250);

        let value = data.to_value();
        assert!(value.get("10").is_some());
        assert!(value["10"]["250"]["mask"].is_number());

        let serde_json::Value::Object(object) = value else {
            panic!("expected object");
        };
        let back = PixelData::from_object(object, "test").unwrap();
        assert_eq!(data, back);
    }
}
