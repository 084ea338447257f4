//! core::global
//!
//! Global (per-sample) metadata document.
//!
//! # Wire Format
//!
//! A single JSON object. The keys `filename` and `sample_id` are required.
//! The key `default` is special: when present it holds an object mapping
//! field names to primitives, used as a fallback layer for pixel queries.
//! Every other key maps directly to a primitive value.
//!
//! ```json
//! {
//!     "filename": "sample1.hdr",
//!     "sample_id": "S1",
//!     "crop": "wheat",
//!     "default": { "mask": 0 }
//! }
//! ```
//!
//! # Example
//!
//! ```
//! use specmeta::core::global::GlobalData;
//!
//! let mut data = GlobalData::new("sample1.hdr", "S1");
//! data.set("crop", "wheat".into());
//! data.set_default("mask", 0.into());
//!
//! assert_eq!(data.get("crop").unwrap().as_str(), Some("wheat"));
//! assert_eq!(data.default_for("mask").unwrap().as_int(), Some(0));
//! ```

use std::collections::BTreeMap;

use crate::core::store::{Document, StoreError};
use crate::core::types::MetaValue;

/// Field holding the data file name.
pub const FILENAME: &str = "filename";

/// Field holding the sample identifier.
pub const SAMPLE_ID: &str = "sample_id";

/// Key of the per-field default table.
pub const DEFAULT_KEY: &str = "default";

/// Global metadata: a flat field map plus an optional default table.
///
/// Field order is not significant; keys serialize sorted.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GlobalData {
    fields: BTreeMap<String, MetaValue>,
    defaults: Option<BTreeMap<String, MetaValue>>,
}

impl GlobalData {
    /// Create a document with the two required fields.
    pub fn new(filename: &str, sample_id: &str) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(FILENAME.to_string(), MetaValue::from(filename));
        fields.insert(SAMPLE_ID.to_string(), MetaValue::from(sample_id));
        Self {
            fields,
            defaults: None,
        }
    }

    /// Look up a flat field.
    pub fn get(&self, field: &str) -> Option<&MetaValue> {
        self.fields.get(field)
    }

    /// Set a flat field, creating it if absent.
    pub fn set(&mut self, field: impl Into<String>, value: MetaValue) {
        self.fields.insert(field.into(), value);
    }

    /// Remove a flat field.
    pub fn remove(&mut self, field: &str) -> Option<MetaValue> {
        self.fields.remove(field)
    }

    /// Look up a field in the default table, if the table exists.
    pub fn default_for(&self, field: &str) -> Option<&MetaValue> {
        self.defaults.as_ref().and_then(|d| d.get(field))
    }

    /// Set a default-table entry, creating the table if absent.
    pub fn set_default(&mut self, field: impl Into<String>, value: MetaValue) {
        self.defaults
            .get_or_insert_with(BTreeMap::new)
            .insert(field.into(), value);
    }

    /// Remove a default-table entry.
    pub fn remove_default(&mut self, field: &str) -> Option<MetaValue> {
        self.defaults.as_mut().and_then(|d| d.remove(field))
    }

    /// Iterate the flat fields in key order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &MetaValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of flat fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the document has no flat fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Document for GlobalData {
    const REQUIRED_KEYS: &'static [&'static str] = &[FILENAME, SAMPLE_ID];

    fn from_object(
        object: serde_json::Map<String, serde_json::Value>,
        origin: &str,
    ) -> Result<Self, StoreError> {
        let mut fields = BTreeMap::new();
        let mut defaults = None;

        for (key, value) in object {
            if key == DEFAULT_KEY {
                let serde_json::Value::Object(table) = value else {
                    return Err(StoreError::Parse {
                        origin: origin.to_string(),
                        message: format!("'{DEFAULT_KEY}' must be a JSON object"),
                    });
                };
                let mut parsed = BTreeMap::new();
                for (field, raw) in table {
                    let value =
                        MetaValue::try_from(raw).map_err(|source| StoreError::InvalidValue {
                            field: format!("{DEFAULT_KEY}.{field}"),
                            origin: origin.to_string(),
                            source,
                        })?;
                    parsed.insert(field, value);
                }
                defaults = Some(parsed);
            } else {
                let value =
                    MetaValue::try_from(value).map_err(|source| StoreError::InvalidValue {
                        field: key.clone(),
                        origin: origin.to_string(),
                        source,
                    })?;
                fields.insert(key, value);
            }
        }

        Ok(Self { fields, defaults })
    }

    fn to_value(&self) -> serde_json::Value {
        let mut object = serde_json::Map::new();
        for (key, value) in &self.fields {
            object.insert(key.clone(), value.clone().into());
        }
        if let Some(defaults) = &self.defaults {
            let table: serde_json::Map<String, serde_json::Value> = defaults
                .iter()
                .map(|(k, v)| (k.clone(), v.clone().into()))
                .collect();
            object.insert(DEFAULT_KEY.to_string(), serde_json::Value::Object(table));
        }
        serde_json::Value::Object(object)
    }
}

impl std::fmt::Display for GlobalData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_json(json: &str) -> Result<GlobalData, StoreError> {
        let value: serde_json::Value = serde_json::from_str(json).unwrap();
        let serde_json::Value::Object(object) = value else {
            panic!("test input must be an object");
        };
        GlobalData::from_object(object, "test")
    }

    #[test]
    fn new_has_required_fields() {
        let data = GlobalData::new("a.hdr", "S1");
        assert_eq!(data.get(FILENAME).unwrap().as_str(), Some("a.hdr"));
        assert_eq!(data.get(SAMPLE_ID).unwrap().as_str(), Some("S1"));
        assert_eq!(data.len(), 2);
    }

    #[test]
    fn set_creates_and_overwrites() {
        let mut data = GlobalData::new("a.hdr", "S1");
        data.set("crop", "wheat".into());
        data.set("crop", "barley".into());
        assert_eq!(data.get("crop").unwrap().as_str(), Some("barley"));
    }

    #[test]
    fn default_table_is_separate_from_fields() {
        let mut data = GlobalData::new("a.hdr", "S1");
        data.set_default("mask", 1.into());

        assert!(data.get("mask").is_none());
        assert_eq!(data.default_for("mask").unwrap().as_int(), Some(1));

        data.remove_default("mask");
        assert!(data.default_for("mask").is_none());
    }

    #[test]
    fn parse_splits_default_from_fields() {
        let data = from_json(
            r#"{
                "filename": "a.hdr",
                "sample_id": "S1",
                "crop": "wheat",
                "default": { "mask": 0, "label": "bg" }
            }"#,
        )
        .unwrap();

        assert_eq!(data.get("crop").unwrap().as_str(), Some("wheat"));
        assert!(data.get(DEFAULT_KEY).is_none());
        assert_eq!(data.default_for("mask").unwrap().as_int(), Some(0));
        assert_eq!(data.default_for("label").unwrap().as_str(), Some("bg"));
    }

    #[test]
    fn non_object_default_rejected() {
        let result = from_json(r#"{"filename": "a", "sample_id": "S1", "default": 5}"#);
        assert!(matches!(result, Err(StoreError::Parse { .. })));
    }

    #[test]
    fn nested_field_value_rejected() {
        let result = from_json(r#"{"filename": "a", "sample_id": "S1", "extra": [1]}"#);
        assert!(matches!(result, Err(StoreError::InvalidValue { .. })));
    }

    #[test]
    fn roundtrip_preserves_default_table() {
        let mut data = GlobalData::new("a.hdr", "S1");
        data.set("height", MetaValue::Float(1.5));
        data.set_default("mask", 0.into());

        let value = data.to_value();
        let serde_json::Value::Object(object) = value else {
            panic!("expected object");
        };
        let back = GlobalData::from_object(object, "test").unwrap();
        assert_eq!(data, back);
    }

    #[test]
    fn absent_default_table_not_serialized() {
        let data = GlobalData::new("a.hdr", "S1");
        let value = data.to_value();
        assert!(value.get(DEFAULT_KEY).is_none());
    }

    #[test]
    fn display_is_compact_json() {
        let data = GlobalData::new("a.hdr", "S1");
        let text = data.to_string();
        assert!(text.starts_with('{'));
        assert!(text.contains("\"sample_id\":\"S1\""));
    }
}
