// Row and cell encoding
//
// Rows cross the API as an ordered mapping from column name to a tagged
// cell value. The tag set is deliberately small: null, text, int, double,
// bool, bytes. Driver types outside that set degrade to their textual
// rendering and are tagged as text.

use scylla::frame::response::result::{ColumnSpec, CqlValue, Row};
use serde::{Deserialize, Serialize};

mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded).map_err(serde::de::Error::custom)
    }
}

/// A single tagged cell value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum CellValue {
    Null,
    Text(String),
    Int(i64),
    Double(f64),
    Bool(bool),
    Bytes(#[serde(with = "base64_bytes")] Vec<u8>),
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            CellValue::Int(v) => Some(*v),
            _ => None,
        }
    }
}

/// One result row: column names in select order, each with its cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataRow {
    pub cells: Vec<(String, CellValue)>,
}

impl DataRow {
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Build a row from the driver's column specs and raw row.
    pub fn from_driver(specs: &[ColumnSpec], row: &Row) -> Self {
        let cells = specs
            .iter()
            .enumerate()
            .map(|(i, spec)| {
                let value = row
                    .columns
                    .get(i)
                    .and_then(|opt| opt.as_ref())
                    .map(cell_value)
                    .unwrap_or(CellValue::Null);
                (spec.name.clone(), value)
            })
            .collect();
        Self { cells }
    }
}

/// Convert one driver value into the tagged encoding.
pub fn cell_value(value: &CqlValue) -> CellValue {
    match value {
        CqlValue::Ascii(s) | CqlValue::Text(s) => CellValue::Text(s.clone()),
        CqlValue::TinyInt(v) => CellValue::Int(*v as i64),
        CqlValue::SmallInt(v) => CellValue::Int(*v as i64),
        CqlValue::Int(v) => CellValue::Int(*v as i64),
        CqlValue::BigInt(v) => CellValue::Int(*v),
        CqlValue::Counter(c) => CellValue::Int(c.0),
        CqlValue::Float(v) => CellValue::Double(*v as f64),
        CqlValue::Double(v) => CellValue::Double(*v),
        CqlValue::Boolean(b) => CellValue::Bool(*b),
        CqlValue::Blob(bytes) => CellValue::Bytes(bytes.clone()),
        CqlValue::Uuid(u) => CellValue::Text(u.to_string()),
        CqlValue::Timeuuid(u) => CellValue::Text(u.to_string()),
        CqlValue::Inet(addr) => CellValue::Text(addr.to_string()),
        CqlValue::Empty => CellValue::Null,
        other => CellValue::Text(format!("{:?}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_conversions() {
        assert_eq!(cell_value(&CqlValue::Text("hi".into())), CellValue::Text("hi".into()));
        assert_eq!(cell_value(&CqlValue::Ascii("hi".into())), CellValue::Text("hi".into()));
        assert_eq!(cell_value(&CqlValue::Int(7)), CellValue::Int(7));
        assert_eq!(cell_value(&CqlValue::BigInt(1 << 40)), CellValue::Int(1 << 40));
        assert_eq!(cell_value(&CqlValue::SmallInt(-3)), CellValue::Int(-3));
        assert_eq!(cell_value(&CqlValue::Float(1.5)), CellValue::Double(1.5));
        assert_eq!(cell_value(&CqlValue::Double(2.25)), CellValue::Double(2.25));
        assert_eq!(cell_value(&CqlValue::Boolean(true)), CellValue::Bool(true));
        assert_eq!(
            cell_value(&CqlValue::Blob(vec![1, 2, 3])),
            CellValue::Bytes(vec![1, 2, 3])
        );
        assert_eq!(cell_value(&CqlValue::Empty), CellValue::Null);
    }

    #[test]
    fn test_uuid_degrades_to_text() {
        let uuid = uuid_from_u128(0x1234_5678_9abc_def0);
        match cell_value(&CqlValue::Uuid(uuid)) {
            CellValue::Text(s) => assert_eq!(s, uuid.to_string()),
            other => panic!("expected text, got {other:?}"),
        }
    }

    fn uuid_from_u128(v: u128) -> uuid::Uuid {
        uuid::Uuid::from_u128(v)
    }

    #[test]
    fn test_collection_degrades_to_text() {
        let list = CqlValue::List(vec![CqlValue::Int(1), CqlValue::Int(2)]);
        match cell_value(&list) {
            CellValue::Text(s) => assert!(s.contains("Int(1)")),
            other => panic!("expected text fallback, got {other:?}"),
        }
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_value(CellValue::Text("x".into())).unwrap();
        assert_eq!(json, serde_json::json!({"type": "text", "value": "x"}));

        let json = serde_json::to_value(CellValue::Null).unwrap();
        assert_eq!(json, serde_json::json!({"type": "null"}));

        let json = serde_json::to_value(CellValue::Bytes(vec![0xde, 0xad])).unwrap();
        assert_eq!(json, serde_json::json!({"type": "bytes", "value": "3q0="}));
    }

    #[test]
    fn test_bytes_roundtrip() {
        let cell = CellValue::Bytes(vec![0, 1, 2, 255]);
        let json = serde_json::to_string(&cell).unwrap();
        let back: CellValue = serde_json::from_str(&json).unwrap();
        assert_eq!(cell, back);
    }

    #[test]
    fn test_row_get() {
        let row = DataRow {
            cells: vec![
                ("id".to_string(), CellValue::Int(1)),
                ("name".to_string(), CellValue::Text("alice".into())),
            ],
        };
        assert_eq!(row.get("id").and_then(CellValue::as_i64), Some(1));
        assert_eq!(row.get("name").and_then(CellValue::as_str), Some("alice"));
        assert!(row.get("missing").is_none());
    }
}
