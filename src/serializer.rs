//! Serialization layer. Defaults to JSON via serde_json.
//!
//! Implement [`Serializer`] if the records should be laid out differently on
//! disk (pretty-printed, one-per-line, etc.).

use crate::error::{Error, Result};
use crate::record::Record;
use serde_json::Value;

/// Converts the record sequence to/from bytes for persistence.
pub trait Serializer: Send + Sync {
    /// Encode the records as bytes.
    fn serialize(&self, records: &[Record]) -> Result<Vec<u8>>;

    /// Decode bytes back into records. Anything but an array of objects is
    /// [`Error::StoreCorrupt`].
    fn deserialize(&self, bytes: &[u8]) -> Result<Vec<Record>>;
}

/// JSON serializer with optional pretty-printing.
#[derive(Debug, Clone, Default)]
pub struct JsonSerializer {
    pretty: bool,
}

impl JsonSerializer {
    /// Compact JSON (single line, no extra whitespace).
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretty-printed JSON with indentation, easier to read by hand.
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl Serializer for JsonSerializer {
    fn serialize(&self, records: &[Record]) -> Result<Vec<u8>> {
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(records)
        } else {
            serde_json::to_vec(records)
        };
        bytes.map_err(|e| Error::StoreUnwritable(e.to_string()))
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<Vec<Record>> {
        let text = std::str::from_utf8(bytes).map_err(|e| Error::StoreUnreadable(e.to_string()))?;
        let value: Value = serde_json::from_str(text)?;
        let Value::Array(items) = value else {
            return Err(Error::StoreCorrupt("top level is not an array".into()));
        };
        items
            .into_iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::Object(record) => Ok(record),
                _ => Err(Error::StoreCorrupt(format!("element {i} is not an object"))),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compact_output_keeps_field_order() {
        let records = JsonSerializer::new()
            .deserialize(br#"[{"name":"widget","id":1}]"#)
            .unwrap();
        let bytes = JsonSerializer::new().serialize(&records).unwrap();
        assert_eq!(bytes, br#"[{"name":"widget","id":1}]"#);
    }

    #[test]
    fn rejects_non_arrays_and_non_objects() {
        let ser = JsonSerializer::new();
        assert!(matches!(ser.deserialize(b"{}"), Err(Error::StoreCorrupt(_))));
        assert!(matches!(ser.deserialize(b"[1,2]"), Err(Error::StoreCorrupt(_))));
        assert!(matches!(ser.deserialize(b""), Err(Error::StoreCorrupt(_))));
        assert!(matches!(ser.deserialize(b"[{]"), Err(Error::StoreCorrupt(_))));
    }

    #[test]
    fn invalid_utf8_is_unreadable() {
        let ser = JsonSerializer::new();
        assert!(matches!(ser.deserialize(&[0xff, 0xfe]), Err(Error::StoreUnreadable(_))));
    }
}
