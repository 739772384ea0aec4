//! In-memory [`RecordStore`] for tests and embedding.

use crate::error::{Error, Result};
use crate::record::Record;
use crate::serializer::{JsonSerializer, Serializer};
use crate::store::RecordStore;
use parking_lot::RwLock;

/// Keeps the serialized collection in a byte buffer instead of a file.
///
/// Stores bytes rather than records so reads stay verbatim and a corrupt
/// payload behaves exactly like a corrupt file. `None` plays the part of a
/// missing file.
#[derive(Debug, Default)]
pub struct MemoryStore {
    bytes: RwLock<Option<Vec<u8>>>,
    serializer: JsonSerializer,
    fail_writes: RwLock<bool>,
}

impl MemoryStore {
    /// Empty collection (`[]`).
    pub fn new() -> Self {
        Self::with_bytes(b"[]".to_vec())
    }

    /// Start from arbitrary stored bytes, valid or not.
    pub fn with_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: RwLock::new(Some(bytes.into())),
            ..Self::default()
        }
    }

    /// A store whose reads all fail, like a missing file.
    pub fn missing() -> Self {
        Self::default()
    }

    /// Make every subsequent [`save`](RecordStore::save) fail.
    pub fn fail_writes(&self, yes: bool) {
        *self.fail_writes.write() = yes;
    }

    /// Current stored bytes, if any.
    #[must_use]
    pub fn snapshot(&self) -> Option<Vec<u8>> {
        self.bytes.read().clone()
    }
}

impl RecordStore for MemoryStore {
    fn load_raw(&self) -> Result<Vec<u8>> {
        self.bytes
            .read()
            .clone()
            .ok_or_else(|| Error::StoreUnreadable("no stored collection".into()))
    }

    fn save(&self, records: &[Record]) -> Result<()> {
        if *self.fail_writes.read() {
            return Err(Error::StoreUnwritable("writes disabled".into()));
        }
        let bytes = self.serializer.serialize(records)?;
        *self.bytes.write() = Some(bytes);
        Ok(())
    }

    fn serializer(&self) -> &JsonSerializer {
        &self.serializer
    }
}
