//! Record store trait, id assignment, and the file-backed store + builder.

use crate::error::Result;
use crate::persist::{atomic_write, ensure_exists, plain_write, read_bytes};
use crate::record::{record_id, Record};
use crate::serializer::{JsonSerializer, Serializer};
use std::path::{Path, PathBuf};

/// Where the collection lives. Handlers only talk to this trait, so a test
/// can swap in [`MemoryStore`](crate::memory::MemoryStore).
///
/// Every call goes to the underlying medium; implementations must not cache
/// between calls. Each handler does its own `load` → mutate → `save`.
pub trait RecordStore: Send + Sync {
    /// The stored bytes, untouched.
    fn load_raw(&self) -> Result<Vec<u8>>;

    /// Replace the whole collection with `records`.
    fn save(&self, records: &[Record]) -> Result<()>;

    /// Serializer used to decode [`load_raw`](Self::load_raw).
    fn serializer(&self) -> &JsonSerializer;

    /// Parse the stored bytes into records.
    fn load(&self) -> Result<Vec<Record>> {
        let bytes = self.load_raw()?;
        self.serializer().deserialize(&bytes)
    }
}

/// Id for the next created record: one past the largest id, or `1` when
/// there is none. Numeric-string ids count by their number, so a legacy
/// `"5"` pushes the next id to 6. A fractional maximum rounds down first.
/// Records whose id doesn't read as a number don't take part.
///
/// Gaps left by deletions below the maximum are never refilled, but deleting
/// the highest record lets its id come back.
#[must_use]
pub fn next_id(records: &[Record]) -> i64 {
    records
        .iter()
        .filter_map(record_id)
        .reduce(f64::max)
        .map_or(1, |max| (max.floor() as i64).saturating_add(1))
}

/// Store backed by one JSON array file.
pub struct FileStore {
    path: PathBuf,
    serializer: JsonSerializer,
    atomic: bool,
}

impl FileStore {
    /// Open the file at `path` with compact JSON and atomic writes, creating
    /// it as `[]` when missing.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::builder(path).build()
    }

    /// Start configuring a new store. Call [`.build()`](FileStoreBuilder::build)
    /// when ready.
    pub fn builder(path: impl AsRef<Path>) -> FileStoreBuilder {
        FileStoreBuilder::new(path)
    }

    /// Path to the backing JSON file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordStore for FileStore {
    fn load_raw(&self) -> Result<Vec<u8>> {
        read_bytes(&self.path)
    }

    fn save(&self, records: &[Record]) -> Result<()> {
        let bytes = self.serializer.serialize(records)?;
        if self.atomic {
            atomic_write(&self.path, &bytes)?;
        } else {
            plain_write(&self.path, &bytes)?;
        }
        tracing::debug!(path = %self.path.display(), records = records.len(), "store saved");
        Ok(())
    }

    fn serializer(&self) -> &JsonSerializer {
        &self.serializer
    }
}

impl std::fmt::Debug for FileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileStore")
            .field("path", &self.path)
            .field("atomic", &self.atomic)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Configures and opens a [`FileStore`].
///
/// ```rust,no_run
/// use json_items::FileStore;
///
/// let store = FileStore::builder("items.json")
///     .pretty(true)
///     .atomic_writes(false)
///     .build()
///     .unwrap();
/// ```
pub struct FileStoreBuilder {
    path: PathBuf,
    pretty: bool,
    atomic: bool,
    create_if_missing: bool,
}

impl FileStoreBuilder {
    fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            pretty: false,
            atomic: true,
            create_if_missing: true,
        }
    }

    /// Write human-readable JSON with indentation (default: compact).
    pub fn pretty(mut self, yes: bool) -> Self {
        self.pretty = yes;
        self
    }

    /// Write through a temp file + rename (default: on). Off truncates the
    /// file in place.
    pub fn atomic_writes(mut self, yes: bool) -> Self {
        self.atomic = yes;
        self
    }

    /// Seed a missing file with `[]` at build time (default: on). Off leaves
    /// it missing, and every request then fails to read the store.
    pub fn create_if_missing(mut self, yes: bool) -> Self {
        self.create_if_missing = yes;
        self
    }

    /// Open the store. Only touches the disk when seeding a missing file.
    pub fn build(self) -> Result<FileStore> {
        if self.create_if_missing && ensure_exists(&self.path)? {
            tracing::info!(path = %self.path.display(), "created empty store");
        }
        let serializer = if self.pretty {
            JsonSerializer::pretty()
        } else {
            JsonSerializer::new()
        };
        Ok(FileStore {
            path: self.path,
            serializer,
            atomic: self.atomic,
        })
    }
}

impl std::fmt::Debug for FileStoreBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileStoreBuilder")
            .field("path", &self.path)
            .field("pretty", &self.pretty)
            .field("atomic", &self.atomic)
            .field("create_if_missing", &self.create_if_missing)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records(v: serde_json::Value) -> Vec<Record> {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn next_id_on_empty_is_one() {
        assert_eq!(next_id(&[]), 1);
    }

    #[test]
    fn next_id_is_max_plus_one() {
        let rs = records(json!([{"id": 1}, {"id": 7}, {"id": 3}]));
        assert_eq!(next_id(&rs), 8);
    }

    #[test]
    fn next_id_skips_records_without_numeric_ids() {
        let rs = records(json!([{"id": "x"}, {"name": "no id"}]));
        assert_eq!(next_id(&rs), 1);
        let rs = records(json!([{"id": "x"}, {"id": 4}]));
        assert_eq!(next_id(&rs), 5);
    }

    #[test]
    fn next_id_counts_numeric_string_ids() {
        let rs = records(json!([{"id": "5"}]));
        assert_eq!(next_id(&rs), 6);
        let rs = records(json!([{"id": "9"}, {"id": 3}]));
        assert_eq!(next_id(&rs), 10);
    }

    #[test]
    fn next_id_rounds_fractional_max_down() {
        let rs = records(json!([{"id": 5.5}]));
        assert_eq!(next_id(&rs), 6);
        let rs = records(json!([{"id": -3}]));
        assert_eq!(next_id(&rs), -2);
    }
}
