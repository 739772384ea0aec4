//! Disk I/O helpers: raw read, plain overwrite and atomic write.
//!
//! The rename-over approach is close to atomic on most platforms. On NTFS
//! (Windows) it's reliable; on FAT32 or network shares there are no hard
//! guarantees. If that matters to you, keep backups or use a real database.

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

/// Reads the file at `path` as-is. A missing file is an error here, unlike a
/// fresh key-value store: the collection is expected to exist.
pub fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| Error::StoreUnreadable(format!("{}: {e}", path.display())))
}

/// Truncate `path` and write `bytes` into it. A crash mid-write leaves a
/// partial file behind.
pub fn plain_write(path: &Path, bytes: &[u8]) -> Result<()> {
    std::fs::write(path, bytes)
        .map_err(|e| Error::StoreUnwritable(format!("{}: {e}", path.display())))
}

/// Per-process sequence for temp file names.
static TMP_SEQ: AtomicU64 = AtomicU64::new(0);

/// Write `bytes` to a fresh temp file next to `path` and then rename over
/// `path`. This avoids leaving a half-written file if the process crashes
/// mid-write.
///
/// Every call gets its own `<path>.<pid>.<seq>.tmp`, so overlapping writers
/// never truncate or steal each other's temp file. The last rename wins.
pub fn atomic_write(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = temp_path_for(path);
    let result = std::fs::write(&tmp, bytes).and_then(|()| std::fs::rename(&tmp, path));
    if let Err(e) = result {
        let _ = std::fs::remove_file(&tmp);
        return Err(Error::StoreUnwritable(format!("{}: {e}", path.display())));
    }
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");
    let seq = TMP_SEQ.fetch_add(1, Ordering::Relaxed);
    path.with_extension(format!("{ext}.{}.{seq}.tmp", std::process::id()))
}

/// Seed `path` with an empty array if it doesn't exist yet. Returns `true`
/// when the file was created.
pub fn ensure_exists(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    atomic_write(path, b"[]")?;
    Ok(true)
}
