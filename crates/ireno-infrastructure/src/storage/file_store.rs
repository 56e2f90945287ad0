//! File-backed key-value store with atomic writes.
//!
//! Each key is stored in its own file inside one directory:
//!
//! - **Atomicity**: values are written to a temp file and renamed into place
//! - **Isolation**: writers take an exclusive `fs2` lock on the directory
//! - **Durability**: explicit fsync before rename
//! - **Quota**: an optional byte budget across all stored values

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write as IoWrite};
use std::path::{Path, PathBuf};

use ireno_core::storage::{KeyValueStore, StoreWriteError};

const VALUE_EXTENSION: &str = "value";
const LOCK_FILE_NAME: &str = ".store.lock";

/// A directory of value files behaving like browser local storage.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    dir: PathBuf,
    quota_bytes: Option<u64>,
}

impl FileKeyValueStore {
    /// Creates a store rooted at `dir`. The directory is created on first
    /// write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            quota_bytes: None,
        }
    }

    /// Caps the total size of stored values.
    pub fn with_quota(mut self, quota_bytes: Option<u64>) -> Self {
        self.quota_bytes = quota_bytes;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `key`.
    fn value_path(&self, key: &str) -> PathBuf {
        self.dir
            .join(format!("{}.{}", encode_key(key), VALUE_EXTENSION))
    }

    fn temp_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!(".{}.tmp", encode_key(key)))
    }

    /// Bytes used by every stored value except `excluded`.
    fn used_bytes(&self, excluded: &Path) -> std::io::Result<u64> {
        let mut total = 0;
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path == excluded {
                continue;
            }
            if path.extension().and_then(|e| e.to_str()) == Some(VALUE_EXTENSION) {
                total += fs::metadata(&path)?.len();
            }
        }
        Ok(total)
    }

    fn write_atomic(&self, key: &str, value: &str) -> Result<(), StoreWriteError> {
        fs::create_dir_all(&self.dir).map_err(|e| map_io_error(&self.dir, e))?;
        let _lock = DirLock::acquire(&self.dir)?;

        let target = self.value_path(key);
        if let Some(quota) = self.quota_bytes {
            let used = self
                .used_bytes(&target)
                .map_err(|e| map_io_error(&self.dir, e))?;
            let needed = value.len() as u64;
            if used + needed > quota {
                return Err(StoreWriteError::QuotaExceeded(format!(
                    "{} bytes needed, {} of {} bytes in use",
                    needed, used, quota
                )));
            }
        }

        let tmp_path = self.temp_path(key);
        let result = (|| {
            let mut tmp_file = File::create(&tmp_path)?;
            tmp_file.write_all(value.as_bytes())?;
            tmp_file.sync_all()?;
            drop(tmp_file);
            fs::rename(&tmp_path, &target)
        })();

        if let Err(e) = result {
            let _ = fs::remove_file(&tmp_path);
            return Err(map_io_error(&target, e));
        }
        Ok(())
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn read(&self, key: &str) -> Option<String> {
        let path = self.value_path(key);
        match fs::read_to_string(&path) {
            Ok(content) => Some(content),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to read stored value");
                None
            }
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StoreWriteError> {
        self.write_atomic(key, value)
    }

    fn remove(&self, key: &str) {
        let path = self.value_path(key);
        match fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to remove stored value");
            }
        }
    }
}

/// Maps a key to a file-name-safe string.
///
/// ASCII letters, digits, `-` and `_` are kept; every other byte becomes
/// `%XX`, so distinct keys never share a file.
fn encode_key(key: &str) -> String {
    let mut encoded = String::with_capacity(key.len());
    for byte in key.bytes() {
        match byte {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' | b'_' => encoded.push(byte as char),
            other => encoded.push_str(&format!("%{:02X}", other)),
        }
    }
    encoded
}

fn map_io_error(path: &Path, err: std::io::Error) -> StoreWriteError {
    let message = format!("{}: {}", path.display(), err);
    match err.kind() {
        ErrorKind::StorageFull => StoreWriteError::QuotaExceeded(message),
        ErrorKind::PermissionDenied | ErrorKind::ReadOnlyFilesystem => {
            StoreWriteError::Unavailable(message)
        }
        _ => StoreWriteError::Io(message),
    }
}

/// An exclusive lock on the store directory.
///
/// The lock is released when the file handle is dropped.
struct DirLock {
    #[allow(dead_code)]
    file: File,
}

impl DirLock {
    fn acquire(dir: &Path) -> Result<Self, StoreWriteError> {
        let lock_path = dir.join(LOCK_FILE_NAME);
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| map_io_error(&lock_path, e))?;

        #[cfg(unix)]
        {
            use fs2::FileExt;
            file.lock_exclusive()
                .map_err(|e| map_io_error(&lock_path, e))?;
        }

        Ok(DirLock { file })
    }
}
