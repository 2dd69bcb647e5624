use super::{check_quota, Storage};
use crate::error::{StorageError, StorageResult};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const EXTENSION: &str = "json";

/// Stores each key as a JSON file in one directory
///
/// Writes go to a temporary file that is renamed over the target, so a crash
/// mid-write leaves the previous value intact.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
    quota: Option<usize>,
}

impl FileStorage {
    /// Open (or create) a storage directory
    pub fn open(dir: impl Into<PathBuf>, quota: Option<usize>) -> StorageResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        log::debug!("File storage directory: {}", dir.display());
        Ok(Self { dir, quota })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Map a key onto a safe file name
    fn filename(key: &str) -> String {
        let stem: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        format!("{stem}.{EXTENSION}")
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(Self::filename(key))
    }

    /// Bytes used by every stored value except `key`'s
    fn used_by_others(&self, key: &str) -> StorageResult<usize> {
        let own = Self::filename(key);
        let mut used = 0;
        for entry in std::fs::read_dir(&self.dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            if entry.file_name().to_string_lossy() == own {
                continue;
            }
            let name_len = path.file_stem().map(|s| s.len()).unwrap_or(0);
            used += name_len + entry.metadata()?.len() as usize;
        }
        Ok(used)
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let bytes = match std::fs::read(self.path(key)) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        String::from_utf8(bytes).map(Some).map_err(|_| {
            log::warn!("{} does not hold UTF-8 text", self.path(key).display());
            StorageError::InvalidEncoding {
                key: key.to_string(),
            }
        })
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        if self.quota.is_some() {
            check_quota(self.quota, self.used_by_others(key)?, key, value)?;
        }
        let path = self.path(key);
        let tmp = path.with_extension("tmp");
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        log::debug!("Wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        match std::fs::remove_file(self.path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
