//! File-backed store.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::{CacheError, KvStore};

/// Stores each key as `<dir>/<key>.json`, with `:` written as `+`.
///
/// Writes go to a temporary file first and are renamed into place, so a
/// crash mid-write leaves the previous value intact.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .map_err(|e| CacheError::OpenError(format!("{}: {}", dir.display(), e)))?;
        Ok(Self { dir })
    }

    /// Root directory of the store.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Check that `key` can be stored as a file name.
    ///
    /// Keys are ASCII letters, digits, `-`, `_`, `.` and `:`, and must not
    /// start with `.`.
    pub fn validate_key(key: &str) -> Result<(), CacheError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':'))
            && !key.starts_with('.');
        if valid {
            Ok(())
        } else {
            Err(CacheError::InvalidKey(key.to_string()))
        }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, CacheError> {
        Self::validate_key(key)?;
        // '+' never appears in a valid key, so distinct keys get distinct files
        Ok(self.dir.join(format!("{}.json", key.replace(':', "+"))))
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let path = self.path_for(key)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), CacheError> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        tracing::trace!(path = %path.display(), bytes = value.len(), "wrote blob");
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), CacheError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        store.set("cart", br#"[{"id":"p1"}]"#).unwrap();

        // A second handle on the same directory sees the write
        let reopened = FileStore::open(dir.path()).unwrap();
        assert_eq!(
            reopened.get("cart").unwrap(),
            Some(br#"[{"id":"p1"}]"#.to_vec())
        );
    }

    #[test]
    fn test_missing_and_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        assert_eq!(store.get("cart").unwrap(), None);
        store.delete("cart").unwrap();

        store.set("cart", b"[]").unwrap();
        assert!(store.exists("cart").unwrap());
        store.delete("cart").unwrap();
        assert!(!store.exists("cart").unwrap());
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        assert!(matches!(
            store.set("../escape", b"x"),
            Err(CacheError::InvalidKey(_))
        ));
        assert!(matches!(store.get(""), Err(CacheError::InvalidKey(_))));
    }

    #[test]
    fn test_namespaced_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        store.set("cart:guest", b"[]").unwrap();
        assert!(dir.path().join("cart+guest.json").exists());
    }

    #[test]
    fn test_separator_does_not_collide() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        store.set("cart:guest", b"[1]").unwrap();
        store.set("cart_guest", b"[2]").unwrap();

        assert_eq!(store.get("cart:guest").unwrap(), Some(b"[1]".to_vec()));
        assert_eq!(store.get("cart_guest").unwrap(), Some(b"[2]".to_vec()));
    }

    #[test]
    fn test_validate_key() {
        assert!(FileStore::validate_key("cart:guest-2").is_ok());
        assert!(matches!(
            FileStore::validate_key("cart:my session"),
            Err(CacheError::InvalidKey(_))
        ));
        assert!(FileStore::validate_key(".hidden").is_err());
        assert!(FileStore::validate_key("a+b").is_err());
    }
}
