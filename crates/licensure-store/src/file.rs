use std::fs;
use std::path::{Path, PathBuf};

use licensure_model::Result;

use crate::{Sink, Source, Store};

/// A filesystem-backed artifact store. Its identity for monitor purposes is
/// its canonicalized path.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Bind a store to `path`. The file need not exist yet.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The path this store is bound to.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Source for FileStore {
    fn read_all(&self) -> Result<Vec<u8>> {
        fs::read(&self.path)
            .map_err(|err| crate::store_error(&format!("reading {}", self.path.display()), err))
    }
}

impl Sink for FileStore {
    fn write_all(&self, bytes: &[u8]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|err| {
                    crate::store_error(&format!("creating {}", parent.display()), err)
                })?;
            }
        }
        fs::write(&self.path, bytes)
            .map_err(|err| crate::store_error(&format!("writing {}", self.path.display()), err))
    }
}

impl Store for FileStore {
    fn exists(&self) -> Result<bool> {
        Ok(self.path.is_file())
    }

    fn delete(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(crate::store_error(
                &format!("deleting {}", self.path.display()),
                err,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn write_read_delete_round_trip() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested").join("artifact.lic"));

        assert!(!store.exists().unwrap());
        store.write_all(b"artifact bytes").unwrap();
        assert!(store.exists().unwrap());
        assert_eq!(store.read_all().unwrap(), b"artifact bytes");

        store.delete().unwrap();
        assert!(!store.exists().unwrap());
    }

    #[test]
    fn delete_missing_file_is_not_an_error() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("absent.lic"));
        assert!(store.delete().is_ok());
    }

    #[test]
    fn read_missing_file_is_a_store_failure() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("absent.lic"));
        assert!(store.read_all().is_err());
    }
}
