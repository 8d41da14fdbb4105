use parking_lot::Mutex;

use licensure_model::Result;

use crate::{Sink, Source, Store};

/// An in-memory byte store, used for testing and for the chained manager's
/// internal capability probe.
#[derive(Debug, Default)]
pub struct MemoryStore {
    bytes: Mutex<Option<Vec<u8>>>,
}

impl MemoryStore {
    /// Construct an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct an in-memory store pre-populated with `bytes`.
    #[must_use]
    pub fn with_bytes(bytes: Vec<u8>) -> Self {
        Self {
            bytes: Mutex::new(Some(bytes)),
        }
    }
}

impl Source for MemoryStore {
    fn read_all(&self) -> Result<Vec<u8>> {
        self.bytes
            .lock()
            .clone()
            .ok_or_else(|| crate::store_error("memory store", "no artifact installed"))
    }
}

impl Sink for MemoryStore {
    fn write_all(&self, bytes: &[u8]) -> Result<()> {
        *self.bytes.lock() = Some(bytes.to_vec());
        Ok(())
    }
}

impl Store for MemoryStore {
    fn exists(&self) -> Result<bool> {
        Ok(self.bytes.lock().is_some())
    }

    fn delete(&self) -> Result<()> {
        *self.bytes.lock() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_store_reports_absence() {
        let store = MemoryStore::new();
        assert!(!store.exists().unwrap());
        assert!(store.read_all().is_err());
    }

    #[test]
    fn write_then_read_round_trips() {
        let store = MemoryStore::new();
        store.write_all(b"artifact").unwrap();
        assert!(store.exists().unwrap());
        assert_eq!(store.read_all().unwrap(), b"artifact");
    }

    #[test]
    fn delete_clears_existence() {
        let store = MemoryStore::with_bytes(b"artifact".to_vec());
        store.delete().unwrap();
        assert!(!store.exists().unwrap());
    }
}
