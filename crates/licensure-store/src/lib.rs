//! Byte-stream endpoints (`Source`/`Sink`) and persistent byte containers
//! (`Store`) the license pipeline reads and writes through.

#![warn(missing_docs)]

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use licensure_model::{LicenseError, Result};

/// A readable byte-stream endpoint.
pub trait Source: Send + Sync {
    /// Read the entire contents of the source.
    fn read_all(&self) -> Result<Vec<u8>>;
}

/// A writable byte-stream endpoint.
pub trait Sink: Send + Sync {
    /// Overwrite the sink's contents with `bytes`.
    fn write_all(&self, bytes: &[u8]) -> Result<()>;
}

/// A persistent byte container with existence/delete semantics.
///
/// A `Store` doubles as a [`Source`] and [`Sink`]; its identity (not its
/// contents) is what callers use as a mutual-exclusion point around
/// install/uninstall.
pub trait Store: Source + Sink {
    /// Whether the store currently holds an artifact.
    fn exists(&self) -> Result<bool>;

    /// Remove the stored artifact, if any.
    fn delete(&self) -> Result<()>;
}

pub(crate) fn store_error(context: &str, err: impl std::fmt::Display) -> LicenseError {
    LicenseError::Store(format!("{context}: {err}"))
}
