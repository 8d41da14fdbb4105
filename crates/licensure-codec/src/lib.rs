//! The `Codec` abstraction (byte encode/decode of arbitrary serializable
//! values) and the repository model/context/controller that bundles a signed
//! license payload together with its signature.

#![warn(missing_docs)]

mod json;
mod repository;

pub use json::JsonCodec;
pub use repository::{DefaultRepositoryContext, RepositoryContext, RepositoryController, RepositoryModel};

use licensure_model::{LicenseError, Result};
use serde::{de::DeserializeOwned, Serialize};

/// Encodes and decodes arbitrary serializable values to and from bytes.
///
/// Java's `Codec` can encode/decode truly `Any` because of type erasure at
/// runtime; this trait stays object-safe by routing through
/// [`serde_json::Value`] as the erased intermediate representation, and
/// [`encode`]/[`decode`] provide the generic, typed entry points callers
/// actually use.
pub trait Codec: Send + Sync {
    /// Encode an already-erased value to bytes.
    fn encode_value(&self, value: &serde_json::Value) -> Result<Vec<u8>>;

    /// Decode bytes into an erased value.
    fn decode_value(&self, bytes: &[u8]) -> Result<serde_json::Value>;
}

/// Encode `value` through `codec`.
pub fn encode<T: Serialize>(codec: &dyn Codec, value: &T) -> Result<Vec<u8>> {
    let erased = serde_json::to_value(value)
        .map_err(|err| LicenseError::Unexpected(anyhow::anyhow!("codec encode: {err}")))?;
    codec.encode_value(&erased)
}

/// Decode bytes through `codec` into a concrete type.
pub fn decode<T: DeserializeOwned>(codec: &dyn Codec, bytes: &[u8]) -> Result<T> {
    let erased = codec.decode_value(bytes)?;
    serde_json::from_value(erased)
        .map_err(|err| LicenseError::Unexpected(anyhow::anyhow!("codec decode: {err}")))
}
