//! Byte-layer plumbing shared by the base manager and the key generator: the
//! compression/encryption composition the artifact layout requires, and the
//! cache/monitor key derived from an object's identity rather than its
//! contents.

use std::sync::Arc;

use licensure_context::Context;
use licensure_crypto::Transformation;
use licensure_model::Result;
use licensure_store::Store;

/// Write-direction transform: compress, then encrypt —
/// `encryption(compression(bytes))`.
pub(crate) fn encode_artifact(
    context: &Context,
    encryption: &dyn Transformation,
    payload: Vec<u8>,
) -> Result<Vec<u8>> {
    let compressed = context.compression().apply(payload)?;
    encryption.apply(compressed)
}

/// Read-direction transform: decrypt, then decompress — the exact inverse
/// of [`encode_artifact`], applied to bytes coming off a source.
pub(crate) fn decode_artifact(
    context: &Context,
    encryption: &dyn Transformation,
    bytes: Vec<u8>,
) -> Result<Vec<u8>> {
    let decrypted = encryption.invert(bytes)?;
    context.compression().invert(decrypted)
}

/// An opaque identity for a [`Store`], used as a cache key and the
/// "same object" check the cache's freshness semantics rely on. Two calls
/// against the same store yield the same identity; the underlying bytes
/// are never inspected.
pub(crate) type CacheKey = usize;

pub(crate) fn store_identity(store: &Arc<dyn Store>) -> CacheKey {
    Arc::as_ptr(store).cast::<()>() as CacheKey
}
