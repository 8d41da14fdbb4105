use licensure_model::{LicenseError, Result};

use crate::Codec;

/// The default codec, serializing the erased value as compact JSON.
///
/// This is the only `Codec` implementation shipped in-tree; the trait
/// exists so a deployment can swap in CBOR, a binary format, or anything
/// else without touching the pipeline above it.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl JsonCodec {
    /// Construct the JSON codec.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Codec for JsonCodec {
    fn encode_value(&self, value: &serde_json::Value) -> Result<Vec<u8>> {
        serde_json::to_vec(value)
            .map_err(|err| LicenseError::Unexpected(anyhow::anyhow!("json encode: {err}")))
    }

    fn decode_value(&self, bytes: &[u8]) -> Result<serde_json::Value> {
        serde_json::from_slice(bytes)
            .map_err(|err| LicenseError::Unexpected(anyhow::anyhow!("json decode: {err}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{decode, encode};
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Sample {
        name: String,
        count: u32,
    }

    #[test]
    fn round_trips_a_struct() {
        let codec = JsonCodec::new();
        let value = Sample {
            name: "widget".into(),
            count: 3,
        };
        let bytes = encode(&codec, &value).unwrap();
        let restored: Sample = decode(&codec, &bytes).unwrap();
        assert_eq!(value, restored);
    }

    #[test]
    fn rejects_malformed_bytes() {
        let codec = JsonCodec::new();
        assert!(codec.decode_value(b"not json").is_err());
    }
}
