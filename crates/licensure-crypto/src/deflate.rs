use std::io::{Read, Write};

use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use flate2::Compression;

use licensure_model::{LicenseError, Result};

use crate::Transformation;

/// Deflate compression, as named by the `compression=deflate` scenario in
/// the license artifact layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct Deflate;

impl Deflate {
    /// Construct the deflate transformation at the default compression level.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Transformation for Deflate {
    fn apply(&self, data: Vec<u8>) -> Result<Vec<u8>> {
        let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
        encoder
            .write_all(&data)
            .map_err(|err| LicenseError::Unexpected(anyhow::anyhow!("deflate compress: {err}")))?;
        encoder
            .finish()
            .map_err(|err| LicenseError::Unexpected(anyhow::anyhow!("deflate compress: {err}")))
    }

    fn invert(&self, data: Vec<u8>) -> Result<Vec<u8>> {
        let mut decoder = DeflateDecoder::new(data.as_slice());
        let mut out = Vec::new();
        decoder
            .read_to_end(&mut out)
            .map_err(|err| LicenseError::Unexpected(anyhow::anyhow!("deflate decompress: {err}")))?;
        Ok(out)
    }
}
