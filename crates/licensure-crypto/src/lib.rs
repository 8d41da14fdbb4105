//! Byte-stream transformations (compression, password-protected encryption)
//! and signature-based authentication for the license pipeline.

#![warn(missing_docs)]

mod authentication;
mod deflate;
mod encryption;
mod password;
mod transformation;

pub use authentication::{Authentication, Decoder, Ed25519Authentication};
pub use deflate::Deflate;
pub use encryption::{AesGcmEncryption, AesKeySize};
pub use password::{
    CheckedPasswordProtection, MinimumStrengthPolicy, Password, PasswordPolicy,
    PasswordProtection, StaticPasswordProtection, Usage,
};
pub use transformation::{Chain, Transformation};

/// Decode a value through a `Decoder`'s erased representation.
pub fn decode<T: serde::de::DeserializeOwned>(decoder: &dyn Decoder) -> licensure_model::Result<T> {
    let value = decoder.decode_value()?;
    serde_json::from_value(value).map_err(|err| {
        licensure_model::LicenseError::Unexpected(anyhow::anyhow!("decoder decode: {err}"))
    })
}
