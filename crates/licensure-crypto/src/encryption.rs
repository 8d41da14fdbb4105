use std::sync::Arc;

use aes_gcm::aead::{Aead, AeadCore, OsRng};
use aes_gcm::{Aes128Gcm, Aes256Gcm, KeyInit, Nonce};
use argon2::password_hash::SaltString;
use argon2::Argon2;

use licensure_model::{LicenseError, Result};

use crate::password::{PasswordProtection, Usage};
use crate::Transformation;

const NONCE_LENGTH: usize = 12;

/// The AES key size an [`AesGcmEncryption`] derives and encrypts under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AesKeySize {
    /// 16-byte key, AES-128-GCM.
    Bits128,
    /// 32-byte key, AES-256-GCM.
    Bits256,
}

impl AesKeySize {
    fn key_length(self) -> usize {
        match self {
            AesKeySize::Bits128 => 16,
            AesKeySize::Bits256 => 32,
        }
    }
}

/// Password-protected AES-GCM encryption, at either the 128-bit or 256-bit
/// key size.
///
/// The salt used to derive the key and the nonce used to encrypt are both
/// freshly generated on every `apply` and prefixed onto the ciphertext, so
/// the same password never produces the same bytes twice and `invert`
/// needs no side channel to recover them.
///
/// Wire layout: `[salt_len: u8][salt bytes][nonce: 12 bytes][ciphertext]`.
/// The key size is not carried on the wire; the transformation that
/// encrypted an artifact must match the one configured to decrypt it.
pub struct AesGcmEncryption {
    password: Arc<dyn PasswordProtection>,
    key_size: AesKeySize,
}

impl AesGcmEncryption {
    /// Construct the transformation at the default 256-bit key size,
    /// reading its secret from `password`.
    #[must_use]
    pub fn new(password: Arc<dyn PasswordProtection>) -> Self {
        Self::with_key_size(password, AesKeySize::Bits256)
    }

    /// Construct the transformation at an explicit key size.
    #[must_use]
    pub fn with_key_size(password: Arc<dyn PasswordProtection>, key_size: AesKeySize) -> Self {
        Self { password, key_size }
    }

    fn derive_key(&self, secret: &str, salt: &SaltString) -> Result<Vec<u8>> {
        let mut key = vec![0u8; self.key_size.key_length()];
        Argon2::default()
            .hash_password_into(secret.as_bytes(), salt.as_str().as_bytes(), &mut key)
            .map_err(|err| LicenseError::Authentication(format!("key derivation failed: {err}")))?;
        Ok(key)
    }
}

impl Transformation for AesGcmEncryption {
    fn apply(&self, data: Vec<u8>) -> Result<Vec<u8>> {
        let secret = self.password.password(Usage::Write)?;
        let salt = SaltString::generate(&mut OsRng);
        let key = self.derive_key(secret.as_str(), &salt)?;

        let (nonce, ciphertext) = match self.key_size {
            AesKeySize::Bits128 => {
                let cipher = Aes128Gcm::new_from_slice(&key)
                    .map_err(|err| LicenseError::Authentication(format!("invalid cipher key: {err}")))?;
                let nonce = Aes128Gcm::generate_nonce(&mut OsRng);
                let ciphertext = cipher
                    .encrypt(&nonce, data.as_ref())
                    .map_err(|err| LicenseError::Authentication(format!("encryption failed: {err}")))?;
                (nonce.to_vec(), ciphertext)
            }
            AesKeySize::Bits256 => {
                let cipher = Aes256Gcm::new_from_slice(&key)
                    .map_err(|err| LicenseError::Authentication(format!("invalid cipher key: {err}")))?;
                let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
                let ciphertext = cipher
                    .encrypt(&nonce, data.as_ref())
                    .map_err(|err| LicenseError::Authentication(format!("encryption failed: {err}")))?;
                (nonce.to_vec(), ciphertext)
            }
        };

        let salt_bytes = salt.as_str().as_bytes();
        let mut out = Vec::with_capacity(1 + salt_bytes.len() + NONCE_LENGTH + ciphertext.len());
        out.push(salt_bytes.len() as u8);
        out.extend_from_slice(salt_bytes);
        out.extend_from_slice(&nonce);
        out.extend_from_slice(&ciphertext);
        Ok(out)
    }

    fn invert(&self, data: Vec<u8>) -> Result<Vec<u8>> {
        let secret = self.password.password(Usage::Read)?;

        let salt_len = *data
            .first()
            .ok_or_else(|| LicenseError::Authentication("ciphertext truncated".into()))?
            as usize;
        let rest = &data[1..];
        if rest.len() < salt_len + NONCE_LENGTH {
            return Err(LicenseError::Authentication("ciphertext truncated".into()));
        }
        let salt_str = std::str::from_utf8(&rest[..salt_len])
            .map_err(|_| LicenseError::Authentication("corrupt salt encoding".into()))?;
        let salt = SaltString::from_b64(salt_str)
            .map_err(|err| LicenseError::Authentication(format!("corrupt salt: {err}")))?;
        let nonce_bytes = &rest[salt_len..salt_len + NONCE_LENGTH];
        let ciphertext = &rest[salt_len + NONCE_LENGTH..];

        let key = self.derive_key(secret.as_str(), &salt)?;
        let nonce = Nonce::from_slice(nonce_bytes);
        let plaintext = match self.key_size {
            AesKeySize::Bits128 => {
                let cipher = Aes128Gcm::new_from_slice(&key)
                    .map_err(|err| LicenseError::Authentication(format!("invalid cipher key: {err}")))?;
                cipher.decrypt(nonce, ciphertext)
            }
            AesKeySize::Bits256 => {
                let cipher = Aes256Gcm::new_from_slice(&key)
                    .map_err(|err| LicenseError::Authentication(format!("invalid cipher key: {err}")))?;
                cipher.decrypt(nonce, ciphertext)
            }
        }
        .map_err(|_| LicenseError::Authentication("decryption failed: wrong password or tampered artifact".into()))?;
        Ok(plaintext)
    }
}
