use std::convert::TryInto;
use std::sync::Arc;

use ed25519_dalek::{SigningKey, VerifyingKey};

use licensure_crypto::{
    AesGcmEncryption, AesKeySize, Authentication, Ed25519Authentication, PasswordProtection, Transformation,
};
use licensure_model::{LicenseError, Result};
use licensure_store::Source;

/// Builds a [`Transformation`] from an algorithm name and a secret.
pub trait EncryptionFactory: Send + Sync {
    /// Build the transformation named by `algorithm`.
    fn create(&self, algorithm: &str, password: Arc<dyn PasswordProtection>) -> Result<Arc<dyn Transformation>>;
}

/// The only `EncryptionFactory` shipped in-tree: AES-GCM at either of two
/// conventional key sizes, each a distinct implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultEncryptionFactory;

impl EncryptionFactory for DefaultEncryptionFactory {
    fn create(&self, algorithm: &str, password: Arc<dyn PasswordProtection>) -> Result<Arc<dyn Transformation>> {
        match algorithm {
            "AES-128-GCM" => Ok(Arc::new(AesGcmEncryption::with_key_size(password, AesKeySize::Bits128))),
            "AES-256-GCM" => Ok(Arc::new(AesGcmEncryption::with_key_size(password, AesKeySize::Bits256))),
            other => Err(LicenseError::Config(format!(
                "unsupported encryption algorithm: {other}"
            ))),
        }
    }
}

/// Which half of a keypair a keystore lookup should yield.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyRole {
    /// The private half, capable of signing.
    Signing,
    /// The public half, capable only of verifying.
    Verifying,
}

/// A request for key material, routed to an [`AuthenticationFactory`].
pub struct KeyMaterialRequest {
    /// Keystore alias identifying which entry to load.
    pub alias: String,
    /// The byte-stream endpoint the raw key material is read from.
    pub source: Arc<dyn Source>,
    /// Whether a signing or verifying key is being requested.
    pub role: KeyRole,
}

/// Builds an [`Authentication`] from key material.
pub trait AuthenticationFactory: Send + Sync {
    /// Resolve `request` into a concrete authenticator.
    fn create(&self, request: KeyMaterialRequest) -> Result<Arc<dyn Authentication>>;
}

/// The only `AuthenticationFactory` shipped in-tree: reads a raw 32-byte
/// Ed25519 seed or public key directly off the source. A real keystore
/// format (PKCS#12, PEM, an OS keychain) is an external collaborator —
/// this factory is the reference implementation the core needs to be
/// runnable end to end.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519KeystoreFactory;

impl AuthenticationFactory for Ed25519KeystoreFactory {
    fn create(&self, request: KeyMaterialRequest) -> Result<Arc<dyn Authentication>> {
        let bytes = request.source.read_all()?;
        let key_bytes: [u8; 32] = bytes.as_slice().try_into().map_err(|_| {
            LicenseError::Config(format!(
                "keystore alias '{}' must hold exactly 32 bytes of key material",
                request.alias
            ))
        })?;

        match request.role {
            KeyRole::Signing => {
                let signing_key = SigningKey::from_bytes(&key_bytes);
                Ok(Arc::new(Ed25519Authentication::signer(signing_key)))
            }
            KeyRole::Verifying => {
                let verifying_key = VerifyingKey::from_bytes(&key_bytes).map_err(|err| {
                    LicenseError::Config(format!(
                        "keystore alias '{}' holds an invalid verifying key: {err}",
                        request.alias
                    ))
                })?;
                Ok(Arc::new(Ed25519Authentication::verifier(verifying_key)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use licensure_codec::RepositoryContext as _;
    use licensure_crypto::{Password, StaticPasswordProtection};
    use licensure_store::MemoryStore;

    #[test]
    fn encryption_factory_builds_aes_256_gcm() {
        let factory = DefaultEncryptionFactory;
        let password: Arc<dyn PasswordProtection> =
            Arc::new(StaticPasswordProtection::new(Password::new("correcthorse1")));
        assert!(factory.create("AES-256-GCM", password).is_ok());
    }

    #[test]
    fn encryption_factory_builds_aes_128_gcm() {
        let factory = DefaultEncryptionFactory;
        let password: Arc<dyn PasswordProtection> =
            Arc::new(StaticPasswordProtection::new(Password::new("correcthorse1")));
        assert!(factory.create("AES-128-GCM", password).is_ok());
    }

    #[test]
    fn encryption_factory_keys_are_not_interchangeable_across_algorithm_names() {
        let factory = DefaultEncryptionFactory;
        let password: Arc<dyn PasswordProtection> =
            Arc::new(StaticPasswordProtection::new(Password::new("correcthorse1")));
        let aes128 = factory.create("AES-128-GCM", password.clone()).unwrap();
        let aes256 = factory.create("AES-256-GCM", password).unwrap();

        let ciphertext = aes128.apply(b"payload".to_vec()).unwrap();
        assert!(aes256.invert(ciphertext).is_err());
    }

    #[test]
    fn encryption_factory_rejects_unknown_algorithm() {
        let factory = DefaultEncryptionFactory;
        let password: Arc<dyn PasswordProtection> =
            Arc::new(StaticPasswordProtection::new(Password::new("correcthorse1")));
        assert!(factory.create("ROT13", password).is_err());
    }

    #[test]
    fn keystore_factory_builds_signer_and_verifier_from_matching_seed() {
        let seed = [7u8; 32];
        let signing_key = SigningKey::from_bytes(&seed);
        let verifying_bytes = signing_key.verifying_key().to_bytes().to_vec();

        let factory = Ed25519KeystoreFactory;
        let signer = factory
            .create(KeyMaterialRequest {
                alias: "vendor".into(),
                source: Arc::new(MemoryStore::with_bytes(seed.to_vec())),
                role: KeyRole::Signing,
            })
            .unwrap();
        let verifier = factory
            .create(KeyMaterialRequest {
                alias: "consumer".into(),
                source: Arc::new(MemoryStore::with_bytes(verifying_bytes)),
                role: KeyRole::Verifying,
            })
            .unwrap();

        let controller = licensure_codec::DefaultRepositoryContext
            .controller(Arc::new(licensure_codec::JsonCodec::new()));
        let license = licensure_model::License::new().with_subject("App");
        let (model, _decoder) = signer.sign(&controller, &license).unwrap();
        assert!(verifier.verify(&controller, &model).is_ok());
    }

    #[test]
    fn keystore_factory_rejects_wrong_length_material() {
        let factory = Ed25519KeystoreFactory;
        let result = factory.create(KeyMaterialRequest {
            alias: "bad".into(),
            source: Arc::new(MemoryStore::with_bytes(vec![1, 2, 3])),
            role: KeyRole::Verifying,
        });
        assert!(result.is_err());
    }
}
