use std::sync::Arc;

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};

use licensure_codec::{Codec, RepositoryController, RepositoryModel};
use licensure_model::{License, LicenseError, Result};

/// Yields a decoded value from an authenticated payload.
pub trait Decoder: Send + Sync {
    /// Decode the payload into its erased representation.
    fn decode_value(&self) -> Result<serde_json::Value>;
}

struct PayloadDecoder {
    codec: Arc<dyn Codec>,
    payload: Vec<u8>,
}

impl Decoder for PayloadDecoder {
    fn decode_value(&self) -> Result<serde_json::Value> {
        self.codec.decode_value(&self.payload)
    }
}

/// A keystore-backed signer/verifier, bound to a single Ed25519 keypair.
///
/// `sign` produces a [`RepositoryModel`] carrying the signed payload and its
/// signature, plus a [`Decoder`] over that payload; `verify` checks an
/// existing model's signature and, if it holds, hands back the same kind of
/// decoder. Holding only a [`VerifyingKey`] (no signing key) is a valid,
/// consumer-only configuration — `sign` then fails rather than panicking.
pub trait Authentication: Send + Sync {
    /// Sign `license`, producing a model and a decoder over its payload.
    fn sign(
        &self,
        controller: &RepositoryController,
        license: &License,
    ) -> Result<(RepositoryModel, Box<dyn Decoder>)>;

    /// Verify `model`'s signature, producing a decoder over its payload.
    fn verify(
        &self,
        controller: &RepositoryController,
        model: &RepositoryModel,
    ) -> Result<Box<dyn Decoder>>;
}

/// [`Authentication`] backed by a single Ed25519 keypair.
pub struct Ed25519Authentication {
    signing_key: Option<SigningKey>,
    verifying_key: VerifyingKey,
}

impl Ed25519Authentication {
    /// A verify-only authenticator — the configuration used by a
    /// consumer-only deployment that never generates keys.
    #[must_use]
    pub fn verifier(verifying_key: VerifyingKey) -> Self {
        Self {
            signing_key: None,
            verifying_key,
        }
    }

    /// A full signer/verifier authenticator, as used by a vendor.
    #[must_use]
    pub fn signer(signing_key: SigningKey) -> Self {
        let verifying_key = signing_key.verifying_key();
        Self {
            signing_key: Some(signing_key),
            verifying_key,
        }
    }
}

impl Authentication for Ed25519Authentication {
    fn sign(
        &self,
        controller: &RepositoryController,
        license: &License,
    ) -> Result<(RepositoryModel, Box<dyn Decoder>)> {
        let signing_key = self.signing_key.as_ref().ok_or_else(|| {
            LicenseError::Authentication(
                "no signing key configured; this authenticator is verify-only".into(),
            )
        })?;

        let payload = controller.encode_payload(license)?;
        let signature = signing_key.sign(&payload);

        let model = RepositoryModel {
            signed_payload: payload.clone(),
            signature: signature.to_bytes().to_vec(),
        };
        let decoder = PayloadDecoder {
            codec: controller.codec(),
            payload,
        };
        Ok((model, Box::new(decoder)))
    }

    fn verify(
        &self,
        controller: &RepositoryController,
        model: &RepositoryModel,
    ) -> Result<Box<dyn Decoder>> {
        let signature_bytes: [u8; 64] = model.signature.as_slice().try_into().map_err(|_| {
            LicenseError::Authentication("invalid signature length".into())
        })?;
        let signature = Signature::from_bytes(&signature_bytes);

        self.verifying_key
            .verify_strict(&model.signed_payload, &signature)
            .map_err(|err| {
                LicenseError::Authentication(format!("signature verification failed: {err}"))
            })?;

        Ok(Box::new(PayloadDecoder {
            codec: controller.codec(),
            payload: model.signed_payload.clone(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode;
    use licensure_codec::{DefaultRepositoryContext, JsonCodec, RepositoryContext};

    fn controller() -> RepositoryController {
        DefaultRepositoryContext.controller(Arc::new(JsonCodec::new()))
    }

    #[test]
    fn sign_then_verify_recovers_the_license() {
        let signing_key = SigningKey::generate(&mut rand::rngs::OsRng);
        let authentication = Ed25519Authentication::signer(signing_key);
        let controller = controller();

        let license = License::new().with_subject("App").with_consumer_amount(1);
        let (model, _decoder) = authentication.sign(&controller, &license).unwrap();

        let verified_decoder = authentication.verify(&controller, &model).unwrap();
        let restored: License = decode(verified_decoder.as_ref()).unwrap();
        assert_eq!(restored, license);
    }

    #[test]
    fn verify_rejects_tampered_payload() {
        let signing_key = SigningKey::generate(&mut rand::rngs::OsRng);
        let authentication = Ed25519Authentication::signer(signing_key);
        let controller = controller();

        let license = License::new().with_subject("App");
        let (mut model, _decoder) = authentication.sign(&controller, &license).unwrap();
        model.signed_payload.push(0xFF);

        assert!(authentication.verify(&controller, &model).is_err());
    }

    #[test]
    fn verify_only_authenticator_cannot_sign() {
        let signing_key = SigningKey::generate(&mut rand::rngs::OsRng);
        let verifying_key = signing_key.verifying_key();
        let authentication = Ed25519Authentication::verifier(verifying_key);
        let controller = controller();

        let license = License::new();
        assert!(authentication.sign(&controller, &license).is_err());
    }
}
