//! Shared test fixtures, compiled only under `cfg(test)`.

use std::sync::Arc;
use std::time::Duration;

use ed25519_dalek::SigningKey;
use licensure_codec::{DefaultRepositoryContext, JsonCodec};
use licensure_context::clock::Clock;
use licensure_context::Context;
use licensure_context::factories::{DefaultEncryptionFactory, Ed25519KeystoreFactory};
use licensure_crypto::{
    AesGcmEncryption, Authentication, Deflate, Ed25519Authentication, Password, StaticPasswordProtection,
    Transformation,
};

/// Build a context wired up with the in-tree reference collaborators, the
/// way a deployment actually would, pinned to a caller-supplied clock.
pub(crate) fn test_context(clock: impl Clock + 'static) -> Context {
    test_context_with_period(clock, Duration::from_secs(30 * 60))
}

/// As [`test_context`], with an explicit cache period for tests that
/// exercise TTL expiry.
pub(crate) fn test_context_with_period(clock: impl Clock + 'static, cache_period: Duration) -> Context {
    Context::builder()
        .codec(Arc::new(JsonCodec::new()))
        .compression(Arc::new(Deflate::new()))
        .encryption_algorithm("AES-256-GCM")
        .encryption_factory(Arc::new(DefaultEncryptionFactory))
        .authentication_factory(Arc::new(Ed25519KeystoreFactory))
        .repository_context(Arc::new(DefaultRepositoryContext))
        .keystore_type("raw-ed25519")
        .subject("App")
        .clock(Arc::new(clock))
        .cache_period(cache_period)
        .build()
        .unwrap()
}

/// An Ed25519 authenticator that can both sign and verify, for tests that
/// don't need to exercise the consumer-only (verify-only) split.
pub(crate) fn signer() -> Arc<dyn Authentication> {
    let signing_key = SigningKey::generate(&mut rand::rngs::OsRng);
    Arc::new(Ed25519Authentication::signer(signing_key))
}

/// A verify-only Ed25519 authenticator bound to a fresh, unrelated
/// keypair's public half — simulates a consumer-only keystore that holds
/// no signing key at all (`sign` always fails).
pub(crate) fn verifier_only() -> Arc<dyn Authentication> {
    let signing_key = SigningKey::generate(&mut rand::rngs::OsRng);
    Arc::new(Ed25519Authentication::verifier(signing_key.verifying_key()))
}

/// A fixed-password AES-GCM encryption transformation.
pub(crate) fn fixed_encryption() -> Arc<dyn Transformation> {
    let password = Arc::new(StaticPasswordProtection::new(Password::new("correcthorse1")));
    Arc::new(AesGcmEncryption::new(password))
}
