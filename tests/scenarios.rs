use std::sync::Arc;

use chrono::{Duration, Utc};
use ed25519_dalek::SigningKey;

use licensure_codec::{DefaultRepositoryContext, JsonCodec};
use licensure_context::factories::{DefaultEncryptionFactory, Ed25519KeystoreFactory};
use licensure_context::testing::FixedClock;
use licensure_context::Context;
use licensure_crypto::{
    Authentication, Deflate, Ed25519Authentication, Password, StaticPasswordProtection, Transformation,
};
use licensure_manager::{BaseLicenseManager, ConsumerManager, ConsumerManagerBuilder, VendorManagerBuilder};
use licensure_model::{DistinguishedName, License, LicenseError, ValidationFailure};
use licensure_store::{MemoryStore, Store};

fn context_for(subject: &str, clock: Arc<FixedClock>) -> Arc<Context> {
    Arc::new(
        Context::builder()
            .codec(Arc::new(JsonCodec::new()))
            .compression(Arc::new(Deflate::new()))
            .encryption_algorithm("AES-128-GCM")
            .encryption_factory(Arc::new(DefaultEncryptionFactory))
            .authentication_factory(Arc::new(Ed25519KeystoreFactory))
            .repository_context(Arc::new(DefaultRepositoryContext))
            .keystore_type("raw-ed25519")
            .subject(subject)
            .clock(clock)
            .build()
            .unwrap(),
    )
}

fn shared_keypair() -> (Arc<dyn Authentication>, Arc<dyn Authentication>) {
    let signing_key = SigningKey::generate(&mut rand::rngs::OsRng);
    let verifying_key = signing_key.verifying_key();
    (
        Arc::new(Ed25519Authentication::signer(signing_key)),
        Arc::new(Ed25519Authentication::verifier(verifying_key)),
    )
}

fn shared_encryption() -> Arc<dyn Transformation> {
    let password = Arc::new(StaticPasswordProtection::new(Password::new("correcthorse1")));
    Arc::new(licensure_crypto::AesGcmEncryption::new(password))
}

/// S1 — vendor generates, consumer loads the exact fields back.
#[test]
fn s1_vendor_to_consumer_happy_path() {
    let now = Utc::now();
    let clock = Arc::new(FixedClock::new(now));
    let context = context_for("App", clock);
    let (signer, verifier) = shared_keypair();
    let encryption = shared_encryption();
    let store: Arc<dyn Store> = Arc::new(MemoryStore::new());

    let vendor = VendorManagerBuilder::new(Arc::clone(&context))
        .authentication(signer)
        .encryption(Arc::clone(&encryption))
        .build()
        .unwrap();

    let bean = License::new()
        .with_consumer_amount(1)
        .with_holder(DistinguishedName::common_name("Alice"));
    let generator = vendor.generate_key_from(bean).unwrap();
    generator.save_to(store.as_ref()).unwrap();

    let consumer = ConsumerManagerBuilder::new(context)
        .authentication(verifier)
        .encryption(encryption)
        .store_in(store)
        .build()
        .unwrap();

    let loaded = consumer.load().unwrap();
    assert_eq!(loaded.consumer_amount, Some(1));
    assert_eq!(loaded.consumer_type.as_deref(), Some("User"));
    assert_eq!(loaded.holder.unwrap().as_str(), "CN=Alice");
    assert_eq!(loaded.issuer.unwrap().as_str(), "CN=App");
    assert_eq!(loaded.subject.as_deref(), Some("App"));
    assert_eq!(loaded.issued, Some(now));
    assert_eq!(loaded.not_after, None);
    assert_eq!(loaded.not_before, None);
}

/// S2 — an already-expired license fails `verify()` with `LicenseHasExpired`.
#[test]
fn s2_expired_license_fails_verify() {
    let now = Utc::now();
    let clock = Arc::new(FixedClock::new(now));
    let context = context_for("App", clock);
    let (signer, verifier) = shared_keypair();
    let encryption = shared_encryption();
    let store: Arc<dyn Store> = Arc::new(MemoryStore::new());

    let vendor = VendorManagerBuilder::new(Arc::clone(&context))
        .authentication(signer)
        .encryption(Arc::clone(&encryption))
        .build()
        .unwrap();

    let bean = License::new()
        .with_consumer_amount(1)
        .with_not_after(now - Duration::seconds(1));
    let generator = vendor.generate_key_from(bean).unwrap();
    generator.save_to(store.as_ref()).unwrap();

    let consumer = ConsumerManagerBuilder::new(context)
        .authentication(verifier)
        .encryption(encryption)
        .store_in(store)
        .build()
        .unwrap();

    let err = consumer.verify().unwrap_err();
    assert!(matches!(
        err,
        LicenseError::Validation(ValidationFailure::LicenseHasExpired(_))
    ));
}

/// S3 — a vendor-issued license for one subject fails verification under a
/// context configured for a different subject.
#[test]
fn s3_subject_mismatch_fails_verify() {
    let now = Utc::now();
    let vendor_context = context_for("A", Arc::new(FixedClock::new(now)));
    let consumer_context = context_for("B", Arc::new(FixedClock::new(now)));
    let (signer, verifier) = shared_keypair();
    let encryption = shared_encryption();
    let store: Arc<dyn Store> = Arc::new(MemoryStore::new());

    let vendor = VendorManagerBuilder::new(vendor_context)
        .authentication(signer)
        .encryption(Arc::clone(&encryption))
        .build()
        .unwrap();
    let bean = License::new().with_consumer_amount(1);
    let generator = vendor.generate_key_from(bean).unwrap();
    generator.save_to(store.as_ref()).unwrap();

    let consumer = ConsumerManagerBuilder::new(consumer_context)
        .authentication(verifier)
        .encryption(encryption)
        .store_in(store)
        .build()
        .unwrap();

    match consumer.verify().unwrap_err() {
        LicenseError::Validation(ValidationFailure::InvalidSubject { expected, actual }) => {
            assert_eq!(expected, "B");
            assert_eq!(actual, "A");
        }
        other => panic!("expected a subject mismatch, got {other:?}"),
    }
}

/// S4 — a consumer chain whose parent cannot authenticate, but whose own
/// keystore can sign, auto-generates a free-trial key on first `load()` and
/// reuses it on the second.
#[test]
fn s4_ftp_fallback_generates_once_and_reuses() {
    let clock = Arc::new(FixedClock::new(Utc::now()));
    let context = context_for("App", clock);
    let (signer, _unused_verifier) = shared_keypair();
    let (_parent_signer, parent_verifier) = shared_keypair();
    let encryption = shared_encryption();

    let parent_store: Arc<dyn Store> = Arc::new(MemoryStore::new());
    let parent: Arc<dyn ConsumerManager> = ConsumerManagerBuilder::new(Arc::clone(&context))
        .authentication(parent_verifier)
        .encryption(Arc::clone(&encryption))
        .store_in(parent_store)
        .build()
        .unwrap();

    let self_store: Arc<dyn Store> = Arc::new(MemoryStore::new());
    let chain = ConsumerManagerBuilder::new(context)
        .authentication(signer)
        .encryption(encryption)
        .store_in(self_store)
        .ftp_days(7)
        .parent(parent)
        .build()
        .unwrap();

    let first = chain.load().unwrap();
    assert_eq!(first.not_before, first.issued);
    assert_eq!(first.not_after, first.issued.map(|issued| issued + Duration::days(7)));

    let second = chain.load().unwrap();
    assert_eq!(first, second);
}

/// S5 — the same chain, but the consumer-side keystore is verify-only; the
/// parent's original failure propagates unchanged instead of a free-trial
/// key being generated.
#[test]
fn s5_ftp_refused_without_signing_key() {
    let clock = Arc::new(FixedClock::new(Utc::now()));
    let context = context_for("App", clock);
    let (_self_signer, self_verifier) = shared_keypair();
    let (_parent_signer, parent_verifier) = shared_keypair();
    let encryption = shared_encryption();

    let parent_store: Arc<dyn Store> = Arc::new(MemoryStore::new());
    let parent: Arc<dyn ConsumerManager> = ConsumerManagerBuilder::new(Arc::clone(&context))
        .authentication(parent_verifier)
        .encryption(Arc::clone(&encryption))
        .store_in(parent_store)
        .build()
        .unwrap();

    let self_store: Arc<dyn Store> = Arc::new(MemoryStore::new());
    let chain = ConsumerManagerBuilder::new(context)
        .authentication(self_verifier)
        .encryption(encryption)
        .store_in(Arc::clone(&self_store))
        .ftp_days(7)
        .parent(parent)
        .build()
        .unwrap();

    assert!(chain.load().is_err());
    assert!(!self_store.exists().unwrap());
}

/// S6 — an artifact that fails signature verification is never deleted by
/// `uninstall()`.
#[test]
fn s6_uninstall_authenticates_before_deleting() {
    let clock = Arc::new(FixedClock::new(Utc::now()));
    let context = context_for("App", clock);
    let (_signer, verifier) = shared_keypair();
    let encryption = shared_encryption();

    let store: Arc<dyn Store> = Arc::new(MemoryStore::with_bytes(b"not a valid artifact".to_vec()));
    let base = BaseLicenseManager::new(
        context,
        Arc::new(licensure_manager::ManagerParameters::new(verifier, encryption, 0, Some(Arc::clone(&store)))),
    );

    assert!(matches!(base.uninstall(), Err(LicenseError::Authentication(_))));
    assert!(store.exists().unwrap());
}
