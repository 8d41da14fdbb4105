use std::sync::Arc;

use licensure_codec::RepositoryModel;
use licensure_context::Context;
use licensure_crypto::Decoder;
use licensure_model::{License, Result};
use licensure_store::{Sink, Source, Store};

use crate::generator::KeyGenerator;
use crate::parameters::ManagerParameters;
use crate::pipeline::decode_artifact;

/// Implements the five lifecycle operations directly against a [`Store`],
/// with no caching and no parent fallback. A vendor manager *is* one of
/// these; the caching and chained managers each wrap one and intercept
/// individual steps rather than re-running the whole operation, so most of
/// this type's methods are exposed to the rest of the crate rather than kept
/// private.
pub struct BaseLicenseManager {
    context: Arc<Context>,
    parameters: Arc<ManagerParameters>,
}

impl BaseLicenseManager {
    /// Construct a base manager bound to `context` and `parameters`.
    #[must_use]
    pub fn new(context: Arc<Context>, parameters: Arc<ManagerParameters>) -> Self {
        Self { context, parameters }
    }

    /// The context this manager was built with.
    #[must_use]
    pub fn context(&self) -> &Arc<Context> {
        &self.context
    }

    /// This manager's resolved parameters.
    #[must_use]
    pub fn parameters(&self) -> &Arc<ManagerParameters> {
        &self.parameters
    }

    /// The configured store, or a `Config` failure for a vendor manager.
    pub fn store(&self) -> Result<Arc<dyn Store>> {
        self.parameters.store_required()
    }

    /// `generateKeyFrom(bean) → KeyGenerator`.
    ///
    /// Authorization is cleared eagerly; the effective bean and signature
    /// are computed lazily, once, inside the returned [`KeyGenerator`].
    pub fn generate_key_from(&self, bean: License) -> Result<KeyGenerator> {
        self.context.authorization().clear_generate()?;
        Ok(KeyGenerator::new(
            Arc::clone(&self.context),
            Arc::clone(&self.parameters),
            bean,
        ))
    }

    /// `install(source)`: verify `source`, then byte-copy it into the store.
    /// Authentication is mandatory before persistence — a tampered or
    /// unsigned artifact is never installed.
    pub fn install(&self, source: &dyn Source) -> Result<()> {
        self.context.authorization().clear_install()?;
        let bytes = source.read_all()?;
        self.authenticate_bytes(&bytes)?;
        self.store()?.write_all(&bytes)?;
        crate::telemetry::record_install();
        Ok(())
    }

    /// `load() → License`: authenticate then codec-decode the installed
    /// artifact. Does not check the validity window.
    pub fn load(&self) -> Result<License> {
        self.context.authorization().clear_load()?;
        let store = self.store()?;
        let decoder = self.authenticate(store.as_ref())?;
        licensure_crypto::decode(decoder.as_ref())
    }

    /// `verify()`: load, then run the effective validator.
    pub fn verify(&self) -> Result<License> {
        self.context.authorization().clear_verify()?;
        match self.verify_inner() {
            Ok(license) => Ok(license),
            Err(err) => {
                crate::telemetry::record_verification_failed();
                Err(err)
            }
        }
    }

    fn verify_inner(&self) -> Result<License> {
        let store = self.store()?;
        let decoder = self.authenticate(store.as_ref())?;
        let license: License = licensure_crypto::decode(decoder.as_ref())?;
        self.context.validate(&license)?;
        Ok(license)
    }

    /// `uninstall()`: authenticate the installed artifact first — an
    /// unauthenticated artifact is never silently discarded — then delete
    /// it.
    pub fn uninstall(&self) -> Result<()> {
        self.context.authorization().clear_uninstall()?;
        let store = self.store()?;
        self.authenticate(store.as_ref())?;
        store.delete()
    }

    /// `authenticate(source) =
    /// authentication.verify(repositoryModel(source))`, reading `source`
    /// itself.
    pub fn authenticate(&self, source: &dyn Source) -> Result<Box<dyn Decoder>> {
        let bytes = source.read_all()?;
        self.authenticate_bytes(&bytes)
    }

    /// As [`Self::authenticate`], but over bytes already in hand — used by
    /// `install` so the source is read exactly once.
    pub fn authenticate_bytes(&self, bytes: &[u8]) -> Result<Box<dyn Decoder>> {
        let encryption = self.parameters.encryption();
        let decoded = decode_artifact(&self.context, encryption.as_ref(), bytes.to_vec())?;
        let codec = self.context.codec();
        let model: RepositoryModel = licensure_codec::decode(codec.as_ref(), &decoded)?;
        let controller = self.context.repository_context().controller(codec);
        self.parameters.authentication().verify(&controller, &model)
    }

}
