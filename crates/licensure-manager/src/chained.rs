use std::sync::Arc;

use licensure_context::Context;
use licensure_model::{License, LicenseError, Result};
use licensure_store::{MemoryStore, Source};
use once_cell::sync::OnceCell;

use crate::caching::CachingLicenseManager;
use crate::consumer::ConsumerManager;
use crate::generator::KeyGenerator;
use crate::parameters::ManagerParameters;

/// Sits atop a [`CachingLicenseManager`] and a `parent` consumer manager,
/// trying the parent first and falling back to itself — possibly auto-
/// generating a free-trial key — on failure.
pub struct ChainedLicenseManager {
    parent: Arc<dyn ConsumerManager>,
    self_manager: CachingLicenseManager,
    can_generate: OnceCell<bool>,
}

impl ChainedLicenseManager {
    /// Wrap `self_manager`, trying `parent` first on every operation.
    #[must_use]
    pub fn new(parent: Arc<dyn ConsumerManager>, self_manager: CachingLicenseManager) -> Self {
        Self {
            parent,
            self_manager,
            can_generate: OnceCell::new(),
        }
    }

    /// Whether this deployment holds the private signing key needed to
    /// generate new license keys, probed once and latched.
    ///
    /// A consumer-only deployment lacks the signing key, so attempting to
    /// generate would always fail; skipping the fallback in that case
    /// preserves the parent's original error instead of masking it.
    pub fn can_generate_license_keys(&self) -> bool {
        *self.can_generate.get_or_init(|| {
            let bean = self.self_manager.context().license();
            self.self_manager
                .base()
                .generate_key_from(bean)
                .and_then(|generator| generator.save_to(&MemoryStore::new()))
                .is_ok()
        })
    }

    fn generate_iff_new_ftp(&self, original: LicenseError) -> Result<KeyGenerator> {
        if !self.can_generate_license_keys() {
            return Err(original);
        }
        let store = self.self_manager.base().store()?;
        if store.exists()? {
            return Err(original);
        }
        let bean = self.self_manager.context().license();
        let generator = self.self_manager.base().generate_key_from(bean)?;
        generator.save_to(store.as_ref())?;
        crate::telemetry::record_ftp_key_generated();
        Ok(generator)
    }
}

impl ConsumerManager for ChainedLicenseManager {
    fn context(&self) -> &Arc<Context> {
        self.self_manager.context()
    }

    fn parameters(&self) -> &Arc<ManagerParameters> {
        self.self_manager.parameters()
    }

    fn install(&self, source: &dyn Source) -> Result<()> {
        match self.parent.install(source) {
            Ok(()) => Ok(()),
            Err(err) => {
                if self.can_generate_license_keys() {
                    Err(err)
                } else {
                    self.self_manager.install(source)
                }
            }
        }
    }

    fn uninstall(&self) -> Result<()> {
        match self.parent.uninstall() {
            Ok(()) => Ok(()),
            Err(err) => {
                if self.can_generate_license_keys() {
                    Err(err)
                } else {
                    self.self_manager.uninstall()
                }
            }
        }
    }

    fn load(&self) -> Result<License> {
        if let Ok(license) = self.parent.load() {
            return Ok(license);
        }
        if let Ok(license) = self.self_manager.load() {
            return Ok(license);
        }
        let _guard = self.self_manager.lock_store();
        match self.self_manager.load() {
            Ok(license) => Ok(license),
            Err(err) => self.generate_iff_new_ftp(err)?.license(),
        }
    }

    fn verify(&self) -> Result<License> {
        if let Ok(license) = self.parent.verify() {
            return Ok(license);
        }
        if let Ok(license) = self.self_manager.verify() {
            return Ok(license);
        }
        let _guard = self.self_manager.lock_store();
        match self.self_manager.verify() {
            Ok(license) => Ok(license),
            Err(err) => self.generate_iff_new_ftp(err)?.license(),
        }
    }
}
