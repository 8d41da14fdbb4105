use std::sync::Arc;

use licensure_model::{License, LicenseError};
use licensure_store::Source;

use crate::consumer::ConsumerManager;

/// A single, simplified failure type every [`UncheckedManager`] operation
/// can fail with, replacing the full [`LicenseError`] taxonomy a caller
/// would otherwise have to match on.
///
/// Rust has no checked-vs-unchecked exception distinction, so unlike the
/// source this never panics — it is purely a simplifying façade over the
/// same `Result`-based error propagation the rest of the crate uses.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct UncheckedLicenseError(#[source] LicenseError);

impl From<LicenseError> for UncheckedLicenseError {
    fn from(err: LicenseError) -> Self {
        Self(err)
    }
}

/// Adapts a [`ConsumerManager`]'s checked operations to the simplified
/// [`UncheckedLicenseError`] surface. Not a separate implementation —
/// purely a façade over the wrapped manager.
pub struct UncheckedManager {
    inner: Arc<dyn ConsumerManager>,
}

impl UncheckedManager {
    /// Wrap `inner`.
    #[must_use]
    pub fn new(inner: Arc<dyn ConsumerManager>) -> Self {
        Self { inner }
    }

    /// See [`ConsumerManager::install`].
    pub fn install(&self, source: &dyn Source) -> Result<(), UncheckedLicenseError> {
        Ok(self.inner.install(source)?)
    }

    /// See [`ConsumerManager::load`].
    pub fn load(&self) -> Result<License, UncheckedLicenseError> {
        Ok(self.inner.load()?)
    }

    /// See [`ConsumerManager::verify`].
    pub fn verify(&self) -> Result<License, UncheckedLicenseError> {
        Ok(self.inner.verify()?)
    }

    /// See [`ConsumerManager::uninstall`].
    pub fn uninstall(&self) -> Result<(), UncheckedLicenseError> {
        Ok(self.inner.uninstall()?)
    }
}

/// Wrap `manager` behind the unchecked façade.
#[must_use]
pub fn unchecked(manager: Arc<dyn ConsumerManager>) -> UncheckedManager {
    UncheckedManager::new(manager)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::BaseLicenseManager;
    use crate::caching::CachingLicenseManager;
    use crate::parameters::ManagerParameters;
    use licensure_context::testing::FixedClock;
    use licensure_store::{MemoryStore, Store};

    #[test]
    fn wraps_a_store_failure_as_an_unchecked_error() {
        let context = Arc::new(crate::testing::test_context(FixedClock::new(chrono::Utc::now())));
        let authentication = crate::testing::signer();
        let encryption = crate::testing::fixed_encryption();
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let parameters = Arc::new(ManagerParameters::new(authentication, encryption, 0, Some(store)));
        let base = BaseLicenseManager::new(context, parameters);
        let manager: Arc<dyn ConsumerManager> = Arc::new(CachingLicenseManager::new(base));

        let facade = unchecked(manager);
        let err = facade.load().unwrap_err();
        assert!(err.to_string().contains("store failure"));
    }
}
