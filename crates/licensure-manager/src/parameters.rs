use std::sync::Arc;

use chrono::Duration as ChronoDuration;
use licensure_context::Context;
use licensure_crypto::{Authentication, Transformation};
use licensure_model::{License, LicenseError, Result};
use licensure_store::Store;

/// Per-manager bundle of collaborators that aren't shared across every
/// manager a context builds.
///
/// Unlike the Java original, `encryption` is never optional at this point:
/// the manager builder (§4.2) resolves "inherit from parent" at build time,
/// so every constructed manager already carries a concrete transformation.
pub struct ManagerParameters {
    authentication: Arc<dyn Authentication>,
    encryption: Arc<dyn Transformation>,
    ftp_days: u32,
    store: Option<Arc<dyn Store>>,
}

impl ManagerParameters {
    /// Construct a resolved parameter bundle. `ftp_days` of `0` means "no
    /// free-trial period"; `store` is `None` for a vendor manager.
    #[must_use]
    pub fn new(
        authentication: Arc<dyn Authentication>,
        encryption: Arc<dyn Transformation>,
        ftp_days: u32,
        store: Option<Arc<dyn Store>>,
    ) -> Self {
        Self {
            authentication,
            encryption,
            ftp_days,
            store,
        }
    }

    /// The authenticator this manager signs or verifies with.
    #[must_use]
    pub fn authentication(&self) -> Arc<dyn Authentication> {
        Arc::clone(&self.authentication)
    }

    /// The transformation applied on top of compression when writing, and
    /// inverted before decompression when reading.
    #[must_use]
    pub fn encryption(&self) -> Arc<dyn Transformation> {
        Arc::clone(&self.encryption)
    }

    /// The free-trial period, in days. `0` means this manager never
    /// auto-generates a free-trial key.
    #[must_use]
    pub fn ftp_days(&self) -> u32 {
        self.ftp_days
    }

    /// The configured store, if this is a consumer manager's parameters.
    #[must_use]
    pub fn store(&self) -> Option<Arc<dyn Store>> {
        self.store.clone()
    }

    /// The configured store, or a [`LicenseError::Config`] if this is a
    /// vendor manager's parameters (no store attached).
    pub fn store_required(&self) -> Result<Arc<dyn Store>> {
        self.store
            .clone()
            .ok_or_else(|| LicenseError::Config("no store configured for this manager".into()))
    }

    /// Run the context's initialization, then — if a free-trial period is
    /// configured — overwrite the validity window so the countdown begins at
    /// generation time.
    pub(crate) fn initialize(&self, context: &Context, bean: &mut License) -> Result<()> {
        context.initialize(bean)?;
        if self.ftp_days > 0 {
            let issued = bean.issued.ok_or_else(|| {
                LicenseError::Unexpected(anyhow::anyhow!(
                    "context initialization left `issued` unset"
                ))
            })?;
            bean.not_before = Some(issued);
            bean.not_after = Some(issued + ChronoDuration::days(i64::from(self.ftp_days)));
        }
        Ok(())
    }
}
