use std::sync::Arc;

use licensure_context::Context;
use licensure_model::{License, Result};
use licensure_store::Source;

use crate::parameters::ManagerParameters;

/// The operations a consumer-side manager exposes, implemented by both
/// [`crate::CachingLicenseManager`] and [`crate::ChainedLicenseManager`] so
/// a chained manager's parent can be either one.
pub trait ConsumerManager: Send + Sync {
    /// The context this manager was built with.
    fn context(&self) -> &Arc<Context>;

    /// This manager's resolved parameters.
    fn parameters(&self) -> &Arc<ManagerParameters>;

    /// Verify `source`, then install it as this manager's current key.
    fn install(&self, source: &dyn Source) -> Result<()>;

    /// Authenticate and decode the installed license. Does not validate
    /// the time window.
    fn load(&self) -> Result<License>;

    /// Load, then run the effective validator.
    fn verify(&self) -> Result<License>;

    /// Authenticate the installed artifact, then delete it.
    fn uninstall(&self) -> Result<()>;
}
