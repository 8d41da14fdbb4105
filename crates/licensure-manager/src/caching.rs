use std::sync::Arc;
use std::time::{Duration, Instant};

use licensure_context::Context;
use licensure_crypto::Decoder;
use licensure_model::{License, Result};
use licensure_store::{Sink, Source, Store};
use parking_lot::{Mutex, RwLock};

use crate::base::BaseLicenseManager;
use crate::consumer::ConsumerManager;
use crate::parameters::ManagerParameters;
use crate::pipeline::{store_identity, CacheKey};

struct CacheEntry<V> {
    key: CacheKey,
    value: V,
    deadline: Instant,
}

/// An atomically-replaceable `(key, value, deadline)` triple. A zero-length
/// cache period is treated as "never cache": [`CacheCell::get_or_compute`]
/// still recomputes every call, but never stores the result.
struct CacheCell<V> {
    slot: RwLock<Option<CacheEntry<V>>>,
}

impl<V: Clone> CacheCell<V> {
    fn new() -> Self {
        Self {
            slot: RwLock::new(None),
        }
    }

    fn get_or_compute(&self, key: CacheKey, period: Duration, compute: impl FnOnce() -> Result<V>) -> Result<V> {
        if let Some(entry) = self.slot.read().as_ref() {
            if entry.key == key && Instant::now() < entry.deadline {
                return Ok(entry.value.clone());
            }
        }
        let value = compute()?;
        self.publish(key, value.clone(), period);
        Ok(value)
    }

    fn publish(&self, key: CacheKey, value: V, period: Duration) {
        if period.is_zero() {
            *self.slot.write() = None;
            return;
        }
        *self.slot.write() = Some(CacheEntry {
            key,
            value,
            deadline: Instant::now() + period,
        });
    }

    fn clear(&self) {
        *self.slot.write() = None;
    }
}

/// Wraps a [`BaseLicenseManager`], memoizing `authenticate(source) →
/// Decoder` and `decodeLicense(source) → License` behind independent TTL
/// caches.
pub struct CachingLicenseManager {
    base: BaseLicenseManager,
    decoder_cache: CacheCell<Arc<dyn Decoder>>,
    license_cache: CacheCell<License>,
    store_lock: Mutex<()>,
}

impl CachingLicenseManager {
    /// Wrap `base` with caching.
    #[must_use]
    pub fn new(base: BaseLicenseManager) -> Self {
        Self {
            base,
            decoder_cache: CacheCell::new(),
            license_cache: CacheCell::new(),
            store_lock: Mutex::new(()),
        }
    }

    /// The wrapped base manager, e.g. for the chained manager's
    /// free-trial capability probe.
    #[must_use]
    pub fn base(&self) -> &BaseLicenseManager {
        &self.base
    }

    /// Acquire this manager's store monitor.
    pub fn lock_store(&self) -> parking_lot::MutexGuard<'_, ()> {
        self.store_lock.lock()
    }

    fn period(&self) -> Duration {
        self.base.context().cache_period()
    }

    fn decode_cached(&self, store: &Arc<dyn Store>) -> Result<License> {
        let key = store_identity(store);
        self.license_cache.get_or_compute(key, self.period(), || {
            let bytes = store.read_all()?;
            let decoder = self.base.authenticate_bytes(&bytes)?;
            licensure_crypto::decode(decoder.as_ref())
        })
    }

    fn verify_inner(&self) -> Result<License> {
        let store = self.base.store()?;
        let license = self.decode_cached(&store)?;
        self.context().validate(&license)?;
        Ok(license)
    }
}

impl ConsumerManager for CachingLicenseManager {
    fn context(&self) -> &Arc<Context> {
        self.base.context()
    }

    fn parameters(&self) -> &Arc<ManagerParameters> {
        self.base.parameters()
    }

    fn install(&self, source: &dyn Source) -> Result<()> {
        self.context().authorization().clear_install()?;
        let store = self.base.store()?;
        let _guard = self.lock_store();

        let bytes = source.read_all()?;
        let decoder: Arc<dyn Decoder> = Arc::from(self.base.authenticate_bytes(&bytes)?);
        store.write_all(&bytes)?;

        // Re-key both caches from the source to the store, so a
        // subsequent load() — which reads via the store — hits the entry
        // populated here instead of recomputing.
        let store_key = store_identity(&store);
        let period = self.period();
        self.decoder_cache.publish(store_key, Arc::clone(&decoder), period);
        if let Ok(license) = licensure_crypto::decode::<License>(decoder.as_ref()) {
            self.license_cache.publish(store_key, license, period);
        }
        crate::telemetry::record_install();
        Ok(())
    }

    fn load(&self) -> Result<License> {
        self.context().authorization().clear_load()?;
        let store = self.base.store()?;
        self.decode_cached(&store)
    }

    fn verify(&self) -> Result<License> {
        self.context().authorization().clear_verify()?;
        match self.verify_inner() {
            Ok(license) => Ok(license),
            Err(err) => {
                crate::telemetry::record_verification_failed();
                Err(err)
            }
        }
    }

    fn uninstall(&self) -> Result<()> {
        self.context().authorization().clear_uninstall()?;
        let store = self.base.store()?;
        let _guard = self.lock_store();

        let key = store_identity(&store);
        let bytes = store.read_all()?;
        self.decoder_cache
            .get_or_compute(key, self.period(), || {
                self.base.authenticate_bytes(&bytes).map(Arc::from)
            })?;

        store.delete()?;
        self.decoder_cache.clear();
        self.license_cache.clear();
        Ok(())
    }
}
