use std::sync::Arc;

use licensure_context::factories::{KeyMaterialRequest, KeyRole};
use licensure_context::Context;
use licensure_crypto::{Authentication, CheckedPasswordProtection, PasswordProtection, Transformation};
use licensure_model::{LicenseError, Result};
use licensure_store::{Source, Store};

use crate::base::BaseLicenseManager;
use crate::caching::CachingLicenseManager;
use crate::chained::ChainedLicenseManager;
use crate::consumer::ConsumerManager;
use crate::parameters::ManagerParameters;

/// How an authentication collaborator should be resolved at `build()` time.
enum AuthenticationSpec {
    Direct(Arc<dyn Authentication>),
    Keystore {
        alias: String,
        source: Arc<dyn Source>,
        role: KeyRole,
    },
}

fn resolve_authentication(context: &Context, spec: AuthenticationSpec) -> Result<Arc<dyn Authentication>> {
    match spec {
        AuthenticationSpec::Direct(authentication) => Ok(authentication),
        AuthenticationSpec::Keystore { alias, source, role } => {
            context.authentication_factory().create(KeyMaterialRequest { alias, source, role })
        }
    }
}

/// How an encryption collaborator should be resolved at `build()` time.
/// `algorithm` defaults to the context's configured algorithm when unset.
enum EncryptionSpec {
    Direct(Arc<dyn Transformation>),
    Password {
        algorithm: Option<String>,
        password: Arc<dyn PasswordProtection>,
    },
}

fn resolve_encryption(context: &Context, spec: EncryptionSpec) -> Result<Arc<dyn Transformation>> {
    match spec {
        EncryptionSpec::Direct(encryption) => Ok(encryption),
        EncryptionSpec::Password { algorithm, password } => {
            let algorithm = algorithm.unwrap_or_else(|| context.encryption_algorithm().to_string());
            let checked: Arc<dyn PasswordProtection> =
                Arc::new(CheckedPasswordProtection::new(password, context.password_policy()));
            context.encryption_factory().create(&algorithm, checked)
        }
    }
}

fn required<T>(value: Option<T>, field: &str) -> Result<T> {
    value.ok_or_else(|| LicenseError::Config(format!("{field} is required")))
}

/// Builds a vendor-side [`BaseLicenseManager`]: generation and, optionally,
/// direct store access, with no caching and no parent fallback.
pub struct VendorManagerBuilder {
    context: Arc<Context>,
    authentication: Option<AuthenticationSpec>,
    encryption: Option<EncryptionSpec>,
    store: Option<Arc<dyn Store>>,
}

impl VendorManagerBuilder {
    /// Start building against `context`.
    #[must_use]
    pub fn new(context: Arc<Context>) -> Self {
        Self {
            context,
            authentication: None,
            encryption: None,
            store: None,
        }
    }

    /// Supply an already-built authenticator directly.
    #[must_use]
    pub fn authentication(mut self, authentication: Arc<dyn Authentication>) -> Self {
        self.authentication = Some(AuthenticationSpec::Direct(authentication));
        self
    }

    /// Resolve the authenticator from key material via the context's
    /// authentication factory. A vendor manager needs [`KeyRole::Signing`].
    #[must_use]
    pub fn authentication_from(mut self, alias: impl Into<String>, source: Arc<dyn Source>, role: KeyRole) -> Self {
        self.authentication = Some(AuthenticationSpec::Keystore {
            alias: alias.into(),
            source,
            role,
        });
        self
    }

    /// Supply an already-built encryption transformation directly.
    #[must_use]
    pub fn encryption(mut self, encryption: Arc<dyn Transformation>) -> Self {
        self.encryption = Some(EncryptionSpec::Direct(encryption));
        self
    }

    /// Resolve encryption from a secret via the context's encryption
    /// factory, under the context's default algorithm.
    #[must_use]
    pub fn encryption_with(self, password: Arc<dyn PasswordProtection>) -> Self {
        self.encryption_with_algorithm_opt(None, password)
    }

    /// As [`Self::encryption_with`], overriding the algorithm name.
    #[must_use]
    pub fn encryption_with_algorithm(self, algorithm: impl Into<String>, password: Arc<dyn PasswordProtection>) -> Self {
        self.encryption_with_algorithm_opt(Some(algorithm.into()), password)
    }

    fn encryption_with_algorithm_opt(mut self, algorithm: Option<String>, password: Arc<dyn PasswordProtection>) -> Self {
        self.encryption = Some(EncryptionSpec::Password { algorithm, password });
        self
    }

    /// Attach a store a vendor manager can install/load/verify/uninstall
    /// against directly. Optional — a pure key-generation vendor manager
    /// never needs one.
    #[must_use]
    pub fn store_in(mut self, store: Arc<dyn Store>) -> Self {
        self.store = Some(store);
        self
    }

    /// Validate and construct the manager.
    pub fn build(self) -> Result<BaseLicenseManager> {
        let authentication = resolve_authentication(&self.context, required(self.authentication, "authentication")?)?;
        let encryption = resolve_encryption(&self.context, required(self.encryption, "encryption")?)?;
        let parameters = Arc::new(ManagerParameters::new(authentication, encryption, 0, self.store));
        Ok(BaseLicenseManager::new(self.context, parameters))
    }
}

/// Builds a consumer-side manager. With no `parent` attached, `build()`
/// yields a [`CachingLicenseManager`]; with one attached, it yields a
/// [`ChainedLicenseManager`] wrapping it.
///
/// `.nested_parent()`/`.up()` let a caller configure a multi-level parent
/// chain inline without juggling intermediate `Arc`s by hand. Both
/// `ConsumerManagerBuilder`s involved are the same concrete, non-generic
/// type — nesting needs no recursive generic parameter, only a boxed self-
/// reference.
pub struct ConsumerManagerBuilder {
    context: Arc<Context>,
    authentication: Option<AuthenticationSpec>,
    encryption: Option<EncryptionSpec>,
    ftp_days: u32,
    store: Option<Arc<dyn Store>>,
    parent: Option<Arc<dyn ConsumerManager>>,
    nested_in: Option<Box<ConsumerManagerBuilder>>,
}

impl ConsumerManagerBuilder {
    /// Start building against `context`.
    #[must_use]
    pub fn new(context: Arc<Context>) -> Self {
        Self {
            context,
            authentication: None,
            encryption: None,
            ftp_days: 0,
            store: None,
            parent: None,
            nested_in: None,
        }
    }

    /// Supply an already-built authenticator directly.
    #[must_use]
    pub fn authentication(mut self, authentication: Arc<dyn Authentication>) -> Self {
        self.authentication = Some(AuthenticationSpec::Direct(authentication));
        self
    }

    /// Resolve the authenticator from key material via the context's
    /// authentication factory. A consumer deployment that cannot generate
    /// its own keys only ever needs [`KeyRole::Verifying`].
    #[must_use]
    pub fn authentication_from(mut self, alias: impl Into<String>, source: Arc<dyn Source>, role: KeyRole) -> Self {
        self.authentication = Some(AuthenticationSpec::Keystore {
            alias: alias.into(),
            source,
            role,
        });
        self
    }

    /// Supply an already-built encryption transformation directly.
    #[must_use]
    pub fn encryption(mut self, encryption: Arc<dyn Transformation>) -> Self {
        self.encryption = Some(EncryptionSpec::Direct(encryption));
        self
    }

    /// Resolve encryption from a secret via the context's encryption
    /// factory, under the context's default algorithm. Leaving both this
    /// and [`Self::encryption`] unset inherits the parent's encryption at
    /// `build()` time — a consumer only ever decrypts, never signs a new
    /// secret, so there is no policy to re-check.
    #[must_use]
    pub fn encryption_with(self, password: Arc<dyn PasswordProtection>) -> Self {
        self.encryption_with_algorithm_opt(None, password)
    }

    /// As [`Self::encryption_with`], overriding the algorithm name.
    #[must_use]
    pub fn encryption_with_algorithm(self, algorithm: impl Into<String>, password: Arc<dyn PasswordProtection>) -> Self {
        self.encryption_with_algorithm_opt(Some(algorithm.into()), password)
    }

    fn encryption_with_algorithm_opt(mut self, algorithm: Option<String>, password: Arc<dyn PasswordProtection>) -> Self {
        self.encryption = Some(EncryptionSpec::Password { algorithm, password });
        self
    }

    /// Set the free-trial period, in days. `0` (the default) disables
    /// free-trial fallback even when a parent is attached.
    #[must_use]
    pub fn ftp_days(mut self, days: u32) -> Self {
        self.ftp_days = days;
        self
    }

    /// Set the store this manager installs/loads/verifies/uninstalls
    /// against. Required.
    #[must_use]
    pub fn store_in(mut self, store: Arc<dyn Store>) -> Self {
        self.store = Some(store);
        self
    }

    /// Attach an already-built parent manager, tried before this one on
    /// every operation.
    #[must_use]
    pub fn parent(mut self, parent: Arc<dyn ConsumerManager>) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Start configuring this manager's parent inline, returning a fresh
    /// builder for it. Call [`Self::up`] to finish the parent and return
    /// here with it attached.
    #[must_use]
    pub fn nested_parent(self) -> ConsumerManagerBuilder {
        let mut nested = ConsumerManagerBuilder::new(Arc::clone(&self.context));
        nested.nested_in = Some(Box::new(self));
        nested
    }

    /// Finish a parent builder opened with [`Self::nested_parent`], build
    /// it, and return to the builder it was opened from with the result
    /// attached as `parent`.
    pub fn up(mut self) -> Result<ConsumerManagerBuilder> {
        let mut outer = self
            .nested_in
            .take()
            .ok_or_else(|| LicenseError::Config("up() called without a matching nested_parent()".into()))?;
        let built = self.build()?;
        outer.parent = Some(built);
        Ok(*outer)
    }

    /// Validate and construct the manager.
    pub fn build(self) -> Result<Arc<dyn ConsumerManager>> {
        let authentication = resolve_authentication(&self.context, required(self.authentication, "authentication")?)?;
        let store = required(self.store, "store")?;

        let encryption = match self.encryption {
            Some(spec) => resolve_encryption(&self.context, spec)?,
            None => match &self.parent {
                Some(parent) => parent.parameters().encryption(),
                None => {
                    return Err(LicenseError::Config(
                        "encryption is required when no parent is attached".into(),
                    ))
                }
            },
        };

        let parameters = Arc::new(ManagerParameters::new(
            authentication,
            encryption,
            self.ftp_days,
            Some(store),
        ));
        let base = BaseLicenseManager::new(Arc::clone(&self.context), parameters);
        let caching = CachingLicenseManager::new(base);

        match self.parent {
            Some(parent) => Ok(Arc::new(ChainedLicenseManager::new(parent, caching))),
            None => Ok(Arc::new(caching)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use licensure_context::testing::FixedClock;
    use licensure_crypto::{Password, StaticPasswordProtection};
    use licensure_store::MemoryStore;

    fn context() -> Arc<Context> {
        Arc::new(crate::testing::test_context(FixedClock::new(chrono::Utc::now())))
    }

    fn password() -> Arc<dyn PasswordProtection> {
        Arc::new(StaticPasswordProtection::new(Password::new("correcthorse1")))
    }

    #[test]
    fn vendor_builder_requires_authentication_and_encryption() {
        let context = context();
        assert!(VendorManagerBuilder::new(Arc::clone(&context)).build().is_err());
        assert!(VendorManagerBuilder::new(context)
            .authentication(crate::testing::signer())
            .build()
            .is_err());
    }

    #[test]
    fn vendor_builder_builds_a_working_manager() {
        let context = context();
        let manager = VendorManagerBuilder::new(context)
            .authentication(crate::testing::signer())
            .encryption_with(password())
            .build()
            .unwrap();

        let bean = licensure_model::License::new().with_subject("App").with_consumer_amount(1);
        let generator = manager.generate_key_from(bean).unwrap();
        assert!(generator.license().is_ok());
    }

    #[test]
    fn consumer_builder_without_parent_yields_a_caching_manager() {
        let context = context();
        let authentication = crate::testing::signer();
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());

        let base = VendorManagerBuilder::new(Arc::clone(&context))
            .authentication(Arc::clone(&authentication))
            .encryption_with(password())
            .build()
            .unwrap();
        let bean = licensure_model::License::new().with_subject("App").with_consumer_amount(1);
        let generator = base.generate_key_from(bean).unwrap();
        generator.save_to(store.as_ref()).unwrap();

        let manager = ConsumerManagerBuilder::new(context)
            .authentication(authentication)
            .encryption_with(password())
            .store_in(Arc::clone(&store))
            .build()
            .unwrap();

        assert_eq!(manager.load().unwrap(), generator.license().unwrap());
    }

    #[test]
    fn consumer_builder_inherits_parent_encryption_when_unset() {
        let context = context();
        let parent_store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let child_store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let authentication = crate::testing::signer();

        let parent: Arc<dyn ConsumerManager> = ConsumerManagerBuilder::new(Arc::clone(&context))
            .authentication(Arc::clone(&authentication))
            .encryption_with(password())
            .store_in(parent_store)
            .build()
            .unwrap();

        let child = ConsumerManagerBuilder::new(context)
            .authentication(authentication)
            .store_in(child_store)
            .parent(parent)
            .build();

        assert!(child.is_ok());
    }

    #[test]
    fn nested_parent_and_up_attach_the_built_parent() {
        let context = context();
        let parent_store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let child_store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let authentication = crate::testing::signer();

        let manager = ConsumerManagerBuilder::new(Arc::clone(&context))
            .authentication(Arc::clone(&authentication))
            .store_in(child_store)
            .nested_parent()
            .authentication(authentication)
            .encryption_with(password())
            .store_in(parent_store)
            .up()
            .unwrap()
            .build();

        assert!(manager.is_ok());
    }

    #[test]
    fn up_without_nested_parent_is_an_error() {
        let context = context();
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let result = ConsumerManagerBuilder::new(context)
            .authentication(crate::testing::signer())
            .encryption_with(password())
            .store_in(store)
            .up();
        assert!(result.is_err());
    }
}
