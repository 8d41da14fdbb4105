use std::sync::Arc;
use std::time::Duration;

use licensure_codec::{Codec, RepositoryContext};
use licensure_crypto::{PasswordPolicy, Transformation};
use licensure_model::{LicenseError, Result};

use crate::authorization::{LicenseManagementAuthorization, PermitAll};
use crate::clock::{Clock, SystemClock};
use crate::composition::{CompositionMode, Initialization, InitializerFn, Validation, ValidatorFn};
use crate::factories::{AuthenticationFactory, DefaultEncryptionFactory, EncryptionFactory};

const DEFAULT_CACHE_PERIOD: Duration = Duration::from_secs(30 * 60);

/// Immutable bundle of every collaborator the license pipeline needs. Built
/// once via [`ContextBuilder`] and shared by every manager the builder later
/// produces.
pub struct Context {
    pub(crate) codec: Arc<dyn Codec>,
    pub(crate) compression: Arc<dyn Transformation>,
    pub(crate) encryption_algorithm: String,
    pub(crate) encryption_factory: Arc<dyn EncryptionFactory>,
    pub(crate) authentication_factory: Arc<dyn AuthenticationFactory>,
    pub(crate) repository_context: Arc<dyn RepositoryContext>,
    pub(crate) keystore_type: String,
    pub(crate) subject: String,
    pub(crate) initialization: Initialization,
    pub(crate) validation: Validation,
    pub(crate) password_policy: Arc<dyn PasswordPolicy>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) authorization: Arc<dyn LicenseManagementAuthorization>,
    pub(crate) cache_period: Duration,
}

impl Context {
    /// Start building a context.
    #[must_use]
    pub fn builder() -> ContextBuilder {
        ContextBuilder::default()
    }

    /// The configured codec.
    #[must_use]
    pub fn codec(&self) -> Arc<dyn Codec> {
        Arc::clone(&self.codec)
    }

    /// The configured compression transformation.
    #[must_use]
    pub fn compression(&self) -> Arc<dyn Transformation> {
        Arc::clone(&self.compression)
    }

    /// The configured default encryption algorithm name.
    #[must_use]
    pub fn encryption_algorithm(&self) -> &str {
        &self.encryption_algorithm
    }

    /// The configured encryption factory.
    #[must_use]
    pub fn encryption_factory(&self) -> Arc<dyn EncryptionFactory> {
        Arc::clone(&self.encryption_factory)
    }

    /// The configured authentication factory.
    #[must_use]
    pub fn authentication_factory(&self) -> Arc<dyn AuthenticationFactory> {
        Arc::clone(&self.authentication_factory)
    }

    /// The configured repository context.
    #[must_use]
    pub fn repository_context(&self) -> Arc<dyn RepositoryContext> {
        Arc::clone(&self.repository_context)
    }

    /// The default keystore type new manager builders inherit.
    #[must_use]
    pub fn keystore_type(&self) -> &str {
        &self.keystore_type
    }

    /// The product subject every generated/verified license must match.
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// The configured password policy.
    #[must_use]
    pub fn password_policy(&self) -> Arc<dyn PasswordPolicy> {
        Arc::clone(&self.password_policy)
    }

    /// The configured clock.
    #[must_use]
    pub fn clock(&self) -> Arc<dyn Clock> {
        Arc::clone(&self.clock)
    }

    /// The configured authorization.
    #[must_use]
    pub fn authorization(&self) -> Arc<dyn LicenseManagementAuthorization> {
        Arc::clone(&self.authorization)
    }

    /// The configured cache TTL. Zero means "never cache".
    #[must_use]
    pub fn cache_period(&self) -> Duration {
        self.cache_period
    }

    /// Run the effective initialization hook against `bean`.
    pub fn initialize(&self, bean: &mut licensure_model::License) -> Result<()> {
        self.initialization
            .apply(bean, self.clock.as_ref(), &self.subject)
    }

    /// Run the effective validation hook against `bean`.
    pub fn validate(&self, bean: &licensure_model::License) -> Result<()> {
        self.validation.apply(bean, self.clock.as_ref(), &self.subject)
    }

    /// The current instant, as seen by the configured clock.
    #[must_use]
    pub fn now(&self) -> chrono::DateTime<chrono::Utc> {
        self.clock.now()
    }

    /// A fresh, unset license bean template, ready to be filled in by
    /// [`Context::initialize`]. Used by the chained manager to generate a
    /// free-trial key with no caller-supplied fields.
    #[must_use]
    pub fn license(&self) -> licensure_model::License {
        licensure_model::License::new()
    }
}

/// Fluent builder for [`Context`].
///
/// `build()` fails with [`LicenseError::Config`] if any required field is
/// absent or empty; optional fields fall back to their documented defaults.
#[derive(Default)]
pub struct ContextBuilder {
    codec: Option<Arc<dyn Codec>>,
    compression: Option<Arc<dyn Transformation>>,
    encryption_algorithm: Option<String>,
    encryption_factory: Option<Arc<dyn EncryptionFactory>>,
    authentication_factory: Option<Arc<dyn AuthenticationFactory>>,
    repository_context: Option<Arc<dyn RepositoryContext>>,
    keystore_type: Option<String>,
    subject: Option<String>,
    initialization_hook: Option<(Arc<InitializerFn>, CompositionMode)>,
    validation_hook: Option<(Arc<ValidatorFn>, CompositionMode)>,
    password_policy: Option<Arc<dyn PasswordPolicy>>,
    clock: Option<Arc<dyn Clock>>,
    authorization: Option<Arc<dyn LicenseManagementAuthorization>>,
    cache_period: Option<Duration>,
}

impl ContextBuilder {
    /// Set the codec used to encode/decode the license bean and repository
    /// model.
    #[must_use]
    pub fn codec(mut self, codec: Arc<dyn Codec>) -> Self {
        self.codec = Some(codec);
        self
    }

    /// Set the compression transformation applied before encryption.
    #[must_use]
    pub fn compression(mut self, compression: Arc<dyn Transformation>) -> Self {
        self.compression = Some(compression);
        self
    }

    /// Set the default encryption algorithm name, must be non-empty.
    #[must_use]
    pub fn encryption_algorithm(mut self, algorithm: impl Into<String>) -> Self {
        self.encryption_algorithm = Some(algorithm.into());
        self
    }

    /// Set the factory used to build encryption transformations.
    #[must_use]
    pub fn encryption_factory(mut self, factory: Arc<dyn EncryptionFactory>) -> Self {
        self.encryption_factory = Some(factory);
        self
    }

    /// Set the factory used to build authenticators from key material.
    #[must_use]
    pub fn authentication_factory(mut self, factory: Arc<dyn AuthenticationFactory>) -> Self {
        self.authentication_factory = Some(factory);
        self
    }

    /// Set the repository context used to carry signed payloads.
    #[must_use]
    pub fn repository_context(mut self, repository_context: Arc<dyn RepositoryContext>) -> Self {
        self.repository_context = Some(repository_context);
        self
    }

    /// Set the default keystore type, must be non-empty.
    #[must_use]
    pub fn keystore_type(mut self, keystore_type: impl Into<String>) -> Self {
        self.keystore_type = Some(keystore_type.into());
        self
    }

    /// Set the product subject, must be non-empty.
    #[must_use]
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Supply a user initialization hook, composed with the built-in one
    /// under `mode`.
    #[must_use]
    pub fn initialization(mut self, hook: Arc<InitializerFn>, mode: CompositionMode) -> Self {
        self.initialization_hook = Some((hook, mode));
        self
    }

    /// Supply a user validation hook, composed with the built-in one under
    /// `mode`.
    #[must_use]
    pub fn validation(mut self, hook: Arc<ValidatorFn>, mode: CompositionMode) -> Self {
        self.validation_hook = Some((hook, mode));
        self
    }

    /// Override the default (minimum-strength) password policy.
    #[must_use]
    pub fn password_policy(mut self, policy: Arc<dyn PasswordPolicy>) -> Self {
        self.password_policy = Some(policy);
        self
    }

    /// Override the default (wall-clock) clock.
    #[must_use]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Override the default (permit-all) authorization.
    #[must_use]
    pub fn authorization(mut self, authorization: Arc<dyn LicenseManagementAuthorization>) -> Self {
        self.authorization = Some(authorization);
        self
    }

    /// Override the default (30 minutes) cache period.
    #[must_use]
    pub fn cache_period(mut self, period: Duration) -> Self {
        self.cache_period = Some(period);
        self
    }

    /// Validate and construct the context.
    pub fn build(self) -> Result<Context> {
        let codec = self
            .codec
            .ok_or_else(|| LicenseError::Config("codec is required".into()))?;
        let compression = self
            .compression
            .ok_or_else(|| LicenseError::Config("compression is required".into()))?;
        let encryption_algorithm = non_empty(self.encryption_algorithm, "encryption algorithm")?;
        let encryption_factory = self
            .encryption_factory
            .unwrap_or_else(|| Arc::new(DefaultEncryptionFactory));
        let authentication_factory = self
            .authentication_factory
            .ok_or_else(|| LicenseError::Config("authentication factory is required".into()))?;
        let repository_context = self
            .repository_context
            .ok_or_else(|| LicenseError::Config("repository context is required".into()))?;
        let keystore_type = non_empty(self.keystore_type, "keystore type")?;
        let subject = non_empty(self.subject, "subject")?;

        let initialization = match self.initialization_hook {
            Some((hook, mode)) => Initialization::compose(hook, mode),
            None => Initialization::built_in(),
        };
        let validation = match self.validation_hook {
            Some((hook, mode)) => Validation::compose(hook, mode),
            None => Validation::built_in(),
        };

        Ok(Context {
            codec,
            compression,
            encryption_algorithm,
            encryption_factory,
            authentication_factory,
            repository_context,
            keystore_type,
            subject,
            initialization,
            validation,
            password_policy: self
                .password_policy
                .unwrap_or_else(|| Arc::new(licensure_crypto::MinimumStrengthPolicy::default())),
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            authorization: self.authorization.unwrap_or_else(|| Arc::new(PermitAll)),
            cache_period: self.cache_period.unwrap_or(DEFAULT_CACHE_PERIOD),
        })
    }
}

fn non_empty(value: Option<String>, field: &str) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(LicenseError::Config(format!("{field} is required and must be non-empty"))),
    }
}
