use std::sync::Arc;

use licensure_model::{License, Result};

use crate::clock::Clock;
use crate::initializer::default_initializer;
use crate::validator::default_validator;

/// How a user-supplied hook composes with the built-in one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositionMode {
    /// Run the user hook, then the built-in one.
    Decorate,
    /// Run only the user hook.
    Override,
}

/// Signature of an initialization hook.
pub type InitializerFn = dyn Fn(&mut License, &dyn Clock, &str) -> Result<()> + Send + Sync;
/// Signature of a validation hook.
pub type ValidatorFn = dyn Fn(&License, &dyn Clock, &str) -> Result<()> + Send + Sync;

/// The effective initialization hook a context applies on `generateKeyFrom`.
#[derive(Clone)]
pub struct Initialization(Arc<InitializerFn>);

impl Initialization {
    /// The built-in initializer, used when no user hook is supplied.
    #[must_use]
    pub fn built_in() -> Self {
        Self(Arc::new(default_initializer))
    }

    /// Compose a user-supplied `first` hook with the built-in one under `mode`.
    #[must_use]
    pub fn compose(first: Arc<InitializerFn>, mode: CompositionMode) -> Self {
        match mode {
            CompositionMode::Override => Self(first),
            CompositionMode::Decorate => Self(Arc::new(move |bean, clock, subject| {
                first(bean, clock, subject)?;
                default_initializer(bean, clock, subject)
            })),
        }
    }

    /// Run the effective initializer.
    pub fn apply(&self, bean: &mut License, clock: &dyn Clock, subject: &str) -> Result<()> {
        (self.0)(bean, clock, subject)
    }
}

impl Default for Initialization {
    fn default() -> Self {
        Self::built_in()
    }
}

/// The effective validation hook a context applies on `verify`/`load`.
#[derive(Clone)]
pub struct Validation(Arc<ValidatorFn>);

impl Validation {
    /// The built-in validator, used when no user hook is supplied.
    #[must_use]
    pub fn built_in() -> Self {
        Self(Arc::new(default_validator))
    }

    /// Compose a user-supplied `first` hook with the built-in one under `mode`.
    #[must_use]
    pub fn compose(first: Arc<ValidatorFn>, mode: CompositionMode) -> Self {
        match mode {
            CompositionMode::Override => Self(first),
            CompositionMode::Decorate => Self(Arc::new(move |bean, clock, subject| {
                first(bean, clock, subject)?;
                default_validator(bean, clock, subject)
            })),
        }
    }

    /// Run the effective validator.
    pub fn apply(&self, bean: &License, clock: &dyn Clock, subject: &str) -> Result<()> {
        (self.0)(bean, clock, subject)
    }
}

impl Default for Validation {
    fn default() -> Self {
        Self::built_in()
    }
}
