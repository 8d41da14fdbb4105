use std::sync::Arc;

use zeroize::Zeroizing;

use licensure_model::{LicenseError, Result};

/// Distinguishes why a secret is being read, so a [`PasswordPolicy`] can be
/// applied only on the path that matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Usage {
    /// The secret is about to be used to encrypt or sign — the latest safe
    /// moment to reject a weak one.
    Write,
    /// The secret is being used to decrypt or verify; never policy-checked.
    Read,
}

/// A secret that zeroizes its backing memory when dropped.
#[derive(Clone)]
pub struct Password(Arc<Zeroizing<String>>);

impl Password {
    /// Wrap a plaintext secret.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(Arc::new(Zeroizing::new(value.into())))
    }

    /// Borrow the secret's bytes.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

/// Supplies a secret for a given usage.
pub trait PasswordProtection: Send + Sync {
    /// Return the secret for the given usage.
    fn password(&self, usage: Usage) -> Result<Password>;
}

/// A fixed, in-memory secret — the only `PasswordProtection` shipped
/// in-tree; keystore- or prompt-backed implementations are external
/// collaborators.
#[derive(Clone)]
pub struct StaticPasswordProtection(Password);

impl StaticPasswordProtection {
    /// Wrap a fixed secret.
    #[must_use]
    pub fn new(password: Password) -> Self {
        Self(password)
    }
}

impl PasswordProtection for StaticPasswordProtection {
    fn password(&self, _usage: Usage) -> Result<Password> {
        Ok(self.0.clone())
    }
}

/// Enforces a strength rule against a secret.
pub trait PasswordPolicy: Send + Sync {
    /// Check `password`, raising on weakness.
    fn check(&self, password: &Password) -> Result<()>;
}

/// The default policy: a minimum length plus at least one letter and one
/// digit.
#[derive(Debug, Clone, Copy)]
pub struct MinimumStrengthPolicy {
    /// Minimum accepted length.
    pub min_length: usize,
}

impl Default for MinimumStrengthPolicy {
    fn default() -> Self {
        Self { min_length: 8 }
    }
}

impl PasswordPolicy for MinimumStrengthPolicy {
    fn check(&self, password: &Password) -> Result<()> {
        let secret = password.as_str();
        if secret.len() < self.min_length {
            return Err(LicenseError::PasswordPolicy(format!(
                "secret must be at least {} characters",
                self.min_length
            )));
        }
        let has_letter = secret.chars().any(|c| c.is_alphabetic());
        let has_digit = secret.chars().any(|c| c.is_ascii_digit());
        if !(has_letter && has_digit) {
            return Err(LicenseError::PasswordPolicy(
                "secret must contain at least one letter and one digit".into(),
            ));
        }
        Ok(())
    }
}

/// Wraps a [`PasswordProtection`] with a [`PasswordPolicy`], checked only on
/// [`Usage::Write`].
pub struct CheckedPasswordProtection {
    inner: Arc<dyn PasswordProtection>,
    policy: Arc<dyn PasswordPolicy>,
}

impl CheckedPasswordProtection {
    /// Wrap `inner`, enforcing `policy` on write usages.
    #[must_use]
    pub fn new(inner: Arc<dyn PasswordProtection>, policy: Arc<dyn PasswordPolicy>) -> Self {
        Self { inner, policy }
    }
}

impl PasswordProtection for CheckedPasswordProtection {
    fn password(&self, usage: Usage) -> Result<Password> {
        let secret = self.inner.password(usage)?;
        if usage == Usage::Write {
            self.policy.check(&secret)?;
        }
        Ok(secret)
    }
}
