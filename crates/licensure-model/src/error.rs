use chrono::{DateTime, Utc};

/// Result alias used throughout the licensure workspace.
pub type Result<T> = std::result::Result<T, LicenseError>;

/// Error taxonomy for the license lifecycle pipeline.
///
/// Each variant is a *kind*, not a concrete backend failure: callers match
/// on the variant to decide how to react (deny, retry, surface to an
/// operator) without needing to know which collaborator produced it.
#[derive(Debug, thiserror::Error)]
pub enum LicenseError {
    /// Missing or invalid builder input.
    #[error("configuration error: {0}")]
    Config(String),

    /// An authorization gate refused the operation.
    #[error("operation denied by authorization policy: {0}")]
    AuthorizationDenied(String),

    /// Signature invalid, keystore unreadable, or wrong password.
    #[error("authentication failure: {0}")]
    Authentication(String),

    /// The license bean violates the default or a user-supplied validator.
    #[error("license validation failed: {0}")]
    Validation(#[from] ValidationFailure),

    /// I/O error reading, writing, or deleting the store, source, or sink.
    #[error("store failure: {0}")]
    Store(String),

    /// A secret was too weak to use on a WRITE usage.
    #[error("password policy rejected the supplied secret: {0}")]
    PasswordPolicy(String),

    /// Anything else, wrapped rather than left untyped.
    #[error("unexpected failure: {0}")]
    Unexpected(#[from] anyhow::Error),
}

/// Specific reasons a license bean failed validation.
#[derive(Debug, thiserror::Error)]
pub enum ValidationFailure {
    #[error("{}", crate::messages::CONSUMER_AMOUNT_IS_NOT_POSITIVE)]
    ConsumerAmountIsNotPositive,
    #[error("{}", crate::messages::CONSUMER_TYPE_IS_NULL)]
    ConsumerTypeIsNull,
    #[error("{}", crate::messages::HOLDER_IS_NULL)]
    HolderIsNull,
    #[error("{}", crate::messages::ISSUED_IS_NULL)]
    IssuedIsNull,
    #[error("{}", crate::messages::ISSUER_IS_NULL)]
    IssuerIsNull,
    #[error("{}: expired at {0}", crate::messages::LICENSE_HAS_EXPIRED)]
    LicenseHasExpired(DateTime<Utc>),
    #[error("{}: not valid until {0}", crate::messages::LICENSE_IS_NOT_YET_VALID)]
    LicenseIsNotYetValid(DateTime<Utc>),
    #[error("{}: expected `{expected}`, got `{actual}`", crate::messages::INVALID_SUBJECT)]
    InvalidSubject { expected: String, actual: String },
}

impl LicenseError {
    /// Construct an [`LicenseError::AuthorizationDenied`] for the named gate.
    pub fn authorization_denied(gate: &str) -> Self {
        Self::AuthorizationDenied(gate.to_owned())
    }
}
