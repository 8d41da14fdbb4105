use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::dn::DistinguishedName;

/// Mutable record of license fields.
///
/// Every required field is modeled as `Option` because the bean is valid in
/// an "unset" state prior to initialization (component H fills the gaps) —
/// the type itself does not enforce the invariants in §3;
/// [`crate::error::ValidationFailure`] is raised by the validator that
/// checks them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct License {
    pub consumer_amount: Option<i64>,
    pub consumer_type: Option<String>,
    pub holder: Option<DistinguishedName>,
    pub issuer: Option<DistinguishedName>,
    pub issued: Option<DateTime<Utc>>,
    pub not_before: Option<DateTime<Utc>>,
    pub not_after: Option<DateTime<Utc>>,
    pub subject: Option<String>,
    /// User extension fields, opaque to the core.
    #[serde(default)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl License {
    /// Start building a license bean from scratch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter for the consumer amount.
    #[must_use]
    pub fn with_consumer_amount(mut self, amount: i64) -> Self {
        self.consumer_amount = Some(amount);
        self
    }

    /// Builder-style setter for the consumer type.
    #[must_use]
    pub fn with_consumer_type(mut self, consumer_type: impl Into<String>) -> Self {
        self.consumer_type = Some(consumer_type.into());
        self
    }

    /// Builder-style setter for the holder distinguished name.
    #[must_use]
    pub fn with_holder(mut self, holder: DistinguishedName) -> Self {
        self.holder = Some(holder);
        self
    }

    /// Builder-style setter for the issuer distinguished name.
    #[must_use]
    pub fn with_issuer(mut self, issuer: DistinguishedName) -> Self {
        self.issuer = Some(issuer);
        self
    }

    /// Builder-style setter for the issued instant.
    #[must_use]
    pub fn with_issued(mut self, issued: DateTime<Utc>) -> Self {
        self.issued = Some(issued);
        self
    }

    /// Builder-style setter for the validity window start.
    #[must_use]
    pub fn with_not_before(mut self, not_before: DateTime<Utc>) -> Self {
        self.not_before = Some(not_before);
        self
    }

    /// Builder-style setter for the validity window end.
    #[must_use]
    pub fn with_not_after(mut self, not_after: DateTime<Utc>) -> Self {
        self.not_after = Some(not_after);
        self
    }

    /// Builder-style setter for the product subject.
    #[must_use]
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Insert a user extension field.
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}
