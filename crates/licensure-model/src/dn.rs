use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LicenseError;

/// A distinguished name identifying a license holder or issuer.
///
/// The core only needs equality, display, and construction from a
/// human-supplied string; it does not parse or validate RFC 4514 structure
/// beyond rejecting an empty value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DistinguishedName(String);

impl DistinguishedName {
    /// Construct a distinguished name from an arbitrary non-empty string.
    pub fn new(value: impl Into<String>) -> Result<Self, LicenseError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(LicenseError::Config("distinguished name is empty".into()));
        }
        Ok(Self(value))
    }

    /// Build a distinguished name of the form `CN=<name>`.
    #[must_use]
    pub fn common_name(name: impl AsRef<str>) -> Self {
        Self(format!("CN={}", name.as_ref()))
    }

    /// Borrow the underlying string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DistinguishedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for DistinguishedName {
    type Err = LicenseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn common_name_prefixes_cn() {
        let dn = DistinguishedName::common_name("Acme Corp");
        assert_eq!(dn.as_str(), "CN=Acme Corp");
    }

    #[test]
    fn empty_value_rejected() {
        assert!(DistinguishedName::new("").is_err());
        assert!(DistinguishedName::new("   ").is_err());
    }
}
