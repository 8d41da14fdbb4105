//! Stable message identifiers for validation failures.
//!
//! A real deployment would swap this constant table for a localized
//! catalogue keyed by the same identifiers; the core only promises the
//! identifiers stay stable, not the English text attached to them here.

pub const CONSUMER_AMOUNT_IS_NOT_POSITIVE: &str = "consumerAmountIsNotPositive";
pub const CONSUMER_TYPE_IS_NULL: &str = "consumerTypeIsNull";
pub const HOLDER_IS_NULL: &str = "holderIsNull";
pub const ISSUED_IS_NULL: &str = "issuedIsNull";
pub const ISSUER_IS_NULL: &str = "issuerIsNull";
pub const LICENSE_HAS_EXPIRED: &str = "licenseHasExpired";
pub const LICENSE_IS_NOT_YET_VALID: &str = "licenseIsNotYetValid";
pub const INVALID_SUBJECT: &str = "invalidSubject";
pub const UNKNOWN: &str = "unknown";
