use licensure_model::{License, LicenseError, Result, ValidationFailure};

use crate::clock::Clock;

/// Enforce the field invariants and time window raising the first failure
/// encountered in the documented order.
pub fn default_validator(bean: &License, clock: &dyn Clock, subject: &str) -> Result<()> {
    if bean.consumer_amount.unwrap_or(0) <= 0 {
        return Err(ValidationFailure::ConsumerAmountIsNotPositive.into());
    }
    if bean.consumer_type.is_none() {
        return Err(ValidationFailure::ConsumerTypeIsNull.into());
    }
    if bean.holder.is_none() {
        return Err(ValidationFailure::HolderIsNull.into());
    }
    if bean.issuer.is_none() {
        return Err(ValidationFailure::IssuerIsNull.into());
    }
    if bean.issued.is_none() {
        return Err(ValidationFailure::IssuedIsNull.into());
    }

    let now = clock.now();
    if let Some(not_after) = bean.not_after {
        if now > not_after {
            return Err(ValidationFailure::LicenseHasExpired(not_after).into());
        }
    }
    if let Some(not_before) = bean.not_before {
        if now < not_before {
            return Err(ValidationFailure::LicenseIsNotYetValid(not_before).into());
        }
    }

    if bean.subject.as_deref() != Some(subject) {
        return Err(LicenseError::Validation(ValidationFailure::InvalidSubject {
            expected: subject.to_owned(),
            actual: bean.subject.clone().unwrap_or_default(),
        }));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FixedClock;
    use chrono::{Duration, Utc};
    use licensure_model::DistinguishedName;

    fn valid_bean(subject: &str, clock: &FixedClock) -> License {
        License::new()
            .with_consumer_amount(1)
            .with_consumer_type("User")
            .with_holder(DistinguishedName::common_name("Alice"))
            .with_issuer(DistinguishedName::common_name(subject))
            .with_issued(clock.now())
            .with_subject(subject)
    }

    #[test]
    fn accepts_a_well_formed_bean() {
        let clock = FixedClock::new(Utc::now());
        let bean = valid_bean("App", &clock);
        assert!(default_validator(&bean, &clock, "App").is_ok());
    }

    #[test]
    fn rejects_non_positive_amount() {
        let clock = FixedClock::new(Utc::now());
        let bean = valid_bean("App", &clock).with_consumer_amount(0);
        assert!(matches!(
            default_validator(&bean, &clock, "App"),
            Err(LicenseError::Validation(ValidationFailure::ConsumerAmountIsNotPositive))
        ));
    }

    #[test]
    fn rejects_expired_license() {
        let now = Utc::now();
        let clock = FixedClock::new(now);
        let bean = valid_bean("App", &clock).with_not_after(now - Duration::seconds(1));
        assert!(matches!(
            default_validator(&bean, &clock, "App"),
            Err(LicenseError::Validation(ValidationFailure::LicenseHasExpired(_)))
        ));
    }

    #[test]
    fn rejects_not_yet_valid_license() {
        let now = Utc::now();
        let clock = FixedClock::new(now);
        let bean = valid_bean("App", &clock).with_not_before(now + Duration::seconds(60));
        assert!(matches!(
            default_validator(&bean, &clock, "App"),
            Err(LicenseError::Validation(ValidationFailure::LicenseIsNotYetValid(_)))
        ));
    }

    #[test]
    fn rejects_subject_mismatch() {
        let clock = FixedClock::new(Utc::now());
        let bean = valid_bean("A", &clock);
        match default_validator(&bean, &clock, "B") {
            Err(LicenseError::Validation(ValidationFailure::InvalidSubject { expected, actual })) => {
                assert_eq!(expected, "B");
                assert_eq!(actual, "A");
            }
            other => panic!("expected subject mismatch, got {other:?}"),
        }
    }
}
