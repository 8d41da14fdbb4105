use licensure_model::{DistinguishedName, License, Result};

use crate::clock::Clock;

/// Fill in every unset field of `bean`, never overwriting one already set.
/// The clock is injected rather than read from the system, so generation
/// time is reproducible in tests.
pub fn default_initializer(bean: &mut License, clock: &dyn Clock, subject: &str) -> Result<()> {
    if bean.consumer_amount.is_none() {
        bean.consumer_amount = Some(1);
    }
    if bean.consumer_type.is_none() {
        bean.consumer_type = Some("User".to_owned());
    }
    if bean.holder.is_none() {
        bean.holder = Some(DistinguishedName::common_name("unknown"));
    }
    if bean.issued.is_none() {
        bean.issued = Some(clock.now());
    }
    if bean.issuer.is_none() {
        bean.issuer = Some(DistinguishedName::common_name(subject));
    }
    if bean.subject.is_none() {
        bean.subject = Some(subject.to_owned());
    }
    Ok(())
}
