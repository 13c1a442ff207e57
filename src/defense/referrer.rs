//! Referrer suppression: force a no-referrer policy on outgoing requests.

use super::{lock_state, SharedState};
use crate::platform::{ApiResult, ReferrerPolicy, RequestPolicySource};

/// Request policy decorator.
pub struct DefendedRequestPolicy {
    inner: Box<dyn RequestPolicySource>,
    state: SharedState,
}

impl DefendedRequestPolicy {
    pub fn new(inner: Box<dyn RequestPolicySource>, state: SharedState) -> Self {
        Self { inner, state }
    }
}

impl RequestPolicySource for DefendedRequestPolicy {
    fn referrer_policy(&self) -> ApiResult<ReferrerPolicy> {
        let st = lock_state(&self.state);
        if st.settings.enabled && st.settings.suppress_referrer {
            Ok(ReferrerPolicy::NoReferrer)
        } else {
            drop(st);
            self.inner.referrer_policy()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defense::SessionState;
    use crate::prng::SessionPrng;
    use crate::settings::FingerprintDefenseSettings;

    struct LeakyPolicy;

    impl RequestPolicySource for LeakyPolicy {
        fn referrer_policy(&self) -> ApiResult<ReferrerPolicy> {
            Ok(ReferrerPolicy::Full)
        }
    }

    fn defended(settings: FingerprintDefenseSettings) -> DefendedRequestPolicy {
        DefendedRequestPolicy::new(
            Box::new(LeakyPolicy),
            SessionState::shared(settings, SessionPrng::from_seed(1)),
        )
    }

    #[test]
    fn test_suppression_forces_no_referrer() {
        let policy = defended(FingerprintDefenseSettings::default());
        assert_eq!(policy.referrer_policy().unwrap(), ReferrerPolicy::NoReferrer);
    }

    #[test]
    fn test_toggle_off_passthrough() {
        let mut settings = FingerprintDefenseSettings::default();
        settings.suppress_referrer = false;
        assert_eq!(
            defended(settings).referrer_policy().unwrap(),
            ReferrerPolicy::Full
        );
    }
}
