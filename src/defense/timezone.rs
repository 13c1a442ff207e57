//! Timezone defense: bounded per-session skew of the reported UTC offset.

use super::{lock_state, SharedState};
use crate::platform::{ApiResult, TimeSource};

/// Time source decorator.
pub struct DefendedTimeSource {
    inner: Box<dyn TimeSource>,
    state: SharedState,
}

impl DefendedTimeSource {
    pub fn new(inner: Box<dyn TimeSource>, state: SharedState) -> Self {
        Self { inner, state }
    }
}

impl TimeSource for DefendedTimeSource {
    fn utc_offset_minutes(&self) -> ApiResult<i32> {
        let offset = self.inner.utc_offset_minutes()?;
        let mut st = lock_state(&self.state);
        if st.settings.enabled && st.settings.timezone_skew {
            Ok(offset + st.timezone_skew() as i32)
        } else {
            Ok(offset)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defense::SessionState;
    use crate::profile::TIMEZONE_SKEW_MAX_MINUTES;
    use crate::prng::SessionPrng;
    use crate::settings::FingerprintDefenseSettings;

    struct FakeClock;

    impl TimeSource for FakeClock {
        fn utc_offset_minutes(&self) -> ApiResult<i32> {
            Ok(-300) // UTC-5
        }
    }

    fn defended(seed: u64, settings: FingerprintDefenseSettings) -> DefendedTimeSource {
        DefendedTimeSource::new(
            Box::new(FakeClock),
            SessionState::shared(settings, SessionPrng::from_seed(seed)),
        )
    }

    #[test]
    fn test_skew_bounded_and_stable() {
        let clock = defended(21, FingerprintDefenseSettings::default());
        let a = clock.utc_offset_minutes().unwrap();
        assert!((a + 300).abs() as i64 <= TIMEZONE_SKEW_MAX_MINUTES);
        assert_eq!(clock.utc_offset_minutes().unwrap(), a);
    }

    #[test]
    fn test_skew_differs_across_sessions() {
        let offsets: Vec<i32> = (0..8)
            .map(|seed| {
                defended(seed, FingerprintDefenseSettings::default())
                    .utc_offset_minutes()
                    .unwrap()
            })
            .collect();
        assert!(
            offsets.iter().any(|&o| o != offsets[0]),
            "all sessions produced the same skew: {offsets:?}"
        );
    }

    #[test]
    fn test_toggle_off_passthrough() {
        let mut settings = FingerprintDefenseSettings::default();
        settings.timezone_skew = false;
        assert_eq!(defended(21, settings).utc_offset_minutes().unwrap(), -300);
    }
}
