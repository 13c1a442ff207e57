//! Screen geometry defense: small per-session dimension offsets.
//!
//! Each dimension gets its own bounded offset, clamped so no reported value
//! ever goes negative.

use super::{lock_state, SharedState};
use crate::platform::{ApiResult, ScreenMetrics, ScreenSource};

/// Screen source decorator.
pub struct DefendedScreen {
    inner: Box<dyn ScreenSource>,
    state: SharedState,
}

impl DefendedScreen {
    pub fn new(inner: Box<dyn ScreenSource>, state: SharedState) -> Self {
        Self { inner, state }
    }
}

fn offset_dim(value: u32, offset: i64) -> u32 {
    (value as i64 + offset).max(0) as u32
}

impl ScreenSource for DefendedScreen {
    fn metrics(&self) -> ApiResult<ScreenMetrics> {
        let metrics = self.inner.metrics()?;
        let mut st = lock_state(&self.state);
        if !(st.settings.enabled && st.settings.screen_metrics_skew) {
            return Ok(metrics);
        }
        let offsets = st.screen_offsets();
        Ok(ScreenMetrics {
            width: offset_dim(metrics.width, offsets.width),
            height: offset_dim(metrics.height, offsets.height),
            avail_width: offset_dim(metrics.avail_width, offsets.avail_width),
            avail_height: offset_dim(metrics.avail_height, offsets.avail_height),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defense::SessionState;
    use crate::profile::SCREEN_OFFSET_MAX;
    use crate::prng::SessionPrng;
    use crate::settings::FingerprintDefenseSettings;

    struct FakeScreen {
        metrics: ScreenMetrics,
    }

    impl ScreenSource for FakeScreen {
        fn metrics(&self) -> ApiResult<ScreenMetrics> {
            Ok(self.metrics)
        }
    }

    fn defended(seed: u64, settings: FingerprintDefenseSettings, metrics: ScreenMetrics) -> DefendedScreen {
        DefendedScreen::new(
            Box::new(FakeScreen { metrics }),
            SessionState::shared(settings, SessionPrng::from_seed(seed)),
        )
    }

    const REAL: ScreenMetrics = ScreenMetrics {
        width: 1920,
        height: 1080,
        avail_width: 1920,
        avail_height: 1040,
    };

    #[test]
    fn test_offsets_bounded_and_stable() {
        let screen = defended(31, FingerprintDefenseSettings::default(), REAL);
        let a = screen.metrics().unwrap();
        assert!((a.width as i64 - 1920).abs() <= SCREEN_OFFSET_MAX);
        assert!((a.height as i64 - 1080).abs() <= SCREEN_OFFSET_MAX);
        assert_eq!(screen.metrics().unwrap(), a);
    }

    #[test]
    fn test_never_negative() {
        let tiny = ScreenMetrics {
            width: 1,
            height: 1,
            avail_width: 0,
            avail_height: 0,
        };
        for seed in 0..64 {
            let m = defended(seed, FingerprintDefenseSettings::default(), tiny)
                .metrics()
                .unwrap();
            // u32 cannot be negative; the clamp must prevent wraparound
            assert!(m.width <= 1 + SCREEN_OFFSET_MAX as u32);
            assert!(m.avail_width <= SCREEN_OFFSET_MAX as u32);
        }
    }

    #[test]
    fn test_differs_across_sessions() {
        let a = defended(1, FingerprintDefenseSettings::default(), REAL)
            .metrics()
            .unwrap();
        let b = defended(2, FingerprintDefenseSettings::default(), REAL)
            .metrics()
            .unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_toggle_off_passthrough() {
        let mut settings = FingerprintDefenseSettings::default();
        settings.screen_metrics_skew = false;
        assert_eq!(
            defended(31, settings, REAL).metrics().unwrap(),
            REAL
        );
    }
}
