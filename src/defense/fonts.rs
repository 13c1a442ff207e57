//! Font-metric defense.
//!
//! Measurements against the session's sampled "known font" set pass through
//! unchanged; any other family gets a sub-pixel width jitter, deterministic
//! per family within the session. Font enumeration via width probing then
//! sees a plausible but session-specific font landscape.

use super::{lock_state, SharedState};
use crate::platform::{ApiResult, FontMetricsSource};
use crate::prng::{mix, str_seed};
use crate::profile::FONT_JITTER_MAX_PX;

/// Font metrics decorator.
pub struct DefendedFontMetrics {
    inner: Box<dyn FontMetricsSource>,
    state: SharedState,
}

impl DefendedFontMetrics {
    pub fn new(inner: Box<dyn FontMetricsSource>, state: SharedState) -> Self {
        Self { inner, state }
    }
}

/// Sub-pixel jitter keyed on session and family. Magnitude is kept in
/// `[0.05, FONT_JITTER_MAX_PX]` so a perturbed width never equals the raw one.
fn family_jitter(jitter_seed: u64, family: &str) -> f64 {
    let h = mix(jitter_seed, str_seed(family));
    let unit = (h % 10_000) as f64 / 10_000.0;
    let magnitude = 0.05 + unit * (FONT_JITTER_MAX_PX - 0.05);
    if h & (1 << 60) == 0 {
        magnitude
    } else {
        -magnitude
    }
}

impl FontMetricsSource for DefendedFontMetrics {
    fn measure_text(&self, text: &str, family: &str) -> ApiResult<f64> {
        let width = self.inner.measure_text(text, family)?;
        let mut st = lock_state(&self.state);
        if !(st.settings.enabled && st.settings.spoof_font_metrics) {
            return Ok(width);
        }
        let known = st
            .known_fonts()
            .iter()
            .any(|f| f.eq_ignore_ascii_case(family));
        if known {
            return Ok(width);
        }
        Ok(width + family_jitter(st.font_jitter_seed(), family))
    }
}
