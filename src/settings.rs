//! Defense settings: which vectors to perturb.
//!
//! A flat record of boolean toggles, consulted live by both the collectors
//! and the defended surfaces. All defenses are enabled by default. The Store
//! persists this record across sessions; a missing or partial stored record
//! deserializes against the defaults.

use serde::{Deserialize, Serialize};

/// Process-wide defense configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FingerprintDefenseSettings {
    /// Master switch; off means every wrapped surface is exact passthrough.
    pub enabled: bool,
    pub canvas_noise: bool,
    pub webgl_noise: bool,
    pub audio_noise: bool,
    pub spoof_user_agent: bool,
    pub spoof_font_metrics: bool,
    pub suppress_referrer: bool,
    pub timezone_skew: bool,
    pub screen_metrics_skew: bool,
}

impl Default for FingerprintDefenseSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            canvas_noise: true,
            webgl_noise: true,
            audio_noise: true,
            spoof_user_agent: true,
            spoof_font_metrics: true,
            suppress_referrer: true,
            timezone_skew: true,
            screen_metrics_skew: true,
        }
    }
}

/// Typed partial update; `None` fields leave the current value untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SettingsUpdate {
    pub enabled: Option<bool>,
    pub canvas_noise: Option<bool>,
    pub webgl_noise: Option<bool>,
    pub audio_noise: Option<bool>,
    pub spoof_user_agent: Option<bool>,
    pub spoof_font_metrics: Option<bool>,
    pub suppress_referrer: Option<bool>,
    pub timezone_skew: Option<bool>,
    pub screen_metrics_skew: Option<bool>,
}

impl SettingsUpdate {
    /// Merge this update into `settings` field-wise.
    pub fn apply_to(&self, settings: &mut FingerprintDefenseSettings) {
        macro_rules! merge {
            ($($field:ident),+ $(,)?) => {
                $(if let Some(v) = self.$field { settings.$field = v; })+
            };
        }
        merge!(
            enabled,
            canvas_noise,
            webgl_noise,
            audio_noise,
            spoof_user_agent,
            spoof_font_metrics,
            suppress_referrer,
            timezone_skew,
            screen_metrics_skew,
        );
    }
}
