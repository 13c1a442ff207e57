//! Engine facade: the only stateful entry point.
//!
//! Owns the active settings and the session PRNG (one lock guards both; they
//! are read together on every collection/patch call and must observe a
//! consistent pair) plus the defense installer and the salt rotation
//! history. The UI-facing Store sequences the individual query operations
//! (collect, build, evaluate, plan) and persists the results.

use serde::{Deserialize, Serialize};

use crate::collector;
use crate::defense::{lock_state, DefenseInstaller, InstalledVectors, SessionState, SharedState};
use crate::error::Result;
use crate::mitigation;
use crate::platform::HostEnvironment;
use crate::prng::SessionPrng;
use crate::salt::SaltRotationManager;
use crate::settings::{FingerprintDefenseSettings, SettingsUpdate};
use crate::signal::{
    FingerprintMitigationPlan, FingerprintSignal, FingerprintSnapshot, PlanStrategy, SaltRotation,
};
use crate::snapshot::{self, RiskEvaluation};

/// Per-vector defense state for the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VectorStatus {
    pub id: String,
    /// The defended wrapper is in place.
    pub installed: bool,
    /// Installed and currently enabled by settings.
    pub active: bool,
}

/// Status report over all defended vectors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefenseStatus {
    pub enabled: bool,
    pub vectors: Vec<VectorStatus>,
}

/// The fingerprint detection and defense engine.
///
/// One instance per session; tests create independent instances freely.
pub struct FingerprintEngine {
    state: SharedState,
    installer: DefenseInstaller,
    rotations: SaltRotationManager,
}

impl FingerprintEngine {
    /// Engine with default settings and an entropy-derived session seed.
    pub fn new() -> Result<Self> {
        Self::with_settings(FingerprintDefenseSettings::default(), None)
    }

    /// Engine with explicit settings (e.g. a record the Store persisted) and
    /// an optional fixed seed.
    pub fn with_settings(
        settings: FingerprintDefenseSettings,
        seed: Option<u64>,
    ) -> Result<Self> {
        let prng = SessionPrng::new(seed)?;
        let state = SessionState::shared(settings, prng);
        Ok(Self {
            installer: DefenseInstaller::new(state.clone()),
            state,
            rotations: SaltRotationManager::new(),
        })
    }

    /// Install all defenses over `host` and optionally apply settings and a
    /// seed. Idempotent: repeated calls re-apply settings/seed but never
    /// re-wrap an installed vector.
    pub fn initialize(
        &mut self,
        host: HostEnvironment,
        settings: Option<FingerprintDefenseSettings>,
        seed: Option<u64>,
    ) {
        {
            let mut st = lock_state(&self.state);
            if let Some(settings) = settings {
                st.settings = settings;
            }
            if let Some(seed) = seed {
                st.reset(seed);
            }
        }
        self.installer.install(host);
    }

    /// Merge a partial update and return the new effective settings. Safe to
    /// call at any time, including before `initialize`.
    pub fn update_settings(&self, update: SettingsUpdate) -> FingerprintDefenseSettings {
        let mut st = lock_state(&self.state);
        update.apply_to(&mut st.settings);
        log::debug!("settings updated: {:?}", st.settings);
        st.settings
    }

    pub fn settings(&self) -> FingerprintDefenseSettings {
        lock_state(&self.state).settings
    }

    /// Run a collection pass over the defended surfaces.
    pub fn collect(&self, salt: &str) -> Vec<FingerprintSignal> {
        collector::collect_all(self.installer.host(), salt)
    }

    /// Aggregate signals into a snapshot.
    pub fn build_snapshot(
        &self,
        signals: Vec<FingerprintSignal>,
        salt: &str,
    ) -> FingerprintSnapshot {
        let mut st = lock_state(&self.state);
        snapshot::build(signals, salt, &mut st.prng)
    }

    /// Classify a snapshot into a risk band.
    pub fn evaluate(&self, snapshot: &FingerprintSnapshot) -> RiskEvaluation {
        snapshot::evaluate(snapshot)
    }

    /// Plan countermeasures for a snapshot.
    pub fn plan(
        &self,
        snapshot: &FingerprintSnapshot,
        strategy: PlanStrategy,
    ) -> FingerprintMitigationPlan {
        let mut st = lock_state(&self.state);
        mitigation::plan(snapshot, strategy, &mut st.prng)
    }

    /// Rotate the anonymization salt. The caller is expected to run a fresh
    /// collection pass afterwards.
    pub fn rotate_salt(&mut self, previous: &str, reason: Option<&str>) -> Result<SaltRotation> {
        self.rotations.rotate(previous, reason)
    }

    /// Salt rotation records, oldest first, capped at the history bound.
    pub fn rotation_history(&self) -> Vec<SaltRotation> {
        self.rotations.history().cloned().collect()
    }

    /// Re-seed the session, dropping all cached spoof values.
    pub fn reset_session(&self, seed: u64) {
        lock_state(&self.state).reset(seed);
    }

    /// The defended measurement surfaces, for the host-integration layer.
    pub fn defended(&self) -> &HostEnvironment {
        self.installer.host()
    }

    pub fn installed(&self) -> InstalledVectors {
        self.installer.installed()
    }

    /// Live per-vector defense status.
    pub fn status(&self) -> DefenseStatus {
        let settings = self.settings();
        let installed = self.installer.installed();
        let entry = |id: &str, installed: bool, flag: bool| VectorStatus {
            id: id.to_string(),
            installed,
            active: installed && settings.enabled && flag,
        };
        DefenseStatus {
            enabled: settings.enabled,
            vectors: vec![
                entry("canvas", installed.canvas, settings.canvas_noise),
                entry("webgl", installed.webgl, settings.webgl_noise),
                entry("audio", installed.audio, settings.audio_noise),
                entry("userAgent", installed.user_agent, settings.spoof_user_agent),
                entry("fonts", installed.fonts, settings.spoof_font_metrics),
                entry("referrer", installed.referrer, settings.suppress_referrer),
                entry("timezone", installed.timezone, settings.timezone_skew),
                entry("screen", installed.screen, settings.screen_metrics_skew),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_settings_before_initialize() {
        let engine = FingerprintEngine::with_settings(
            FingerprintDefenseSettings::default(),
            Some(1),
        )
        .unwrap();
        let settings = engine.update_settings(SettingsUpdate {
            canvas_noise: Some(false),
            ..Default::default()
        });
        assert!(!settings.canvas_noise);
        assert_eq!(engine.settings(), settings);
    }

    #[test]
    fn test_collect_without_host_is_empty() {
        let engine = FingerprintEngine::with_settings(
            FingerprintDefenseSettings::default(),
            Some(1),
        )
        .unwrap();
        assert!(engine.collect("salt").is_empty());
    }

    #[test]
    fn test_status_reflects_toggles_live() {
        let mut engine = FingerprintEngine::with_settings(
            FingerprintDefenseSettings::default(),
            Some(1),
        )
        .unwrap();
        engine.initialize(HostEnvironment::default(), None, None);

        let status = engine.status();
        assert!(status.enabled);
        // nothing installed over an empty host
        assert!(status.vectors.iter().all(|v| !v.installed && !v.active));

        engine.update_settings(SettingsUpdate {
            enabled: Some(false),
            ..Default::default()
        });
        assert!(!engine.status().enabled);
    }

    #[test]
    fn test_rotation_history_capped() {
        let mut engine = FingerprintEngine::with_settings(
            FingerprintDefenseSettings::default(),
            Some(1),
        )
        .unwrap();
        let mut salt = "initial".to_string();
        for _ in 0..12 {
            salt = engine.rotate_salt(&salt, Some("scheduled")).unwrap().new_salt;
        }
        assert_eq!(engine.rotation_history().len(), 10);
    }
}
