//! Data model: measurement vectors, signals, snapshots, mitigations.
//!
//! All persisted records are serde-derived with camelCase field names, the
//! form the Store writes into host storage.

use serde::{Deserialize, Serialize};

use crate::prng::now_millis;

/// One measurable platform property usable to re-identify a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Vector {
    Canvas,
    Webgl,
    Plugins,
    Fonts,
    Screen,
    Timezone,
    Language,
    UserAgent,
}

impl Vector {
    /// Collection order. Also the canonical risk table order.
    pub const ALL: [Vector; 8] = [
        Vector::Canvas,
        Vector::Webgl,
        Vector::Plugins,
        Vector::Fonts,
        Vector::Screen,
        Vector::Timezone,
        Vector::Language,
        Vector::UserAgent,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Vector::Canvas => "canvas",
            Vector::Webgl => "webgl",
            Vector::Plugins => "plugins",
            Vector::Fonts => "fonts",
            Vector::Screen => "screen",
            Vector::Timezone => "timezone",
            Vector::Language => "language",
            Vector::UserAgent => "userAgent",
        }
    }

    /// Baseline re-identification risk of the vector.
    pub fn default_risk(&self) -> f64 {
        match self {
            Vector::Canvas => 0.95,
            Vector::Webgl => 0.90,
            Vector::Plugins => 0.85,
            Vector::Fonts => 0.70,
            Vector::Screen => 0.65,
            Vector::Timezone => 0.50,
            Vector::Language => 0.40,
            Vector::UserAgent => 0.30,
        }
    }

    /// Whether repeated measurements of the raw vector normally agree.
    pub fn is_stable(&self) -> bool {
        !matches!(self, Vector::Screen)
    }

    pub fn from_id(id: &str) -> Option<Vector> {
        Vector::ALL.iter().copied().find(|v| v.id() == id)
    }
}

/// A signal value: a single reading or a list (e.g. per-plugin digests).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SignalValue {
    Text(String),
    List(Vec<String>),
}

impl SignalValue {
    pub fn text(s: impl Into<String>) -> Self {
        SignalValue::Text(s.into())
    }
}

/// One measured reading of a vector, tagged with its risk score.
/// Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FingerprintSignal {
    pub id: String,
    pub value: SignalValue,
    pub timestamp: u64,
    pub risk_score: f64,
    pub is_stable: bool,
}

impl FingerprintSignal {
    /// A successfully measured signal at the vector's table risk.
    pub fn measured(vector: Vector, value: SignalValue) -> Self {
        Self {
            id: vector.id().to_string(),
            value,
            timestamp: now_millis(),
            risk_score: vector.default_risk(),
            is_stable: vector.is_stable(),
        }
    }

    /// Sentinel for an absent platform capability. Risk 0: a surface that
    /// does not exist cannot be measured against the user.
    pub fn unsupported(vector: Vector) -> Self {
        Self {
            id: vector.id().to_string(),
            value: SignalValue::text("unsupported"),
            timestamp: now_millis(),
            risk_score: 0.0,
            is_stable: vector.is_stable(),
        }
    }

    /// Sentinel for a failed measurement (permission denial, API error).
    /// The surface exists, so it keeps the vector's table risk.
    pub fn denied(vector: Vector) -> Self {
        Self {
            id: vector.id().to_string(),
            value: SignalValue::text("denied"),
            timestamp: now_millis(),
            risk_score: vector.default_risk(),
            is_stable: vector.is_stable(),
        }
    }
}

/// Aggregate of all signals collected in one pass. Immutable; a new pass
/// supersedes rather than mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FingerprintSnapshot {
    pub id: String,
    pub timestamp: u64,
    pub signals: Vec<FingerprintSignal>,
    pub risk_score: f64,
    pub salt: String,
    pub is_high_risk: bool,
    pub matched_trackers: Vec<String>,
}

/// Countermeasure kind for a single signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MitigationStrategy {
    Spoof,
    Obfuscate,
    Deny,
    Randomize,
}

/// Plan-level aggressiveness requested by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanStrategy {
    Aggressive,
    #[default]
    Balanced,
    Conservative,
}

/// A countermeasure applied to one signal, with before/after values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FingerprintMitigation {
    pub signal_id: String,
    pub strategy: MitigationStrategy,
    pub original_value: SignalValue,
    pub mitigated_value: SignalValue,
    pub applied: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Per-snapshot mitigation plan. Holds a weak reference to the snapshot by
/// id; the snapshot may already be superseded by the time the plan is read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FingerprintMitigationPlan {
    pub snapshot_id: String,
    pub timestamp: u64,
    pub mitigations: Vec<FingerprintMitigation>,
    pub strategy: PlanStrategy,
    pub success_count: u32,
    pub failure_count: u32,
}

/// One entry in the append-only salt rotation history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaltRotation {
    pub previous_salt: String,
    pub new_salt: String,
    pub timestamp: u64,
    pub reason: String,
}
