//! Snapshot builder and risk evaluator.

use serde::{Deserialize, Serialize};

use crate::prng::{now_millis, SessionPrng};
use crate::signal::{FingerprintSignal, FingerprintSnapshot};

/// Snapshots at or above this aggregate score are flagged high-risk.
pub const HIGH_RISK_THRESHOLD: f64 = 0.7;

/// Individual signals at or above this score count as known tracking vectors.
pub const TRACKER_THRESHOLD: f64 = 0.7;

/// Lower bound of the medium risk band.
pub const MEDIUM_RISK_THRESHOLD: f64 = 0.5;

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Aggregate `signals` into an immutable snapshot.
///
/// The id is unique for the process lifetime (millisecond timestamp plus a
/// random suffix). An empty signal list is valid and scores 0.
pub fn build(
    signals: Vec<FingerprintSignal>,
    salt: &str,
    prng: &mut SessionPrng,
) -> FingerprintSnapshot {
    let risk_score = if signals.is_empty() {
        0.0
    } else {
        round2(signals.iter().map(|s| s.risk_score).sum::<f64>() / signals.len() as f64)
    };
    let matched_trackers: Vec<String> = signals
        .iter()
        .filter(|s| s.risk_score >= TRACKER_THRESHOLD)
        .map(|s| s.id.clone())
        .collect();

    FingerprintSnapshot {
        id: format!("fp-{}-{}", now_millis(), prng.next_token()),
        timestamp: now_millis(),
        signals,
        risk_score,
        salt: salt.to_string(),
        is_high_risk: risk_score >= HIGH_RISK_THRESHOLD,
        matched_trackers,
    }
}

/// Risk band of a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// Evaluation result handed to the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskEvaluation {
    pub risk_level: RiskLevel,
    pub risk_score: f64,
    pub trackers: Vec<String>,
    pub recommendation: String,
}

/// Classify a snapshot into a risk band with a recommendation.
pub fn evaluate(snapshot: &FingerprintSnapshot) -> RiskEvaluation {
    let risk_level = if snapshot.risk_score >= HIGH_RISK_THRESHOLD {
        RiskLevel::High
    } else if snapshot.risk_score >= MEDIUM_RISK_THRESHOLD {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    };

    let recommendation = match risk_level {
        RiskLevel::High => {
            "High re-identification risk. Enable aggressive defenses and rotate \
             the anonymization salt."
        }
        RiskLevel::Medium => {
            "Moderate re-identification risk. Balanced defenses are recommended."
        }
        RiskLevel::Low => "Low re-identification risk. Basic defenses are sufficient.",
    }
    .to_string();

    RiskEvaluation {
        risk_level,
        risk_score: snapshot.risk_score,
        trackers: snapshot.matched_trackers.clone(),
        recommendation,
    }
}
