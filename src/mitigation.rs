//! Mitigation planner: assigns each signal a countermeasure.
//!
//! The per-signal strategy is a function of the signal's risk score and the
//! requested plan-level aggressiveness. Success/failure counts are always
//! derived from the mitigations list, never tracked separately.

use crate::prng::{now_millis, SessionPrng};
use crate::profile::USER_AGENT_POOL;
use crate::signal::{
    FingerprintMitigation, FingerprintMitigationPlan, FingerprintSnapshot, MitigationStrategy,
    PlanStrategy, SignalValue, Vector,
};

/// Attempts at producing a replacement value distinct from the original
/// before a mitigation is recorded as failed.
const MAX_VALUE_ATTEMPTS: usize = 4;

/// Strategy table: plan-level aggressiveness × signal risk.
pub fn strategy_for(plan: PlanStrategy, risk_score: f64) -> MitigationStrategy {
    match plan {
        PlanStrategy::Aggressive => {
            if risk_score >= 0.7 {
                MitigationStrategy::Deny
            } else {
                MitigationStrategy::Obfuscate
            }
        }
        PlanStrategy::Conservative => {
            if risk_score >= 0.9 {
                MitigationStrategy::Deny
            } else {
                MitigationStrategy::Randomize
            }
        }
        PlanStrategy::Balanced => {
            if risk_score >= 0.8 {
                MitigationStrategy::Obfuscate
            } else {
                MitigationStrategy::Randomize
            }
        }
    }
}

/// Produce the replacement value for one strategy application.
pub fn mitigated_value(
    strategy: MitigationStrategy,
    signal_id: &str,
    prng: &mut SessionPrng,
) -> SignalValue {
    match strategy {
        MitigationStrategy::Deny => SignalValue::text("blocked"),
        MitigationStrategy::Obfuscate => {
            SignalValue::Text(format!("{signal_id}:obfuscated:{}", prng.next_token()))
        }
        MitigationStrategy::Randomize => SignalValue::Text(prng.next_token()),
        // spoofing a user agent draws from the plausible pool; everything
        // else falls back to a random token
        MitigationStrategy::Spoof => {
            if signal_id == Vector::UserAgent.id() {
                let idx = prng.next_int(0, USER_AGENT_POOL.len() as i64 - 1) as usize;
                SignalValue::text(USER_AGENT_POOL[idx])
            } else {
                SignalValue::Text(prng.next_token())
            }
        }
    }
}

fn mitigate_signal(
    signal_id: &str,
    original: &SignalValue,
    strategy: MitigationStrategy,
    prng: &mut SessionPrng,
) -> FingerprintMitigation {
    mitigate_signal_with_budget(signal_id, original, strategy, prng, MAX_VALUE_ATTEMPTS)
}

fn mitigate_signal_with_budget(
    signal_id: &str,
    original: &SignalValue,
    strategy: MitigationStrategy,
    prng: &mut SessionPrng,
    max_attempts: usize,
) -> FingerprintMitigation {
    let mut value = mitigated_value(strategy, signal_id, prng);
    let mut attempts = 1;
    // non-deny replacements must differ from the original
    while strategy != MitigationStrategy::Deny && &value == original && attempts < max_attempts {
        value = mitigated_value(strategy, signal_id, prng);
        attempts += 1;
    }

    if strategy != MitigationStrategy::Deny && &value == original {
        log::warn!("could not derive a distinct replacement for {signal_id}");
        return FingerprintMitigation {
            signal_id: signal_id.to_string(),
            strategy,
            original_value: original.clone(),
            mitigated_value: value,
            applied: false,
            error: Some("could not derive a replacement distinct from the original".into()),
        };
    }

    FingerprintMitigation {
        signal_id: signal_id.to_string(),
        strategy,
        original_value: original.clone(),
        mitigated_value: value,
        applied: true,
        error: None,
    }
}

/// Plan countermeasures for every signal in `snapshot`.
pub fn plan(
    snapshot: &FingerprintSnapshot,
    strategy: PlanStrategy,
    prng: &mut SessionPrng,
) -> FingerprintMitigationPlan {
    let mitigations: Vec<FingerprintMitigation> = snapshot
        .signals
        .iter()
        .map(|s| {
            mitigate_signal(
                &s.id,
                &s.value,
                strategy_for(strategy, s.risk_score),
                prng,
            )
        })
        .collect();

    let success_count = mitigations.iter().filter(|m| m.applied).count() as u32;
    let failure_count = mitigations.len() as u32 - success_count;

    FingerprintMitigationPlan {
        snapshot_id: snapshot.id.clone(),
        timestamp: now_millis(),
        mitigations,
        strategy,
        success_count,
        failure_count,
    }
}
