//! Transport-safe text round-trips for snapshots, plans, and settings.
//!
//! Deserialization validates the minimal required fields up front and fails
//! with a single [`FingerprintError::Deserialization`]; it never hands back
//! a partially-populated record.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{FingerprintError, Result};
use crate::settings::FingerprintDefenseSettings;
use crate::signal::{FingerprintMitigationPlan, FingerprintSnapshot};

fn to_text<T: Serialize>(value: &T, what: &str) -> Result<String> {
    serde_json::to_string(value)
        .map_err(|e| FingerprintError::Serialization(format!("{what}: {e}")))
}

fn from_text<T: DeserializeOwned>(text: &str, what: &str, required: &[&str]) -> Result<T> {
    let value: serde_json::Value = serde_json::from_str(text)
        .map_err(|e| FingerprintError::Deserialization(format!("{what}: {e}")))?;
    for field in required {
        if value.get(field).is_none() {
            return Err(FingerprintError::Deserialization(format!(
                "{what}: missing required field `{field}`"
            )));
        }
    }
    serde_json::from_value(value)
        .map_err(|e| FingerprintError::Deserialization(format!("{what}: {e}")))
}

pub fn serialize_snapshot(snapshot: &FingerprintSnapshot) -> Result<String> {
    to_text(snapshot, "snapshot")
}

pub fn deserialize_snapshot(text: &str) -> Result<FingerprintSnapshot> {
    from_text(text, "snapshot", &["id", "timestamp", "signals"])
}

pub fn serialize_plan(plan: &FingerprintMitigationPlan) -> Result<String> {
    to_text(plan, "mitigation plan")
}

pub fn deserialize_plan(text: &str) -> Result<FingerprintMitigationPlan> {
    from_text(
        text,
        "mitigation plan",
        &["snapshotId", "timestamp", "mitigations"],
    )
}

pub fn serialize_settings(settings: &FingerprintDefenseSettings) -> Result<String> {
    to_text(settings, "settings")
}

/// Settings tolerate missing fields (they fall back to defaults); only
/// structurally invalid text is rejected.
pub fn deserialize_settings(text: &str) -> Result<FingerprintDefenseSettings> {
    from_text(text, "settings", &[])
}
