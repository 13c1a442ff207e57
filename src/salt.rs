//! Anonymization salt generation and rotation.
//!
//! The salt is mixed into every signal hash, so rotating it decorrelates
//! future snapshots from past ones. Rotation history is append-only and
//! capped; the engine never re-collects on rotation. Sequencing a fresh
//! collection pass is the Store's responsibility.

use std::collections::VecDeque;

use crate::error::{FingerprintError, Result};
use crate::prng::now_millis;
use crate::signal::SaltRotation;

/// Salt length in raw bytes (rendered as 32 hex chars).
pub const SALT_BYTES: usize = 16;

/// Rotations retained in history; the oldest entry is evicted beyond this.
pub const ROTATION_HISTORY_CAP: usize = 10;

/// Generate a fresh salt from the OS entropy source.
pub fn generate_salt() -> Result<String> {
    let mut bytes = [0u8; SALT_BYTES];
    getrandom::getrandom(&mut bytes).map_err(|e| {
        FingerprintError::EnvironmentNotSupported(format!("no entropy source for salt: {e}"))
    })?;
    Ok(hex::encode(bytes))
}

/// Tracks salt rotations with a bounded audit history.
#[derive(Debug, Default)]
pub struct SaltRotationManager {
    history: VecDeque<SaltRotation>,
}

impl SaltRotationManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore a previously-persisted history (already bounded by the cap).
    pub fn with_history(history: Vec<SaltRotation>) -> Self {
        let mut manager = Self::new();
        for rotation in history.into_iter().take(ROTATION_HISTORY_CAP) {
            manager.history.push_back(rotation);
        }
        manager
    }

    /// Replace `previous` with a freshly generated salt.
    ///
    /// The new salt is always independent of the previous one; a repeated
    /// draw (an entropy-source malfunction) is retried and then surfaced as
    /// a rotation failure rather than silently reused.
    pub fn rotate(&mut self, previous: &str, reason: Option<&str>) -> Result<SaltRotation> {
        let mut salt = generate_salt()?;
        let mut attempts = 1;
        while salt == previous {
            if attempts >= 3 {
                return Err(FingerprintError::SaltRotation(
                    "entropy source keeps returning the previous salt".into(),
                ));
            }
            salt = generate_salt()?;
            attempts += 1;
        }

        let rotation = SaltRotation {
            previous_salt: previous.to_string(),
            new_salt: salt,
            timestamp: now_millis(),
            reason: reason.unwrap_or("manual").to_string(),
        };

        self.history.push_back(rotation.clone());
        while self.history.len() > ROTATION_HISTORY_CAP {
            self.history.pop_front();
        }
        log::info!(
            "salt rotated ({}); history depth {}",
            rotation.reason,
            self.history.len()
        );
        Ok(rotation)
    }

    /// Rotation records, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &SaltRotation> {
        self.history.iter()
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_salt_shape() {
        let salt = generate_salt().unwrap();
        assert_eq!(salt.len(), SALT_BYTES * 2);
        assert!(salt.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_rotation_never_repeats_previous() {
        let mut manager = SaltRotationManager::new();
        let previous = generate_salt().unwrap();
        let rotation = manager.rotate(&previous, None).unwrap();
        assert_ne!(rotation.new_salt, previous);
        assert_eq!(rotation.previous_salt, previous);
        assert_eq!(rotation.reason, "manual");
    }

    #[test]
    fn test_successive_rotations_differ() {
        let mut manager = SaltRotationManager::new();
        let a = manager.rotate("seed-salt", Some("scheduled")).unwrap();
        let b = manager.rotate(&a.new_salt, Some("scheduled")).unwrap();
        assert_ne!(a.new_salt, b.new_salt);
        assert_eq!(b.previous_salt, a.new_salt);
    }

    #[test]
    fn test_history_capped_at_ten() {
        let mut manager = SaltRotationManager::new();
        let mut salt = generate_salt().unwrap();
        for _ in 0..15 {
            salt = manager.rotate(&salt, None).unwrap().new_salt;
        }
        assert_eq!(manager.len(), ROTATION_HISTORY_CAP);
        // oldest entries evicted: history forms a contiguous chain ending
        // in the latest salt
        let last = manager.history().last().unwrap();
        assert_eq!(last.new_salt, salt);
    }

    #[test]
    fn test_restored_history_is_bounded() {
        let rotations: Vec<SaltRotation> = (0..15)
            .map(|i| SaltRotation {
                previous_salt: format!("prev-{i}"),
                new_salt: format!("new-{i}"),
                timestamp: i,
                reason: "manual".into(),
            })
            .collect();
        let manager = SaltRotationManager::with_history(rotations);
        assert_eq!(manager.len(), ROTATION_HISTORY_CAP);
    }
}
