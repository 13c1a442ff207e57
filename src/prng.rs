//! Session-seeded deterministic PRNG.
//!
//! Everything the defense layer randomizes (spoofed values, noise offsets,
//! screen and timezone skews) derives from this generator, so repeated reads
//! within a session are stable while different sessions diverge. Prevents
//! fingerprinters from averaging the perturbation out across multiple reads.
//!
//! Deliberately not cryptographically strong: unpredictability comes from the
//! per-session seed (drawn from the OS entropy source), while the generator
//! itself must be fast and bit-for-bit reproducible.

use crate::error::{FingerprintError, Result};

/// xorshift64* session generator.
///
/// Given the same seed and the same call sequence the output is identical;
/// tests and the "consistent within a session" invariant both rely on this.
#[derive(Debug, Clone)]
pub struct SessionPrng {
    seed: u64,
    state: u64,
}

impl SessionPrng {
    /// Create a generator. Without an explicit seed, one is derived from
    /// wall-clock time mixed with the OS entropy source.
    pub fn new(seed: Option<u64>) -> Result<Self> {
        let seed = match seed {
            Some(seed) => seed,
            None => {
                let mut bytes = [0u8; 8];
                getrandom::getrandom(&mut bytes).map_err(|e| {
                    FingerprintError::EnvironmentNotSupported(format!(
                        "no entropy source for session seed: {e}"
                    ))
                })?;
                now_millis() ^ u64::from_le_bytes(bytes)
            }
        };
        Ok(Self::from_seed(seed))
    }

    /// Create a generator from a fixed seed.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            seed,
            // xorshift state must be non-zero
            state: if seed == 0 { 0x9E37_79B9_7F4A_7C15 } else { seed },
        }
    }

    /// The seed this session was created with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Re-seed in place, restarting the output sequence.
    pub fn reseed(&mut self, seed: u64) {
        *self = Self::from_seed(seed);
    }

    /// Raw 64-bit output.
    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545_F491_4F6C_DD1D)
    }

    /// Uniform float in `[0, 1)`.
    pub fn next(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform integer in `[min, max]` (inclusive).
    pub fn next_int(&mut self, min: i64, max: i64) -> i64 {
        debug_assert!(min <= max);
        let span = (max - min + 1) as f64;
        min + (self.next() * span) as i64
    }

    /// Uniform float in `[min, max)`.
    pub fn next_float(&mut self, min: f64, max: f64) -> f64 {
        min + self.next() * (max - min)
    }

    /// Fresh 16-hex-char random token.
    pub fn next_token(&mut self) -> String {
        format!("{:016x}", self.next_u64())
    }
}

/// Stateless deterministic mixer (splitmix64 finalizer).
///
/// Used for positionally-keyed noise (canvas pixels, audio bins, font
/// families) that must not depend on how many times the streaming generator
/// was pumped beforehand.
#[inline]
pub fn mix(seed: u64, index: u64) -> u64 {
    let mut h = seed ^ index.wrapping_mul(0x9E37_79B9_7F4A_7C15);
    h = (h ^ (h >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    h = (h ^ (h >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    h ^ (h >> 31)
}

/// Cheap stable seed for a string key, for use with [`mix`].
#[inline]
pub fn str_seed(s: &str) -> u64 {
    s.bytes()
        .fold(0xcbf2_9ce4_8422_2325u64, |h, b| {
            (h ^ b as u64).wrapping_mul(0x0000_0100_0000_01B3)
        })
}

/// Milliseconds since the Unix epoch.
pub(crate) fn now_millis() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let mut a = SessionPrng::from_seed(42);
        let mut b = SessionPrng::from_seed(42);
        for _ in 0..100 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn test_different_seeds_diverge() {
        let mut a = SessionPrng::from_seed(42);
        let mut b = SessionPrng::from_seed(43);
        assert_ne!(a.next_u64(), b.next_u64());
    }

    #[test]
    fn test_next_in_unit_interval() {
        let mut rng = SessionPrng::from_seed(7);
        for _ in 0..1000 {
            let x = rng.next();
            assert!((0.0..1.0).contains(&x), "out of range: {x}");
        }
    }

    #[test]
    fn test_next_int_inclusive_bounds() {
        let mut rng = SessionPrng::from_seed(7);
        let mut saw_min = false;
        let mut saw_max = false;
        for _ in 0..10_000 {
            let n = rng.next_int(-3, 3);
            assert!((-3..=3).contains(&n), "out of range: {n}");
            saw_min |= n == -3;
            saw_max |= n == 3;
        }
        assert!(saw_min && saw_max, "bounds never hit");
    }

    #[test]
    fn test_next_float_range() {
        let mut rng = SessionPrng::from_seed(9);
        for _ in 0..1000 {
            let x = rng.next_float(-0.5, 0.5);
            assert!((-0.5..0.5).contains(&x));
        }
    }

    #[test]
    fn test_zero_seed_does_not_stall() {
        let mut rng = SessionPrng::from_seed(0);
        let a = rng.next_u64();
        let b = rng.next_u64();
        assert_ne!(a, 0);
        assert_ne!(a, b);
    }

    #[test]
    fn test_reseed_restarts_sequence() {
        let mut rng = SessionPrng::from_seed(5);
        let first = rng.next_u64();
        rng.next_u64();
        rng.reseed(5);
        assert_eq!(rng.next_u64(), first);
    }

    #[test]
    fn test_mix_stable_and_keyed() {
        assert_eq!(mix(42, 0), mix(42, 0));
        assert_ne!(mix(42, 0), mix(42, 1));
        assert_ne!(mix(42, 0), mix(43, 0));
    }

    #[test]
    fn test_unseeded_sessions_differ() {
        let mut a = SessionPrng::new(None).unwrap();
        let mut b = SessionPrng::new(None).unwrap();
        assert_ne!(a.next_u64(), b.next_u64());
    }
}
