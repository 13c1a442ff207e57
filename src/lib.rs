//! Browser fingerprint detection and defense engine.
//!
//! The crate measures the classic fingerprinting vectors (canvas, WebGL,
//! audio, fonts, screen, timezone, language, user agent) through a set of
//! host capability traits, reduces each reading to a salted hash, scores the
//! aggregate re-identification risk, and plans countermeasures. The defense
//! side wraps the same capabilities in decorators that inject deterministic,
//! session-stable noise so repeated reads within a session agree while
//! cross-session readings diverge.
//!
//! Typical flow:
//!
//! ```no_run
//! use fpdefense::{FingerprintEngine, HostEnvironment, PlanStrategy};
//!
//! # fn main() -> fpdefense::Result<()> {
//! let mut engine = FingerprintEngine::new()?;
//! engine.initialize(HostEnvironment::default(), None, None);
//!
//! let salt = fpdefense::generate_salt()?;
//! let signals = engine.collect(&salt);
//! let snapshot = engine.build_snapshot(signals, &salt);
//! let evaluation = engine.evaluate(&snapshot);
//! let plan = engine.plan(&snapshot, PlanStrategy::Balanced);
//! # let _ = (evaluation, plan);
//! # Ok(())
//! # }
//! ```
//!
//! All randomness flows from one seeded [`prng::SessionPrng`], so a fixed
//! seed reproduces an entire session bit for bit.

pub mod collector;
pub mod defense;
pub mod engine;
pub mod error;
pub mod mitigation;
pub mod platform;
pub mod prng;
pub mod profile;
pub mod salt;
pub mod serialize;
pub mod settings;
pub mod signal;
pub mod snapshot;

pub use defense::{DefenseInstaller, InstalledVectors, SessionState, SharedState};
pub use engine::{DefenseStatus, FingerprintEngine, VectorStatus};
pub use error::{ErrorCode, FingerprintError, Result};
pub use platform::{
    ApiFailure, ApiResult, AudioPipeline, CompressorParams, FontMetricsSource, GpuParameter,
    GpuParameterSource, GpuParameterValue, HostEnvironment, NavigatorSource, ReferrerPolicy,
    RenderingSurface, RequestPolicySource, ScreenMetrics, ScreenSource, TimeSource,
};
pub use salt::{generate_salt, SaltRotationManager};
pub use serialize::{
    deserialize_plan, deserialize_settings, deserialize_snapshot, serialize_plan,
    serialize_settings, serialize_snapshot,
};
pub use settings::{FingerprintDefenseSettings, SettingsUpdate};
pub use signal::{
    FingerprintMitigation, FingerprintMitigationPlan, FingerprintSignal, FingerprintSnapshot,
    MitigationStrategy, PlanStrategy, SaltRotation, SignalValue, Vector,
};
pub use snapshot::{RiskEvaluation, RiskLevel};
