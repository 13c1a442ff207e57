//! Defense installer and shared session state.
//!
//! The installer wraps each present host capability in a defended decorator
//! exactly once per process lifetime; there is no uninstall (reverting
//! requires reloading the execution context). Every decorator consults the
//! *current* settings and session PRNG on every call, so toggling a vector
//! off takes effect on the next read without reinstallation.
//!
//! All PRNG-derived values a decorator needs (spoofed user agent, timezone
//! skew, screen offsets, canvas noise seed, ...) are computed lazily on first
//! use and cached for the session. Re-rolling per call would let a
//! fingerprinter average the noise out, and would break the session-stability
//! invariant.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::platform::HostEnvironment;
use crate::prng::SessionPrng;
use crate::profile;
use crate::settings::FingerprintDefenseSettings;

pub mod audio;
pub mod canvas;
pub mod fonts;
pub mod navigator;
pub mod referrer;
pub mod screen;
pub mod timezone;
pub mod webgl;

pub use audio::DefendedAudioPipeline;
pub use canvas::DefendedRenderingSurface;
pub use fonts::DefendedFontMetrics;
pub use navigator::DefendedNavigator;
pub use referrer::DefendedRequestPolicy;
pub use screen::DefendedScreen;
pub use timezone::DefendedTimeSource;
pub use webgl::DefendedGpuParameters;

/// Per-session screen geometry offsets.
#[derive(Debug, Clone, Copy)]
pub struct ScreenOffsets {
    pub width: i64,
    pub height: i64,
    pub avail_width: i64,
    pub avail_height: i64,
}

/// Lazily-derived per-session randomized values. Each is drawn from the
/// session PRNG on first use, then cached until the session is reset.
#[derive(Debug, Clone, Default)]
struct SessionValues {
    user_agent: Option<String>,
    timezone_skew: Option<i64>,
    screen_offsets: Option<ScreenOffsets>,
    gpu_size_offset: Option<i64>,
    gpu_range_offset: Option<f64>,
    audio_frequency_offset: Option<f64>,
    compressor_offset: Option<f64>,
    canvas_seed: Option<u64>,
    known_fonts: Option<Vec<&'static str>>,
    font_jitter_seed: Option<u64>,
}

/// The engine's single mutable resource: active settings plus the session
/// PRNG and its derived values. Settings and PRNG are read together on every
/// collection/patch call and must observe a consistent pair, so they live
/// under one lock.
#[derive(Debug)]
pub struct SessionState {
    pub settings: FingerprintDefenseSettings,
    pub prng: SessionPrng,
    values: SessionValues,
}

/// Handle shared between the engine and the defended decorators.
pub type SharedState = Arc<Mutex<SessionState>>;

/// Lock the shared state, recovering from a poisoned lock (the state itself
/// cannot be left logically inconsistent by a panicking reader).
pub(crate) fn lock_state(state: &SharedState) -> MutexGuard<'_, SessionState> {
    match state.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

impl SessionState {
    pub fn new(settings: FingerprintDefenseSettings, prng: SessionPrng) -> Self {
        Self {
            settings,
            prng,
            values: SessionValues::default(),
        }
    }

    pub fn shared(settings: FingerprintDefenseSettings, prng: SessionPrng) -> SharedState {
        Arc::new(Mutex::new(Self::new(settings, prng)))
    }

    /// Re-seed the session: the derived-value cache is dropped so the next
    /// reads draw fresh spoof values from the new sequence.
    pub fn reset(&mut self, seed: u64) {
        self.prng.reseed(seed);
        self.values = SessionValues::default();
        log::info!("session reset (new seed installed)");
    }

    /// The user-agent string this session reports, drawn once from the pool.
    pub fn user_agent(&mut self) -> String {
        if self.values.user_agent.is_none() {
            let idx = self
                .prng
                .next_int(0, profile::USER_AGENT_POOL.len() as i64 - 1) as usize;
            self.values.user_agent = Some(profile::USER_AGENT_POOL[idx].to_string());
        }
        self.values.user_agent.clone().unwrap_or_default()
    }

    /// Minutes added to the reported UTC offset this session.
    pub fn timezone_skew(&mut self) -> i64 {
        *self.values.timezone_skew.get_or_insert_with(|| {
            self.prng.next_int(
                -profile::TIMEZONE_SKEW_MAX_MINUTES,
                profile::TIMEZONE_SKEW_MAX_MINUTES,
            )
        })
    }

    /// Per-dimension screen geometry offsets for this session.
    pub fn screen_offsets(&mut self) -> ScreenOffsets {
        *self.values.screen_offsets.get_or_insert_with(|| {
            let max = profile::SCREEN_OFFSET_MAX;
            ScreenOffsets {
                width: self.prng.next_int(-max, max),
                height: self.prng.next_int(-max, max),
                avail_width: self.prng.next_int(-max, max),
                avail_height: self.prng.next_int(-max, max),
            }
        })
    }

    /// Signed integer offset for GPU size-like parameters. Never zero, so
    /// the defended reading always differs from the raw one.
    pub fn gpu_size_offset(&mut self) -> i64 {
        *self.values.gpu_size_offset.get_or_insert_with(|| {
            let magnitude = self.prng.next_int(1, profile::GPU_SIZE_OFFSET_MAX);
            if self.prng.next() < 0.5 {
                -magnitude
            } else {
                magnitude
            }
        })
    }

    /// Float offset applied to both bounds of GPU range-like parameters.
    pub fn gpu_range_offset(&mut self) -> f64 {
        *self.values.gpu_range_offset.get_or_insert_with(|| {
            self.prng
                .next_float(-profile::GPU_RANGE_OFFSET_MAX, profile::GPU_RANGE_OFFSET_MAX)
        })
    }

    /// Sub-audible offset for the generated tone frequency, in Hz.
    pub fn audio_frequency_offset(&mut self) -> f64 {
        *self.values.audio_frequency_offset.get_or_insert_with(|| {
            self.prng.next_float(
                -profile::AUDIO_FREQUENCY_OFFSET_MAX,
                profile::AUDIO_FREQUENCY_OFFSET_MAX,
            )
        })
    }

    /// Tiny offset for dynamics-compressor parameters.
    pub fn compressor_offset(&mut self) -> f64 {
        *self.values.compressor_offset.get_or_insert_with(|| {
            self.prng
                .next_float(-profile::COMPRESSOR_OFFSET_MAX, profile::COMPRESSOR_OFFSET_MAX)
        })
    }

    /// Seed keying the canvas pixel noise pattern for this session.
    pub fn canvas_seed(&mut self) -> u64 {
        *self
            .values
            .canvas_seed
            .get_or_insert_with(|| self.prng.next_u64())
    }

    /// Seed keying per-family font-width jitter for this session.
    pub fn font_jitter_seed(&mut self) -> u64 {
        *self
            .values
            .font_jitter_seed
            .get_or_insert_with(|| self.prng.next_u64())
    }

    /// The fonts this session admits to knowing. A sampled subset of the
    /// standard list; queries outside it get perturbed metrics.
    pub fn known_fonts(&mut self) -> Vec<&'static str> {
        if self.values.known_fonts.is_none() {
            let mut pool: Vec<&'static str> = profile::STANDARD_FONTS.to_vec();
            let mut sample = Vec::with_capacity(profile::KNOWN_FONT_SAMPLE);
            while sample.len() < profile::KNOWN_FONT_SAMPLE && !pool.is_empty() {
                let idx = self.prng.next_int(0, pool.len() as i64 - 1) as usize;
                sample.push(pool.swap_remove(idx));
            }
            self.values.known_fonts = Some(sample);
        }
        self.values.known_fonts.clone().unwrap_or_default()
    }
}

/// Which defended vectors have been installed. One-way flags: there is no
/// uninstall transition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InstalledVectors {
    pub canvas: bool,
    pub webgl: bool,
    pub audio: bool,
    pub user_agent: bool,
    pub fonts: bool,
    pub referrer: bool,
    pub timezone: bool,
    pub screen: bool,
}

/// Wraps the host's measurement surfaces in defended decorators.
///
/// Installing a vector twice is a no-op; the first wrapper stays in place and
/// the later capability is dropped.
pub struct DefenseInstaller {
    state: SharedState,
    host: HostEnvironment,
    installed: InstalledVectors,
}

impl DefenseInstaller {
    pub fn new(state: SharedState) -> Self {
        Self {
            state,
            host: HostEnvironment::default(),
            installed: InstalledVectors::default(),
        }
    }

    /// Install defenses over every capability `host` provides.
    pub fn install(&mut self, host: HostEnvironment) {
        let state = &self.state;

        if let Some(inner) = host.rendering {
            if self.installed.canvas {
                log::debug!("canvas defense already installed; ignoring new surface");
            } else {
                self.host.rendering =
                    Some(Box::new(DefendedRenderingSurface::new(inner, state.clone())));
                self.installed.canvas = true;
            }
        }
        if let Some(inner) = host.gpu {
            if self.installed.webgl {
                log::debug!("webgl defense already installed; ignoring new surface");
            } else {
                self.host.gpu = Some(Box::new(DefendedGpuParameters::new(inner, state.clone())));
                self.installed.webgl = true;
            }
        }
        if let Some(inner) = host.audio {
            if self.installed.audio {
                log::debug!("audio defense already installed; ignoring new surface");
            } else {
                self.host.audio =
                    Some(Box::new(DefendedAudioPipeline::new(inner, state.clone())));
                self.installed.audio = true;
            }
        }
        if let Some(inner) = host.navigator {
            if self.installed.user_agent {
                log::debug!("navigator defense already installed; ignoring new surface");
            } else {
                self.host.navigator =
                    Some(Box::new(DefendedNavigator::new(inner, state.clone())));
                self.installed.user_agent = true;
            }
        }
        if let Some(inner) = host.fonts {
            if self.installed.fonts {
                log::debug!("font defense already installed; ignoring new surface");
            } else {
                self.host.fonts = Some(Box::new(DefendedFontMetrics::new(inner, state.clone())));
                self.installed.fonts = true;
            }
        }
        if let Some(inner) = host.request_policy {
            if self.installed.referrer {
                log::debug!("referrer defense already installed; ignoring new surface");
            } else {
                self.host.request_policy =
                    Some(Box::new(DefendedRequestPolicy::new(inner, state.clone())));
                self.installed.referrer = true;
            }
        }
        if let Some(inner) = host.time {
            if self.installed.timezone {
                log::debug!("timezone defense already installed; ignoring new surface");
            } else {
                self.host.time = Some(Box::new(DefendedTimeSource::new(inner, state.clone())));
                self.installed.timezone = true;
            }
        }
        if let Some(inner) = host.screen {
            if self.installed.screen {
                log::debug!("screen defense already installed; ignoring new surface");
            } else {
                self.host.screen = Some(Box::new(DefendedScreen::new(inner, state.clone())));
                self.installed.screen = true;
            }
        }

        log::info!("defense install pass complete: {:?}", self.installed);
    }

    /// The defended measurement surfaces. Before any install this is an
    /// empty environment, which collectors treat as unsupported.
    pub fn host(&self) -> &HostEnvironment {
        &self.host
    }

    pub fn installed(&self) -> InstalledVectors {
        self.installed
    }
}
