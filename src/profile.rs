//! Spoof pools and noise bounds.
//!
//! Every magnitude the defense layer perturbs by is a named constant here,
//! so the noise stays sub-noticeable by construction and tests can assert
//! against the same bounds the decorators use.

/// Plausible user-agent strings the session spoof is drawn from.
///
/// Common browser/OS pairs; one is picked per session and held stable.
pub const USER_AGENT_POOL: &[&str] = &[
    "Mozilla/5.0 (X11; Linux x86_64; rv:115.0) Gecko/20100101 Firefox/115.0",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:115.0) Gecko/20100101 Firefox/115.0",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) \
     Version/17.1 Safari/605.1.15",
];

/// Fonts every mainstream platform ships. Queries outside the session's
/// sampled subset of this list get perturbed metrics.
pub const STANDARD_FONTS: &[&str] = &[
    "serif",
    "sans-serif",
    "monospace",
    "cursive",
    "fantasy",
    "system-ui",
    "Arial",
    "Times New Roman",
    "Courier New",
    "Georgia",
    "Verdana",
    "Helvetica",
    "Times",
    "Courier",
    "Lucida Console",
];

/// How many of [`STANDARD_FONTS`] each session treats as "known".
pub const KNOWN_FONT_SAMPLE: usize = 10;

/// Probe string for font-metric measurement (wide/narrow glyph mix).
pub const FONT_PROBE_TEXT: &str = "mmmmmmmmmmlli";

/// Canvas noise: one touched pixel per this many bytes of RGBA data.
pub const CANVAS_NOISE_DIVISOR: usize = 4000;

/// Canvas noise: per-channel delta magnitude cap.
pub const CANVAS_NOISE_AMPLITUDE: i32 = 2;

/// GPU size-like parameters get an integer offset in `±` this.
pub const GPU_SIZE_OFFSET_MAX: i64 = 3;

/// GPU range-like parameters get a float offset within `±` this on both bounds.
pub const GPU_RANGE_OFFSET_MAX: f64 = 0.01;

/// Oscillator frequency offset cap, in Hz. Far below audibility.
pub const AUDIO_FREQUENCY_OFFSET_MAX: f64 = 0.01;

/// Dynamics-compressor parameter offset cap.
pub const COMPRESSOR_OFFSET_MAX: f64 = 0.001;

/// Sub-pixel cap for perturbed text-width measurements.
pub const FONT_JITTER_MAX_PX: f64 = 0.45;

/// Reported UTC offset skew cap, in minutes.
pub const TIMEZONE_SKEW_MAX_MINUTES: i64 = 60;

/// Screen geometry offset cap, in pixels per dimension.
pub const SCREEN_OFFSET_MAX: i64 = 24;
