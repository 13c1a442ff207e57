//! Capability-wrapper traits over the host's measurement surfaces.
//!
//! In a browser host these would be prototype methods; here each surface is a
//! trait with a real implementation supplied by the host-integration layer
//! and a defended decorator (see [`crate::defense`]) that applies the
//! noise/spoof logic. The engine only ever sees the trait objects.
//!
//! Methods return [`ApiResult`]; a failure means the host refused or botched
//! the read. Callers in this crate never propagate an [`ApiFailure`]; they
//! degrade to the `"denied"` sentinel.

use std::fmt;

/// Why a platform read failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiFailure {
    PermissionDenied,
    Unavailable,
    Failed(String),
}

impl fmt::Display for ApiFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiFailure::PermissionDenied => write!(f, "permission denied"),
            ApiFailure::Unavailable => write!(f, "surface unavailable"),
            ApiFailure::Failed(msg) => write!(f, "platform call failed: {msg}"),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiFailure>;

/// 2D rendering surface: raw RGBA readout plus a derived export form.
pub trait RenderingSurface {
    /// Raw RGBA pixel buffer (4 bytes per pixel).
    fn read_pixels(&self) -> ApiResult<Vec<u8>>;

    /// Transport form of the surface content (`data:` URL).
    fn export_data_url(&self) -> ApiResult<String>;
}

/// GPU parameter identifiers the engine interrogates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpuParameter {
    Vendor,
    Renderer,
    ShadingLanguageVersion,
    MaxTextureSize,
    MaxRenderbufferSize,
    MaxViewportDims,
    AliasedLineWidthRange,
    AliasedPointSizeRange,
}

impl GpuParameter {
    pub const ALL: [GpuParameter; 8] = [
        GpuParameter::Vendor,
        GpuParameter::Renderer,
        GpuParameter::ShadingLanguageVersion,
        GpuParameter::MaxTextureSize,
        GpuParameter::MaxRenderbufferSize,
        GpuParameter::MaxViewportDims,
        GpuParameter::AliasedLineWidthRange,
        GpuParameter::AliasedPointSizeRange,
    ];
}

/// A GPU parameter reading.
#[derive(Debug, Clone, PartialEq)]
pub enum GpuParameterValue {
    Text(String),
    /// Size-like scalar (texture/renderbuffer limits).
    Size(i64),
    /// Size-like pair (viewport dims).
    SizePair(i64, i64),
    /// Range-like pair (aliased line width / point size).
    Range(f64, f64),
}

pub trait GpuParameterSource {
    fn get_parameter(&self, param: GpuParameter) -> ApiResult<GpuParameterValue>;
}

/// Dynamics-compressor parameter set, as exposed by the audio graph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompressorParams {
    pub threshold: f64,
    pub knee: f64,
    pub ratio: f64,
    pub attack: f64,
    pub release: f64,
}

/// Audio-processing graph endpoints used for fingerprinting.
pub trait AudioPipeline {
    /// Frequency of the generated probe tone, in Hz.
    fn oscillator_frequency(&self) -> ApiResult<f64>;

    fn compressor_params(&self) -> ApiResult<CompressorParams>;
}

/// Navigator-level identity surfaces.
pub trait NavigatorSource {
    fn user_agent(&self) -> ApiResult<String>;
    fn languages(&self) -> ApiResult<Vec<String>>;
    fn plugins(&self) -> ApiResult<Vec<String>>;
}

/// Text-measurement surface.
pub trait FontMetricsSource {
    /// Measured advance width of `text` under `family`, in CSS pixels.
    fn measure_text(&self, text: &str, family: &str) -> ApiResult<f64>;
}

/// Screen geometry reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenMetrics {
    pub width: u32,
    pub height: u32,
    pub avail_width: u32,
    pub avail_height: u32,
}

pub trait ScreenSource {
    fn metrics(&self) -> ApiResult<ScreenMetrics>;
}

/// Wall-clock surface.
pub trait TimeSource {
    /// Reported offset from UTC, in minutes (positive = east of UTC).
    fn utc_offset_minutes(&self) -> ApiResult<i32>;
}

/// Referrer policy applied to outgoing requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferrerPolicy {
    NoReferrer,
    OriginOnly,
    Full,
}

pub trait RequestPolicySource {
    fn referrer_policy(&self) -> ApiResult<ReferrerPolicy>;
}

/// The host's measurement surfaces, one optional capability per vector.
/// An absent capability is the "unsupported" sentinel path for collectors.
#[derive(Default)]
pub struct HostEnvironment {
    pub rendering: Option<Box<dyn RenderingSurface>>,
    pub gpu: Option<Box<dyn GpuParameterSource>>,
    pub audio: Option<Box<dyn AudioPipeline>>,
    pub navigator: Option<Box<dyn NavigatorSource>>,
    pub fonts: Option<Box<dyn FontMetricsSource>>,
    pub screen: Option<Box<dyn ScreenSource>>,
    pub time: Option<Box<dyn TimeSource>>,
    pub request_policy: Option<Box<dyn RequestPolicySource>>,
}

impl HostEnvironment {
    /// Whether the host provides the basic primitives a collection pass
    /// needs. Headless/SSR contexts without a navigator surface yield an
    /// empty collection outright.
    pub fn has_basic_support(&self) -> bool {
        self.navigator.is_some()
    }
}

impl fmt::Debug for HostEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostEnvironment")
            .field("rendering", &self.rendering.is_some())
            .field("gpu", &self.gpu.is_some())
            .field("audio", &self.audio.is_some())
            .field("navigator", &self.navigator.is_some())
            .field("fonts", &self.fonts.is_some())
            .field("screen", &self.screen.is_some())
            .field("time", &self.time.is_some())
            .field("request_policy", &self.request_policy.is_some())
            .finish()
    }
}
