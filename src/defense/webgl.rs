//! GPU parameter defense.
//!
//! Size-like parameters get a small signed integer offset, range-like
//! parameters a small float offset on both bounds; everything else (vendor,
//! renderer, version strings) passes through unchanged. Offsets are drawn
//! once per session.

use super::{lock_state, SharedState};
use crate::platform::{ApiResult, GpuParameter, GpuParameterSource, GpuParameterValue};

/// GPU parameter source decorator.
pub struct DefendedGpuParameters {
    inner: Box<dyn GpuParameterSource>,
    state: SharedState,
}

impl DefendedGpuParameters {
    pub fn new(inner: Box<dyn GpuParameterSource>, state: SharedState) -> Self {
        Self { inner, state }
    }
}

impl GpuParameterSource for DefendedGpuParameters {
    fn get_parameter(&self, param: GpuParameter) -> ApiResult<GpuParameterValue> {
        let value = self.inner.get_parameter(param)?;

        let mut st = lock_state(&self.state);
        if !(st.settings.enabled && st.settings.webgl_noise) {
            return Ok(value);
        }

        Ok(match value {
            GpuParameterValue::Size(v) => GpuParameterValue::Size(v + st.gpu_size_offset()),
            GpuParameterValue::SizePair(a, b) => {
                let offset = st.gpu_size_offset();
                GpuParameterValue::SizePair(a + offset, b + offset)
            }
            GpuParameterValue::Range(lo, hi) => {
                let offset = st.gpu_range_offset();
                GpuParameterValue::Range(lo + offset, hi + offset)
            }
            text @ GpuParameterValue::Text(_) => text,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defense::SessionState;
    use crate::profile::{GPU_RANGE_OFFSET_MAX, GPU_SIZE_OFFSET_MAX};
    use crate::prng::SessionPrng;
    use crate::settings::FingerprintDefenseSettings;

    struct FakeGpu;

    impl GpuParameterSource for FakeGpu {
        fn get_parameter(&self, param: GpuParameter) -> ApiResult<GpuParameterValue> {
            Ok(match param {
                GpuParameter::Vendor => GpuParameterValue::Text("ACME Inc.".into()),
                GpuParameter::Renderer => GpuParameterValue::Text("ACME R300".into()),
                GpuParameter::ShadingLanguageVersion => {
                    GpuParameterValue::Text("WebGL GLSL ES 1.0".into())
                }
                GpuParameter::MaxTextureSize => GpuParameterValue::Size(16384),
                GpuParameter::MaxRenderbufferSize => GpuParameterValue::Size(16384),
                GpuParameter::MaxViewportDims => GpuParameterValue::SizePair(16384, 16384),
                GpuParameter::AliasedLineWidthRange => GpuParameterValue::Range(1.0, 10.0),
                GpuParameter::AliasedPointSizeRange => GpuParameterValue::Range(1.0, 255.0),
            })
        }
    }

    fn defended(seed: u64, settings: FingerprintDefenseSettings) -> DefendedGpuParameters {
        DefendedGpuParameters::new(
            Box::new(FakeGpu),
            SessionState::shared(settings, SessionPrng::from_seed(seed)),
        )
    }

    #[test]
    fn test_size_offset_applied_and_bounded() {
        let gpu = defended(7, FingerprintDefenseSettings::default());
        match gpu.get_parameter(GpuParameter::MaxTextureSize).unwrap() {
            GpuParameterValue::Size(v) => {
                assert_ne!(v, 16384);
                assert!((v - 16384).abs() <= GPU_SIZE_OFFSET_MAX);
            }
            other => panic!("unexpected value: {other:?}"),
        }
    }

    #[test]
    fn test_range_offset_applied_to_both_bounds() {
        let gpu = defended(7, FingerprintDefenseSettings::default());
        match gpu.get_parameter(GpuParameter::AliasedLineWidthRange).unwrap() {
            GpuParameterValue::Range(lo, hi) => {
                assert_ne!(lo, 1.0);
                assert!((lo - 1.0).abs() <= GPU_RANGE_OFFSET_MAX);
                // both bounds move by the same session offset
                assert!((hi - lo - 9.0).abs() < 1e-9);
            }
            other => panic!("unexpected value: {other:?}"),
        }
    }

    #[test]
    fn test_text_parameters_pass_through() {
        let gpu = defended(7, FingerprintDefenseSettings::default());
        assert_eq!(
            gpu.get_parameter(GpuParameter::Vendor).unwrap(),
            GpuParameterValue::Text("ACME Inc.".into())
        );
    }

    #[test]
    fn test_offsets_stable_within_session() {
        let gpu = defended(7, FingerprintDefenseSettings::default());
        let a = gpu.get_parameter(GpuParameter::MaxTextureSize).unwrap();
        let b = gpu.get_parameter(GpuParameter::MaxTextureSize).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_toggle_off_passthrough() {
        let mut settings = FingerprintDefenseSettings::default();
        settings.webgl_noise = false;
        let gpu = defended(7, settings);
        assert_eq!(
            gpu.get_parameter(GpuParameter::MaxTextureSize).unwrap(),
            GpuParameterValue::Size(16384)
        );
    }
}
