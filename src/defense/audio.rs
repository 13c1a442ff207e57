//! Audio graph defense: sub-audible per-session offsets.
//!
//! The generated probe tone and the dynamics-compressor parameters both get
//! tiny offsets, enough to move the rendered-buffer hash without any audible
//! difference.

use super::{lock_state, SharedState};
use crate::platform::{ApiResult, AudioPipeline, CompressorParams};

/// Audio pipeline decorator.
pub struct DefendedAudioPipeline {
    inner: Box<dyn AudioPipeline>,
    state: SharedState,
}

impl DefendedAudioPipeline {
    pub fn new(inner: Box<dyn AudioPipeline>, state: SharedState) -> Self {
        Self { inner, state }
    }
}

impl AudioPipeline for DefendedAudioPipeline {
    fn oscillator_frequency(&self) -> ApiResult<f64> {
        let freq = self.inner.oscillator_frequency()?;
        let mut st = lock_state(&self.state);
        if st.settings.enabled && st.settings.audio_noise {
            Ok(freq + st.audio_frequency_offset())
        } else {
            Ok(freq)
        }
    }

    fn compressor_params(&self) -> ApiResult<CompressorParams> {
        let params = self.inner.compressor_params()?;
        let mut st = lock_state(&self.state);
        if !(st.settings.enabled && st.settings.audio_noise) {
            return Ok(params);
        }
        let offset = st.compressor_offset();
        Ok(CompressorParams {
            threshold: params.threshold + offset,
            knee: params.knee + offset,
            ratio: params.ratio + offset,
            // time constants are in seconds; scale the offset down further
            attack: params.attack + offset * 1e-3,
            release: params.release + offset * 1e-3,
        })
    }
}
