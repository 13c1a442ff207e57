//! Canvas defense: session-stable per-pixel noise.
//!
//! A bounded number of pixels (one per [`CANVAS_NOISE_DIVISOR`] bytes of RGBA
//! data, at least one) get a ±[`CANVAS_NOISE_AMPLITUDE`] delta on one color
//! channel before any data leaves the surface. The noise pattern is keyed on
//! the session canvas seed and the pixel position only, so re-reading the
//! same surface yields the identical noised buffer.
//!
//! [`CANVAS_NOISE_DIVISOR`]: crate::profile::CANVAS_NOISE_DIVISOR
//! [`CANVAS_NOISE_AMPLITUDE`]: crate::profile::CANVAS_NOISE_AMPLITUDE

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use super::{lock_state, SharedState};
use crate::platform::{ApiResult, RenderingSurface};
use crate::prng::mix;
use crate::profile::{CANVAS_NOISE_AMPLITUDE, CANVAS_NOISE_DIVISOR};

/// Perturb an RGBA buffer in place. Deterministic in `(seed, buffer length,
/// position)`; independent of call order. Each touch lands in its own pixel
/// stride, so no byte ever moves by more than [`CANVAS_NOISE_AMPLITUDE`].
pub fn perturb_pixels(data: &mut [u8], seed: u64) {
    if data.is_empty() {
        return;
    }
    let touches = (data.len() / CANVAS_NOISE_DIVISOR).max(1);
    let pixel_count = (data.len() / 4).max(1);
    // one disjoint pixel range per touch
    let stride = (pixel_count / touches).max(1);
    for k in 0..touches {
        let px = k * stride + (mix(seed, k as u64) % stride as u64) as usize;
        // skip the alpha channel; flat alpha deltas are trivially detectable
        let channel = (mix(seed, k as u64 ^ 0x0010_0000) % 3) as usize;
        let magnitude = 1 + (mix(seed, k as u64 ^ 0x0020_0000) % CANVAS_NOISE_AMPLITUDE as u64) as i32;
        let delta = if mix(seed, k as u64 ^ 0x0040_0000) & 1 == 1 {
            magnitude
        } else {
            -magnitude
        };
        let idx = px * 4 + channel;
        if idx < data.len() {
            data[idx] = (data[idx] as i32 + delta).clamp(0, 255) as u8;
        }
    }
}

/// Rendering surface decorator applying canvas noise to reads and exports.
pub struct DefendedRenderingSurface {
    inner: Box<dyn RenderingSurface>,
    state: SharedState,
}

impl DefendedRenderingSurface {
    pub fn new(inner: Box<dyn RenderingSurface>, state: SharedState) -> Self {
        Self { inner, state }
    }

    fn noise_seed(&self) -> Option<u64> {
        let mut st = lock_state(&self.state);
        if st.settings.enabled && st.settings.canvas_noise {
            Some(st.canvas_seed())
        } else {
            None
        }
    }
}

impl RenderingSurface for DefendedRenderingSurface {
    fn read_pixels(&self) -> ApiResult<Vec<u8>> {
        let mut pixels = self.inner.read_pixels()?;
        if let Some(seed) = self.noise_seed() {
            perturb_pixels(&mut pixels, seed);
        }
        Ok(pixels)
    }

    fn export_data_url(&self) -> ApiResult<String> {
        match self.noise_seed() {
            // derived export formats must reflect the same noised content
            Some(seed) => {
                let mut pixels = self.inner.read_pixels()?;
                perturb_pixels(&mut pixels, seed);
                Ok(format!("data:image/png;base64,{}", BASE64.encode(&pixels)))
            }
            None => self.inner.export_data_url(),
        }
    }
}
