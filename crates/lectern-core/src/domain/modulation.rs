//! Per-sentence pitch/rate adjustment.

use serde::{Deserialize, Serialize};

/// Lowest pitch/rate multiplier speech engines reliably accept.
pub const MIN_SPEECH_PARAM: f32 = 0.5;

/// Highest pitch/rate multiplier speech engines reliably accept.
pub const MAX_SPEECH_PARAM: f32 = 2.0;

/// A pitch/rate delta applied on top of the base parameters of a request.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Modulation {
    pub pitch_delta: f32,
    pub rate_delta: f32,
}

impl Modulation {
    /// No adjustment.
    pub const NEUTRAL: Self = Self::new(0.0, 0.0);

    #[must_use]
    pub const fn new(pitch_delta: f32, rate_delta: f32) -> Self {
        Self {
            pitch_delta,
            rate_delta,
        }
    }

    /// Apply this modulation to base parameters, clamping the result into
    /// `[min, max]`.
    #[must_use]
    pub fn apply(self, base_rate: f32, base_pitch: f32, min: f32, max: f32) -> SpeechParams {
        SpeechParams {
            rate: (base_rate + self.rate_delta).clamp(min, max),
            pitch: (base_pitch + self.pitch_delta).clamp(min, max),
        }
    }
}

/// Final rate and pitch handed to the speech service for one utterance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeechParams {
    pub rate: f32,
    pub pitch: f32,
}

impl Default for SpeechParams {
    fn default() -> Self {
        Self {
            rate: 1.0,
            pitch: 1.0,
        }
    }
}
