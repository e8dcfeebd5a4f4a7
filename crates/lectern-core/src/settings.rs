//! Settings domain types and validation.
//!
//! Engine-wide tunables that are not part of an individual narration request.
//! These are pure domain types with no infrastructure dependencies.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::{MAX_SPEECH_PARAM, MIN_SPEECH_PARAM};

/// Default delay between auto-play becoming possible and playback starting.
pub const DEFAULT_AUTO_PLAY_SETTLE_MS: u64 = 300;

/// Label shown when no platform voice could be selected.
pub const DEFAULT_VOICE_LABEL: &str = "Default voice";

/// Narration engine settings.
///
/// All fields are optional to support partial configuration files and
/// graceful defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct NarrationSettings {
    /// Delay before an automatic `play()` once voices and text are ready.
    pub auto_play_settle_ms: Option<u64>,

    /// Label surfaced as the voice name when the platform default is used.
    pub default_voice_label: Option<String>,

    /// Lowest rate/pitch handed to the speech service.
    pub min_speech_param: Option<f32>,

    /// Highest rate/pitch handed to the speech service.
    pub max_speech_param: Option<f32>,
}

impl NarrationSettings {
    /// Create settings with sensible defaults.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            auto_play_settle_ms: Some(DEFAULT_AUTO_PLAY_SETTLE_MS),
            default_voice_label: Some(DEFAULT_VOICE_LABEL.to_string()),
            min_speech_param: Some(MIN_SPEECH_PARAM),
            max_speech_param: Some(MAX_SPEECH_PARAM),
        }
    }

    /// Parse settings from a JSON document and validate them.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self =
            serde_json::from_str(json).map_err(|e| SettingsError::Parse(e.to_string()))?;
        validate_settings(&settings)?;
        Ok(settings)
    }

    /// Get the effective auto-play settle delay (with default fallback).
    #[must_use]
    pub const fn effective_auto_play_settle(&self) -> Duration {
        match self.auto_play_settle_ms {
            Some(ms) => Duration::from_millis(ms),
            None => Duration::from_millis(DEFAULT_AUTO_PLAY_SETTLE_MS),
        }
    }

    /// Get the effective default voice label (with default fallback).
    #[must_use]
    pub fn effective_default_voice_label(&self) -> &str {
        self.default_voice_label
            .as_deref()
            .unwrap_or(DEFAULT_VOICE_LABEL)
    }

    /// Get the effective `(min, max)` clamp range for rate and pitch.
    #[must_use]
    pub fn effective_param_range(&self) -> (f32, f32) {
        (
            self.min_speech_param.unwrap_or(MIN_SPEECH_PARAM),
            self.max_speech_param.unwrap_or(MAX_SPEECH_PARAM),
        )
    }
}

/// Settings validation error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SettingsError {
    #[error("Auto-play settle delay must be at most 10000 ms, got {0}")]
    InvalidSettleDelay(u64),

    #[error("Speech parameter range must satisfy 0 < min <= max <= 10, got {min}..{max}")]
    InvalidParamRange { min: f32, max: f32 },

    #[error("Default voice label must not be empty")]
    EmptyVoiceLabel,

    #[error("Failed to parse settings: {0}")]
    Parse(String),
}

/// Validate settings values.
pub fn validate_settings(settings: &NarrationSettings) -> Result<(), SettingsError> {
    if let Some(ms) = settings.auto_play_settle_ms {
        if ms > 10_000 {
            return Err(SettingsError::InvalidSettleDelay(ms));
        }
    }

    let (min, max) = settings.effective_param_range();
    if !(min > 0.0 && min <= max && max <= 10.0) {
        return Err(SettingsError::InvalidParamRange { min, max });
    }

    if let Some(label) = &settings.default_voice_label {
        if label.trim().is_empty() {
            return Err(SettingsError::EmptyVoiceLabel);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = NarrationSettings::with_defaults();
        assert_eq!(settings.auto_play_settle_ms, Some(300));
        assert_eq!(settings.effective_default_voice_label(), "Default voice");
        assert!(validate_settings(&settings).is_ok());
    }

    #[test]
    fn test_effective_values_fall_back_when_unset() {
        let settings = NarrationSettings::default();
        assert_eq!(
            settings.effective_auto_play_settle(),
            Duration::from_millis(DEFAULT_AUTO_PLAY_SETTLE_MS)
        );
        assert_eq!(settings.effective_param_range(), (0.5, 2.0));
    }

    #[test]
    fn test_partial_json() {
        let settings = NarrationSettings::from_json(r#"{"autoPlaySettleMs": 50}"#).unwrap();
        assert_eq!(
            settings.effective_auto_play_settle(),
            Duration::from_millis(50)
        );
        assert_eq!(settings.default_voice_label, None);
    }

    #[test]
    fn test_validate_settle_delay() {
        let settings = NarrationSettings {
            auto_play_settle_ms: Some(60_000),
            ..Default::default()
        };
        assert_eq!(
            validate_settings(&settings),
            Err(SettingsError::InvalidSettleDelay(60_000))
        );
    }

    #[test]
    fn test_validate_param_range() {
        let settings = NarrationSettings {
            min_speech_param: Some(1.5),
            max_speech_param: Some(1.0),
            ..Default::default()
        };
        assert!(matches!(
            validate_settings(&settings),
            Err(SettingsError::InvalidParamRange { .. })
        ));
    }

    #[test]
    fn test_validate_empty_label() {
        let settings = NarrationSettings {
            default_voice_label: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(
            validate_settings(&settings),
            Err(SettingsError::EmptyVoiceLabel)
        );
    }

    #[test]
    fn test_malformed_json() {
        let result = NarrationSettings::from_json("{not json");
        assert!(matches!(result, Err(SettingsError::Parse(_))));
    }
}
