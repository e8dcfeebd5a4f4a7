//! Platform voices and scored selection candidates.

use serde::{Deserialize, Serialize};

/// A voice as enumerated by the platform speech service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformVoice {
    /// Display name (e.g. `"Google UK English Female"`).
    pub name: String,

    /// BCP 47 language tag (e.g. `"en-GB"`). Some platforms use `_`.
    pub locale: String,
}

impl PlatformVoice {
    pub fn new(name: impl Into<String>, locale: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            locale: locale.into(),
        }
    }
}

/// A platform voice scored against the requested preferences.
///
/// Produced per selection and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceCandidate {
    pub name: String,
    pub locale: String,
    pub score: u32,
}
