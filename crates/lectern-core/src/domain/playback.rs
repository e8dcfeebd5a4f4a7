//! Playback status as seen by callers.

use serde::{Deserialize, Serialize};

/// Current state of a narration session.
///
/// ```text
///   Idle → Playing ⇄ Paused
///            │        │
///            ▼        ▼
///          Done      Idle (stop)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackStatus {
    /// Nothing in flight. Initial state, and the state after `stop()` or a
    /// synthesis failure.
    #[default]
    Idle,

    /// A unit is being spoken.
    Playing,

    /// The in-flight unit is suspended.
    Paused,

    /// Every segment was spoken. Terminal until the next `play()`.
    Done,
}

impl PlaybackStatus {
    /// Whether a unit is in flight (playing or suspended).
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Playing | Self::Paused)
    }

    /// Lowercase wire name, matching the serialized form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Playing => "playing",
            Self::Paused => "paused",
            Self::Done => "done",
        }
    }
}

/// Read-only live status of a narrator, suitable for UI binding.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackSnapshot {
    pub status: PlaybackStatus,

    /// Index of the word currently being spoken, `None` when unknown.
    pub word_index: Option<usize>,

    /// Name of the selected voice, or the generic default label.
    pub voice_name: String,
}
