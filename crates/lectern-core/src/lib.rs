//! Core domain types and port definitions for the lectern narration engine.
//!
//! This crate has no knowledge of any concrete speech platform. It defines
//! the request and playback types shared by every layer, the
//! [`SpeechService`](ports::SpeechService) capability trait that platform
//! adapters implement, and the engine [`settings`].
#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod ports;
pub mod settings;

// Re-export commonly used types for convenience
pub use domain::{
    Gender, MAX_SPEECH_PARAM, MIN_SPEECH_PARAM, Modulation, NarrationRequest, Pace,
    ParseOptionError, PitchLevel, PlatformVoice, PlaybackSnapshot, PlaybackStatus, Region,
    Segment, SpeechParams, VoiceCandidate,
};
pub use ports::{
    CatalogClosed, ReportSink, SpeechError, SpeechService, Utterance, UtteranceEvent,
    UtteranceId, UtteranceReporter, VoiceCatalog, VoiceCatalogPublisher, voice_catalog,
};
pub use settings::{
    DEFAULT_AUTO_PLAY_SETTLE_MS, DEFAULT_VOICE_LABEL, NarrationSettings, SettingsError,
    validate_settings,
};
