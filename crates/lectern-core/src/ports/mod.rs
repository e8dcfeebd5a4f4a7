//! Port definitions (trait abstractions) for external systems.
//!
//! The narration engine depends only on these traits; platform adapters
//! (console, browser bridge, server-side TTS) implement them and are injected
//! at the composition root.

pub mod catalog;
pub mod speech;

pub use catalog::{CatalogClosed, VoiceCatalog, VoiceCatalogPublisher, voice_catalog};
pub use speech::{
    ReportSink, SpeechError, SpeechService, Utterance, UtteranceEvent, UtteranceId,
    UtteranceReporter,
};
