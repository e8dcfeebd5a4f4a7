//! Speech service port: the narrow capability interface over a platform
//! speech-synthesis engine.
//!
//! # Design Rules
//!
//! - The platform engine is global state on most hosts (browser
//!   `speechSynthesis`, SAPI, speech-dispatcher). Adapters wrap it behind
//!   [`SpeechService`] so the narration engine never touches an ambient global.
//! - Progress is reported back through an [`UtteranceReporter`] tagged with the
//!   utterance id. The consumer discards reports whose id is no longer live,
//!   so an adapter may deliver one last callback after `cancel()`.
//! - `pause`, `resume` and `cancel` are global controls, exactly like the
//!   platform engines they wrap.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::SpeechParams;
use crate::ports::catalog::VoiceCatalog;

/// Identifier of a single `speak` call.
pub type UtteranceId = u64;

// ── Errors ───────────────────────────────────────────────────────────────────

/// Errors reported by a speech service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpeechError {
    /// The utterance was removed from the queue by `cancel()`.
    #[error("utterance canceled")]
    Canceled,

    /// The utterance was cut off mid-speech by `cancel()` or another speak.
    #[error("utterance interrupted")]
    Interrupted,

    /// The audio output device is in use.
    #[error("audio output busy")]
    AudioBusy,

    /// The requested voice cannot be used.
    #[error("voice not available: {0}")]
    VoiceUnavailable(String),

    /// The engine failed to synthesize the utterance.
    #[error("speech synthesis failed: {0}")]
    Synthesis(String),

    /// The engine itself is not reachable.
    #[error("speech service unavailable: {0}")]
    Unavailable(String),
}

impl SpeechError {
    /// Map a platform error code (Web Speech API style, e.g. `"interrupted"`,
    /// `"audio-busy"`) onto a [`SpeechError`].
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_lowercase().as_str() {
            "canceled" | "cancelled" => Self::Canceled,
            "interrupted" => Self::Interrupted,
            "audio-busy" => Self::AudioBusy,
            "voice-unavailable" => Self::VoiceUnavailable(code.to_string()),
            "audio-hardware" | "network" | "not-allowed" => Self::Unavailable(code.to_string()),
            _ => Self::Synthesis(code.to_string()),
        }
    }

    /// Whether this error is the expected byproduct of a deliberate
    /// stop/teardown/text change rather than a real failure.
    #[must_use]
    pub const fn is_cancellation(&self) -> bool {
        matches!(self, Self::Canceled | Self::Interrupted)
    }
}

// ── Utterance ────────────────────────────────────────────────────────────────

/// One unit of speech handed to the service.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub id: UtteranceId,
    pub text: String,
    pub params: SpeechParams,
    /// Voice name; `None` selects the platform default.
    pub voice: Option<String>,
}

/// Progress reported by the service for one utterance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UtteranceEvent {
    /// Synthesis reached `char_index` (characters into the utterance text).
    Boundary { char_index: usize },

    /// The utterance finished speaking.
    End,

    /// The utterance failed or was cancelled.
    Error(SpeechError),
}

/// Callback that receives utterance reports.
pub type ReportSink = Arc<dyn Fn(UtteranceId, UtteranceEvent) + Send + Sync>;

/// Handle given to the service with every `speak` call.
///
/// Every report is tagged with the utterance id so the consumer can filter
/// reports that arrive after the utterance stopped being live.
#[derive(Clone)]
pub struct UtteranceReporter {
    id: UtteranceId,
    sink: ReportSink,
}

impl UtteranceReporter {
    pub fn new(id: UtteranceId, sink: ReportSink) -> Self {
        Self { id, sink }
    }

    #[must_use]
    pub const fn id(&self) -> UtteranceId {
        self.id
    }

    /// Report word-level progress inside the utterance.
    pub fn boundary(&self, char_index: usize) {
        (self.sink)(self.id, UtteranceEvent::Boundary { char_index });
    }

    /// Report that the utterance finished.
    pub fn end(&self) {
        (self.sink)(self.id, UtteranceEvent::End);
    }

    /// Report that the utterance failed.
    pub fn error(&self, error: SpeechError) {
        (self.sink)(self.id, UtteranceEvent::Error(error));
    }
}

impl fmt::Debug for UtteranceReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UtteranceReporter")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

// ── Port ─────────────────────────────────────────────────────────────────────

/// Backend-agnostic platform speech engine.
///
/// Implementations must be `Send + Sync` so a single narrator task can hold
/// them as `Arc<dyn SpeechService>`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SpeechService: Send + Sync {
    /// The platform voice list, which may still be loading.
    fn catalog(&self) -> VoiceCatalog;

    /// Start speaking one utterance.
    ///
    /// Returns once the utterance has been handed to the engine; progress is
    /// delivered later through `reporter`. An `Err` means the engine refused
    /// the utterance outright and no report will follow.
    async fn speak(
        &self,
        utterance: Utterance,
        reporter: UtteranceReporter,
    ) -> Result<(), SpeechError>;

    /// Suspend the utterance currently being spoken.
    fn pause(&self);

    /// Continue a suspended utterance.
    fn resume(&self);

    /// Drop the current and all queued utterances.
    fn cancel(&self);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use crate::domain::PlatformVoice;

    #[test]
    fn cancellation_codes_are_expected() {
        assert!(SpeechError::from_code("canceled").is_cancellation());
        assert!(SpeechError::from_code("Interrupted").is_cancellation());
        assert!(!SpeechError::from_code("audio-busy").is_cancellation());
        assert_eq!(
            SpeechError::from_code("synthesis-failed"),
            SpeechError::Synthesis("synthesis-failed".to_string())
        );
        assert_eq!(
            SpeechError::from_code("network"),
            SpeechError::Unavailable("network".to_string())
        );
    }

    #[test]
    fn reporter_tags_events_with_its_id() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink_seen = Arc::clone(&seen);
        let reporter = UtteranceReporter::new(
            7,
            Arc::new(move |id, event| sink_seen.lock().unwrap().push((id, event))),
        );

        reporter.boundary(4);
        reporter.end();
        reporter.error(SpeechError::Canceled);

        let seen = seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![
                (7, UtteranceEvent::Boundary { char_index: 4 }),
                (7, UtteranceEvent::End),
                (7, UtteranceEvent::Error(SpeechError::Canceled)),
            ]
        );
    }

    #[tokio::test]
    async fn mock_service_is_object_safe() {
        let mut mock = MockSpeechService::new();
        mock.expect_catalog()
            .returning(|| VoiceCatalog::fixed(vec![PlatformVoice::new("Karen", "en-AU")]));
        mock.expect_speak().times(1).returning(|utterance, reporter| {
            assert_eq!(utterance.id, reporter.id());
            reporter.end();
            Ok(())
        });

        let service: Arc<dyn SpeechService> = Arc::new(mock);
        assert!(service.catalog().is_ready());

        let ended = Arc::new(Mutex::new(false));
        let flag = Arc::clone(&ended);
        let reporter = UtteranceReporter::new(
            1,
            Arc::new(move |_, event| {
                if event == UtteranceEvent::End {
                    *flag.lock().unwrap() = true;
                }
            }),
        );
        let utterance = Utterance {
            id: 1,
            text: "G'day.".to_string(),
            params: SpeechParams::default(),
            voice: None,
        };

        service.speak(utterance, reporter).await.unwrap();
        assert!(*ended.lock().unwrap());
    }
}
