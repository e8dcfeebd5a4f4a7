//! Narration engine error types.

use lectern_core::SpeechError;

/// Errors surfaced by the narration engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NarrationError {
    /// The narrator task has shut down; no further commands are accepted.
    #[error("Narration engine has stopped")]
    EngineStopped,

    /// The speech service failed while speaking a segment.
    #[error("Speech failed on segment {segment}: {source}")]
    Synthesis {
        segment: usize,
        #[source]
        source: SpeechError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthesis_error_names_the_segment() {
        let err = NarrationError::Synthesis {
            segment: 2,
            source: SpeechError::AudioBusy,
        };
        assert_eq!(err.to_string(), "Speech failed on segment 2: audio output busy");
    }
}
