//! Domain types for narration requests, segments, voices and playback.

mod modulation;
mod playback;
mod request;
mod segment;
mod voice;

pub use modulation::{MAX_SPEECH_PARAM, MIN_SPEECH_PARAM, Modulation, SpeechParams};
pub use playback::{PlaybackSnapshot, PlaybackStatus};
pub use request::{Gender, NarrationRequest, Pace, ParseOptionError, PitchLevel, Region};
pub use segment::Segment;
pub use voice::{PlatformVoice, VoiceCandidate};
