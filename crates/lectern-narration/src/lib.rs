//! Narration engine: turns a [`NarrationRequest`](lectern_core::NarrationRequest)
//! into a strictly ordered sequence of utterances on a platform
//! [`SpeechService`](lectern_core::SpeechService).
//!
//! - [`segmenter`] splits the text into sentences with character offsets.
//! - [`prosody`] derives a pitch/rate adjustment per sentence.
//! - [`selector`] picks the best platform voice for the requested accent.
//! - [`controller`] runs the [`Narrator`] task that drives playback.
#![deny(unused_crate_dependencies)]

// Used only by the integration tests.
#[cfg(test)]
use {async_trait as _, mockall as _};

pub mod controller;
pub mod error;
pub mod prosody;
pub mod segmenter;
pub mod selector;
pub mod session;

// Re-export key types for convenience
pub use controller::{CompletionCallback, NarrationEvent, Narrator, NarratorOptions};
pub use error::NarrationError;
pub use prosody::{Cadence, analyze, classify};
pub use segmenter::{Segments, segment, segment_all};
pub use selector::select;
pub use session::{PlaybackSession, WordTracker, word_index_at};
