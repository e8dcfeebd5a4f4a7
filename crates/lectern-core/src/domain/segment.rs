//! Sentence-level speakable units.

use serde::{Deserialize, Serialize};

/// A sentence-level unit of the original text.
///
/// Offsets count characters (Unicode scalar values), not bytes, so they can
/// be handed to UI layers unchanged. `end_offset` is exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    /// Position of this segment in the sequence (0-based).
    pub index: usize,

    /// The segment text, trimmed, terminal punctuation included.
    pub text: String,

    /// Character offset of the first character in the original text.
    pub start_offset: usize,

    /// Character offset one past the last character in the original text.
    pub end_offset: usize,
}

impl Segment {
    /// Length of the segment in characters.
    #[must_use]
    pub const fn char_len(&self) -> usize {
        self.end_offset - self.start_offset
    }
}
