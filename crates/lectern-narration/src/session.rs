//! Playback session state and word-position tracking.
//!
//! A [`PlaybackSession`] is owned by the narrator task and only ever mutated
//! there; callers receive clones for inspection.

use lectern_core::{PlaybackSnapshot, PlaybackStatus, Segment, UtteranceId};

// ── Word tracking ──────────────────────────────────────────────────

/// Index of the whitespace-delimited word at `char_offset` in `text`.
///
/// An offset at the start of (or inside) word *k* yields *k*; an offset on
/// whitespace after word *k* yields *k + 1*, the word about to be spoken.
#[must_use]
pub fn word_index_at(text: &str, char_offset: usize) -> usize {
    let mut tracker = WordTracker::default();
    tracker.advance(text, char_offset)
}

/// Incremental word counter.
///
/// Boundary reports arrive with non-decreasing offsets, so only the
/// characters since the previous report are scanned. A report that moves
/// backwards triggers a rescan from the start of the text; the returned index
/// never decreases until [`reset`](WordTracker::reset).
#[derive(Debug, Clone, Default)]
pub struct WordTracker {
    char_pos: usize,
    byte_pos: usize,
    words_started: usize,
    in_word: bool,
    highest: Option<usize>,
}

impl WordTracker {
    /// Move to `char_offset` and return the word index there.
    pub fn advance(&mut self, text: &str, char_offset: usize) -> usize {
        if char_offset < self.char_pos {
            let highest = self.highest;
            *self = Self {
                highest,
                ..Self::default()
            };
        }

        for c in text[self.byte_pos..]
            .chars()
            .take(char_offset - self.char_pos)
        {
            let is_word_char = !c.is_whitespace();
            if is_word_char && !self.in_word {
                self.words_started += 1;
            }
            self.in_word = is_word_char;
            self.char_pos += 1;
            self.byte_pos += c.len_utf8();
        }

        let index = self.words_started.saturating_sub(usize::from(self.in_word));
        let index = self.highest.map_or(index, |h| h.max(index));
        self.highest = Some(index);
        index
    }

    /// Forget all progress.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

// ── Session ────────────────────────────────────────────────────────

/// The mutable state of one narration run.
#[derive(Debug, Clone, Default)]
pub struct PlaybackSession {
    status: PlaybackStatus,
    segments: Vec<Segment>,
    current_segment: usize,
    char_offset_cursor: usize,
    word_index: Option<usize>,
    voice_name: String,
    live_utterance: Option<UtteranceId>,
    deferred_end: bool,
    words: WordTracker,
}

impl PlaybackSession {
    pub(crate) fn new(voice_name: String) -> Self {
        Self {
            voice_name,
            ..Self::default()
        }
    }

    pub const fn status(&self) -> PlaybackStatus {
        self.status
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Index of the segment being (or about to be) spoken.
    pub const fn current_segment(&self) -> usize {
        self.current_segment
    }

    /// Character offset of the current segment in the original text.
    pub const fn char_offset_cursor(&self) -> usize {
        self.char_offset_cursor
    }

    pub const fn word_index(&self) -> Option<usize> {
        self.word_index
    }

    pub fn voice_name(&self) -> &str {
        &self.voice_name
    }

    /// The utterance whose reports are still accepted.
    pub const fn live_utterance(&self) -> Option<UtteranceId> {
        self.live_utterance
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            status: self.status,
            word_index: self.word_index,
            voice_name: self.voice_name.clone(),
        }
    }

    // ── Mutation (narrator task only) ──────────────────────────────

    pub(crate) fn set_voice_name(&mut self, name: String) {
        self.voice_name = name;
    }

    pub(crate) const fn set_status(&mut self, status: PlaybackStatus) {
        self.status = status;
    }

    /// Back to idle with every cursor at zero.
    pub(crate) fn reset(&mut self) {
        self.status = PlaybackStatus::Idle;
        self.segments.clear();
        self.current_segment = 0;
        self.char_offset_cursor = 0;
        self.word_index = None;
        self.live_utterance = None;
        self.deferred_end = false;
        self.words.reset();
    }

    /// Start a fresh run over `segments`.
    pub(crate) fn begin(&mut self, segments: Vec<Segment>) {
        self.reset();
        self.segments = segments;
        self.status = PlaybackStatus::Playing;
    }

    pub(crate) fn current(&self) -> Option<&Segment> {
        self.segments.get(self.current_segment)
    }

    pub(crate) fn is_live(&self, id: UtteranceId) -> bool {
        self.live_utterance == Some(id)
    }

    pub(crate) const fn set_live_utterance(&mut self, id: Option<UtteranceId>) {
        self.live_utterance = id;
    }

    /// Remember a completion that arrived while paused.
    ///
    /// The finished utterance stops being live, so its late reports are dropped.
    pub(crate) const fn defer_end(&mut self) {
        self.deferred_end = true;
        self.live_utterance = None;
    }

    pub(crate) const fn take_deferred_end(&mut self) -> bool {
        std::mem::replace(&mut self.deferred_end, false)
    }

    /// Move past the current segment.
    ///
    /// Returns `true` if another segment follows; otherwise the session is
    /// marked [`Done`](PlaybackStatus::Done) and the word index cleared.
    pub(crate) fn finish_unit(&mut self) -> bool {
        self.live_utterance = None;
        let Some(finished) = self.segments.get(self.current_segment) else {
            return false;
        };
        let finished_end = finished.end_offset;

        self.current_segment += 1;
        match self.segments.get(self.current_segment) {
            Some(next) => {
                self.char_offset_cursor = next.start_offset;
                true
            }
            None => {
                // Past the final separator, as if another segment followed.
                self.char_offset_cursor = finished_end + 1;
                self.status = PlaybackStatus::Done;
                self.word_index = None;
                false
            }
        }
    }

    /// Map a boundary `char_index` inside the current unit to a word index
    /// in `text`.
    pub(crate) fn record_boundary(&mut self, text: &str, char_index: usize) -> usize {
        let global = self.char_offset_cursor + char_index;
        let index = self.words.advance(text, global);
        self.word_index = Some(index);
        index
    }
}
