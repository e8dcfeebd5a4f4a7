//! Sentence segmentation with original-text offsets.
//!
//! Splits narrative text at sentence-terminal punctuation (`.`, `!`, `?`, `…`)
//! that is followed by whitespace. The punctuation stays with the sentence it
//! ends, so `"Wait..."` is one segment. Offsets are character offsets into the
//! original text, which lets boundary reports be mapped back to words.

use std::iter::FusedIterator;

use lectern_core::Segment;

/// Characters that may end a sentence.
const SENTENCE_TERMINALS: [char; 4] = ['.', '!', '?', '…'];

/// Lazily segment `text` into sentences.
///
/// The returned iterator is cheap to clone; a clone restarts from the same
/// position, so a fresh sequence can be produced for every playback run.
#[must_use]
pub const fn segment(text: &str) -> Segments<'_> {
    Segments {
        text,
        byte_pos: 0,
        char_pos: 0,
        next_index: 0,
    }
}

/// Segment `text` and collect every sentence.
#[must_use]
pub fn segment_all(text: &str) -> Vec<Segment> {
    segment(text).collect()
}

/// Iterator over the sentences of a text. See [`segment`].
#[derive(Debug, Clone)]
pub struct Segments<'a> {
    text: &'a str,
    byte_pos: usize,
    char_pos: usize,
    next_index: usize,
}

impl Iterator for Segments<'_> {
    type Item = Segment;

    fn next(&mut self) -> Option<Segment> {
        // Skip the separator(s) left over from the previous sentence.
        let rest = &self.text[self.byte_pos..];
        let body = rest.trim_start();
        let skipped = &rest[..rest.len() - body.len()];
        self.byte_pos += skipped.len();
        self.char_pos += skipped.chars().count();

        if body.is_empty() {
            return None;
        }

        let start_byte = self.byte_pos;
        let start_char = self.char_pos;
        let mut end_byte = self.text.len();
        let mut consumed = 0;

        let mut chars = body.char_indices().peekable();
        while let Some((i, c)) = chars.next() {
            consumed += 1;
            if SENTENCE_TERMINALS.contains(&c)
                && chars.peek().is_some_and(|&(_, next)| next.is_whitespace())
            {
                end_byte = start_byte + i + c.len_utf8();
                break;
            }
        }

        self.byte_pos = end_byte;
        self.char_pos = start_char + consumed;

        // Only the final sentence can carry trailing whitespace.
        let sentence = self.text[start_byte..end_byte].trim_end();
        let segment = Segment {
            index: self.next_index,
            text: sentence.to_string(),
            start_offset: start_char,
            end_offset: start_char + sentence.chars().count(),
        };
        self.next_index += 1;
        Some(segment)
    }
}

impl FusedIterator for Segments<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    /// Extract `[start, end)` by character offsets.
    fn slice_chars(text: &str, start: usize, end: usize) -> String {
        text.chars().skip(start).take(end - start).collect()
    }

    #[test]
    fn splits_on_terminal_punctuation() {
        let text = "Hello world. Stop! Wait... Are you sure?";
        let segments = segment_all(text);

        let texts: Vec<&str> = segments.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["Hello world.", "Stop!", "Wait...", "Are you sure?"]);

        let rebuilt = texts.join(" ");
        assert_eq!(rebuilt, text);

        for (i, seg) in segments.iter().enumerate() {
            assert_eq!(seg.index, i);
            assert_eq!(slice_chars(text, seg.start_offset, seg.end_offset), seg.text);
        }
    }

    #[test]
    fn offsets_are_ordered_and_non_overlapping() {
        let segments = segment_all("One. Two!  Three?\n\nFour");
        for pair in segments.windows(2) {
            assert!(pair[0].end_offset < pair[1].start_offset);
        }
        assert_eq!(segments[1].start_offset, 5);
        assert_eq!(segments[2].start_offset, 11);
        assert_eq!(segments[3].text, "Four");
    }

    #[test]
    fn unicode_ellipsis_ends_a_sentence() {
        let segments = segment_all("Wait… what?");
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].text, "Wait…");
        assert_eq!(segments[0].char_len(), 5);
        assert_eq!(segments[1].start_offset, 6);
    }

    #[test]
    fn offsets_count_characters_not_bytes() {
        let text = "Café déjà vu. Oui!";
        let segments = segment_all(text);
        assert_eq!(segments[1].start_offset, 14);
        assert_eq!(slice_chars(text, segments[1].start_offset, segments[1].end_offset), "Oui!");
    }

    #[test]
    fn punctuation_inside_a_word_does_not_split() {
        let segments = segment_all("Pi is 3.14 roughly. Yes?");
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].text, "Pi is 3.14 roughly.");
    }

    #[test]
    fn text_without_terminal_is_one_segment() {
        let segments = segment_all("  no punctuation here  ");
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].text, "no punctuation here");
        assert_eq!(segments[0].start_offset, 2);
    }

    #[test]
    fn whitespace_only_text_has_no_segments() {
        assert!(segment_all("").is_empty());
        assert!(segment_all(" \n\t ").is_empty());
    }

    #[test]
    fn iterator_is_restartable() {
        let segments = segment("A. B. C.");
        let first: Vec<_> = segments.clone().collect();
        let second: Vec<_> = segments.collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
    }
}
