//! Punctuation-driven prosody heuristics.
//!
//! Each sentence is classified into a [`Cadence`] by its closing punctuation
//! and, for exclamations, its opening word. The cadence maps to a fixed
//! pitch/rate [`Modulation`].

use lectern_core::Modulation;

/// Opening words that make an exclamation urgent.
const INTERJECTIONS: &[&str] = &[
    "wait", "stop", "no", "help", "run", "look", "watch", "listen", "hey", "quick", "hurry",
    "careful", "duck", "go", "now", "yes", "oh", "ah",
];

/// Prosodic shape of a sentence. Variants are listed in match priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cadence {
    /// Ends with `?`: rises and slows slightly.
    Question,
    /// Ends with `!` and opens with an interjection.
    UrgentExclamation,
    /// Ends with `!`.
    Exclamation,
    /// Ends with `...` or `…`: drops and slows.
    TrailingOff,
    Neutral,
}

impl Cadence {
    #[must_use]
    pub const fn modulation(self) -> Modulation {
        match self {
            Self::Question => Modulation::new(0.15, -0.05),
            Self::UrgentExclamation => Modulation::new(0.20, 0.10),
            Self::Exclamation => Modulation::new(0.10, 0.05),
            Self::TrailingOff => Modulation::new(-0.10, -0.15),
            Self::Neutral => Modulation::NEUTRAL,
        }
    }
}

/// Classify a sentence. Only the first matching rule applies.
#[must_use]
pub fn classify(sentence: &str) -> Cadence {
    let sentence = sentence.trim();

    if sentence.ends_with('?') {
        Cadence::Question
    } else if sentence.ends_with('!') {
        if opens_with_interjection(sentence) {
            Cadence::UrgentExclamation
        } else {
            Cadence::Exclamation
        }
    } else if sentence.ends_with("...") || sentence.ends_with('…') {
        Cadence::TrailingOff
    } else {
        Cadence::Neutral
    }
}

/// Pitch/rate adjustment for a sentence.
#[must_use]
pub fn analyze(sentence: &str) -> Modulation {
    classify(sentence).modulation()
}

fn opens_with_interjection(sentence: &str) -> bool {
    let Some(first) = sentence.split_whitespace().next() else {
        return false;
    };
    let word = first
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase();
    INTERJECTIONS.contains(&word.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_rises() {
        assert_eq!(classify("Are you sure?"), Cadence::Question);
        assert_eq!(analyze("Are you sure?"), Modulation::new(0.15, -0.05));
    }

    #[test]
    fn interjection_exclamation_is_urgent() {
        assert_eq!(analyze("Run!"), Modulation::new(0.20, 0.10));
        assert_eq!(classify("Wait, don't go!"), Cadence::UrgentExclamation);
        assert_eq!(classify("\"Help,\" she cried!"), Cadence::UrgentExclamation);
    }

    #[test]
    fn interjection_must_be_the_whole_first_word() {
        assert_eq!(classify("Nobody move!"), Cadence::Exclamation);
        assert_eq!(classify("No!"), Cadence::UrgentExclamation);
    }

    #[test]
    fn plain_exclamation() {
        assert_eq!(analyze("What a day!"), Modulation::new(0.10, 0.05));
    }

    #[test]
    fn ellipsis_trails_off() {
        assert_eq!(classify("And then..."), Cadence::TrailingOff);
        assert_eq!(classify("And then…"), Cadence::TrailingOff);
        assert_eq!(analyze("Wait..."), Modulation::new(-0.10, -0.15));
    }

    #[test]
    fn statement_is_neutral() {
        assert_eq!(analyze("It's raining."), Modulation::NEUTRAL);
        assert_eq!(analyze(""), Modulation::NEUTRAL);
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert_eq!(classify("  Really?  \n"), Cadence::Question);
    }
}
