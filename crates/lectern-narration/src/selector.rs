//! Voice selection. Scores platform voices against region/gender preferences.
//!
//! | Signal | Points |
//! |---|---|
//! | Locale matches the region's n-th preferred locale | `10 − 3n` |
//! | Locale is English | 2 |
//! | Display name contains a keyword for the requested gender | 5 |
//! | Display name names a high-quality vendor | 3 |
//!
//! The highest total wins; on a tie the earlier catalog entry is kept.

use lectern_core::{Gender, PlatformVoice, Region, VoiceCandidate};

/// Vendors whose voices are noticeably better than stock system voices.
const HIGH_QUALITY_VENDORS: &[&str] = &["google", "microsoft", "apple", "amazon", "siri"];

const FEMALE_KEYWORDS: &[&str] = &[
    "female", "woman", "samantha", "allison", "ava", "susan", "zira", "victoria", "kate", "serena",
    "hazel", "libby", "sonia", "fiona", "moira", "tessa", "veena", "heera", "neerja", "kalpana",
    "swara", "karen", "catherine", "natasha", "matilda",
];

const MALE_KEYWORDS: &[&str] = &[
    "male", "man", "alex", "fred", "david", "guy", "mark", "tom", "daniel", "george", "oliver",
    "arthur", "ryan", "rishi", "ravi", "prabhat", "hemant", "lee", "william", "james", "gordon",
];

/// Locales tried for a region, most preferred first.
#[must_use]
pub const fn locale_priorities(region: Region) -> &'static [&'static str] {
    match region {
        Region::Us => &["en-us"],
        Region::Uk => &["en-gb", "en-us"],
        Region::In => &["en-in", "hi-in", "en-us"],
        Region::Au => &["en-au", "en-gb", "en-us"],
    }
}

const fn gender_keywords(gender: Gender) -> &'static [&'static str] {
    match gender {
        Gender::Female => FEMALE_KEYWORDS,
        Gender::Male => MALE_KEYWORDS,
    }
}

/// Score a single voice for the requested preferences.
#[must_use]
pub fn score(voice: &PlatformVoice, region: Region, gender: Gender) -> u32 {
    let locale = voice.locale.trim().replace('_', "-").to_ascii_lowercase();
    let mut total = 0;

    if let Some(rank) = locale_priorities(region)
        .iter()
        .position(|preferred| locale.starts_with(preferred))
    {
        #[allow(clippy::cast_possible_truncation)]
        let rank = rank as u32;
        total += 10u32.saturating_sub(3 * rank);
    }

    if locale.starts_with("en") {
        total += 2;
    }

    // Whole-word matching keeps "male" from matching "Female".
    let name = voice.name.to_lowercase();
    let words: Vec<&str> = name
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    if words.iter().any(|w| gender_keywords(gender).contains(w)) {
        total += 5;
    }

    if words.iter().any(|w| HIGH_QUALITY_VENDORS.contains(w)) {
        total += 3;
    }

    total
}

/// Pick the best voice from `catalog`, or `None` if the catalog is empty.
#[must_use]
pub fn select(region: Region, gender: Gender, catalog: &[PlatformVoice]) -> Option<VoiceCandidate> {
    let mut best: Option<VoiceCandidate> = None;

    for voice in catalog {
        let points = score(voice, region, gender);
        if best.as_ref().is_none_or(|b| points > b.score) {
            best = Some(VoiceCandidate {
                name: voice.name.clone(),
                locale: voice.locale.clone(),
                score: points,
            });
        }
    }

    if let Some(ref choice) = best {
        tracing::debug!(
            voice = %choice.name,
            locale = %choice.locale,
            score = choice.score,
            %region,
            %gender,
            "Selected voice"
        );
    }

    best
}
