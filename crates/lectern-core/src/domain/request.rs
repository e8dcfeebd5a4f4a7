//! Narration request: the text plus voice/style preferences.
//!
//! The request is supplied by the surrounding application and is immutable
//! once a session starts. Replacing it replaces the session.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a preference string does not name a known option.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}' (expected one of: {expected})")]
pub struct ParseOptionError {
    /// Which option was being parsed (e.g. `"region"`).
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
    /// Space-separated list of accepted values.
    pub expected: &'static str,
}

/// Implements `FromStr` and `Display` over the lowercase wire names.
macro_rules! wire_names {
    ($ty:ident, $kind:literal, { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            /// Lowercase wire name of this option.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = ParseOptionError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($name => Ok(Self::$variant),)+
                    _ => Err(ParseOptionError {
                        kind: $kind,
                        value: s.to_string(),
                        expected: concat!($($name, " "),+).trim_ascii_end(),
                    }),
                }
            }
        }
    };
}

// ── Preference enums ───────────────────────────────────────────────

/// Requested voice gender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    #[default]
    Female,
    Male,
}

wire_names!(Gender, "gender", { Female => "female", Male => "male" });

/// Requested accent region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    #[default]
    Us,
    Uk,
    In,
    Au,
}

wire_names!(Region, "region", { Us => "us", Uk => "uk", In => "in", Au => "au" });

/// Speaking pace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pace {
    Slow,
    #[default]
    Normal,
    Fast,
}

wire_names!(Pace, "pace", { Slow => "slow", Normal => "normal", Fast => "fast" });

impl Pace {
    /// Base speech rate multiplier before per-sentence modulation.
    #[must_use]
    pub const fn base_rate(self) -> f32 {
        match self {
            Self::Slow => 0.8,
            Self::Normal => 1.0,
            Self::Fast => 1.2,
        }
    }
}

/// Voice pitch preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PitchLevel {
    Low,
    #[default]
    Normal,
    High,
}

wire_names!(PitchLevel, "pitch", { Low => "low", Normal => "normal", High => "high" });

impl PitchLevel {
    /// Base pitch multiplier before per-sentence modulation.
    #[must_use]
    pub const fn base_pitch(self) -> f32 {
        match self {
            Self::Low => 0.8,
            Self::Normal => 1.0,
            Self::High => 1.2,
        }
    }
}

// ── Request ────────────────────────────────────────────────────────

/// A request to narrate a block of text.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NarrationRequest {
    /// The narrative text.
    pub text: String,

    /// Preferred voice gender.
    pub gender: Gender,

    /// Preferred accent region.
    pub region: Region,

    /// Speaking pace.
    pub pace: Pace,

    /// Voice pitch.
    pub pitch: PitchLevel,

    /// Start narrating on its own once voices and text are available.
    pub auto_play: bool,
}

impl NarrationRequest {
    /// Create a request for `text` with default preferences.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = gender;
        self
    }

    #[must_use]
    pub const fn with_region(mut self, region: Region) -> Self {
        self.region = region;
        self
    }

    #[must_use]
    pub const fn with_pace(mut self, pace: Pace) -> Self {
        self.pace = pace;
        self
    }

    #[must_use]
    pub const fn with_pitch(mut self, pitch: PitchLevel) -> Self {
        self.pitch = pitch;
        self
    }

    #[must_use]
    pub const fn with_auto_play(mut self, auto_play: bool) -> Self {
        self.auto_play = auto_play;
        self
    }

    /// Whether there is anything to say.
    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_wire_names_case_insensitively() {
        assert_eq!("UK".parse::<Region>().unwrap(), Region::Uk);
        assert_eq!(" male ".parse::<Gender>().unwrap(), Gender::Male);
        assert_eq!("fast".parse::<Pace>().unwrap(), Pace::Fast);
        assert_eq!("low".parse::<PitchLevel>().unwrap(), PitchLevel::Low);
    }

    #[test]
    fn rejects_unknown_option() {
        let err = "fr".parse::<Region>().unwrap_err();
        assert_eq!(err.kind, "region");
        assert_eq!(err.expected, "us uk in au");
        assert!(err.to_string().contains("'fr'"));
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for region in [Region::Us, Region::Uk, Region::In, Region::Au] {
            assert_eq!(region.to_string().parse::<Region>().unwrap(), region);
        }
    }

    #[test]
    fn request_deserializes_from_camel_case_json() {
        let json = r#"{"text":"Hi.","gender":"male","region":"in","autoPlay":true}"#;
        let request: NarrationRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.gender, Gender::Male);
        assert_eq!(request.region, Region::In);
        assert_eq!(request.pace, Pace::Normal);
        assert!(request.auto_play);
    }

    #[test]
    fn whitespace_only_text_has_nothing_to_say() {
        assert!(!NarrationRequest::new("  \n\t").has_text());
        assert!(NarrationRequest::new("Hello.").has_text());
    }

    #[test]
    #[allow(clippy::float_cmp)]
    fn base_parameters_by_preference() {
        assert_eq!(Pace::Normal.base_rate(), 1.0);
        assert!(Pace::Slow.base_rate() < Pace::Fast.base_rate());
        assert!(PitchLevel::Low.base_pitch() < PitchLevel::High.base_pitch());
    }
}
