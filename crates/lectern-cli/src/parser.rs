//! Main CLI parser.
//!
//! Narration preferences can come from flags or the environment, so a shell
//! profile can pin a preferred accent without repeating it on every call.

use std::path::PathBuf;

use clap::Parser;
use lectern_core::{Gender, NarrationRequest, Pace, PitchLevel, Region};

/// Command-line interface for the console narrator.
#[derive(Parser, Debug)]
#[command(name = "lectern")]
#[command(about = "Narrate text with punctuation-aware prosody")]
#[command(version)]
pub struct Cli {
    /// Text to narrate. Read from --file or stdin when omitted
    pub text: Option<String>,

    /// Read the text from a file
    #[arg(short = 'f', long = "file", conflicts_with = "text")]
    pub file: Option<PathBuf>,

    /// Preferred voice gender (female, male)
    #[arg(long, env = "LECTERN_GENDER", default_value = "female")]
    pub gender: Gender,

    /// Preferred accent region (us, uk, in, au)
    #[arg(long, env = "LECTERN_REGION", default_value = "us")]
    pub region: Region,

    /// Speaking pace (slow, normal, fast)
    #[arg(long, env = "LECTERN_PACE", default_value = "normal")]
    pub pace: Pace,

    /// Voice pitch (low, normal, high)
    #[arg(long, env = "LECTERN_PITCH", default_value = "normal")]
    pub pitch: PitchLevel,

    /// Start as soon as voices are loaded instead of immediately
    #[arg(long = "auto-play")]
    pub auto_play: bool,

    /// Control playback from stdin (p = pause, r = resume, s = stop, play, q = quit)
    #[arg(short = 'i', long = "interactive")]
    pub interactive: bool,

    /// Speaking speed of the console voice at rate 1.0
    #[arg(long, env = "LECTERN_WPM", default_value_t = 180, value_parser = clap::value_parser!(u32).range(1..))]
    pub wpm: u32,

    /// Simulated delay before the console voice list becomes available
    #[arg(long = "voice-delay-ms", default_value_t = 150)]
    pub voice_delay_ms: u64,

    /// Narration settings file (JSON)
    #[arg(long = "settings", env = "LECTERN_SETTINGS")]
    pub settings: Option<PathBuf>,

    /// Print status snapshots as JSON lines on stderr
    #[arg(long = "json")]
    pub json: bool,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl Cli {
    /// Build the narration request for `text` from the parsed preferences.
    pub fn narration_request(&self, text: String) -> NarrationRequest {
        NarrationRequest::new(text)
            .with_gender(self.gender)
            .with_region(self.region)
            .with_pace(self.pace)
            .with_pitch(self.pitch)
            .with_auto_play(self.auto_play)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parser_builds() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_preferences() {
        let cli = Cli::parse_from([
            "lectern", "--region", "UK", "--gender", "male", "--pace", "fast", "--auto-play",
            "Hello there.",
        ]);
        assert_eq!(cli.text.as_deref(), Some("Hello there."));

        let request = cli.narration_request("Hello there.".to_string());
        assert_eq!(request.region, Region::Uk);
        assert_eq!(request.gender, Gender::Male);
        assert_eq!(request.pace, Pace::Fast);
        assert_eq!(request.pitch, PitchLevel::Normal);
        assert!(request.auto_play);
    }

    #[test]
    fn test_rejects_unknown_region() {
        let err = Cli::try_parse_from(["lectern", "--region", "fr", "Bonjour."]).unwrap_err();
        assert!(err.to_string().contains("unknown region 'fr'"));
    }

    #[test]
    fn test_text_and_file_conflict() {
        assert!(Cli::try_parse_from(["lectern", "--file", "story.txt", "Hello."]).is_err());
    }

    #[test]
    fn test_zero_wpm_rejected() {
        assert!(Cli::try_parse_from(["lectern", "--wpm", "0", "Hello."]).is_err());
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from(["lectern", "-i", "-v", "--settings", "/tmp/lectern.json"]);
        assert!(cli.interactive);
        assert!(cli.verbose);
        assert_eq!(cli.settings, Some(PathBuf::from("/tmp/lectern.json")));
        assert_eq!(cli.text, None);
    }
}
