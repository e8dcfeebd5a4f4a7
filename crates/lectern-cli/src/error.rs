//! CLI-specific error types and exit code mapping.

use lectern_core::SettingsError;
use lectern_narration::NarrationError;
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Argument or input error.
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// IO error (file not found, permission denied, etc.).
    #[error("IO error: {0}")]
    Io(String),

    /// Settings file could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Narration failed.
    #[error("Narration error: {0}")]
    Narration(String),
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow Unix conventions:
    /// - 0: Success
    /// - 1: General error
    /// - 2: Misuse of shell command (invalid arguments)
    /// - 64-78: Reserved for specific error categories (see sysexits.h)
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Narration(_) => 1,
            CliError::Arguments(_) => 2, // EX_USAGE
            CliError::Io(_) => 74,       // EX_IOERR
            CliError::Config(_) => 78,   // EX_CONFIG
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io(err.to_string())
    }
}

impl From<SettingsError> for CliError {
    fn from(err: SettingsError) -> Self {
        CliError::Config(err.to_string())
    }
}

impl From<NarrationError> for CliError {
    fn from(err: NarrationError) -> Self {
        CliError::Narration(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lectern_core::SpeechError;

    #[test]
    fn test_exit_codes() {
        assert_eq!(CliError::Arguments("x".into()).exit_code(), 2);
        assert_eq!(CliError::Io("x".into()).exit_code(), 74);
        assert_eq!(CliError::Config("x".into()).exit_code(), 78);
        assert_eq!(CliError::Narration("x".into()).exit_code(), 1);
    }

    #[test]
    fn test_from_settings_error() {
        let err: CliError = SettingsError::EmptyVoiceLabel.into();
        assert!(matches!(err, CliError::Config(_)));
        assert_eq!(err.exit_code(), 78);
    }

    #[test]
    fn test_from_narration_error() {
        let err: CliError = NarrationError::Synthesis {
            segment: 0,
            source: SpeechError::AudioBusy,
        }
        .into();
        assert!(matches!(err, CliError::Narration(ref msg) if msg.contains("segment 0")));
    }
}
