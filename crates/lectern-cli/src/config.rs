//! Settings and input loading.

use std::io::Read;
use std::path::Path;

use lectern_core::NarrationSettings;

use crate::error::CliError;

/// Load narration settings from `path`, or the defaults when no file is given.
pub fn load_settings(path: Option<&Path>) -> Result<NarrationSettings, CliError> {
    let Some(path) = path else {
        return Ok(NarrationSettings::with_defaults());
    };

    let json = std::fs::read_to_string(path)
        .map_err(|e| CliError::Config(format!("cannot read {}: {e}", path.display())))?;
    let settings = NarrationSettings::from_json(&json)?;
    tracing::debug!(path = %path.display(), ?settings, "Loaded settings");
    Ok(settings)
}

/// Resolve the text to narrate: the argument, else the file, else `stdin`.
pub fn resolve_text(
    text: Option<&str>,
    file: Option<&Path>,
    stdin: impl Read,
) -> Result<String, CliError> {
    let text = match (text, file) {
        (Some(text), _) => text.to_string(),
        (None, Some(path)) => std::fs::read_to_string(path)?,
        (None, None) => {
            let mut buf = String::new();
            let mut stdin = stdin;
            stdin.read_to_string(&mut buf)?;
            buf
        }
    };

    if text.trim().is_empty() {
        return Err(CliError::Arguments("nothing to narrate".to_string()));
    }
    Ok(text)
}
