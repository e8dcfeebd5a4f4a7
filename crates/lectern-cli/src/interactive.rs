//! Interactive playback control over line-based input.

use lectern_narration::Narrator;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::error::CliError;

/// A playback control typed by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Play,
    Pause,
    Resume,
    Stop,
    Quit,
}

impl Control {
    /// Parse one input line. Unknown input yields `None`.
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_ascii_lowercase().as_str() {
            "play" => Some(Self::Play),
            "p" | "pause" => Some(Self::Pause),
            "r" | "resume" => Some(Self::Resume),
            "s" | "stop" => Some(Self::Stop),
            "q" | "quit" | "exit" => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Apply controls read from `input` until `q` or end of input.
pub async fn run_controls<R>(narrator: &Narrator, input: R) -> Result<(), CliError>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let Some(control) = Control::parse(&line) else {
            eprintln!("Unknown command '{}'. Use: play, p, r, s, q", line.trim());
            continue;
        };

        tracing::debug!(?control, "Interactive control");
        match control {
            Control::Play => narrator.play().await?,
            Control::Pause => narrator.pause().await?,
            Control::Resume => narrator.resume().await?,
            Control::Stop => narrator.stop().await?,
            Control::Quit => break,
        }
    }
    Ok(())
}
