//! Console front end for the lectern narration engine.
//!
//! Wires the [`ConsoleSpeech`] adapter into a
//! [`Narrator`](lectern_narration::Narrator) and exposes the pieces the
//! `lectern` binary is built from.
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Used by the binary only.
use anyhow as _;
use serde_json as _;
use tracing_subscriber as _;

pub mod config;
pub mod console_speech;
pub mod error;
pub mod interactive;
pub mod parser;

// Re-export primary types for convenient access
pub use config::{load_settings, resolve_text};
pub use console_speech::{ConsoleSpeech, ConsoleSpeechConfig, console_voices};
pub use error::CliError;
pub use interactive::{Control, run_controls};
pub use parser::Cli;
