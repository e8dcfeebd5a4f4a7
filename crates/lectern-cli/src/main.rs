//! CLI entry point - the composition root.
//!
//! Wires the console speech adapter into a narrator, then either plays the
//! text to completion or hands control to the interactive prompt.

use std::time::Duration;

use clap::Parser;
use lectern_cli::{
    Cli, CliError, ConsoleSpeech, ConsoleSpeechConfig, console_voices, load_settings,
    resolve_text, run_controls,
};
use lectern_core::PlaybackSnapshot;
use lectern_narration::{NarrationEvent, Narrator, NarratorOptions};
use tokio::sync::{mpsc, watch};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(e.exit_code());
    }
    Ok(())
}

fn init_tracing(verbose: bool) -> anyhow::Result<()> {
    let default_level = if verbose { "debug" } else { "warn" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
}

async fn run(cli: Cli) -> Result<(), CliError> {
    if cli.interactive && cli.text.is_none() && cli.file.is_none() {
        return Err(CliError::Arguments(
            "interactive mode reads controls from stdin; pass the text or --file".to_string(),
        ));
    }

    let settings = load_settings(cli.settings.as_deref())?;
    let text = resolve_text(cli.text.as_deref(), cli.file.as_deref(), std::io::stdin())?;
    let request = cli.narration_request(text);
    let auto_play = request.auto_play;

    let speech = ConsoleSpeech::spawn(ConsoleSpeechConfig {
        words_per_minute: cli.wpm,
        voice_delay: Duration::from_millis(cli.voice_delay_ms),
        voices: console_voices(),
        echo: true,
    });
    let (narrator, events) = Narrator::spawn(
        speech,
        request,
        NarratorOptions {
            settings,
            on_complete: None,
        },
    );

    if cli.json {
        tokio::spawn(print_snapshots(narrator.subscribe()));
    }

    if cli.interactive {
        eprintln!("Controls: play, p (pause), r (resume), s (stop), q (quit)");
        let printer = tokio::spawn(print_events(events));
        let result = run_controls(&narrator, tokio::io::BufReader::new(tokio::io::stdin())).await;
        narrator.shutdown().await?;
        let _ = printer.await;
        result
    } else {
        if !auto_play {
            narrator.play().await?;
        }
        let result = tokio::select! {
            result = wait_for_completion(events) => result,
            _ = tokio::signal::ctrl_c() => {
                eprintln!();
                tracing::info!("Interrupted");
                Ok(())
            }
        };
        narrator.shutdown().await?;
        result
    }
}

/// Drive a non-interactive run until the narration completes or fails.
async fn wait_for_completion(
    mut events: mpsc::UnboundedReceiver<NarrationEvent>,
) -> Result<(), CliError> {
    while let Some(event) = events.recv().await {
        match event {
            NarrationEvent::Completed => return Ok(()),
            NarrationEvent::Error(e) => return Err(e.into()),
            other => report(&other),
        }
    }
    Err(CliError::Narration(
        "narration engine stopped unexpectedly".to_string(),
    ))
}

async fn print_events(mut events: mpsc::UnboundedReceiver<NarrationEvent>) {
    while let Some(event) = events.recv().await {
        report(&event);
    }
}

fn report(event: &NarrationEvent) {
    match event {
        NarrationEvent::VoiceSelected { name, locale } => match locale {
            Some(locale) => eprintln!("[voice: {name} ({locale})]"),
            None => eprintln!("[voice: {name}]"),
        },
        NarrationEvent::StatusChanged(status) => eprintln!("[{}]", status.as_str()),
        NarrationEvent::Error(e) => eprintln!("[error: {e}]"),
        NarrationEvent::SegmentStarted { index, params, .. } => {
            tracing::debug!(index, rate = params.rate, pitch = params.pitch, "Segment started");
        }
        NarrationEvent::WordBoundary { word_index } => {
            tracing::trace!(word_index, "Word boundary");
        }
        NarrationEvent::Completed => {}
    }
}

/// Print every published snapshot as one JSON line on stderr.
async fn print_snapshots(mut status: watch::Receiver<PlaybackSnapshot>) {
    loop {
        let line = serde_json::to_string(&*status.borrow_and_update());
        match line {
            Ok(line) => eprintln!("{line}"),
            Err(e) => tracing::warn!(error = %e, "Failed to serialize status"),
        }
        if status.changed().await.is_err() {
            break;
        }
    }
}
