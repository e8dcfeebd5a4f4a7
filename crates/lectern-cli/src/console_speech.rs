//! Console speech service: a [`SpeechService`] that "speaks" by printing.
//!
//! Each utterance runs on its own task that prints one word per tick, where a
//! tick is derived from the configured words-per-minute and the utterance
//! rate. The voice list is published after a short delay, mimicking platforms
//! that enumerate voices asynchronously.

use std::io::Write;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use lectern_core::{
    PlatformVoice, SpeechError, SpeechService, Utterance, UtteranceReporter, VoiceCatalog,
    voice_catalog,
};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// Voices offered by the console engine.
pub fn console_voices() -> Vec<PlatformVoice> {
    [
        ("Samantha", "en-US"),
        ("Alex", "en-US"),
        ("Serena", "en-GB"),
        ("Daniel", "en-GB"),
        ("Veena", "en-IN"),
        ("Rishi", "en-IN"),
        ("Karen", "en-AU"),
        ("Lee", "en-AU"),
    ]
    .into_iter()
    .map(|(name, locale)| PlatformVoice::new(name, locale))
    .collect()
}

/// Configuration for [`ConsoleSpeech`].
#[derive(Debug, Clone)]
pub struct ConsoleSpeechConfig {
    /// Words per minute at rate 1.0.
    pub words_per_minute: u32,
    /// Delay before the voice list is published.
    pub voice_delay: Duration,
    pub voices: Vec<PlatformVoice>,
    /// Print spoken words to stdout.
    pub echo: bool,
}

impl Default for ConsoleSpeechConfig {
    fn default() -> Self {
        Self {
            words_per_minute: 180,
            voice_delay: Duration::from_millis(150),
            voices: console_voices(),
            echo: true,
        }
    }
}

/// Simulated speech engine for terminals.
pub struct ConsoleSpeech {
    catalog: VoiceCatalog,
    words_per_minute: u32,
    echo: bool,
    paused: watch::Sender<bool>,
    /// Replaced on every `cancel()` so later utterances start uncancelled.
    cancel: Mutex<CancellationToken>,
}

impl ConsoleSpeech {
    /// Create the engine and schedule publication of its voice list.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(config: ConsoleSpeechConfig) -> Arc<Self> {
        let (publisher, catalog) = voice_catalog();
        let voices = config.voices;
        let delay = config.voice_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            publisher.publish(voices);
        });

        let (paused, _) = watch::channel(false);
        Arc::new(Self {
            catalog,
            words_per_minute: config.words_per_minute.max(1),
            echo: config.echo,
            paused,
            cancel: Mutex::new(CancellationToken::new()),
        })
    }

    fn word_duration(&self, rate: f32) -> Duration {
        let words_per_second = f64::from(self.words_per_minute) * f64::from(rate.max(0.1)) / 60.0;
        Duration::from_secs_f64(1.0 / words_per_second)
    }

    fn current_token(&self) -> CancellationToken {
        self.cancel
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Whitespace-delimited words with their character offsets.
fn words_with_offsets(text: &str) -> Vec<(usize, String)> {
    let mut words = Vec::new();
    let mut current: Option<(usize, String)> = None;

    for (i, c) in text.chars().enumerate() {
        if c.is_whitespace() {
            words.extend(current.take());
        } else {
            current.get_or_insert_with(|| (i, String::new())).1.push(c);
        }
    }
    words.extend(current);
    words
}

fn echo_word(word: &str) {
    let mut stdout = std::io::stdout().lock();
    let _ = write!(stdout, "{word} ");
    let _ = stdout.flush();
}

#[async_trait]
impl SpeechService for ConsoleSpeech {
    fn catalog(&self) -> VoiceCatalog {
        self.catalog.clone()
    }

    async fn speak(
        &self,
        utterance: Utterance,
        reporter: UtteranceReporter,
    ) -> Result<(), SpeechError> {
        let token = self.current_token();
        let mut paused = self.paused.subscribe();
        let tick = self.word_duration(utterance.params.rate);
        let words = words_with_offsets(&utterance.text);
        let echo = self.echo;

        tracing::trace!(
            utterance = utterance.id,
            voice = ?utterance.voice,
            words = words.len(),
            ?tick,
            "Console speaking"
        );

        tokio::spawn(async move {
            for (char_index, word) in words {
                let resumed = tokio::select! {
                    () = token.cancelled() => false,
                    unpaused = async { paused.wait_for(|p| !*p).await.is_ok() } => unpaused,
                };
                if !resumed {
                    reporter.error(SpeechError::Canceled);
                    return;
                }

                reporter.boundary(char_index);
                if echo {
                    echo_word(&word);
                }

                tokio::select! {
                    () = token.cancelled() => {
                        reporter.error(SpeechError::Canceled);
                        return;
                    }
                    () = tokio::time::sleep(tick) => {}
                }
            }
            if echo {
                println!();
            }
            reporter.end();
        });

        Ok(())
    }

    fn pause(&self) {
        self.paused.send_replace(true);
    }

    fn resume(&self) {
        self.paused.send_replace(false);
    }

    fn cancel(&self) {
        let mut token = self.cancel.lock().unwrap_or_else(PoisonError::into_inner);
        token.cancel();
        *token = CancellationToken::new();
        self.paused.send_replace(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lectern_core::{SpeechParams, UtteranceEvent};
    use tokio_test::{assert_pending, assert_ready_eq, task};

    type Events = Arc<Mutex<Vec<UtteranceEvent>>>;

    fn quiet(words_per_minute: u32) -> Arc<ConsoleSpeech> {
        ConsoleSpeech::spawn(ConsoleSpeechConfig {
            words_per_minute,
            voice_delay: Duration::from_millis(100),
            voices: console_voices(),
            echo: false,
        })
    }

    fn recorder(id: u64) -> (UtteranceReporter, Events) {
        let events: Events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let reporter = UtteranceReporter::new(
            id,
            Arc::new(move |_, event| sink.lock().unwrap().push(event)),
        );
        (reporter, events)
    }

    fn utterance(id: u64, text: &str) -> Utterance {
        Utterance {
            id,
            text: text.to_string(),
            params: SpeechParams::default(),
            voice: None,
        }
    }

    async fn advance(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    #[test]
    fn test_words_with_offsets() {
        assert_eq!(
            words_with_offsets("  Wait…  what? "),
            vec![(2, "Wait…".to_string()), (9, "what?".to_string())]
        );
        assert!(words_with_offsets("   ").is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_voices_publish_after_delay() {
        let speech = quiet(60);
        let mut catalog = speech.catalog();
        let mut ready = task::spawn(async move { catalog.ready().await });

        assert_pending!(ready.poll());
        advance(150).await;
        assert!(ready.is_woken());
        assert_ready_eq!(ready.poll(), Ok(console_voices()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_speaks_one_word_per_tick() {
        let speech = quiet(60);
        let (reporter, events) = recorder(1);
        speech.speak(utterance(1, "Hi there."), reporter).await.unwrap();

        advance(500).await;
        assert_eq!(
            *events.lock().unwrap(),
            vec![UtteranceEvent::Boundary { char_index: 0 }]
        );

        advance(2000).await;
        assert_eq!(
            *events.lock().unwrap(),
            vec![
                UtteranceEvent::Boundary { char_index: 0 },
                UtteranceEvent::Boundary { char_index: 3 },
                UtteranceEvent::End,
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_scales_tick() {
        let speech = quiet(60);
        assert_eq!(speech.word_duration(1.0), Duration::from_secs(1));
        assert_eq!(speech.word_duration(2.0), Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_reports_canceled() {
        let speech = quiet(60);
        let (reporter, events) = recorder(1);
        speech
            .speak(utterance(1, "One two three."), reporter)
            .await
            .unwrap();

        advance(500).await;
        speech.cancel();
        advance(100).await;
        assert_eq!(
            *events.lock().unwrap(),
            vec![
                UtteranceEvent::Boundary { char_index: 0 },
                UtteranceEvent::Error(SpeechError::Canceled),
            ]
        );

        // A fresh utterance is not affected by the earlier cancel.
        let (reporter, events) = recorder(2);
        speech.speak(utterance(2, "Again."), reporter).await.unwrap();
        advance(1500).await;
        assert_eq!(events.lock().unwrap().last(), Some(&UtteranceEvent::End));
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_holds_the_next_word() {
        let speech = quiet(60);
        let (reporter, events) = recorder(1);
        speech
            .speak(utterance(1, "One two three."), reporter)
            .await
            .unwrap();

        advance(500).await;
        speech.pause();
        advance(5000).await;
        assert_eq!(events.lock().unwrap().len(), 1);

        speech.resume();
        advance(100).await;
        assert_eq!(
            events.lock().unwrap().last(),
            Some(&UtteranceEvent::Boundary { char_index: 4 })
        );
    }
}
