//! Playback controller: the narrator task and its handle.
//!
//! All playback state lives in a single tokio task that processes typed
//! [`Command`]s one at a time. Control calls from the [`Narrator`] handle and
//! progress reports from the speech service travel through the same channel,
//! so they are applied in the order they were sent.
//!
//! ```text
//!   Idle ──play──▶ Playing ──last unit ends──▶ Done
//!    ▲              │   ▲                        │
//!    │           pause resume/play               │
//!    │              ▼   │                        │
//!    └───stop────── Paused                       │
//!    ▲                                           │
//!    └────────stop / text change ◀───────────────┘
//! ```
//!
//! Every utterance carries an id. Once an utterance stops being live (stop,
//! text change, fresh play) any late report tagged with its id is dropped.

use std::fmt;
use std::sync::Arc;

use lectern_core::{
    NarrationRequest, NarrationSettings, PlatformVoice, PlaybackSnapshot, PlaybackStatus,
    ReportSink, SpeechError, SpeechParams, SpeechService, Utterance, UtteranceEvent, UtteranceId,
    UtteranceReporter, VoiceCandidate,
};
use tokio::sync::{mpsc, oneshot, watch};
use tokio_util::sync::CancellationToken;

use crate::error::NarrationError;
use crate::session::PlaybackSession;
use crate::{prosody, segmenter, selector};

/// Called once each time a run plays through to the end.
pub type CompletionCallback = Arc<dyn Fn() + Send + Sync>;

// ── Options ────────────────────────────────────────────────────────

/// Construction options for a [`Narrator`].
#[derive(Clone, Default)]
pub struct NarratorOptions {
    pub settings: NarrationSettings,
    pub on_complete: Option<CompletionCallback>,
}

impl fmt::Debug for NarratorOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NarratorOptions")
            .field("settings", &self.settings)
            .field("on_complete", &self.on_complete.is_some())
            .finish()
    }
}

// ── Events ─────────────────────────────────────────────────────────

/// Events emitted by the narrator to the UI / application layer.
#[derive(Debug, Clone, PartialEq)]
pub enum NarrationEvent {
    /// Playback status changed.
    StatusChanged(PlaybackStatus),

    /// A different voice was chosen. `locale` is `None` for the platform
    /// default voice.
    VoiceSelected {
        name: String,
        locale: Option<String>,
    },

    /// A segment was handed to the speech service.
    SegmentStarted {
        index: usize,
        text: String,
        params: SpeechParams,
    },

    /// The word being spoken moved.
    WordBoundary { word_index: usize },

    /// The last segment finished.
    Completed,

    /// Speaking failed; playback is back to idle.
    Error(NarrationError),
}

// ── Commands ───────────────────────────────────────────────────────

/// New request content for [`Command::Replace`].
enum RequestUpdate {
    Text(String),
    Whole(NarrationRequest),
}

/// A command sent to the narrator task.
enum Command {
    /// Resume if paused, otherwise start from the first segment.
    Play { reply: oneshot::Sender<()> },

    Pause { reply: oneshot::Sender<()> },

    /// Resume a paused run; ignored in any other state.
    Resume { reply: oneshot::Sender<()> },

    /// Cancel speech and return to idle.
    Stop { reply: oneshot::Sender<()> },

    /// Swap the request, cancelling the current run.
    Replace {
        update: RequestUpdate,
        reply: oneshot::Sender<()>,
    },

    /// Copy of the current session.
    Snapshot {
        reply: oneshot::Sender<PlaybackSession>,
    },

    /// Progress report from the speech service.
    Utterance {
        id: UtteranceId,
        event: UtteranceEvent,
    },

    /// The voice catalog became non-empty.
    VoicesReady(Vec<PlatformVoice>),

    /// Settle delay elapsed for the request generation `epoch`.
    AutoPlay { epoch: u64 },

    /// Cancel everything and exit.
    Shutdown { reply: Option<oneshot::Sender<()>> },
}

// ── Handle ─────────────────────────────────────────────────────────

/// Handle to a running narrator task.
///
/// Control methods wait until the task has applied the command. Once the task
/// is gone they return [`NarrationError::EngineStopped`]. Dropping the handle
/// shuts the task down.
pub struct Narrator {
    cmd_tx: mpsc::UnboundedSender<Command>,
    status_rx: watch::Receiver<PlaybackSnapshot>,
}

impl Narrator {
    /// Spawn the narrator task for `request`.
    ///
    /// Must be called from within a tokio runtime. Returns the handle and the
    /// stream of [`NarrationEvent`]s.
    pub fn spawn(
        service: Arc<dyn SpeechService>,
        request: NarrationRequest,
        options: NarratorOptions,
    ) -> (Self, mpsc::UnboundedReceiver<NarrationEvent>) {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let session = PlaybackSession::new(
            options
                .settings
                .effective_default_voice_label()
                .to_string(),
        );
        let (status_tx, status_rx) = watch::channel(session.snapshot());

        let sink: ReportSink = {
            let tx = cmd_tx.clone();
            Arc::new(move |id, event| {
                let _ = tx.send(Command::Utterance { id, event });
            })
        };

        let actor = NarratorTask {
            service,
            request,
            settings: options.settings,
            on_complete: options.on_complete,
            session,
            voice: None,
            voices_ready: false,
            next_utterance: 0,
            epoch: 0,
            auto_play_latched: false,
            last_status: PlaybackStatus::Idle,
            cmd_tx: cmd_tx.clone(),
            sink,
            status_tx,
            events: event_tx,
            cancel: CancellationToken::new(),
        };

        tracing::info!(
            auto_play = actor.request.auto_play,
            region = %actor.request.region,
            gender = %actor.request.gender,
            "Starting narrator"
        );
        actor.spawn_catalog_watcher();
        tokio::spawn(actor.run(cmd_rx));

        (Self { cmd_tx, status_rx }, event_rx)
    }

    /// Resume if paused, otherwise start again from the first segment.
    pub async fn play(&self) -> Result<(), NarrationError> {
        self.send_and_recv(|reply| Command::Play { reply }).await
    }

    /// Suspend speech. Only meaningful while playing.
    pub async fn pause(&self) -> Result<(), NarrationError> {
        self.send_and_recv(|reply| Command::Pause { reply }).await
    }

    /// Continue after [`pause`](Self::pause). Only meaningful while paused.
    pub async fn resume(&self) -> Result<(), NarrationError> {
        self.send_and_recv(|reply| Command::Resume { reply }).await
    }

    /// Cancel speech and reset to idle.
    pub async fn stop(&self) -> Result<(), NarrationError> {
        self.send_and_recv(|reply| Command::Stop { reply }).await
    }

    /// Replace the text, keeping the other preferences.
    pub async fn set_text(&self, text: impl Into<String>) -> Result<(), NarrationError> {
        let update = RequestUpdate::Text(text.into());
        self.send_and_recv(|reply| Command::Replace { update, reply })
            .await
    }

    /// Replace the whole request.
    pub async fn replace_request(&self, request: NarrationRequest) -> Result<(), NarrationError> {
        let update = RequestUpdate::Whole(request);
        self.send_and_recv(|reply| Command::Replace { update, reply })
            .await
    }

    /// Live status, ordered after every command and report sent before it.
    pub async fn snapshot(&self) -> Result<PlaybackSnapshot, NarrationError> {
        Ok(self.session().await?.snapshot())
    }

    /// Full copy of the playback session.
    pub async fn session(&self) -> Result<PlaybackSession, NarrationError> {
        self.send_and_recv(|reply| Command::Snapshot { reply })
            .await
    }

    /// Most recently published status, without a round trip.
    pub fn status(&self) -> PlaybackSnapshot {
        self.status_rx.borrow().clone()
    }

    /// Watch the published status.
    pub fn subscribe(&self) -> watch::Receiver<PlaybackSnapshot> {
        self.status_rx.clone()
    }

    /// Cancel any speech and stop the narrator task.
    ///
    /// No events or completion callbacks are delivered afterwards.
    pub async fn shutdown(&self) -> Result<(), NarrationError> {
        self.send_and_recv(|reply| Command::Shutdown { reply: Some(reply) })
            .await
    }

    /// Send a command and wait for the task to acknowledge it.
    async fn send_and_recv<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T, NarrationError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(build(tx))
            .map_err(|_| NarrationError::EngineStopped)?;
        rx.await.map_err(|_| NarrationError::EngineStopped)
    }
}

impl Drop for Narrator {
    fn drop(&mut self) {
        let _ = self.cmd_tx.send(Command::Shutdown { reply: None });
    }
}

impl fmt::Debug for Narrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Narrator")
            .field("status", &*self.status_rx.borrow())
            .finish_non_exhaustive()
    }
}

// ── Narrator task ──────────────────────────────────────────────────

struct NarratorTask {
    service: Arc<dyn SpeechService>,
    request: NarrationRequest,
    settings: NarrationSettings,
    on_complete: Option<CompletionCallback>,

    session: PlaybackSession,
    /// `None` means the platform default voice.
    voice: Option<VoiceCandidate>,
    voices_ready: bool,
    next_utterance: UtteranceId,

    /// Bumped on every request change and manual control; stale auto-play
    /// timers carry an old one.
    epoch: u64,
    auto_play_latched: bool,
    last_status: PlaybackStatus,

    cmd_tx: mpsc::UnboundedSender<Command>,
    sink: ReportSink,
    status_tx: watch::Sender<PlaybackSnapshot>,
    events: mpsc::UnboundedSender<NarrationEvent>,
    /// Cancels helper tasks on shutdown.
    cancel: CancellationToken,
}

impl NarratorTask {
    async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<Command>) {
        while let Some(cmd) = cmd_rx.recv().await {
            match cmd {
                Command::Play { reply } => {
                    self.play().await;
                    let _ = reply.send(());
                }
                Command::Pause { reply } => {
                    self.pause();
                    let _ = reply.send(());
                }
                Command::Resume { reply } => {
                    self.resume().await;
                    let _ = reply.send(());
                }
                Command::Stop { reply } => {
                    self.stop();
                    let _ = reply.send(());
                }
                Command::Replace { update, reply } => {
                    self.replace(update);
                    let _ = reply.send(());
                }
                Command::Snapshot { reply } => {
                    let _ = reply.send(self.session.clone());
                }
                Command::Utterance { id, event } => self.on_utterance(id, event).await,
                Command::VoicesReady(voices) => self.on_voices_ready(&voices),
                Command::AutoPlay { epoch } => self.on_auto_play(epoch).await,
                Command::Shutdown { reply } => {
                    self.teardown();
                    if let Some(reply) = reply {
                        let _ = reply.send(());
                    }
                    break;
                }
            }
        }
        tracing::debug!("Narrator task exited");
    }

    // ── Controls ───────────────────────────────────────────────────

    async fn play(&mut self) {
        self.disarm_auto_play();
        if self.session.status() == PlaybackStatus::Paused {
            self.resume().await;
        } else {
            self.start_fresh().await;
        }
    }

    async fn start_fresh(&mut self) {
        if self.session.live_utterance().is_some() {
            self.service.cancel();
        }

        let segments = segmenter::segment_all(&self.request.text);
        if segments.is_empty() {
            tracing::debug!("Nothing to narrate");
            self.session.reset();
            self.publish();
            return;
        }

        let voices = self.service.catalog().snapshot();
        self.select_voice(&voices);

        tracing::info!(
            segments = segments.len(),
            voice = %self.session.voice_name(),
            "Starting narration"
        );
        self.session.begin(segments);
        self.publish();
        self.speak_current().await;
    }

    fn pause(&mut self) {
        self.disarm_auto_play();
        if self.session.status() != PlaybackStatus::Playing {
            tracing::warn!(status = ?self.session.status(), "Pause ignored: not playing");
            return;
        }
        self.service.pause();
        self.session.set_status(PlaybackStatus::Paused);
        self.publish();
    }

    async fn resume(&mut self) {
        if self.session.status() != PlaybackStatus::Paused {
            tracing::warn!(status = ?self.session.status(), "Resume ignored: not paused");
            return;
        }
        self.service.resume();
        self.session.set_status(PlaybackStatus::Playing);
        self.publish();

        if self.session.take_deferred_end() {
            self.advance().await;
        }
    }

    fn stop(&mut self) {
        tracing::info!(status = ?self.session.status(), "Stopping narration");
        self.disarm_auto_play();
        self.service.cancel();
        self.session.reset();
        self.publish();
    }

    fn replace(&mut self, update: RequestUpdate) {
        if self.session.status().is_active() || self.session.live_utterance().is_some() {
            self.service.cancel();
        }
        self.session.reset();

        match update {
            RequestUpdate::Text(text) => self.request.text = text,
            RequestUpdate::Whole(request) => self.request = request,
        }
        self.epoch += 1;
        self.auto_play_latched = false;
        tracing::debug!(epoch = self.epoch, "Narration request replaced");

        let voices = self.service.catalog().snapshot();
        self.select_voice(&voices);
        self.publish();
        self.maybe_schedule_auto_play();
    }

    fn teardown(&mut self) {
        tracing::info!("Shutting down narrator");
        self.cancel.cancel();
        self.service.cancel();
        self.session.set_live_utterance(None);
    }

    // ── Speaking ───────────────────────────────────────────────────

    async fn speak_current(&mut self) {
        let Some(segment) = self.session.current().cloned() else {
            return;
        };

        self.next_utterance += 1;
        let id = self.next_utterance;

        let (min, max) = self.settings.effective_param_range();
        let params = prosody::analyze(&segment.text).apply(
            self.request.pace.base_rate(),
            self.request.pitch.base_pitch(),
            min,
            max,
        );

        tracing::debug!(
            segment = segment.index,
            utterance = id,
            rate = params.rate,
            pitch = params.pitch,
            "Speaking segment"
        );

        self.session.set_live_utterance(Some(id));
        self.emit(NarrationEvent::SegmentStarted {
            index: segment.index,
            text: segment.text.clone(),
            params,
        });

        let utterance = Utterance {
            id,
            text: segment.text,
            params,
            voice: self.voice.as_ref().map(|v| v.name.clone()),
        };
        let reporter = UtteranceReporter::new(id, Arc::clone(&self.sink));

        if let Err(e) = self.service.speak(utterance, reporter).await {
            self.on_refused(id, e);
        }
    }

    /// `speak` returned an error, so no report will arrive for `id`.
    fn on_refused(&mut self, id: UtteranceId, error: SpeechError) {
        if !error.is_cancellation() {
            self.on_error(id, error);
            return;
        }
        tracing::debug!(utterance = id, error = %error, "Utterance refused by a cancel");
        self.session.set_live_utterance(None);
        self.session.set_status(PlaybackStatus::Idle);
        self.publish();
    }

    /// Move to the next segment, or finish the run.
    async fn advance(&mut self) {
        if self.session.finish_unit() {
            self.speak_current().await;
        } else {
            self.complete();
        }
    }

    fn complete(&mut self) {
        tracing::info!("Narration completed");
        self.publish();
        self.emit(NarrationEvent::Completed);
        if let Some(on_complete) = &self.on_complete {
            on_complete();
        }
    }

    // ── Reports ────────────────────────────────────────────────────

    async fn on_utterance(&mut self, id: UtteranceId, event: UtteranceEvent) {
        if !self.session.is_live(id) {
            tracing::debug!(utterance = id, ?event, "Dropping stale utterance report");
            return;
        }

        match event {
            UtteranceEvent::Boundary { char_index } => {
                let before = self.session.word_index();
                let word_index = self.session.record_boundary(&self.request.text, char_index);
                tracing::trace!(utterance = id, char_index, word_index, "Word boundary");
                if before != Some(word_index) {
                    self.publish();
                    self.emit(NarrationEvent::WordBoundary { word_index });
                }
            }
            UtteranceEvent::End => {
                if self.session.status() == PlaybackStatus::Paused {
                    tracing::debug!(utterance = id, "Utterance ended while paused; deferring");
                    self.session.defer_end();
                } else {
                    self.advance().await;
                }
            }
            UtteranceEvent::Error(e) => self.on_error(id, e),
        }
    }

    fn on_error(&mut self, id: UtteranceId, error: SpeechError) {
        if !self.session.is_live(id) {
            return;
        }
        if error.is_cancellation() {
            tracing::debug!(utterance = id, error = %error, "Ignoring cancellation");
            return;
        }

        let segment = self.session.current_segment();
        tracing::warn!(segment, utterance = id, error = %error, "Speech synthesis failed");

        self.session.set_live_utterance(None);
        self.session.set_status(PlaybackStatus::Idle);
        self.publish();
        self.emit(NarrationEvent::Error(NarrationError::Synthesis {
            segment,
            source: error,
        }));
    }

    // ── Voices & auto-play ─────────────────────────────────────────

    fn spawn_catalog_watcher(&self) {
        let mut catalog = self.service.catalog();
        let tx = self.cmd_tx.clone();
        let token = self.cancel.clone();

        tokio::spawn(async move {
            tokio::select! {
                () = token.cancelled() => {}
                ready = catalog.ready() => match ready {
                    Ok(voices) => {
                        let _ = tx.send(Command::VoicesReady(voices));
                    }
                    Err(e) => tracing::warn!(error = %e, "Voice catalog unavailable"),
                },
            }
        });
    }

    fn on_voices_ready(&mut self, voices: &[PlatformVoice]) {
        tracing::debug!(count = voices.len(), "Voices ready");
        self.voices_ready = true;
        self.select_voice(voices);
        self.publish();
        self.maybe_schedule_auto_play();
    }

    fn select_voice(&mut self, voices: &[PlatformVoice]) {
        let choice = selector::select(self.request.region, self.request.gender, voices);
        let (name, locale) = match &choice {
            Some(candidate) => (candidate.name.clone(), Some(candidate.locale.clone())),
            None => (self.settings.effective_default_voice_label().to_string(), None),
        };
        self.voice = choice;

        if name != self.session.voice_name() {
            self.session.set_voice_name(name.clone());
            self.emit(NarrationEvent::VoiceSelected { name, locale });
        }
    }

    /// Arm the one-shot auto-play timer for the current request.
    fn maybe_schedule_auto_play(&mut self) {
        if !self.request.auto_play
            || self.auto_play_latched
            || !self.voices_ready
            || !self.request.has_text()
        {
            return;
        }
        self.auto_play_latched = true;

        let delay = self.settings.effective_auto_play_settle();
        let epoch = self.epoch;
        let tx = self.cmd_tx.clone();
        let token = self.cancel.clone();
        tracing::debug!(epoch, ?delay, "Auto-play scheduled");

        tokio::spawn(async move {
            tokio::select! {
                () = token.cancelled() => {}
                () = tokio::time::sleep(delay) => {
                    let _ = tx.send(Command::AutoPlay { epoch });
                }
            }
        });
    }

    /// Manual control wins over a pending or future auto-play for this request.
    fn disarm_auto_play(&mut self) {
        self.epoch += 1;
        self.auto_play_latched = true;
    }

    async fn on_auto_play(&mut self, epoch: u64) {
        if epoch != self.epoch {
            tracing::debug!(epoch, current = self.epoch, "Dropping stale auto-play");
            return;
        }
        if self.session.status() != PlaybackStatus::Idle {
            tracing::debug!(status = ?self.session.status(), "Auto-play skipped");
            return;
        }
        tracing::info!("Auto-play triggered");
        self.start_fresh().await;
    }

    // ── Publishing ─────────────────────────────────────────────────

    fn publish(&mut self) {
        let snapshot = self.session.snapshot();
        self.status_tx.send_if_modified(|current| {
            if *current == snapshot {
                false
            } else {
                *current = snapshot;
                true
            }
        });

        let status = self.session.status();
        if status != self.last_status {
            tracing::debug!(old = ?self.last_status, new = ?status, "Playback status transition");
            self.last_status = status;
            self.emit(NarrationEvent::StatusChanged(status));
        }
    }

    fn emit(&self, event: NarrationEvent) {
        if self.events.send(event).is_err() {
            tracing::trace!("Narration event receiver dropped");
        }
    }
}
