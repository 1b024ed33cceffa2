//! Answer orchestration: one full "ask → wait → display → play" traversal.
//!
//! The whole sequence runs on one logical worker and blocks on each network
//! call in turn — strict ordering between stages and UI updates is part of
//! the contract, so no stage overlaps another. The only other execution
//! context is the playback-finished listener (see `pipeline::flags`).

use crate::config::Config;
use crate::error::Result;
use crate::net::{MediaFetcher, ResponseBuffer, Uploader, poll_stage};
use crate::pipeline::flags::ReplyFlags;
use crate::playback::Player;
use crate::ui::{Panel, TextSlot, UiSink};
use std::sync::Arc;
use std::time::Duration;

/// Position of the orchestrator within one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Uploading,
    PollingQuestion,
    PollingAnswer,
    Fetching,
    Playing,
}

/// Drives one orchestration cycle per finalized utterance.
///
/// Not re-entrant: the response buffer and reply file are single-cycle
/// state, so the caller must let one cycle finish before starting the next
/// (one voice-interaction turn at a time).
pub struct Orchestrator {
    client: reqwest::Client,
    uploader: Uploader,
    fetcher: MediaFetcher,
    question_url: String,
    answer_url: String,
    question_timeout: Duration,
    answer_timeout: Duration,
    buffer: ResponseBuffer,
    ui: Box<dyn UiSink>,
    player: Arc<dyn Player>,
    flags: Arc<ReplyFlags>,
    phase: Phase,
}

impl Orchestrator {
    pub fn new(
        config: &Config,
        ui: Box<dyn UiSink>,
        player: Arc<dyn Player>,
        flags: Arc<ReplyFlags>,
    ) -> Self {
        let client = reqwest::Client::new();
        let uploader = Uploader::new(
            client.clone(),
            config.server.upload_url(),
            config.upload.chunk_size,
            config.upload_timeout(),
        );
        let fetcher = MediaFetcher::new(
            client.clone(),
            config.server.media_url(),
            config.reply_path(),
            config.fetch_timeout(),
        );
        Self {
            client,
            uploader,
            fetcher,
            question_url: config.server.question_url(),
            answer_url: config.server.answer_url(),
            question_timeout: config.question_timeout(),
            answer_timeout: config.answer_timeout(),
            buffer: ResponseBuffer::new(config.response.capacity),
            ui,
            player,
            flags,
            phase: Phase::Idle,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn flags(&self) -> Arc<ReplyFlags> {
        Arc::clone(&self.flags)
    }

    fn set_phase(&mut self, phase: Phase) {
        tracing::debug!(from = ?self.phase, to = ?phase, "phase transition");
        self.phase = phase;
    }

    /// Run one cycle for a finalized utterance.
    ///
    /// Invoked by the upstream capture/recognition component. Upload and poll
    /// failures degrade (logged, flow continues with empty or missing text);
    /// only a storage failure in the media fetch aborts the rest of the
    /// cycle. Ends by setting the "reply audio started" flag on success.
    pub async fn answer(&mut self, audio: &[u8]) -> Result<()> {
        self.flags.reset();

        self.set_phase(Phase::Uploading);
        if let Err(e) = self.uploader.send(audio).await {
            tracing::warn!(error = %e, "upload failed, continuing without it");
        }

        self.set_phase(Phase::PollingQuestion);
        let question = poll_stage(
            &self.client,
            &self.question_url,
            self.question_timeout,
            &mut self.buffer,
        )
        .await;
        self.ui.show_text(TextSlot::Question, &question);

        self.set_phase(Phase::PollingAnswer);
        let content = poll_stage(
            &self.client,
            &self.answer_url,
            self.answer_timeout,
            &mut self.buffer,
        )
        .await;
        self.ui.show_text(TextSlot::Content, &content);
        self.ui.show_panel(Panel::Reply, Duration::ZERO);

        self.set_phase(Phase::Fetching);
        if let Err(e) = self.fetcher.fetch().await {
            self.fetcher.discard();
            self.set_phase(Phase::Idle);
            return Err(e);
        }

        self.set_phase(Phase::Playing);
        // "Started" must be observable before the playback service can
        // report completion, or the conditional "ended" write would drop it.
        self.flags.start();
        self.fetcher.play_and_cleanup(self.player.as_ref());

        self.set_phase(Phase::Idle);
        Ok(())
    }
}
