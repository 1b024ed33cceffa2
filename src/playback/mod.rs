//! Playback collaborator interface.
//!
//! The pipeline treats playback as an opaque service: hand it a file path,
//! block until the call returns, and learn about the actual end of audio via
//! the finish notification, which arrives from the player's own execution
//! context on a crossbeam channel.

use crate::error::Result;
use crossbeam_channel::Sender;
use std::path::Path;

#[cfg(feature = "cpal-audio")]
pub mod wav;
#[cfg(feature = "cpal-audio")]
pub use wav::WavPlayer;

/// Playback service consumed by the pipeline.
///
/// Implementations fire their finish notification once per completed playback
/// attempt, successful or not, from whatever context drives the audio.
pub trait Player: Send + Sync {
    /// Play the file at `path` synchronously.
    fn play(&self, path: &Path) -> Result<()>;

    /// Name for logging/debugging.
    fn name(&self) -> &'static str {
        "player"
    }
}

/// Player that performs no audio output.
///
/// Default backend when `cpal-audio` is off (headless device bring-up) and
/// the test double: logs the request and reports finish immediately.
pub struct NullPlayer {
    finish_tx: Sender<()>,
}

impl NullPlayer {
    pub fn new(finish_tx: Sender<()>) -> Self {
        Self { finish_tx }
    }
}

impl Player for NullPlayer {
    fn play(&self, path: &Path) -> Result<()> {
        tracing::info!(path = %path.display(), "null playback");
        let _ = self.finish_tx.send(());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "null"
    }
}
