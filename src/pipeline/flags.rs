//! Reply playback flag pair shared with the UI layer.
//!
//! Two independent booleans with exactly one writer each: the orchestrator
//! sets "started" at the end of a successful cycle, and the playback-finished
//! notification (another execution context) sets "ended" — but only while
//! "started" holds, so "ended" is never observable without "started" in the
//! same cycle.

use crossbeam_channel::Receiver;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;

/// Shared "reply audio started" / "reply audio ended" pair.
#[derive(Debug, Default)]
pub struct ReplyFlags {
    started: AtomicBool,
    ended: AtomicBool,
}

impl ReplyFlags {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Mark the reply audio as started. Hands scroll control to the UI.
    pub fn start(&self) {
        self.started.store(true, Ordering::SeqCst);
    }

    /// Record the playback-finished notification.
    ///
    /// A finish arriving while no reply is marked started (e.g. a prompt
    /// sound from outside the cycle) is dropped.
    pub fn finish(&self) {
        if self.started.load(Ordering::SeqCst) {
            self.ended.store(true, Ordering::SeqCst);
        } else {
            tracing::debug!("playback finished outside a reply cycle, ignored");
        }
    }

    /// Clear both flags at the start of a new orchestration cycle.
    pub fn reset(&self) {
        self.ended.store(false, Ordering::SeqCst);
        self.started.store(false, Ordering::SeqCst);
    }

    pub fn audio_started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }

    pub fn audio_ended(&self) -> bool {
        self.ended.load(Ordering::SeqCst)
    }
}

/// Bridge playback-finished notifications onto the flag pair.
///
/// Runs on its own thread for the life of the sender side; exits when every
/// player holding the sender is dropped.
pub fn spawn_finish_listener(rx: Receiver<()>, flags: Arc<ReplyFlags>) -> JoinHandle<()> {
    std::thread::spawn(move || {
        for () in rx.iter() {
            tracing::debug!("reply audio ended");
            flags.finish();
        }
    })
}
