//! voxbox - Voice-assistant client pipeline for constrained devices
//!
//! Uploads a captured utterance to an inference server in bounded chunks,
//! polls the two text stages, streams the spoken reply to a transient file
//! and plays it, keeping the UI sink and the playback flag pair in step.

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod cli;
pub mod config;
pub mod defaults;
pub mod error;
pub mod net;
pub mod pipeline;
pub mod playback;
pub mod ui;

// Pipeline
pub use pipeline::flags::{ReplyFlags, spawn_finish_listener};
pub use pipeline::orchestrator::{Orchestrator, Phase};

// Network stages
pub use net::{MediaFetcher, ResponseBuffer, Uploader, chunk_spans, poll_stage};

// Collaborator seams
pub use playback::{NullPlayer, Player};
pub use ui::{CollectorSink, LogSink, Panel, TextSlot, UiSink};

// Error handling
pub use error::{Result, VoxboxError};

// Config
pub use config::{Config, default_config_path};

/// Build version string with optional git commit hash.
///
/// Returns `"0.1.0+abc1234"` when git hash is available, `"0.1.0"` otherwise.
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => format!("{}+{}", version, hash),
        _ => version.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_string_starts_with_cargo_version() {
        let ver = version_string();
        assert!(
            ver.starts_with(env!("CARGO_PKG_VERSION")),
            "version_string should start with CARGO_PKG_VERSION, got: {}",
            ver
        );
    }

    #[test]
    fn version_string_contains_plus_when_git_hash_present() {
        let ver = version_string();
        if option_env!("GIT_HASH").is_some_and(|h| !h.is_empty()) {
            assert!(
                ver.contains('+'),
                "With GIT_HASH set, version should contain '+', got: {}",
                ver
            );
        } else {
            assert_eq!(ver, env!("CARGO_PKG_VERSION"));
        }
    }
}
