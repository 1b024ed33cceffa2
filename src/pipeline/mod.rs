//! Answer pipeline: upload, poll, fetch, play — in strict sequence.

pub mod flags;
pub mod orchestrator;

pub use flags::{ReplyFlags, spawn_finish_listener};
pub use orchestrator::{Orchestrator, Phase};
