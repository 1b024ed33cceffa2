//! Default configuration constants for voxbox.
//!
//! This module provides shared constants used across the configuration types
//! to ensure consistency and eliminate duplication. The numeric values mirror
//! the firmware deployment this client was built against.

/// Default inference-server base URL (hardcoded host:port in the deployment).
pub const SERVER_BASE_URL: &str = "http://192.168.71.83:5000";

/// Endpoint path for chunked audio upload (POST, octet-stream).
pub const UPLOAD_PATH: &str = "/upload";

/// Endpoint path for the first text stage (question echo).
pub const QUESTION_PATH: &str = "/get_response";

/// Endpoint path for the second text stage (answer content).
pub const ANSWER_PATH: &str = "/get_response2";

/// Endpoint path for the spoken-reply media download.
pub const MEDIA_PATH: &str = "/get_mp3";

/// Maximum size of one upload chunk in bytes.
///
/// Bounds the per-request memory footprint on the device; each chunk goes out
/// as its own POST request.
pub const CHUNK_SIZE: usize = 10240;

/// Capacity of the bounded response buffer in bytes.
///
/// Responses larger than this are truncated (logged, not fatal).
pub const RESPONSE_CAPACITY: usize = 1024 * 20;

/// Per-request timeout for upload chunks in seconds.
pub const UPLOAD_TIMEOUT_SECS: u64 = 10;

/// Timeout for the question-echo poll stage in seconds.
///
/// The echo is available quickly; a short timeout keeps the turn responsive.
pub const QUESTION_TIMEOUT_SECS: u64 = 10;

/// Timeout for the answer-content poll stage in seconds.
///
/// Content generation takes longer than the echo, hence the longer window.
pub const ANSWER_TIMEOUT_SECS: u64 = 20;

/// Timeout for the spoken-reply media fetch in seconds.
pub const MEDIA_TIMEOUT_SECS: u64 = 20;

/// File name of the transient spoken-reply file.
///
/// Created at fetch start, deleted after playback; never retained across
/// orchestration cycles.
pub const REPLY_FILE_NAME: &str = "result.wav";

/// Interval of the low-priority heartbeat diagnostic log in seconds.
pub const HEARTBEAT_SECS: u64 = 5;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_size_fits_response_capacity() {
        // A single poll response the size of one upload chunk must fit the
        // bounded buffer without truncation.
        assert!(CHUNK_SIZE < RESPONSE_CAPACITY);
    }

    #[test]
    fn answer_timeout_longer_than_question() {
        assert!(ANSWER_TIMEOUT_SECS > QUESTION_TIMEOUT_SECS);
    }

    #[test]
    fn endpoint_paths_are_absolute() {
        for path in [UPLOAD_PATH, QUESTION_PATH, ANSWER_PATH, MEDIA_PATH] {
            assert!(path.starts_with('/'), "endpoint path {} must be absolute", path);
        }
    }
}
