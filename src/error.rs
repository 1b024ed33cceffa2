//! Error types for voxbox.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VoxboxError {
    // Configuration errors
    #[error("Configuration file not found at {path}")]
    ConfigFileNotFound { path: String },

    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    // Network errors (upload chunks, poll stages, media fetch)
    #[error("Transport error for {url}: {message}")]
    Transport { url: String, message: String },

    #[error("Upload aborted at offset {sent} of {total}: {message}")]
    UploadAborted {
        sent: usize,
        total: usize,
        message: String,
    },

    // Storage errors (reply-file streaming)
    #[error("Failed to open reply file {path}: {message}")]
    ReplyFileOpen { path: String, message: String },

    #[error("Short write to reply file {path}: wrote {written} of {expected} bytes")]
    ReplyFileShortWrite {
        path: String,
        written: usize,
        expected: usize,
    },

    // Playback errors
    #[error("Playback failed for {path}: {message}")]
    Playback { path: String, message: String },

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Generic error for cases not covered above
    #[error("{0}")]
    Other(String),
}

impl VoxboxError {
    /// Wrap a reqwest error as a transport failure for the given URL.
    pub fn transport(url: &str, err: &reqwest::Error) -> Self {
        VoxboxError::Transport {
            url: url.to_string(),
            message: err.to_string(),
        }
    }
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, VoxboxError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_config_file_not_found_display() {
        let error = VoxboxError::ConfigFileNotFound {
            path: "/path/to/config.toml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found at /path/to/config.toml"
        );
    }

    #[test]
    fn test_config_invalid_value_display() {
        let error = VoxboxError::ConfigInvalidValue {
            key: "upload.chunk_size".to_string(),
            message: "must be positive".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid configuration value for upload.chunk_size: must be positive"
        );
    }

    #[test]
    fn test_transport_display() {
        let error = VoxboxError::Transport {
            url: "http://host:5000/get_response".to_string(),
            message: "connection refused".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Transport error for http://host:5000/get_response: connection refused"
        );
    }

    #[test]
    fn test_upload_aborted_display() {
        let error = VoxboxError::UploadAborted {
            sent: 10240,
            total: 25000,
            message: "timed out".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Upload aborted at offset 10240 of 25000: timed out"
        );
    }

    #[test]
    fn test_reply_file_open_display() {
        let error = VoxboxError::ReplyFileOpen {
            path: "/tmp/result.wav".to_string(),
            message: "permission denied".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to open reply file /tmp/result.wav: permission denied"
        );
    }

    #[test]
    fn test_reply_file_short_write_display() {
        let error = VoxboxError::ReplyFileShortWrite {
            path: "/tmp/result.wav".to_string(),
            written: 100,
            expected: 512,
        };
        assert_eq!(
            error.to_string(),
            "Short write to reply file /tmp/result.wav: wrote 100 of 512 bytes"
        );
    }

    #[test]
    fn test_playback_display() {
        let error = VoxboxError::Playback {
            path: "/tmp/result.wav".to_string(),
            message: "no output device".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Playback failed for /tmp/result.wav: no output device"
        );
    }

    #[test]
    fn test_other_display() {
        let error = VoxboxError::Other("unexpected error".to_string());
        assert_eq!(error.to_string(), "unexpected error");
    }

    #[test]
    fn test_from_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let error: VoxboxError = io_error.into();
        assert!(error.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_toml_error() {
        let toml_str = "invalid = toml = syntax";
        let toml_error = toml::from_str::<toml::Value>(toml_str).unwrap_err();
        let error: VoxboxError = toml_error.into();
        assert!(error.to_string().contains("Configuration error"));
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_result() -> Result<i32> {
            Ok(42)
        }
        assert_eq!(returns_result().unwrap(), 42);
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<VoxboxError>();
        assert_sync::<VoxboxError>();
    }
}
