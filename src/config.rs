use crate::defaults;
use crate::error::VoxboxError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub upload: UploadConfig,
    pub poll: PollConfig,
    pub response: ResponseConfig,
    pub fetch: FetchConfig,
    pub storage: StorageConfig,
}

/// Inference-server endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    /// Base URL of the inference server, e.g. `http://192.168.71.83:5000`
    pub base_url: String,
    pub upload_path: String,
    pub question_path: String,
    pub answer_path: String,
    pub media_path: String,
}

/// Chunked audio upload configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct UploadConfig {
    /// Maximum bytes per upload request
    pub chunk_size: usize,
    /// Per-chunk request timeout in seconds
    pub timeout_secs: u64,
}

/// Poll-stage timeouts
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PollConfig {
    /// Timeout for the question-echo stage in seconds
    pub question_timeout_secs: u64,
    /// Timeout for the answer-content stage in seconds
    pub answer_timeout_secs: u64,
}

/// Bounded response-buffer configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ResponseConfig {
    /// Capacity of the response accumulator in bytes
    pub capacity: usize,
}

/// Spoken-reply media fetch configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FetchConfig {
    /// Media download timeout in seconds
    pub timeout_secs: u64,
}

/// Transient-file storage configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct StorageConfig {
    /// Path of the transient reply file. Defaults to
    /// `<cache_dir>/voxbox/result.wav` when unset.
    pub reply_path: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::SERVER_BASE_URL.to_string(),
            upload_path: defaults::UPLOAD_PATH.to_string(),
            question_path: defaults::QUESTION_PATH.to_string(),
            answer_path: defaults::ANSWER_PATH.to_string(),
            media_path: defaults::MEDIA_PATH.to_string(),
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            chunk_size: defaults::CHUNK_SIZE,
            timeout_secs: defaults::UPLOAD_TIMEOUT_SECS,
        }
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            question_timeout_secs: defaults::QUESTION_TIMEOUT_SECS,
            answer_timeout_secs: defaults::ANSWER_TIMEOUT_SECS,
        }
    }
}

impl Default for ResponseConfig {
    fn default() -> Self {
        Self {
            capacity: defaults::RESPONSE_CAPACITY,
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: defaults::MEDIA_TIMEOUT_SECS,
        }
    }
}

impl ServerConfig {
    /// Join an endpoint path onto the base URL.
    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    pub fn upload_url(&self) -> String {
        self.endpoint(&self.upload_path)
    }

    pub fn question_url(&self) -> String {
        self.endpoint(&self.question_path)
    }

    pub fn answer_url(&self) -> String {
        self.endpoint(&self.answer_path)
    }

    pub fn media_url(&self) -> String {
        self.endpoint(&self.media_path)
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Returns an error if the file contains invalid TOML.
    /// Missing fields will use default values.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a file or return defaults.
    ///
    /// A missing file silently yields defaults; invalid TOML is logged and
    /// also falls back to defaults — the device must come up regardless of a
    /// broken settings file.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                let missing = e
                    .downcast_ref::<std::io::Error>()
                    .map(|io_err| io_err.kind() == std::io::ErrorKind::NotFound)
                    .unwrap_or(false);
                if !missing {
                    tracing::warn!(path = %path.display(), error = %e, "invalid config, using defaults");
                }
                Self::default()
            }
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - VOXBOX_SERVER → server.base_url
    /// - VOXBOX_REPLY_PATH → storage.reply_path
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(server) = std::env::var("VOXBOX_SERVER")
            && !server.is_empty()
        {
            self.server.base_url = server;
        }
        if let Ok(path) = std::env::var("VOXBOX_REPLY_PATH")
            && !path.is_empty()
        {
            self.storage.reply_path = Some(PathBuf::from(path));
        }
        self
    }

    /// Check value ranges that serde defaults cannot enforce.
    ///
    /// A zero chunk size would degenerate the upload partition, and a
    /// response capacity below 2 cannot hold any text (one slot is reserved
    /// by the strict overflow guard).
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.upload.chunk_size == 0 {
            return Err(VoxboxError::ConfigInvalidValue {
                key: "upload.chunk_size".to_string(),
                message: "must be at least 1 byte".to_string(),
            });
        }
        if self.response.capacity < 2 {
            return Err(VoxboxError::ConfigInvalidValue {
                key: "response.capacity".to_string(),
                message: "must be at least 2 bytes".to_string(),
            });
        }
        Ok(())
    }

    /// Resolved path of the transient reply file.
    pub fn reply_path(&self) -> PathBuf {
        self.storage.reply_path.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(|| PathBuf::from(".cache"))
                .join("voxbox")
                .join(defaults::REPLY_FILE_NAME)
        })
    }

    pub fn upload_timeout(&self) -> Duration {
        Duration::from_secs(self.upload.timeout_secs)
    }

    pub fn question_timeout(&self) -> Duration {
        Duration::from_secs(self.poll.question_timeout_secs)
    }

    pub fn answer_timeout(&self) -> Duration {
        Duration::from_secs(self.poll.answer_timeout_secs)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch.timeout_secs)
    }
}

/// Default configuration file path: `<config_dir>/voxbox/config.toml`.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from(".config"))
        .join("voxbox")
        .join("config.toml")
}
