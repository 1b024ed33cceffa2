//! Streamed download of the spoken reply into a transient file.
//!
//! The body streams straight to persistent storage; nothing is held in
//! memory beyond one body chunk. The file is opened lazily on the first data
//! chunk, so an empty body leaves no file behind. Storage failures (open or
//! short write) are fatal for the transfer; transport failures only end it
//! early, and the turn proceeds with whatever was stored.

use crate::error::{Result, VoxboxError};
use crate::playback::Player;
use futures_util::StreamExt;
use reqwest::header::TRANSFER_ENCODING;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Downloads the reply media to a fixed path and hands it to playback.
pub struct MediaFetcher {
    client: reqwest::Client,
    url: String,
    path: PathBuf,
    timeout: Duration,
}

impl MediaFetcher {
    pub fn new(client: reqwest::Client, url: String, path: PathBuf, timeout: Duration) -> Self {
        Self {
            client,
            url,
            path,
            timeout,
        }
    }

    /// Path of the transient reply file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stream the media body to the reply file. Returns bytes written.
    ///
    /// Transport failures (request, timeout, mid-stream) end the transfer
    /// early with the bytes stored so far; only storage failures are `Err`.
    /// Chunked-transfer responses are not written (same preserved limitation
    /// as the response collector).
    pub async fn fetch(&self) -> Result<u64> {
        let response = match self
            .client
            .get(&self.url)
            .timeout(self.timeout)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(url = %self.url, error = %e, "media request failed");
                return Ok(0);
            }
        };

        if is_chunked(&response) {
            tracing::debug!(url = %self.url, "chunked transfer response, not stored");
            return Ok(0);
        }

        let mut file: Option<File> = None;
        let mut written: u64 = 0;
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(e) => {
                    tracing::warn!(url = %self.url, written, error = %e, "media stream ended early");
                    break;
                }
            };

            let writer = match &mut file {
                Some(writer) => writer,
                slot => slot.insert(self.open_reply_file()?),
            };

            let n = writer.write(&chunk)?;
            if n != chunk.len() {
                return Err(VoxboxError::ReplyFileShortWrite {
                    path: self.path.display().to_string(),
                    written: n,
                    expected: chunk.len(),
                });
            }
            written += n as u64;
        }

        if file.is_some() {
            tracing::info!(url = %self.url, written, "reply file written");
        }
        Ok(written)
    }

    /// Hand the stored file to playback, then delete it. Playback is
    /// attempted for every completed transfer, even a zero-byte one, and
    /// deletion follows every playback attempt so the file is never retained
    /// across cycles. Both failures are logged only.
    pub fn play_and_cleanup(&self, player: &dyn Player) {
        if let Err(e) = player.play(&self.path) {
            tracing::error!(path = %self.path.display(), error = %e, "reply playback failed");
        }
        self.remove_reply_file();
    }

    /// Delete the (possibly partial) reply file after an aborted transfer.
    pub fn discard(&self) {
        self.remove_reply_file();
    }

    fn open_reply_file(&self) -> Result<File> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| VoxboxError::ReplyFileOpen {
                path: self.path.display().to_string(),
                message: e.to_string(),
            })?;
        }
        File::create(&self.path).map_err(|e| VoxboxError::ReplyFileOpen {
            path: self.path.display().to_string(),
            message: e.to_string(),
        })
    }

    fn remove_reply_file(&self) {
        match fs::remove_file(&self.path) {
            Ok(()) => tracing::info!(path = %self.path.display(), "reply file deleted"),
            Err(e) => {
                tracing::error!(path = %self.path.display(), error = %e, "reply file delete failed");
            }
        }
    }
}

fn is_chunked(response: &reqwest::Response) -> bool {
    response
        .headers()
        .get(TRANSFER_ENCODING)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.to_ascii_lowercase().contains("chunked"))
}
