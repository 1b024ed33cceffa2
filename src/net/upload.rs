//! Chunked upload of a captured utterance.
//!
//! The whole audio buffer goes to the upload endpoint as a sequence of POST
//! requests of at most `chunk_size` bytes each, bounding the per-request
//! memory footprint. There is no partial-chunk retry: the first transport
//! failure aborts the loop at the last successfully sent offset, and the
//! remote side owns any partial-data cleanup.

use crate::error::{Result, VoxboxError};
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;

const OCTET_STREAM: &str = "application/octet-stream";

/// Spans `(offset, len)` that exactly partition `[0, total_len)`.
///
/// Empty for a zero-length buffer; an exact multiple of `max_chunk` produces
/// no trailing zero-length span. A zero `max_chunk` is clamped to 1 so the
/// partition invariant holds for any input (`Config::validate` rejects the
/// value before it gets here).
pub fn chunk_spans(total_len: usize, max_chunk: usize) -> impl Iterator<Item = (usize, usize)> {
    let max_chunk = max_chunk.max(1);
    (0..total_len)
        .step_by(max_chunk)
        .map(move |offset| (offset, max_chunk.min(total_len - offset)))
}

/// Sequential chunk uploader for one fixed endpoint.
pub struct Uploader {
    client: reqwest::Client,
    url: String,
    chunk_size: usize,
    timeout: Duration,
}

impl Uploader {
    pub fn new(client: reqwest::Client, url: String, chunk_size: usize, timeout: Duration) -> Self {
        Self {
            client,
            url,
            chunk_size,
            timeout,
        }
    }

    /// Transmit the entire buffer. Returns the total bytes sent on success.
    ///
    /// A zero-length buffer completes immediately with no requests. On the
    /// first failed chunk the upload halts and the error reports the offset
    /// reached; nothing is resent.
    pub async fn send(&self, audio: &[u8]) -> Result<usize> {
        let total = audio.len();
        tracing::info!(total, chunk_size = self.chunk_size, "uploading audio");

        let mut sent = 0usize;
        for (offset, len) in chunk_spans(total, self.chunk_size) {
            let chunk = audio[offset..offset + len].to_vec();
            let result = self
                .client
                .post(&self.url)
                .header(CONTENT_TYPE, OCTET_STREAM)
                .timeout(self.timeout)
                .body(chunk)
                .send()
                .await
                .and_then(reqwest::Response::error_for_status);

            match result {
                Ok(_) => {
                    sent += len;
                    tracing::debug!(offset, len, sent, "chunk uploaded");
                }
                Err(e) => {
                    return Err(VoxboxError::UploadAborted {
                        sent,
                        total,
                        message: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(sent, "upload complete");
        Ok(sent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spans(total: usize, chunk: usize) -> Vec<(usize, usize)> {
        chunk_spans(total, chunk).collect()
    }

    #[test]
    fn deployment_scenario_25000_over_10240() {
        assert_eq!(
            spans(25_000, 10_240),
            vec![(0, 10_240), (10_240, 10_240), (20_480, 4_520)]
        );
    }

    #[test]
    fn zero_length_buffer_yields_no_spans() {
        assert_eq!(spans(0, 10_240), vec![]);
    }

    #[test]
    fn exact_multiple_has_no_empty_final_span() {
        let s = spans(20_480, 10_240);
        assert_eq!(s, vec![(0, 10_240), (10_240, 10_240)]);
        assert!(s.iter().all(|&(_, len)| len > 0));
    }

    #[test]
    fn single_span_when_buffer_smaller_than_chunk() {
        assert_eq!(spans(100, 10_240), vec![(0, 100)]);
    }

    #[test]
    fn zero_chunk_size_is_clamped_to_one() {
        assert_eq!(spans(3, 0), vec![(0, 1), (1, 1), (2, 1)]);
        assert!(spans(100, 0).iter().all(|&(_, len)| len == 1));
    }

    #[test]
    fn request_count_is_ceil_of_len_over_chunk() {
        for (total, chunk) in [(1usize, 1usize), (10, 3), (10, 10), (10, 4), (9999, 128)] {
            let expected = total.div_ceil(chunk);
            assert_eq!(spans(total, chunk).len(), expected, "L={total} C={chunk}");
        }
    }

    #[test]
    fn spans_partition_without_gap_or_overlap() {
        for (total, chunk) in [(25_000usize, 10_240usize), (1, 7), (513, 64), (4096, 4096)] {
            let mut expected_offset = 0;
            for (offset, len) in chunk_spans(total, chunk) {
                assert_eq!(offset, expected_offset, "gap/overlap at L={total} C={chunk}");
                assert!(len <= chunk);
                expected_offset = offset + len;
            }
            assert_eq!(expected_offset, total, "partition must end at L={total}");
        }
    }
}
