//! Bounded accumulation of streaming response bodies.
//!
//! One exchange at a time: the buffer belongs to a single orchestration cycle
//! and is reset by [`ResponseBuffer::finish`] so it can serve the next
//! exchange. Responses delivered with `Transfer-Encoding: chunked` are not
//! accumulated at all — the paired server always sends `Content-Length`
//! bodies, and this mirrors the deployed client's behavior. Known limitation;
//! see DESIGN.md before "fixing" it.

use crate::error::{Result, VoxboxError};
use futures_util::StreamExt;
use reqwest::header::TRANSFER_ENCODING;

/// Fixed-capacity accumulator with a write cursor.
#[derive(Debug)]
pub struct ResponseBuffer {
    buf: Vec<u8>,
    capacity: usize,
}

impl ResponseBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Bytes accumulated since the last reset.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append one data event at the write cursor.
    ///
    /// The guard is strict (`cursor + len` must stay below capacity, one byte
    /// reserved for the terminator the original wire format required). On
    /// overflow the entire event is dropped — never written out of bounds —
    /// and `false` is returned.
    pub fn push(&mut self, chunk: &[u8]) -> bool {
        if self.buf.len() + chunk.len() >= self.capacity {
            tracing::error!(
                cursor = self.buf.len(),
                incoming = chunk.len(),
                capacity = self.capacity,
                "response buffer overflow, dropping event"
            );
            return false;
        }
        self.buf.extend_from_slice(chunk);
        true
    }

    /// Terminate the accumulated bytes as a string and reset the cursor.
    ///
    /// The copy happens before the reset, so the same buffer is immediately
    /// reusable for the next exchange.
    pub fn finish(&mut self) -> String {
        let text = String::from_utf8_lossy(&self.buf).into_owned();
        self.buf.clear();
        text
    }

    /// Fold a streaming response body into the buffer.
    ///
    /// Chunked-transfer responses are ignored (see module docs). A transport
    /// error mid-stream is returned to the caller with whatever bytes already
    /// accumulated left in place.
    pub async fn collect(&mut self, response: reqwest::Response) -> Result<()> {
        if is_chunked(&response) {
            tracing::debug!(url = %response.url(), "chunked transfer response, not accumulated");
            return Ok(());
        }

        let url = response.url().to_string();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| VoxboxError::transport(&url, &e))?;
            self.push(&chunk);
        }
        Ok(())
    }
}

fn is_chunked(response: &reqwest::Response) -> bool {
    response
        .headers()
        .get(TRANSFER_ENCODING)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.to_ascii_lowercase().contains("chunked"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_accumulates_in_order() {
        let mut buf = ResponseBuffer::new(64);
        assert!(buf.push(b"hello "));
        assert!(buf.push(b"world"));
        assert_eq!(buf.finish(), "hello world");
    }

    #[test]
    fn finish_resets_for_next_exchange() {
        let mut buf = ResponseBuffer::new(64);
        buf.push(b"first");
        assert_eq!(buf.finish(), "first");
        assert!(buf.is_empty());
        buf.push(b"second");
        assert_eq!(buf.finish(), "second");
    }

    #[test]
    fn overflow_event_is_dropped_whole() {
        let mut buf = ResponseBuffer::new(10);
        assert!(buf.push(b"12345"));
        // 5 + 5 == capacity — strict guard rejects
        assert!(!buf.push(b"67890"));
        assert_eq!(buf.len(), 5);
        assert_eq!(buf.finish(), "12345");
    }

    #[test]
    fn fill_up_to_capacity_minus_one() {
        let mut buf = ResponseBuffer::new(10);
        assert!(buf.push(b"123456789"));
        assert_eq!(buf.len(), 9);
        assert!(!buf.push(b"x"));
        assert_eq!(buf.len(), 9);
    }

    #[test]
    fn never_writes_past_capacity_for_any_event_sequence() {
        let mut buf = ResponseBuffer::new(100);
        for size in [1usize, 7, 31, 64, 99, 3] {
            buf.push(&vec![b'a'; size]);
            assert!(buf.len() < buf.capacity());
        }
    }

    #[test]
    fn output_is_concatenation_truncated_to_capacity() {
        let mut buf = ResponseBuffer::new(12);
        buf.push(b"abcd");
        buf.push(b"efgh");
        // would reach capacity, dropped
        buf.push(b"ijkl");
        assert_eq!(buf.finish(), "abcdefgh");
    }

    #[test]
    fn zero_length_event_is_accepted() {
        let mut buf = ResponseBuffer::new(4);
        assert!(buf.push(b""));
        assert!(buf.push(b"abc"));
        // cursor at capacity - 1: empty events still fit, data does not
        assert!(buf.push(b""));
        assert!(!buf.push(b"d"));
        assert_eq!(buf.finish(), "abc");
    }

    #[test]
    fn invalid_utf8_is_replaced_not_panicked() {
        let mut buf = ResponseBuffer::new(16);
        buf.push(&[0xff, 0xfe, b'o', b'k']);
        let text = buf.finish();
        assert!(text.ends_with("ok"));
    }
}
