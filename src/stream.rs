//! Incremental decoder turning a raw SSE byte stream into content deltas.
//!
//! Chunk boundaries are arbitrary: a logical frame may be split across two
//! chunks, and one chunk may carry several frames. Bytes accumulate in a
//! buffer and only complete newline-terminated lines are processed, so a
//! frame split mid-line survives until its terminator arrives. A line that
//! parses as a frame but carries no content is skipped; a complete line
//! that fails to parse is dropped silently. Deltas are emitted strictly in
//! arrival order.

use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;
use serde_json::Value;

use crate::error::LlmError;
use crate::http::HttpBodyStream;

/// Frame prefix marking an event-data line.
const DATA_PREFIX: &str = "data:";
/// End-of-stream sentinel; decoding stops the moment a line contains it.
const DONE_SENTINEL: &str = "[DONE]";

/// Pulls the incremental content field out of one parsed frame.
///
/// Vendor-specific: OpenAI-compatible frames nest the text under
/// `choices[0].delta.content`, Anthropic under `delta.text`.
pub type DeltaExtractor = fn(&Value) -> Option<String>;

/// Lazy, ordered sequence of content deltas decoded from a response body.
pub struct DeltaDecoder {
    body: HttpBodyStream,
    buffer: Vec<u8>,
    pending: VecDeque<String>,
    extract: DeltaExtractor,
    done: bool,
    closed: bool,
}

impl DeltaDecoder {
    pub fn new(body: HttpBodyStream, extract: DeltaExtractor) -> Self {
        Self {
            body,
            buffer: Vec::new(),
            pending: VecDeque::new(),
            extract,
            done: false,
            closed: false,
        }
    }

    fn process_line(&mut self, line: &[u8]) {
        let Ok(text) = std::str::from_utf8(line) else {
            tracing::trace!("dropping non-UTF-8 stream line");
            return;
        };
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        if text.contains(DONE_SENTINEL) {
            self.done = true;
            return;
        }
        let Some(payload) = text.strip_prefix(DATA_PREFIX) else {
            return;
        };
        match serde_json::from_str::<Value>(payload.trim_start()) {
            Ok(frame) => {
                if let Some(delta) = (self.extract)(&frame) {
                    if !delta.is_empty() {
                        self.pending.push_back(delta);
                    }
                }
            }
            Err(_) => {
                // malformed after line completion; skip the frame
                tracing::trace!("dropping unparseable stream frame");
            }
        }
    }

    /// Pops the next complete line off the buffer, stripping `\n`/`\r\n`.
    fn drain_line(buffer: &mut Vec<u8>) -> Option<Vec<u8>> {
        buffer.iter().position(|b| *b == b'\n').map(|pos| {
            let mut line: Vec<u8> = buffer.drain(..=pos).collect();
            if line.last() == Some(&b'\n') {
                line.pop();
            }
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            line
        })
    }
}

impl Stream for DeltaDecoder {
    type Item = Result<String, LlmError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        loop {
            if let Some(delta) = this.pending.pop_front() {
                return Poll::Ready(Some(Ok(delta)));
            }
            if this.done {
                return Poll::Ready(None);
            }
            if this.closed {
                if this.buffer.is_empty() {
                    return Poll::Ready(None);
                }
                // transport end-of-data completes the trailing line
                let line: Vec<u8> = this.buffer.drain(..).collect();
                this.process_line(&line);
                this.done = true;
                continue;
            }
            match this.body.as_mut().poll_next(cx) {
                Poll::Ready(Some(Ok(bytes))) => {
                    this.buffer.extend_from_slice(&bytes);
                    while !this.done {
                        match Self::drain_line(&mut this.buffer) {
                            Some(line) => this.process_line(&line),
                            None => break,
                        }
                    }
                    if this.done {
                        this.buffer.clear();
                    }
                }
                Poll::Ready(Some(Err(err))) => return Poll::Ready(Some(Err(err))),
                Poll::Ready(None) => this.closed = true,
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
