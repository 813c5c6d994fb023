//! Incremental server-sent-event frame parser.
//!
//! The stream is an arbitrary sequence of text chunks. Frames are separated by
//! a blank line (`"\n\n"`) and may be split across chunks at any point, so the
//! parser buffers the trailing partial frame until its boundary arrives.
//!
//! ```text
//! data: {"type":"typing","text":"","isIncremental":true}\n
//! \n
//! data: {"type":"message",\n
//! data: "text":"hi"}\n
//! \n
//! ```
//!
//! Every `data: ` line of a frame contributes its remainder to the frame's
//! payload; the lines are concatenated without separators and the result is
//! decoded as one JSON [`InboundMessage`].
//!
//! # Invariants
//!
//! - Chunking Independence: feeding a byte stream split at arbitrary points
//!   yields the same messages, in the same order, as feeding it whole, as
//!   long as no single frame exceeds [`MAX_BUFFERED_BYTES`].
//! - Fault Isolation: a frame that fails to decode is logged and dropped;
//!   parsing continues with the next frame.
//! - Bounded Buffer: a partial frame larger than [`MAX_BUFFERED_BYTES`] is
//!   discarded. Each byte is scanned for a boundary once, so a frame arriving
//!   in many small chunks costs linear time.

use crate::{
    InboundMessage,
    errors::{ProtocolError, Result},
};

/// Blank line separating frames.
pub const FRAME_BOUNDARY: &str = "\n\n";

/// Prefix marking a payload line.
pub const DATA_PREFIX: &str = "data: ";

/// Largest partial frame kept while waiting for its boundary.
pub const MAX_BUFFERED_BYTES: usize = 64 * 1024;

/// Stateful SSE frame parser.
#[derive(Debug, Clone, Default)]
pub struct SseParser {
    /// Text received after the last complete frame. Never contains a
    /// boundary between calls.
    buffer: String,
}

impl SseParser {
    /// Create a parser with an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk and return every message completed by it, in arrival
    /// order.
    pub fn parse(&mut self, chunk: &str) -> Vec<InboundMessage> {
        // Only the new text, plus a trailing newline a boundary may straddle,
        // can hold a boundary.
        let mut from = self.buffer.len() - usize::from(self.buffer.ends_with('\n'));
        self.buffer.push_str(chunk);

        let mut messages = Vec::new();
        let mut start = 0;
        while let Some(offset) = self.buffer[from..].find(FRAME_BOUNDARY) {
            let end = from + offset;
            let segment = &self.buffer[start..end];
            start = end + FRAME_BOUNDARY.len();
            from = start;

            if segment.trim().is_empty() {
                continue;
            }

            match decode_frame(segment) {
                Ok(Some(message)) => messages.push(message),
                Ok(None) => {},
                Err(e) => tracing::warn!(error = %e, "dropping malformed SSE frame"),
            }
        }

        self.buffer.drain(..start);

        if self.buffer.len() > MAX_BUFFERED_BYTES {
            tracing::warn!(bytes = self.buffer.len(), "discarding oversized partial SSE frame");
            self.reset();
        }

        messages
    }

    /// Discard any buffered partial frame.
    pub fn reset(&mut self) {
        self.buffer.clear();
    }

    /// Partial frame waiting for its boundary.
    pub fn buffered(&self) -> &str {
        &self.buffer
    }
}

/// Decode one complete frame (without its trailing blank line).
///
/// Returns `Ok(None)` when the frame carries no `data: ` lines, such as
/// comment or keep-alive frames.
///
/// # Errors
///
/// - `ProtocolError::FrameDecode` if the concatenated data is not a valid
///   message
pub fn decode_frame(segment: &str) -> Result<Option<InboundMessage>> {
    let data: String = segment.split('\n').filter_map(|line| line.strip_prefix(DATA_PREFIX)).collect();

    if data.is_empty() {
        return Ok(None);
    }

    serde_json::from_str(&data).map(Some).map_err(|e| ProtocolError::FrameDecode(e.to_string()))
}

/// Encode a message as a single-line frame, boundary included.
///
/// # Errors
///
/// - `ProtocolError::FrameEncode` if serialization fails
pub fn encode_frame(message: &InboundMessage) -> Result<String> {
    let json = serde_json::to_string(message).map_err(|e| ProtocolError::FrameEncode(e.to_string()))?;
    Ok(format!("{DATA_PREFIX}{json}{FRAME_BOUNDARY}"))
}
