//! Protocol error types.

use thiserror::Error;

/// Result alias for protocol operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors raised while encoding or decoding SSE frames.
///
/// Decode errors are recoverable at the stream level: the parser logs them and
/// drops the offending frame, so a single corrupt frame never aborts a stream.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Frame data was not a valid JSON message.
    #[error("frame decode failed: {0}")]
    FrameDecode(String),

    /// Message could not be encoded as JSON.
    #[error("frame encode failed: {0}")]
    FrameEncode(String),
}
