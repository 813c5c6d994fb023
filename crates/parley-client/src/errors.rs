//! Transport errors.

use thiserror::Error;

/// Stream connection failures.
///
/// `Clone` so the final error can be both reported as an event and returned
/// from [`crate::StreamClient::run`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StreamError {
    /// The request could not be sent or no response arrived.
    #[error("connection failed: {0}")]
    Connect(String),

    /// The server answered with a non-success status.
    #[error("HTTP {code}: {reason}")]
    Status {
        /// Numeric status code.
        code: u16,
        /// Canonical reason phrase.
        reason: String,
    },

    /// The response body failed mid-stream.
    #[error("stream read failed: {0}")]
    Read(String),
}

impl StreamError {
    /// True for failures below HTTP (refused, reset, timed out).
    ///
    /// A status error means the server is reachable and chose to refuse.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Connect(_) | Self::Read(_) => true,
            Self::Status { .. } => false,
        }
    }
}

/// Outbound send failures.
///
/// Only logged: [`crate::HttpSender::send`] flattens these to `false`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SendError {
    /// The request could not be sent.
    #[error("request failed: {0}")]
    Request(String),

    /// The server answered with a non-success status.
    #[error("HTTP {code}: {body}")]
    Status {
        /// Numeric status code.
        code: u16,
        /// Response body text.
        body: String,
    },

    /// The response body was not the expected JSON.
    #[error("invalid response: {0}")]
    Decode(String),

    /// The server reported `success` as falsy.
    #[error("rejected by server: {0}")]
    Rejected(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_errors_are_not_transient() {
        assert!(StreamError::Connect("refused".into()).is_transient());
        assert!(StreamError::Read("reset".into()).is_transient());
        assert!(!StreamError::Status { code: 503, reason: "Service Unavailable".into() }.is_transient());
    }

    #[test]
    fn display_formats() {
        let err = StreamError::Status { code: 500, reason: "Internal Server Error".into() };
        assert_eq!(err.to_string(), "HTTP 500: Internal Server Error");
    }
}
