//! Stream connection status.

/// Connection status as shown to the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConnectionStatus {
    /// No stream open.
    #[default]
    Disconnected,
    /// Request in flight, or waiting to retry.
    Connecting,
    /// Stream open and reading.
    Connected,
    /// Retries exhausted or a fatal stream error.
    Error,
}

impl ConnectionStatus {
    /// True iff the stream is connected.
    pub fn is_listening(self) -> bool {
        self == Self::Connected
    }

    /// Lowercase label for display and logs.
    pub fn label(self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Error => "error",
        }
    }
}
