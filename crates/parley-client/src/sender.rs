//! Outbound HTTP sender.
//!
//! Every outbound message is one JSON POST. Delivery is fire-and-forget: the
//! outcome is a `bool`, failures are logged and never retried.
//!
//! A send succeeds only when the server answers 2xx with a JSON body whose
//! `success` field is truthy (`true`, a non-zero number, a non-empty string,
//! or any array or object).

use std::time::Duration;

use parley_proto::OutboundMessage;
use serde::Deserialize;
use serde_json::Value;
use tokio::{
    sync::mpsc::{self, error::TrySendError},
    task::JoinHandle,
};

use crate::{SendError, config::DEFAULT_SEND_TIMEOUT};

/// Response body of the outbound endpoint.
#[derive(Debug, Deserialize)]
struct SendReply {
    #[serde(default)]
    success: Value,
    #[serde(default)]
    error: Option<Value>,
}

/// JSON POST sender for a single endpoint.
#[derive(Debug, Clone)]
pub struct HttpSender {
    http: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl HttpSender {
    /// Sender posting to `url` with [`DEFAULT_SEND_TIMEOUT`].
    pub fn new(http: reqwest::Client, url: impl Into<String>) -> Self {
        Self { http, url: url.into(), timeout: DEFAULT_SEND_TIMEOUT }
    }

    /// Give up on a POST, response body included, after `timeout`.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// POST `message`. True only on 2xx with a truthy `success`.
    pub async fn send(&self, message: &OutboundMessage) -> bool {
        match self.try_send(message).await {
            Ok(()) => {
                tracing::debug!(kind = %message.kind(), "message sent");
                true
            },
            Err(e) => {
                tracing::warn!(kind = %message.kind(), error = %e, "failed to send message");
                false
            },
        }
    }

    async fn try_send(&self, message: &OutboundMessage) -> Result<(), SendError> {
        let response = self
            .http
            .post(&self.url)
            .timeout(self.timeout)
            .json(message)
            .send()
            .await
            .map_err(|e| SendError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SendError::Status { code: status.as_u16(), body });
        }

        let reply: SendReply = response.json().await.map_err(|e| SendError::Decode(e.to_string()))?;
        if is_truthy(&reply.success) {
            return Ok(());
        }

        let reason = match reply.error {
            Some(Value::String(s)) => s,
            Some(other) => other.to_string(),
            None => "no error given".to_string(),
        };
        Err(SendError::Rejected(reason))
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Background queue delivering messages one at a time, in order.
///
/// Sends never block the caller. A typing, clear, message sequence is posted
/// in exactly that order because a single task drains the channel and awaits
/// each POST before starting the next.
pub struct OutboundQueue {
    tx: mpsc::Sender<OutboundMessage>,
    task: JoinHandle<()>,
}

impl OutboundQueue {
    /// Spawn the delivery task on the current tokio runtime.
    pub fn spawn(sender: HttpSender, capacity: usize) -> Self {
        let (tx, mut rx) = mpsc::channel::<OutboundMessage>(capacity);

        let task = tokio::spawn(async move {
            while let Some(message) = rx.recv().await {
                let delivered = sender.send(&message).await;
                tracing::trace!(kind = %message.kind(), delivered, "outbound processed");
            }
        });

        Self { tx, task }
    }

    /// Queue `message`. Dropped with a warning when the queue is full.
    pub fn enqueue(&self, message: OutboundMessage) {
        match self.tx.try_send(message) {
            Ok(()) => {},
            Err(TrySendError::Full(message)) => {
                tracing::warn!(kind = %message.kind(), "outbound queue full, dropping message");
            },
            Err(TrySendError::Closed(message)) => {
                tracing::warn!(kind = %message.kind(), "outbound queue closed, dropping message");
            },
        }
    }

    /// Stop accepting messages and wait up to `timeout` for queued ones.
    ///
    /// Returns true if everything queued was processed in time.
    pub async fn close(self, timeout: Duration) -> bool {
        let Self { tx, task } = self;
        drop(tx);

        match tokio::time::timeout(timeout, task).await {
            Ok(Ok(())) => true,
            Ok(Err(e)) => {
                tracing::error!(error = %e, "outbound task failed");
                false
            },
            Err(_) => {
                tracing::warn!(timeout_ms = timeout.as_millis() as u64, "outbound flush timed out");
                false
            },
        }
    }
}
