//! Reconnecting SSE stream client.
//!
//! [`StreamClient::run`] owns one long-lived GET request at a time. Body chunks
//! are decoded, fed to an [`SseParser`], and every completed message is sent
//! on the event channel before the next chunk is read, so consumers see
//! messages in arrival order.
//!
//! # Lifecycle
//!
//! ```text
//! ┌──────┐      ┌────────────┐  2xx   ┌───────────┐  body ends  ┌──────────────┐
//! │ Idle │─────>│ Connecting │───────>│ Connected │────────────>│ Disconnected │
//! └──────┘      └────────────┘        └───────────┘             └──────────────┘
//!                  ^      │ error          │ error
//!                  │      v                v
//!                  │   ┌──────────────────────┐  budget spent  ┌───────┐
//!                  └───│ Backoff (sleep)      │───────────────>│ Error │
//!                      └──────────────────────┘                └───────┘
//! ```
//!
//! # Invariants
//!
//! - One `Disconnected` event per connect attempt, whatever ended it.
//! - Abort is never retried and never reported as an error, including an
//!   abort that lands during a backoff sleep.
//! - A successful connect resets the retry budget.
//! - After the last retry fails, `Disconnected` then `Failed` are emitted and
//!   `run` returns the error.

use std::time::Duration;

use futures::StreamExt;
use parley_core::{Backoff, Environment, ReconnectPolicy};
use parley_proto::{InboundMessage, SseParser};
use reqwest::header::{ACCEPT, CACHE_CONTROL};
use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
};

use crate::{ClientConfig, StreamError, text::Utf8Decoder};

/// Events published by the stream client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// The server accepted the request; the body is being read.
    Connected,
    /// A message was parsed from the stream.
    Message(InboundMessage),
    /// The current attempt ended.
    Disconnected,
    /// Waiting before the next attempt.
    Reconnecting {
        /// 1-based retry number.
        attempt: u32,
        /// Wait before the retry.
        delay: Duration,
    },
    /// Retries exhausted. Terminal.
    Failed(StreamError),
}

/// How a single attempt ended without error.
enum Outcome {
    /// The server closed the body.
    Ended,
    /// Cancelled by the handle.
    Aborted,
}

/// Reconnecting SSE reader.
pub struct StreamClient<E: Environment> {
    http: reqwest::Client,
    url: String,
    env: E,
    backoff: Backoff,
    events: mpsc::Sender<StreamEvent>,
    cancel: watch::Receiver<bool>,
}

impl<E: Environment> StreamClient<E> {
    /// Create a client that publishes to `events` until `cancel` flips to
    /// `true`.
    pub fn new(
        http: reqwest::Client,
        url: impl Into<String>,
        env: E,
        policy: ReconnectPolicy,
        events: mpsc::Sender<StreamEvent>,
        cancel: watch::Receiver<bool>,
    ) -> Self {
        Self { http, url: url.into(), env, backoff: Backoff::new(policy), events, cancel }
    }

    /// Run until the stream ends, is cancelled, or retries are exhausted.
    ///
    /// # Errors
    ///
    /// - The last attempt's `StreamError` once the retry budget is spent
    pub async fn run(mut self) -> Result<(), StreamError> {
        let mut parser = SseParser::new();

        loop {
            tracing::debug!(url = %self.url, attempt = self.backoff.attempts(), "connecting to stream");
            let result = self.connect_once(&mut parser).await;

            parser.reset();
            self.emit(StreamEvent::Disconnected).await;

            let error = match result {
                Ok(Outcome::Ended) => {
                    tracing::info!("stream closed by server");
                    return Ok(());
                },
                Ok(Outcome::Aborted) => {
                    tracing::debug!("stream aborted");
                    return Ok(());
                },
                Err(e) if self.is_cancelled() => {
                    tracing::debug!(error = %e, "stream error after abort ignored");
                    return Ok(());
                },
                Err(e) => e,
            };

            let Some(delay) = self.backoff.next_delay() else {
                tracing::error!(error = %error, attempts = self.backoff.attempts(), "stream failed, giving up");
                self.emit(StreamEvent::Failed(error.clone())).await;
                return Err(error);
            };

            let attempt = self.backoff.attempts();
            tracing::warn!(
                error = %error,
                transient = error.is_transient(),
                attempt,
                delay_ms = delay.as_millis() as u64,
                "stream failed, reconnecting"
            );
            self.emit(StreamEvent::Reconnecting { attempt, delay }).await;

            let sleep = self.env.sleep(delay);
            tokio::select! {
                biased;
                () = cancelled(&mut self.cancel) => {
                    tracing::debug!("aborted during backoff");
                    return Ok(());
                }
                () = sleep => {}
            }
        }
    }

    async fn connect_once(&mut self, parser: &mut SseParser) -> Result<Outcome, StreamError> {
        let request = self
            .http
            .get(&self.url)
            .header(ACCEPT, "text/event-stream")
            .header(CACHE_CONTROL, "no-cache")
            .send();

        let response = tokio::select! {
            biased;
            () = cancelled(&mut self.cancel) => return Ok(Outcome::Aborted),
            response = request => response.map_err(|e| StreamError::Connect(e.to_string()))?,
        };

        let status = response.status();
        if !status.is_success() {
            return Err(StreamError::Status {
                code: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        self.backoff.reset();
        tracing::info!(url = %self.url, "stream connected");
        self.emit(StreamEvent::Connected).await;

        let mut body = response.bytes_stream();
        let mut decoder = Utf8Decoder::new();
        loop {
            let chunk = tokio::select! {
                biased;
                () = cancelled(&mut self.cancel) => return Ok(Outcome::Aborted),
                chunk = body.next() => chunk,
            };

            let text = match chunk {
                Some(Ok(bytes)) => decoder.decode(&bytes),
                Some(Err(e)) => return Err(StreamError::Read(e.to_string())),
                None => {
                    let tail = decoder.finish();
                    self.dispatch(parser.parse(&tail)).await;
                    return Ok(Outcome::Ended);
                },
            };

            self.dispatch(parser.parse(&text)).await;
        }
    }

    async fn dispatch(&self, messages: Vec<InboundMessage>) {
        for message in messages {
            tracing::trace!(kind = %message.kind(), "stream message");
            self.emit(StreamEvent::Message(message)).await;
        }
    }

    async fn emit(&self, event: StreamEvent) {
        if self.events.send(event).await.is_err() {
            tracing::debug!("stream event receiver dropped");
        }
    }

    fn is_cancelled(&self) -> bool {
        *self.cancel.borrow()
    }
}

/// Resolves once cancellation is requested or the handle is gone.
async fn cancelled(cancel: &mut watch::Receiver<bool>) {
    // Err means the sender was dropped, which also ends the stream.
    let _ = cancel.wait_for(|cancelled| *cancelled).await;
}

/// Handle to a spawned [`StreamClient`].
///
/// Dropping the handle disconnects.
pub struct StreamHandle {
    events: mpsc::Receiver<StreamEvent>,
    cancel: watch::Sender<bool>,
    task: JoinHandle<Result<(), StreamError>>,
}

impl StreamHandle {
    /// Spawn a stream client on the current tokio runtime.
    pub fn spawn<E: Environment>(
        http: reqwest::Client,
        url: impl Into<String>,
        env: E,
        config: &ClientConfig,
    ) -> Self {
        let (events_tx, events) = mpsc::channel(config.channel_capacity);
        let (cancel, cancel_rx) = watch::channel(false);

        let client = StreamClient::new(http, url, env, config.reconnect, events_tx, cancel_rx);
        let task = tokio::spawn(client.run());

        Self { events, cancel, task }
    }

    /// Next event. `None` once the client has stopped and the queue is empty.
    pub async fn recv(&mut self) -> Option<StreamEvent> {
        self.events.recv().await
    }

    /// Abort the stream. Idempotent.
    pub fn disconnect(&self) {
        self.cancel.send_replace(true);
    }

    /// True once the client task has returned.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for StreamHandle {
    fn drop(&mut self) {
        self.disconnect();
    }
}
