//! Async runtime
//!
//! Event loop that drives terminal I/O and coordinates between the App state
//! machine, the stream client and the outbound queue. Uses `tokio::select!`
//! over terminal events, stream events, the typing deadline and the
//! animation interval, so every state change happens on this task, one event
//! at a time.

use std::io::{self, stdout};

use crossterm::{
    ExecutableCommand,
    event::{Event, EventStream},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use parley_app::{App, AppAction, AppEvent};
use parley_client::{ClientConfig, HttpSender, OutboundQueue, StreamEvent, StreamHandle, SystemEnv};
use parley_core::Environment;
use ratatui::{Terminal, backend::CrosstermBackend};
use thiserror::Error;
use tokio::time::{Instant, MissedTickBehavior};

use crate::{terminal, ui};

/// Runtime errors.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// I/O error from terminal operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// HTTP client construction failed.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Async runtime for the TUI.
///
/// Manages terminal setup/teardown, the main event loop, and the typing
/// timer slot. The stream client and outbound queue run as separate tasks.
pub struct Runtime {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    app: App,
    env: SystemEnv,
    config: ClientConfig,
    stream: StreamHandle,
    queue: Option<OutboundQueue>,
    typing_deadline: Option<Instant>,
}

impl Runtime {
    /// Set up the terminal and start the stream client and outbound queue.
    ///
    /// Must be called inside a tokio runtime.
    pub fn new(stream_url: &str, send_url: &str, config: ClientConfig) -> Result<Self, RuntimeError> {
        let http = reqwest::Client::builder().build()?;
        let env = SystemEnv::new();

        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::new(backend)?;
        let app = App::new(config.typing_timeout);

        let stream = StreamHandle::spawn(http.clone(), stream_url, env, &config);
        let queue = OutboundQueue::spawn(
            HttpSender::new(http, send_url).with_timeout(config.send_timeout),
            config.channel_capacity,
        );

        tracing::info!(stream_url, send_url, "runtime started");

        Ok(Self {
            terminal,
            app,
            env,
            config,
            stream,
            queue: Some(queue),
            typing_deadline: None,
        })
    }

    /// Run the main event loop until the user quits.
    pub async fn run(mut self) -> Result<(), RuntimeError> {
        let actions = self.app.handle(AppEvent::Connecting, self.env.now_ms());
        self.process_actions(actions)?;

        let mut event_stream = EventStream::new();
        let mut animation = tokio::time::interval(self.config.animation_interval);
        animation.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            let should_quit = tokio::select! {
                biased;

                // Terminal events
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_terminal_event(event)?,
                        Some(Err(e)) => return Err(RuntimeError::Io(e)),
                        None => {
                            let actions = self.app.shutdown(self.env.now_ms());
                            self.process_actions(actions)?;
                            true
                        },
                    }
                }

                // Typing deadline
                () = wait_until(self.typing_deadline) => {
                    self.typing_deadline = None;
                    self.dispatch(AppEvent::TypingTimeout)?
                }

                // Stream notifications
                Some(event) = self.stream.recv() => {
                    self.dispatch(stream_event(event))?
                }

                // Typing animation
                _ = animation.tick() => {
                    self.dispatch(AppEvent::AnimationTick)?
                }
            };

            if should_quit {
                break;
            }
        }

        self.teardown().await;
        Ok(())
    }

    /// Handle a terminal event and return whether to quit.
    fn handle_terminal_event(&mut self, event: Event) -> Result<bool, RuntimeError> {
        let app_event = match event {
            Event::Key(key) => match terminal::convert_key(key) {
                Some(key) => AppEvent::Key(key),
                None => return Ok(false),
            },
            Event::Resize(cols, rows) => AppEvent::Resize(cols, rows),
            _ => return Ok(false),
        };

        self.dispatch(app_event)
    }

    fn dispatch(&mut self, event: AppEvent) -> Result<bool, RuntimeError> {
        let actions = self.app.handle(event, self.env.now_ms());
        self.process_actions(actions)
    }

    /// Process actions returned by the app. Returns true if should quit.
    fn process_actions(&mut self, actions: Vec<AppAction>) -> Result<bool, RuntimeError> {
        let mut quit = false;
        for action in actions {
            match action {
                AppAction::Render => self.render()?,
                AppAction::Quit => quit = true,
                AppAction::Send(message) => {
                    if let Some(queue) = &self.queue {
                        queue.enqueue(message);
                    }
                },
                AppAction::ArmTypingTimer(timeout) => {
                    self.typing_deadline = Some(Instant::now() + timeout);
                },
                AppAction::CancelTypingTimer => self.typing_deadline = None,
            }
        }
        Ok(quit)
    }

    /// Stop the stream and give queued messages a bounded time to go out.
    async fn teardown(&mut self) {
        self.typing_deadline = None;
        self.stream.disconnect();

        if let Some(queue) = self.queue.take() {
            let flushed = queue.close(self.config.flush_timeout).await;
            tracing::info!(flushed, stream_finished = self.stream.is_finished(), "runtime stopped");
        }
    }

    /// Render the UI.
    fn render(&mut self) -> Result<(), RuntimeError> {
        let now_ms = self.env.now_ms();
        self.terminal.draw(|frame| {
            ui::render(frame, &self.app, now_ms);
        })?;
        Ok(())
    }
}

impl Drop for Runtime {
    fn drop(&mut self) {
        self.stream.disconnect();

        let _ = disable_raw_mode();
        let _ = stdout().execute(LeaveAlternateScreen);
    }
}

/// Map a stream notification onto the app's event set.
pub fn stream_event(event: StreamEvent) -> AppEvent {
    match event {
        StreamEvent::Connected => AppEvent::Connected,
        StreamEvent::Message(message) => AppEvent::MessageReceived(message),
        StreamEvent::Disconnected => AppEvent::Disconnected,
        StreamEvent::Reconnecting { attempt, delay } => AppEvent::Reconnecting { attempt, delay },
        StreamEvent::Failed(e) => AppEvent::StreamFailed { message: e.to_string() },
    }
}

/// Resolve at `deadline`, or never when no timer is armed.
async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use parley_client::StreamError;

    use super::*;

    #[test]
    fn failed_stream_carries_error_text() {
        let event = stream_event(StreamEvent::Failed(StreamError::Status {
            code: 503,
            reason: "Service Unavailable".into(),
        }));

        assert_eq!(event, AppEvent::StreamFailed { message: "HTTP 503: Service Unavailable".into() });
    }

    #[test]
    fn reconnecting_passes_through() {
        let delay = Duration::from_millis(4000);
        assert_eq!(
            stream_event(StreamEvent::Reconnecting { attempt: 3, delay }),
            AppEvent::Reconnecting { attempt: 3, delay }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn unarmed_timer_never_fires() {
        let fired = tokio::time::timeout(Duration::from_secs(60), wait_until(None)).await;
        assert!(fired.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn armed_timer_fires() {
        let deadline = Instant::now() + Duration::from_secs(2);
        let fired = tokio::time::timeout(Duration::from_secs(3), wait_until(Some(deadline))).await;
        assert!(fired.is_ok());
    }
}
