//! Status bar
//!
//! Displays connection status, the outbound typing indicator and the latest
//! status message.

use parley_app::App;
use parley_core::ConnectionStatus;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

/// Render the status bar.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let paragraph = Paragraph::new(status_line(app))
        .style(Style::default().bg(Color::DarkGray).fg(Color::White));

    frame.render_widget(paragraph, area);
}

/// Status bar content.
pub fn status_line(app: &App) -> Line<'static> {
    let status = app.connection_status();
    let style = match status {
        ConnectionStatus::Disconnected => Style::default().fg(Color::Red),
        ConnectionStatus::Connecting => Style::default().fg(Color::Yellow),
        ConnectionStatus::Connected => Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ConnectionStatus::Error => Style::default().fg(Color::LightRed).add_modifier(Modifier::BOLD),
    };

    let mut spans = vec![Span::raw(" "), Span::styled(status.label(), style)];

    if app.is_listening() {
        spans.push(Span::raw(" | listening"));
    }
    if app.typing_indicator_sent() {
        spans.push(Span::raw(" | typing"));
    }
    if let Some(message) = app.status_message() {
        spans.push(Span::styled(format!(" | {message}"), Style::default().fg(Color::Gray)));
    }

    Line::from(spans)
}
