//! Chat area
//!
//! Displays the unified conversation, oldest at the top.

use std::fmt;

use chrono::{DateTime, Local, TimeZone, Utc};
use parley_app::App;
use parley_core::{MessageSender, UnifiedMessage};
use parley_proto::MessageKind;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
};

const BORDER_SIZE: u16 = 2;
const UNKNOWN_TIME: &str = "--:--";

/// Render the chat area.
pub fn render(frame: &mut Frame, app: &App, now_ms: u64, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Parley ");

    let messages = app.messages(now_ms);
    let items: Vec<ListItem> = if messages.is_empty() {
        vec![ListItem::new(Line::from(Span::styled(
            "Waiting for messages...",
            Style::default().fg(Color::DarkGray),
        )))]
    } else {
        messages.iter().map(|msg| ListItem::new(message_line(msg, app.typing_dots(), &Local))).collect()
    };

    let visible_height = usize::from(area.height.saturating_sub(BORDER_SIZE));
    let skip = items.len().saturating_sub(visible_height);
    let visible_items: Vec<_> = items.into_iter().skip(skip).collect();

    frame.render_widget(List::new(visible_items).block(block), area);
}

/// Format a millisecond timestamp as `HH:MM` in `tz`.
fn format_time_in<Tz>(timestamp_ms: u64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    i64::try_from(timestamp_ms)
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map_or_else(
            || UNKNOWN_TIME.to_owned(),
            |utc| utc.with_timezone(tz).format("%H:%M").to_string(),
        )
}

/// One chat line: time, sender, then the text.
///
/// Typing indicators show the animation `dots` instead of text.
pub fn message_line<Tz>(msg: &UnifiedMessage, dots: &str, tz: &Tz) -> Line<'static>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let sender_style = match msg.sender {
        MessageSender::Cli => Style::default().fg(Color::Cyan),
        MessageSender::Web => Style::default().fg(Color::Green),
        MessageSender::System => Style::default().fg(Color::Yellow),
    };

    let body = match msg.kind() {
        MessageKind::Typing => Span::styled(
            dots.to_owned(),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        ),
        MessageKind::Error => {
            Span::styled(msg.display_text().into_owned(), Style::default().fg(Color::Red))
        },
        _ => Span::raw(msg.display_text().into_owned()),
    };

    Line::from(vec![
        Span::styled(
            format!("[{}] ", format_time_in(msg.timestamp, tz)),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(format!("<{}>", msg.sender.as_str()), sender_style.add_modifier(Modifier::BOLD)),
        Span::raw(" "),
        body,
    ])
}
