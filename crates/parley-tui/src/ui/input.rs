//! Input line
//!
//! Shows the message being composed and places the terminal cursor.

use parley_app::InputState;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
};

const PROMPT: &str = "> ";
const HINT: &str = " Enter to send, Esc to quit ";

/// Render the input line.
pub fn render(frame: &mut Frame, input: &InputState, area: Rect) {
    let paragraph = Paragraph::new(format!("{PROMPT}{}", input.buffer()))
        .style(Style::default().fg(Color::White))
        .block(Block::default().borders(Borders::ALL).title(HINT));

    frame.render_widget(paragraph, area);
    frame.set_cursor_position(cursor_position(area, input.cursor()));
}

/// Terminal cell for a cursor `cursor` characters into the buffer, clamped
/// to the inside of the bordered box.
fn cursor_position(area: Rect, cursor: usize) -> (u16, u16) {
    let left = area.x.saturating_add(1);
    let right = area.right().saturating_sub(2);
    let prompt = PROMPT.len() as u16;

    let x = u16::try_from(cursor).map_or(right, |c| left.saturating_add(prompt).saturating_add(c));
    (x.min(right), area.y.saturating_add(1))
}
