//! Terminal key mapping.
//!
//! Converts crossterm key events into the app's [`KeyInput`] so the state
//! machine never sees terminal types.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::KeyInput;

/// Convert a crossterm key event to a [`KeyInput`].
///
/// Only presses are mapped. Ctrl+C quits like Esc, since raw mode swallows
/// the signal.
pub fn convert_key(event: KeyEvent) -> Option<KeyInput> {
    if event.kind != KeyEventKind::Press {
        return None;
    }

    match event.code {
        KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => Some(KeyInput::Esc),
        KeyCode::Char(_) if event.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
            None
        },
        KeyCode::Char(c) => Some(KeyInput::Char(c)),
        KeyCode::Enter => Some(KeyInput::Enter),
        KeyCode::Backspace => Some(KeyInput::Backspace),
        KeyCode::Delete => Some(KeyInput::Delete),
        KeyCode::Tab => Some(KeyInput::Tab),
        KeyCode::Esc => Some(KeyInput::Esc),
        KeyCode::Left => Some(KeyInput::Left),
        KeyCode::Right => Some(KeyInput::Right),
        KeyCode::Up => Some(KeyInput::Up),
        KeyCode::Down => Some(KeyInput::Down),
        KeyCode::Home => Some(KeyInput::Home),
        KeyCode::End => Some(KeyInput::End),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyEventState;

    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn plain_keys() {
        assert_eq!(convert_key(key(KeyCode::Char('x'), KeyModifiers::NONE)), Some(KeyInput::Char('x')));
        assert_eq!(convert_key(key(KeyCode::Char('X'), KeyModifiers::SHIFT)), Some(KeyInput::Char('X')));
        assert_eq!(convert_key(key(KeyCode::Enter, KeyModifiers::NONE)), Some(KeyInput::Enter));
        assert_eq!(convert_key(key(KeyCode::F(1), KeyModifiers::NONE)), None);
    }

    #[test]
    fn ctrl_c_quits() {
        assert_eq!(convert_key(key(KeyCode::Char('c'), KeyModifiers::CONTROL)), Some(KeyInput::Esc));
        assert_eq!(convert_key(key(KeyCode::Char('a'), KeyModifiers::CONTROL)), None);
    }

    #[test]
    fn releases_are_ignored() {
        let release = KeyEvent {
            code: KeyCode::Char('x'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert_eq!(convert_key(release), None);
    }
}
