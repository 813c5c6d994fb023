//! Three-dot typing animation.

use std::time::Duration;

/// Time between animation frames.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(600);

const FRAMES: [&str; 3] = ["●○○", "○●○", "○○●"];

/// Cycling frame counter for the remote typing indicator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TypingAnimation {
    frame: usize,
}

impl TypingAnimation {
    /// Animation at its first frame.
    pub fn new() -> Self {
        Self::default()
    }

    /// Step to the next frame, wrapping after the last.
    pub fn advance(&mut self) {
        self.frame = (self.frame + 1) % FRAMES.len();
    }

    /// Current frame index.
    pub fn frame(&self) -> usize {
        self.frame
    }

    /// Dots for the current frame.
    pub fn dots(&self) -> &'static str {
        FRAMES[self.frame]
    }

    /// Return to the first frame.
    pub fn reset(&mut self) {
        self.frame = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycles_through_three_frames() {
        let mut animation = TypingAnimation::new();
        let mut seen = Vec::new();
        for _ in 0..4 {
            seen.push(animation.dots());
            animation.advance();
        }

        assert_eq!(seen, ["●○○", "○●○", "○○●", "●○○"]);
    }

    #[test]
    fn reset_returns_to_start() {
        let mut animation = TypingAnimation::new();
        animation.advance();
        animation.reset();

        assert_eq!(animation.frame(), 0);
    }
}
