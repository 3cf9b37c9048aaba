use std::time::{Duration, Instant};

use shared::domain::{CellPos, GRID_SIZE};
use tracing::debug;

use crate::{
    session::SessionController,
    types::{SessionPhase, VerificationResult, VerifyOutcome},
};

pub const MESSAGE_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKey {
    Digit(u8),
    Delete,
    Move(Direction),
    ToggleNotes,
}

impl InputKey {
    pub fn parse(name: &str) -> Option<Self> {
        let key = match name {
            "Backspace" | "Delete" | "0" => InputKey::Delete,
            "ArrowUp" => InputKey::Move(Direction::Up),
            "ArrowDown" => InputKey::Move(Direction::Down),
            "ArrowLeft" => InputKey::Move(Direction::Left),
            "ArrowRight" => InputKey::Move(Direction::Right),
            "n" | "N" => InputKey::ToggleNotes,
            other => {
                let digit = other.parse::<u8>().ok()?;
                if !(1..=9).contains(&digit) {
                    return None;
                }
                InputKey::Digit(digit)
            }
        };
        Some(key)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    cell: Option<CellPos>,
}

impl Selection {
    pub fn cell(&self) -> Option<CellPos> {
        self.cell
    }

    pub fn select(&mut self, row: usize, col: usize) -> bool {
        match CellPos::new(row, col) {
            Some(pos) => {
                self.cell = Some(pos);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.cell = None;
    }

    pub fn step(&mut self, direction: Direction) -> bool {
        let Some(current) = self.cell else {
            return false;
        };
        let last = GRID_SIZE - 1;
        let (row, col) = match direction {
            Direction::Up => (current.row.saturating_sub(1), current.col),
            Direction::Down => ((current.row + 1).min(last), current.col),
            Direction::Left => (current.row, current.col.saturating_sub(1)),
            Direction::Right => (current.row, (current.col + 1).min(last)),
        };
        let next = CellPos { row, col };
        let moved = next != current;
        self.cell = Some(next);
        moved
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransientMessage {
    text: String,
    shown_at: Instant,
}

impl TransientMessage {
    pub fn new(text: impl Into<String>, shown_at: Instant) -> Self {
        Self {
            text: text.into(),
            shown_at,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_visible(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) < MESSAGE_TTL
    }
}

pub fn verification_message(result: &VerificationResult) -> String {
    if let Some(message) = &result.message {
        return message.clone();
    }
    match result.outcome {
        VerifyOutcome::Solved => "Congratulations! You solved it!",
        VerifyOutcome::Incorrect => "Not quite right, keep trying!",
        VerifyOutcome::Incomplete => "Fill in every cell before checking.",
        VerifyOutcome::Unreachable => "Error checking solution",
        VerifyOutcome::Expired => "Your session has expired.",
    }
    .to_string()
}

#[derive(Debug, Default)]
pub struct InteractionLayer {
    selection: Selection,
    message: Option<TransientMessage>,
}

impl InteractionLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> Option<CellPos> {
        self.selection.cell()
    }

    pub async fn select(&mut self, controller: &SessionController, row: usize, col: usize) -> bool {
        if controller.phase().await == SessionPhase::Completed {
            return false;
        }
        self.selection.select(row, col)
    }

    pub async fn handle_key(&mut self, controller: &SessionController, key: InputKey) -> bool {
        if key == InputKey::ToggleNotes {
            controller.toggle_note_mode().await;
            return true;
        }

        let Some(pos) = self.selection.cell() else {
            return false;
        };

        match key {
            InputKey::Digit(digit) => {
                if !controller.note_mode().await
                    && controller.count_digit_usage(digit).await >= GRID_SIZE
                {
                    debug!(digit, "input: digit already placed nine times");
                    return false;
                }
                controller.set_cell(pos.row, pos.col, digit).await
            }
            InputKey::Delete => controller.delete_cell(pos.row, pos.col).await,
            InputKey::Move(direction) => {
                if controller.phase().await == SessionPhase::Completed {
                    return false;
                }
                self.selection.step(direction)
            }
            InputKey::ToggleNotes => false,
        }
    }

    pub fn show_message(&mut self, text: impl Into<String>, now: Instant) {
        self.message = Some(TransientMessage::new(text, now));
    }

    pub fn show_verification(&mut self, result: &VerificationResult, now: Instant) {
        self.show_message(verification_message(result), now);
    }

    pub fn message(&mut self, now: Instant) -> Option<&str> {
        if self
            .message
            .as_ref()
            .is_some_and(|message| !message.is_visible(now))
        {
            self.message = None;
        }
        self.message.as_ref().map(TransientMessage::text)
    }
}

#[cfg(test)]
#[path = "tests/input_tests.rs"]
mod tests;
