//! Live key capture for the interactive modes.
//!
//! The production source puts the terminal in raw mode and reads key events
//! with `crossterm` on a dedicated thread.  Captured keys are translated to
//! [`InputKey`]s and handed over through an `mpsc` channel, so the poll
//! callback only ever does a non-blocking `try_recv`.
//!
//! # Testability
//!
//! The [`KeySource`] trait lets tests inject keys through
//! [`mock::MockKeySource`] without a terminal.

use std::sync::mpsc;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use hidinject_core::keymap::table::ESC;
use hidinject_core::{InputKey, SpecialKey};

pub mod mock;
pub mod terminal;

/// Error type for key capture.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("failed to enter terminal raw mode: {0}")]
    RawMode(#[source] std::io::Error),
    #[error("failed to spawn capture thread: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("capture has already been started")]
    AlreadyStarted,
}

/// Produces live keys.
pub trait KeySource: Send {
    /// Starts capturing and returns the receiving end of the key channel.
    fn start(&self) -> Result<mpsc::Receiver<InputKey>, CaptureError>;
    /// Stops capturing and releases the terminal.  Idempotent.
    fn stop(&self);
}

/// Translates a terminal key event into the input alphabet of the tables.
///
/// Ctrl+letter becomes control code 1..=26.  Ctrl with `[ \ ] ^ _` (which
/// many terminals report as ctrl+`3`..`7`) becomes 0x1B..=0x1F, so ctrl+`]`
/// arrives as 0x1D.  Carriage return is folded into newline and DEL into
/// backspace.  Releases and repeats reported by enhanced keyboards are
/// ignored.
pub fn translate(event: KeyEvent) -> Option<InputKey> {
    if event.kind != KeyEventKind::Press {
        return None;
    }
    let ctrl = event.modifiers.contains(KeyModifiers::CONTROL);
    match event.code {
        KeyCode::Char(c) if ctrl => control_code(c).map(InputKey::Ascii),
        KeyCode::Char('\r') | KeyCode::Char('\n') | KeyCode::Enter => Some(InputKey::Ascii(b'\n')),
        KeyCode::Char('\x7f') => Some(SpecialKey::Backspace.into()),
        KeyCode::Char(c) => InputKey::from_char(c),
        KeyCode::Tab => Some(InputKey::Ascii(b'\t')),
        KeyCode::Backspace => Some(SpecialKey::Backspace.into()),
        KeyCode::Delete => Some(SpecialKey::Delete.into()),
        KeyCode::Esc => Some(InputKey::Ascii(ESC)),
        KeyCode::Up => Some(SpecialKey::ArrowUp.into()),
        KeyCode::Down => Some(SpecialKey::ArrowDown.into()),
        KeyCode::Left => Some(SpecialKey::ArrowLeft.into()),
        KeyCode::Right => Some(SpecialKey::ArrowRight.into()),
        _ => None,
    }
}

fn control_code(c: char) -> Option<u8> {
    match c.to_ascii_lowercase() {
        l @ 'a'..='z' => Some(l as u8 - b'a' + 1),
        '[' | '3' => Some(0x1B),
        '\\' | '4' => Some(0x1C),
        ']' | '5' => Some(0x1D),
        '^' | '6' => Some(0x1E),
        '_' | '7' => Some(0x1F),
        _ => None,
    }
}
