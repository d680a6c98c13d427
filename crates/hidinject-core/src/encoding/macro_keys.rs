//! Fixed hotkey sequences with poll-counted delays.
//!
//! Delays are expressed in poll cycles, not wall-clock time, because the only
//! clock the device has is the host's polling.  One idle poll lasts one
//! endpoint polling interval; [`polls_for_duration`] converts a desired real
//! delay into a poll count for a given interval.

use std::time::Duration;

use tracing::debug;

use crate::domain::queue::ReportQueue;
use crate::report::HidKeyReport;

/// One step of a macro.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacroStep {
    /// Stay idle (all keys released) for this many polls.
    Delay(usize),
    /// Press and release a key combination.
    Chord(HidKeyReport),
}

/// An ordered list of delays and chords.
///
/// ```rust
/// use hidinject_core::{HidKeyCode, HidKeyReport, MacroEncoder, Modifiers, ReportQueue};
///
/// let open_terminal = HidKeyReport::new(Modifiers::CTRL | Modifiers::ALT, HidKeyCode::KeyT);
/// let mut queue = ReportQueue::new();
/// MacroEncoder::new().delay(100).chord(open_terminal).delay(100).encode(&mut queue);
/// assert_eq!(queue.len(), 202);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MacroEncoder {
    steps: Vec<MacroStep>,
}

impl MacroEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for the common "wait, then press" macro.
    pub fn hotkey(delay_polls: usize, chord: HidKeyReport) -> Self {
        Self::new().delay(delay_polls).chord(chord)
    }

    /// Appends an idle delay.  Zero-length delays are dropped.
    pub fn delay(mut self, polls: usize) -> Self {
        if polls > 0 {
            self.steps.push(MacroStep::Delay(polls));
        }
        self
    }

    /// Appends a chord press.
    pub fn chord(mut self, chord: HidKeyReport) -> Self {
        self.steps.push(MacroStep::Chord(chord));
        self
    }

    pub fn steps(&self) -> &[MacroStep] {
        &self.steps
    }

    /// Number of reports (and therefore polls) this macro will occupy.
    pub fn poll_count(&self) -> usize {
        self.steps
            .iter()
            .map(|step| match step {
                MacroStep::Delay(polls) => *polls,
                MacroStep::Chord(_) => 2,
            })
            .sum()
    }

    /// Appends the macro to `queue` and returns the number of reports added.
    pub fn encode(&self, queue: &mut ReportQueue) -> usize {
        let before = queue.len();
        for step in &self.steps {
            match *step {
                MacroStep::Delay(polls) => queue.push_idle_polls(polls),
                MacroStep::Chord(chord) => {
                    debug!(modifiers = %chord.modifiers, key = ?chord.key, "macro chord");
                    queue.push_keydown(chord);
                }
            }
        }
        queue.len() - before
    }
}

/// Converts a wall-clock delay into idle polls at `interval_ms` per poll,
/// rounding up so the real delay is never shorter than requested.
pub fn polls_for_duration(delay: Duration, interval_ms: u8) -> usize {
    let interval = u128::from(interval_ms.max(1));
    let millis = delay.as_millis();
    usize::try_from(millis.div_ceil(interval)).unwrap_or(usize::MAX)
}
