//! Live single-key passthrough.
//!
//! Each captured key is translated and queued immediately.  One configured
//! input (ctrl+`]` by default) is the escape code: it is checked before the
//! table lookup, is never forwarded to the target, and ends the session.

use tracing::{debug, trace};

use crate::domain::queue::ReportQueue;
use crate::keymap::table::{InputKey, KeyCodeTable, CTRL_RIGHT_BRACKET};
use crate::report::HidKeyReport;

/// What happened to one fed key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiveOutcome {
    /// The key was queued as this report (plus its key-up).
    Enqueued(HidKeyReport),
    /// The key has no mapping; nothing was queued.
    Dropped(InputKey),
    /// The escape code arrived; the session should end.
    Terminate,
}

/// Translates captured keys one at a time.
#[derive(Debug, Clone, Copy)]
pub struct LiveEncoder {
    table: &'static KeyCodeTable,
    escape: InputKey,
}

impl LiveEncoder {
    /// Default escape code: ctrl+`]`, the same key telnet uses.
    pub const DEFAULT_ESCAPE: InputKey = InputKey::Ascii(CTRL_RIGHT_BRACKET);

    pub fn new(table: &'static KeyCodeTable) -> Self {
        Self {
            table,
            escape: Self::DEFAULT_ESCAPE,
        }
    }

    /// Replaces the escape code.
    pub fn with_escape(mut self, escape: InputKey) -> Self {
        self.escape = escape;
        self
    }

    pub fn escape(&self) -> InputKey {
        self.escape
    }

    pub fn table(&self) -> &'static KeyCodeTable {
        self.table
    }

    /// Handles one captured key.
    pub fn feed(&self, queue: &mut ReportQueue, key: InputKey) -> LiveOutcome {
        if key == self.escape {
            debug!(?key, "escape code received");
            return LiveOutcome::Terminate;
        }
        match self.table.lookup(key) {
            Some(report) => {
                trace!(?key, %report, "live key queued");
                queue.push_keydown(report);
                LiveOutcome::Enqueued(report)
            }
            None => {
                debug!(?key, "live key has no mapping; dropped");
                LiveOutcome::Dropped(key)
            }
        }
    }
}
