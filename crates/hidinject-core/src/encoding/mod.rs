//! Producers that fill a [`ReportQueue`](crate::ReportQueue).
//!
//! All three strategies are built on the two queue primitives,
//! `push_keydown` (key-down plus automatic key-up) and `push_idle`:
//!
//! - [`MacroEncoder`] – fixed hotkey injection with poll-counted delays.
//! - [`TextEncoder`] – bulk text, plus the here-document "save file" framing.
//! - [`LiveEncoder`] – one captured key at a time, with an escape code that
//!   ends the session instead of being forwarded.

pub mod live;
pub mod macro_keys;
pub mod text;

pub use live::{LiveEncoder, LiveOutcome};
pub use macro_keys::{polls_for_duration, MacroEncoder, MacroStep};
pub use text::{EncodeSummary, HereDocument, SkippedByte, TextEncoder};
