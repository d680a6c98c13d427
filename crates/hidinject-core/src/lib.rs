//! # hidinject-core
//!
//! Keystroke-to-HID-report translation and the poll-driven report delivery
//! pipeline for a host-controlled USB keyboard emulator.
//!
//! This crate has zero dependencies on OS APIs, terminals, or USB hardware.
//! The transport that actually puts reports on the wire is abstracted behind
//! [`HidTransport`]; everything here can run inside a unit test.
//!
//! # Architecture overview (for beginners)
//!
//! A USB keyboard does not "push" keystrokes to the computer.  The host polls
//! the keyboard's interrupt-IN endpoint at a fixed interval, and on every poll
//! the device may hand over exactly one report describing which key is held
//! *right now*.  To type the word `Hi`, the device must therefore deliver four
//! reports over four polls: `H` down, all keys up, `i` down, all keys up.
//!
//! The crate is organised around that contract:
//!
//! - **`keymap`** – Static tables that translate an input character or a
//!   terminal special key into a 3-byte HID report (modifier mask, reserved
//!   byte, USB HID Usage ID).
//!
//! - **`report`** – The [`HidKeyReport`] value type and the USB descriptor
//!   constants a host needs to understand it.
//!
//! - **`domain`** – The [`ReportQueue`] (unbounded FIFO, one pop per poll) and
//!   the [`KeyboardSession`] state machine whose poll callback drains it.
//!
//! - **`encoding`** – Producers that fill the queue: fixed macro hotkeys, bulk
//!   text (including the shell here-document "save file" framing), and live
//!   single-key passthrough.

pub mod domain;
pub mod encoding;
pub mod error;
pub mod keymap;
pub mod report;

pub use domain::queue::ReportQueue;
pub use domain::session::{HidTransport, KeyboardSession, PollOutcome, SessionState};
pub use encoding::{EncodeSummary, LiveEncoder, LiveOutcome, MacroEncoder, TextEncoder};
pub use error::{SessionError, TerminationCause, TransportError};
pub use keymap::hid::HidKeyCode;
pub use keymap::table::{InputKey, KeyCodeTable, SpecialKey};
pub use report::{HidKeyReport, Modifiers, KEY_UP};
