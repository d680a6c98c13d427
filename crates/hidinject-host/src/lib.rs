//! hidinject-host library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/` and
//! the three binaries in `src/bin/` share the same module tree.
//!
//! The core crate knows how to turn keys into reports and when to hand one
//! over.  This crate supplies everything around it: something that polls
//! (a [`HostDriver`](infrastructure::host::HostDriver)), something that
//! produces live keys (a [`KeySource`](infrastructure::key_capture::KeySource)),
//! configuration, and logging that stays out of the way of a raw-mode
//! terminal.

pub mod application;
pub mod infrastructure;
