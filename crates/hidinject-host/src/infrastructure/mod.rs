//! Infrastructure layer: OS-facing adapters.
//!
//! Contains the emulation hosts, terminal key capture, file-system
//! configuration, logging setup and the command-line entry helpers.
//!
//! **Dependency rule**: `hidinject_core` MUST NOT depend on anything here.
//! The application layer uses this layer only through its traits and
//! configuration types.

pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod host;
pub mod key_capture;
