//! Application layer use cases.
//!
//! # What is the "application" layer? (for beginners)
//!
//! Use cases here orchestrate core objects (encoders, queue, session) to
//! fulfil a user goal.  They talk to the outside world only through traits
//! ([`HostDriver`](crate::infrastructure::host::HostDriver),
//! [`KeySource`](crate::infrastructure::key_capture::KeySource)), so tests
//! can drive them with the mock host and mock key source.
//!
//! # Sub-modules
//!
//! - **`drive`** – The poll loop glue shared by every mode: registers the
//!   session's poll callback with a host and decides when to stop.
//! - **`deploy_file`** – Builds the "open a terminal, then type the file as a
//!   here-document" queue and drains it.
//! - **`live_session`** – Wires a key source into a streaming session that
//!   runs until the escape code.

pub mod deploy_file;
pub mod drive;
pub mod live_session;
