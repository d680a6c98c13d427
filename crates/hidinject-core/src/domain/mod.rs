//! Report delivery: the pending-report queue and the poll-driven session.

pub mod queue;
pub mod session;
