//! Poll-driven keyboard session.
//!
//! # Lifecycle
//!
//! ```text
//! Idle ──connect──▶ Connected ──backlog──▶ Draining ──empty──▶ Connected
//!                        │
//!                        └──live encoder──▶ Streaming
//!
//! any state ──escape / stop flag / transport failure──▶ Disconnected
//! ```
//!
//! `Disconnected` is terminal.  Every later poll returns
//! [`SessionError::SessionTerminated`].
//!
//! # The poll callback
//!
//! [`KeyboardSession::on_report_ready`] is what the emulation host calls each
//! time the host computer polls the interrupt-IN endpoint.  It is bounded and
//! never blocks: at most one live key is fed, then at most one report is
//! popped and handed to the [`HidTransport`].  An empty queue is a normal
//! outcome ([`PollOutcome::Idle`]) and sends nothing.
//!
//! If a key-down has been sent but its key-up has not when the session ends
//! by escape or stop request, the terminating poll sends the key-up first so
//! no key is left held on the target.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::queue::ReportQueue;
use crate::encoding::live::{LiveEncoder, LiveOutcome};
use crate::error::{SessionError, TerminationCause, TransportError};
use crate::keymap::table::InputKey;
use crate::report::{HidKeyReport, KEY_UP};

/// Puts one report on the wire.
///
/// Implemented by each emulation host (simulated endpoint, gadget device
/// file, test double).  A call must not block waiting for the host.
#[cfg_attr(test, mockall::automock)]
pub trait HidTransport {
    fn send(&mut self, report: HidKeyReport) -> Result<(), TransportError>;
}

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Created, not yet polled.
    Idle,
    /// Polled, nothing pending.
    Connected,
    /// Working through a macro or bulk-text backlog.
    Draining,
    /// Forwarding live input.
    Streaming,
    /// Ended.  Terminal.
    Disconnected,
}

/// Result of one poll callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// This report was handed to the transport.
    Sent(HidKeyReport),
    /// Nothing was pending; nothing was sent.
    Idle,
}

/// Counters kept for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub polls: u64,
    pub sent: u64,
    pub idle_polls: u64,
    pub dropped_keys: u64,
}

/// One emulated keyboard session.
#[derive(Debug)]
pub struct KeyboardSession {
    id: Uuid,
    queue: ReportQueue,
    live: Option<LiveEncoder>,
    state: SessionState,
    ended_by: Option<TerminationCause>,
    stop: Arc<AtomicBool>,
    key_held: bool,
    stats: SessionStats,
}

impl KeyboardSession {
    /// Creates a session that drains `queue`.  Producers may keep appending
    /// through [`queue_mut`](Self::queue_mut).
    pub fn new(queue: ReportQueue) -> Self {
        Self {
            id: Uuid::new_v4(),
            queue,
            live: None,
            state: SessionState::Idle,
            ended_by: None,
            stop: Arc::new(AtomicBool::new(false)),
            key_held: false,
            stats: SessionStats::default(),
        }
    }

    /// Attaches a live encoder; the session streams captured keys.
    pub fn with_live(mut self, encoder: LiveEncoder) -> Self {
        self.live = Some(encoder);
        self
    }

    /// Shares an externally owned stop flag (e.g. one set by a Ctrl+C
    /// handler).
    pub fn with_stop_flag(mut self, stop: Arc<AtomicBool>) -> Self {
        self.stop = stop;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Why the session ended, once it has.
    pub fn ended_by(&self) -> Option<TerminationCause> {
        self.ended_by
    }

    pub fn is_live(&self) -> bool {
        self.live.is_some()
    }

    /// A handle that ends the session on the next poll when set.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    pub fn queue(&self) -> &ReportQueue {
        &self.queue
    }

    pub fn queue_mut(&mut self) -> &mut ReportQueue {
        &mut self.queue
    }

    /// Returns `true` once nothing is pending and no key is held.
    pub fn is_drained(&self) -> bool {
        self.queue.is_empty() && !self.key_held
    }

    /// Marks the host as present.  Polling an idle session connects it
    /// implicitly, so calling this is optional.
    pub fn connect(&mut self) -> Result<(), SessionError> {
        match self.state {
            SessionState::Disconnected => Err(self.terminated_error()),
            SessionState::Idle => {
                info!(session = %self.id, live = self.is_live(), pending = self.queue.len(), "session connected");
                self.state = SessionState::Connected;
                self.refresh_state();
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Ends the session.  Idempotent: the first cause wins.
    pub fn terminate(&mut self, cause: TerminationCause) {
        if self.state == SessionState::Disconnected {
            return;
        }
        info!(
            session = %self.id,
            %cause,
            sent = self.stats.sent,
            pending = self.queue.len(),
            "session ended"
        );
        self.state = SessionState::Disconnected;
        self.ended_by = Some(cause);
    }

    /// Poll callback without live input.
    pub fn on_report_ready(
        &mut self,
        transport: &mut dyn HidTransport,
    ) -> Result<PollOutcome, SessionError> {
        self.poll_with_input(None, transport)
    }

    /// Poll callback: feed at most one captured key, then deliver at most one
    /// report.
    ///
    /// Returns [`SessionError::SessionTerminated`] when the session ends on
    /// this poll (escape code or stop flag) and on every poll after that.
    pub fn poll_with_input(
        &mut self,
        input: Option<InputKey>,
        transport: &mut dyn HidTransport,
    ) -> Result<PollOutcome, SessionError> {
        if self.state == SessionState::Disconnected {
            return Err(self.terminated_error());
        }
        if self.state == SessionState::Idle {
            self.connect()?;
        }
        self.stats.polls += 1;

        if self.stop.load(Ordering::SeqCst) {
            return self.finish(TerminationCause::StopRequested, transport);
        }

        if let Some(key) = input {
            match self.live {
                Some(encoder) => match encoder.feed(&mut self.queue, key) {
                    LiveOutcome::Terminate => {
                        return self.finish(TerminationCause::EscapeKey, transport);
                    }
                    LiveOutcome::Dropped(_) => self.stats.dropped_keys += 1,
                    LiveOutcome::Enqueued(_) => {}
                },
                None => {
                    warn!(?key, "live key received by a session without a live encoder; ignored");
                    self.stats.dropped_keys += 1;
                }
            }
        }

        let outcome = match self.queue.drain_one() {
            Some(report) => {
                self.deliver(report, transport)?;
                PollOutcome::Sent(report)
            }
            None => {
                self.stats.idle_polls += 1;
                PollOutcome::Idle
            }
        };
        self.refresh_state();
        Ok(outcome)
    }

    fn deliver(
        &mut self,
        report: HidKeyReport,
        transport: &mut dyn HidTransport,
    ) -> Result<(), SessionError> {
        if let Err(err) = transport.send(report) {
            warn!(session = %self.id, error = %err, "transport failed; disconnecting");
            self.terminate(TerminationCause::TransportLost);
            return Err(SessionError::TransportFailure(err));
        }
        self.stats.sent += 1;
        self.key_held = !report.is_key_up();
        Ok(())
    }

    /// Ends the session on this poll, releasing a held key first.
    fn finish(
        &mut self,
        cause: TerminationCause,
        transport: &mut dyn HidTransport,
    ) -> Result<PollOutcome, SessionError> {
        if self.key_held {
            debug!(session = %self.id, "releasing held key before disconnect");
            self.deliver(KEY_UP, transport)?;
        }
        self.terminate(cause);
        Err(SessionError::SessionTerminated(cause))
    }

    fn refresh_state(&mut self) {
        if matches!(self.state, SessionState::Disconnected | SessionState::Idle) {
            return;
        }
        let next = if self.live.is_some() {
            SessionState::Streaming
        } else if self.queue.is_empty() {
            SessionState::Connected
        } else {
            SessionState::Draining
        };
        if next != self.state {
            debug!(session = %self.id, from = ?self.state, to = ?next, "session state changed");
            self.state = next;
        }
    }

    fn terminated_error(&self) -> SessionError {
        SessionError::SessionTerminated(self.ended_by.unwrap_or(TerminationCause::StopRequested))
    }
}
