//! Registers a session's poll callback with a host and runs it.

use std::ops::ControlFlow;
use std::sync::atomic::Ordering;
use std::sync::mpsc::{Receiver, TryRecvError};

use hidinject_core::domain::session::SessionStats;
use hidinject_core::{InputKey, KeyboardSession, SessionError, TerminationCause};
use thiserror::Error;
use tracing::{info, warn};

use crate::infrastructure::config::ConfigError;
use crate::infrastructure::host::{HostDriver, HostError};
use crate::infrastructure::key_capture::CaptureError;

/// Error type for a complete run.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Host(#[from] HostError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Capture(#[from] CaptureError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// When the loop should return on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopWhen {
    /// As soon as everything queued has been sent.
    Drained,
    /// Only when the session ends (escape code or stop flag).
    Terminated,
}

/// What a finished run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// `None` when the loop ended because the queue drained or the host
    /// stopped polling.
    pub ended_by: Option<TerminationCause>,
    pub stats: SessionStats,
}

/// Polls `session` through `host` until `stop_when` is met.
///
/// With `keys`, one captured key is taken per poll.  An orderly session end
/// is returned as `Ok`; a transport failure is returned as an error.
pub fn drive_session(
    session: &mut KeyboardSession,
    host: &mut dyn HostDriver,
    keys: Option<&Receiver<InputKey>>,
    stop_when: StopWhen,
) -> Result<RunSummary, RunError> {
    let mut failure = None;
    let mut capture_open = keys.is_some();

    host.run(&mut |transport| {
        let key = match keys {
            Some(rx) if capture_open => match rx.try_recv() {
                Ok(key) => Some(key),
                Err(TryRecvError::Empty) => None,
                Err(TryRecvError::Disconnected) => {
                    warn!("key capture ended; stopping session");
                    capture_open = false;
                    session.stop_handle().store(true, Ordering::SeqCst);
                    None
                }
            },
            _ => None,
        };

        match session.poll_with_input(key, transport) {
            Ok(_) if stop_when == StopWhen::Drained && session.is_drained() => ControlFlow::Break(()),
            Ok(_) => ControlFlow::Continue(()),
            Err(e) if e.is_terminated() => ControlFlow::Break(()),
            Err(e) => {
                failure = Some(e);
                ControlFlow::Break(())
            }
        }
    })?;

    if let Some(e) = failure {
        return Err(e.into());
    }

    let summary = RunSummary {
        ended_by: session.ended_by(),
        stats: session.stats(),
    };
    info!(
        session = %session.id(),
        sent = summary.stats.sent,
        polls = summary.stats.polls,
        ended_by = ?summary.ended_by,
        "run finished"
    );
    Ok(summary)
}
