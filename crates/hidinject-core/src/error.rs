//! Error types shared by the session and its transport.
//!
//! Two outcomes that look like errors are deliberately *not* errors here:
//!
//! - An unmapped key is skipped by the encoders and reported in their return
//!   value; a whole batch never fails because of one character.
//! - An empty queue is a normal poll result ([`crate::PollOutcome::Idle`]).

use std::fmt;

use thiserror::Error;

use crate::keymap::table::InputKey;

/// Failure raised by the transport collaborator.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The emulation adapter or device went away.
    #[error("transport disconnected: {0}")]
    Disconnected(String),

    /// Writing a report failed at the I/O layer.
    #[error("I/O error while sending report: {0}")]
    Io(#[from] std::io::Error),

    /// The transport accepted fewer bytes than a full report.
    #[error("short write: sent {written} of {expected} bytes")]
    ShortWrite { written: usize, expected: usize },
}

/// Why a session reached `Disconnected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationCause {
    /// The live escape code was received.
    EscapeKey,
    /// The external stop flag was raised (e.g. Ctrl+C).
    StopRequested,
    /// The transport failed or went away.
    TransportLost,
}

impl fmt::Display for TerminationCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TerminationCause::EscapeKey => "escape key received",
            TerminationCause::StopRequested => "stop requested",
            TerminationCause::TransportLost => "transport lost",
        };
        f.write_str(text)
    }
}

/// Errors surfaced by [`crate::KeyboardSession`].
#[derive(Debug, Error)]
pub enum SessionError {
    /// The key has no entry in the active table.  Recovered locally by the
    /// encoders; only returned by strict single-key helpers.
    #[error("no HID mapping for {0:?}")]
    UnmappedKey(InputKey),

    /// The session ended in an orderly way.  Not a crash condition.
    #[error("session terminated: {0}")]
    SessionTerminated(TerminationCause),

    /// The transport failed; the session is over.
    #[error("transport failure: {0}")]
    TransportFailure(#[from] TransportError),
}

impl SessionError {
    /// Returns `true` for an orderly shutdown.
    pub fn is_terminated(&self) -> bool {
        matches!(self, SessionError::SessionTerminated(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_error_converts_into_session_error() {
        let err: SessionError = TransportError::Disconnected("unplugged".into()).into();
        assert!(matches!(err, SessionError::TransportFailure(_)));
        assert!(!err.is_terminated());
        assert_eq!(err.to_string(), "transport failure: transport disconnected: unplugged");
    }

    #[test]
    fn test_terminated_error_message_names_cause() {
        let err = SessionError::SessionTerminated(TerminationCause::EscapeKey);
        assert!(err.is_terminated());
        assert_eq!(err.to_string(), "session terminated: escape key received");
    }

    #[test]
    fn test_short_write_message() {
        let err = TransportError::ShortWrite { written: 1, expected: 3 };
        assert_eq!(err.to_string(), "short write: sent 1 of 3 bytes");
    }
}
