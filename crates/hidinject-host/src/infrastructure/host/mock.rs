//! Mock host for unit and integration testing.
//!
//! Runs polls back to back with no delay and records every report it is
//! given, so tests can assert on exactly what would have reached the wire.

use hidinject_core::report::descriptor::InterruptEndpoint;
use hidinject_core::{HidKeyReport, HidTransport, TransportError};

use super::{HostDriver, HostError, PollCallback};

/// Transport half of [`MockHost`].
#[derive(Debug, Default)]
pub struct RecordingTransport {
    pub sent: Vec<HidKeyReport>,
    /// When set, sends fail after this many successful reports.
    pub fail_after: Option<usize>,
}

impl HidTransport for RecordingTransport {
    fn send(&mut self, report: HidKeyReport) -> Result<(), TransportError> {
        if self.fail_after.is_some_and(|limit| self.sent.len() >= limit) {
            return Err(TransportError::Disconnected("mock host unplugged".into()));
        }
        self.sent.push(report);
        Ok(())
    }
}

/// A host that polls at most `max_polls` times.
#[derive(Debug)]
pub struct MockHost {
    endpoint: InterruptEndpoint,
    max_polls: usize,
    polls: usize,
    transport: RecordingTransport,
}

impl MockHost {
    pub fn new(max_polls: usize) -> Self {
        Self {
            endpoint: InterruptEndpoint::DEPLOY,
            max_polls,
            polls: 0,
            transport: RecordingTransport::default(),
        }
    }

    /// Makes the transport fail once `reports` have been sent.
    pub fn fail_after(mut self, reports: usize) -> Self {
        self.transport.fail_after = Some(reports);
        self
    }

    /// Reports received so far, in order.
    pub fn sent(&self) -> &[HidKeyReport] {
        &self.transport.sent
    }

    /// Poll callbacks made so far.
    pub fn polls(&self) -> usize {
        self.polls
    }
}

impl HostDriver for MockHost {
    fn endpoint(&self) -> InterruptEndpoint {
        self.endpoint
    }

    fn run(&mut self, on_poll: &mut PollCallback<'_>) -> Result<(), HostError> {
        while self.polls < self.max_polls {
            self.polls += 1;
            if on_poll(&mut self.transport).is_break() {
                break;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ops::ControlFlow;
    use hidinject_core::KEY_UP;

    #[test]
    fn test_mock_host_stops_at_poll_limit() {
        let mut host = MockHost::new(5);
        host.run(&mut |_| ControlFlow::Continue(())).expect("run");
        assert_eq!(host.polls(), 5);
    }

    #[test]
    fn test_mock_host_records_sent_reports() {
        let mut host = MockHost::new(2);
        host.run(&mut |t| {
            t.send(KEY_UP).expect("send");
            ControlFlow::Continue(())
        })
        .expect("run");
        assert_eq!(host.sent(), &[KEY_UP, KEY_UP]);
    }

    #[test]
    fn test_fail_after_rejects_later_sends() {
        let mut host = MockHost::new(3).fail_after(1);
        let mut failures = 0;
        host.run(&mut |t| {
            if t.send(KEY_UP).is_err() {
                failures += 1;
            }
            ControlFlow::Continue(())
        })
        .expect("run");
        assert_eq!(host.sent().len(), 1);
        assert_eq!(failures, 2);
    }
}
