//! Timer-driven host that logs reports instead of sending them anywhere.

use std::time::Duration;

use hidinject_core::report::descriptor::{
    InterruptEndpoint, DEFAULT_IDENTITY, INTERFACE_CLASS_HID, KEYBOARD_REPORT_DESCRIPTOR,
};
use hidinject_core::{HidKeyReport, HidTransport, TransportError};
use tracing::{debug, info, trace};

use super::{HostDriver, HostError, PollCallback};

/// Transport that writes each report to the log.
#[derive(Debug, Default)]
pub struct LogTransport {
    sent: u64,
}

impl LogTransport {
    pub fn sent(&self) -> u64 {
        self.sent
    }
}

impl HidTransport for LogTransport {
    fn send(&mut self, report: HidKeyReport) -> Result<(), TransportError> {
        self.sent += 1;
        if report.is_key_up() {
            trace!(%report, "report");
        } else {
            debug!(%report, modifiers = %report.modifiers, key = ?report.key, "report");
        }
        Ok(())
    }
}

/// Polls at the endpoint interval on the calling thread.
#[derive(Debug)]
pub struct SimulatedHost {
    endpoint: InterruptEndpoint,
    transport: LogTransport,
}

impl SimulatedHost {
    pub fn new(endpoint: InterruptEndpoint) -> Self {
        Self {
            endpoint,
            transport: LogTransport::default(),
        }
    }

    /// Reports logged so far.
    pub fn sent(&self) -> u64 {
        self.transport.sent()
    }
}

impl HostDriver for SimulatedHost {
    fn endpoint(&self) -> InterruptEndpoint {
        self.endpoint
    }

    fn run(&mut self, on_poll: &mut PollCallback<'_>) -> Result<(), HostError> {
        let interval = Duration::from_millis(u64::from(self.endpoint.interval_ms.max(1)));
        let identity = DEFAULT_IDENTITY;
        info!(
            vendor_id = identity.vendor_id,
            product_id = identity.product_id,
            product = identity.product,
            interface_class = INTERFACE_CLASS_HID,
            report_descriptor_len = KEYBOARD_REPORT_DESCRIPTOR.len(),
            endpoint = self.endpoint.number,
            interval_ms = self.endpoint.interval_ms,
            "simulated keyboard enumerated; polling"
        );
        while on_poll(&mut self.transport).is_continue() {
            std::thread::sleep(interval);
        }
        info!(sent = self.transport.sent(), "simulated host stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ops::ControlFlow;
    use hidinject_core::{HidKeyCode, KEY_UP};

    #[test]
    fn test_run_stops_when_callback_breaks() {
        // Arrange
        let mut host = SimulatedHost::new(InterruptEndpoint::DEPLOY);
        let mut polls = 0;

        // Act
        host.run(&mut |transport| {
            polls += 1;
            transport
                .send(HidKeyReport::plain(HidKeyCode::KeyA))
                .expect("log transport never fails");
            if polls == 3 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        })
        .expect("run");

        // Assert
        assert_eq!(polls, 3);
        assert_eq!(host.sent(), 3);
    }

    #[test]
    fn test_log_transport_counts_key_up_reports() {
        let mut transport = LogTransport::default();
        transport.send(KEY_UP).expect("send");
        assert_eq!(transport.sent(), 1);
    }
}
