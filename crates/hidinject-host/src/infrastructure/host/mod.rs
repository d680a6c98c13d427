//! Emulation hosts: the side of the wire that polls.
//!
//! A [`HostDriver`] owns the polling clock and the report sink.  It calls the
//! registered poll callback once per polling interval, handing it a
//! [`HidTransport`] to send at most one report through, until the callback
//! asks it to stop.
//!
//! # Implementations
//!
//! - [`simulated::SimulatedHost`] – sleeps one interval per poll and writes
//!   each report to the log.  Useful for dry runs.
//! - [`device_file::DeviceFileHost`] – writes each 3-byte report to a HID
//!   gadget character device (e.g. `/dev/hidg0` under Linux `configfs`).
//! - [`mock::MockHost`] – runs a fixed number of polls with no delay and
//!   records every report, for tests.

use std::ops::ControlFlow;
use std::path::PathBuf;

use hidinject_core::report::descriptor::InterruptEndpoint;
use hidinject_core::HidTransport;
use thiserror::Error;

pub mod device_file;
pub mod mock;
pub mod simulated;

/// Poll callback registered with a host.
pub type PollCallback<'a> = dyn FnMut(&mut dyn HidTransport) -> ControlFlow<()> + 'a;

/// Error type for host setup.
#[derive(Debug, Error)]
pub enum HostError {
    /// The report device could not be opened.
    #[error("failed to open HID device {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Something that polls the emulated keyboard.
pub trait HostDriver {
    /// Endpoint parameters this host polls with.
    fn endpoint(&self) -> InterruptEndpoint;

    /// Invokes `on_poll` once per polling interval until it returns
    /// [`ControlFlow::Break`].
    fn run(&mut self, on_poll: &mut PollCallback<'_>) -> Result<(), HostError>;
}

/// Builds the host selected in the configuration.
///
/// # Errors
///
/// Returns [`HostError::Open`] if a device transport is selected and the
/// device cannot be opened.
pub fn open_host(
    transport: &crate::infrastructure::config::TransportConfig,
    endpoint: InterruptEndpoint,
) -> Result<Box<dyn HostDriver + Send>, HostError> {
    use crate::infrastructure::config::TransportKind;

    match transport.kind {
        TransportKind::Simulated => Ok(Box::new(simulated::SimulatedHost::new(endpoint))),
        TransportKind::Device => Ok(Box::new(device_file::DeviceFileHost::open(
            &transport.device_path,
            endpoint,
        )?)),
    }
}
