//! Host backed by a HID gadget character device.
//!
//! On Linux, a USB gadget configured through `configfs` with the `hid`
//! function exposes a character device (usually `/dev/hidg0`).  Every write
//! of one report to it is delivered to the host computer on its next
//! interrupt-IN poll, so the real host's polling paces the writes.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

use hidinject_core::report::descriptor::InterruptEndpoint;
use hidinject_core::report::REPORT_LEN;
use hidinject_core::{HidKeyReport, HidTransport, TransportError};
use tracing::info;

use super::{HostDriver, HostError, PollCallback};

/// Transport that writes raw 3-byte reports to any [`Write`] sink.
pub struct WriterTransport {
    sink: Box<dyn Write + Send>,
}

impl WriterTransport {
    pub fn new(sink: Box<dyn Write + Send>) -> Self {
        Self { sink }
    }
}

impl std::fmt::Debug for WriterTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WriterTransport").finish_non_exhaustive()
    }
}

impl HidTransport for WriterTransport {
    fn send(&mut self, report: HidKeyReport) -> Result<(), TransportError> {
        let bytes = report.to_bytes();
        let written = self.sink.write(&bytes).map_err(|e| match e.kind() {
            std::io::ErrorKind::BrokenPipe | std::io::ErrorKind::NotConnected => {
                TransportError::Disconnected(e.to_string())
            }
            _ => TransportError::Io(e),
        })?;
        if written != REPORT_LEN {
            return Err(TransportError::ShortWrite {
                written,
                expected: REPORT_LEN,
            });
        }
        self.sink.flush()?;
        Ok(())
    }
}

/// Writes reports to a device file, one per polling interval.
#[derive(Debug)]
pub struct DeviceFileHost {
    endpoint: InterruptEndpoint,
    transport: WriterTransport,
}

impl DeviceFileHost {
    /// Opens `path` for writing.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::Open`] if the device cannot be opened.
    pub fn open(path: &Path, endpoint: InterruptEndpoint) -> Result<Self, HostError> {
        let file = OpenOptions::new()
            .write(true)
            .open(path)
            .map_err(|source| HostError::Open {
                path: path.to_path_buf(),
                source,
            })?;
        info!(path = %path.display(), "HID device opened");
        Ok(Self::from_writer(Box::new(file), endpoint))
    }

    /// Uses an arbitrary sink in place of a device.
    pub fn from_writer(sink: Box<dyn Write + Send>, endpoint: InterruptEndpoint) -> Self {
        Self {
            endpoint,
            transport: WriterTransport::new(sink),
        }
    }
}

impl HostDriver for DeviceFileHost {
    fn endpoint(&self) -> InterruptEndpoint {
        self.endpoint
    }

    fn run(&mut self, on_poll: &mut PollCallback<'_>) -> Result<(), HostError> {
        let interval = Duration::from_millis(u64::from(self.endpoint.interval_ms.max(1)));
        while on_poll(&mut self.transport).is_continue() {
            std::thread::sleep(interval);
        }
        Ok(())
    }
}
