//! Live passthrough use case.
//!
//! Starts a key source, streams every captured key to the target through
//! the selected table, and ends when the escape code arrives.  The same use
//! case serves the hotkeys mode with a different table.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use hidinject_core::keymap::KeymapProfile;
use hidinject_core::{InputKey, KeyboardSession, LiveEncoder, ReportQueue};
use tracing::info;

use crate::application::drive::{drive_session, RunError, RunSummary, StopWhen};
use crate::infrastructure::config::LiveConfig;
use crate::infrastructure::host::HostDriver;
use crate::infrastructure::key_capture::KeySource;

/// Table and escape code for one live run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiveSettings {
    pub profile: KeymapProfile,
    pub escape: InputKey,
}

impl LiveSettings {
    pub fn from_config(profile: KeymapProfile, cfg: &LiveConfig) -> Self {
        Self {
            profile,
            escape: InputKey::Ascii(cfg.escape_code),
        }
    }
}

/// Runs a live session until the escape code, the stop flag, or the end of
/// capture.  The key source is stopped before returning, on every path.
pub fn run_live(
    source: &dyn KeySource,
    host: &mut dyn HostDriver,
    settings: LiveSettings,
    stop: Arc<AtomicBool>,
) -> Result<RunSummary, RunError> {
    let encoder = LiveEncoder::new(settings.profile.table()).with_escape(settings.escape);
    let mut session = KeyboardSession::new(ReportQueue::new())
        .with_live(encoder)
        .with_stop_flag(stop);
    info!(session = %session.id(), profile = ?settings.profile, "live session starting");

    let keys = source.start()?;
    let result = drive_session(&mut session, host, Some(&keys), StopWhen::Terminated);
    source.stop();
    result
}
