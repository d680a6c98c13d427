//! Integration tests for the live and hotkeys use cases with mock adapters.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use hidinject_core::keymap::KeymapProfile;
use hidinject_core::{HidKeyCode, HidKeyReport, InputKey, Modifiers, SpecialKey, TerminationCause, KEY_UP};
use hidinject_host::application::live_session::{run_live, LiveSettings};
use hidinject_host::infrastructure::config::LiveConfig;
use hidinject_host::infrastructure::host::mock::MockHost;
use hidinject_host::infrastructure::key_capture::mock::MockKeySource;
use hidinject_host::infrastructure::key_capture::{CaptureError, KeySource};

/// Key source that has its keys ready the moment capture starts.
struct Scripted {
    inner: MockKeySource,
    keys: Vec<InputKey>,
}

impl Scripted {
    fn new(keys: Vec<InputKey>) -> Self {
        Self {
            inner: MockKeySource::new(),
            keys,
        }
    }
}

impl KeySource for Scripted {
    fn start(&self) -> Result<std::sync::mpsc::Receiver<InputKey>, CaptureError> {
        let rx = self.inner.start()?;
        for key in &self.keys {
            self.inner.inject_key(*key);
        }
        Ok(rx)
    }

    fn stop(&self) {
        self.inner.stop();
    }
}

fn settings(profile: KeymapProfile) -> LiveSettings {
    LiveSettings::from_config(profile, &LiveConfig::default())
}

#[test]
fn test_ctrl_c_and_arrows_are_forwarded_in_interactive_mode() {
    // Arrange
    let source = Scripted::new(vec![InputKey::Ascii(0x03), SpecialKey::ArrowUp.into()]);
    let mut host = MockHost::new(20);

    // Act
    run_live(&source, &mut host, settings(KeymapProfile::Interactive), Arc::new(AtomicBool::new(false)))
        .expect("run");

    // Assert
    assert_eq!(
        host.sent(),
        &[
            HidKeyReport::new(Modifiers::CTRL, HidKeyCode::KeyC),
            KEY_UP,
            HidKeyReport::plain(HidKeyCode::ArrowUp),
            KEY_UP,
        ]
    );
}

#[test]
fn test_hotkeys_mode_ignores_ordinary_letters() {
    let source = Scripted::new(vec![InputKey::Ascii(b'x'), InputKey::Ascii(b'd')]);
    let mut host = MockHost::new(20);

    let summary = run_live(&source, &mut host, settings(KeymapProfile::Hotkeys), Arc::new(AtomicBool::new(false)))
        .expect("run");

    assert_eq!(
        host.sent(),
        &[
            HidKeyReport::new(Modifiers::CTRL | Modifiers::ALT, HidKeyCode::Delete),
            KEY_UP,
        ]
    );
    assert_eq!(summary.stats.dropped_keys, 1);
}

#[test]
fn test_configured_escape_code_replaces_default() {
    let cfg = LiveConfig {
        escape_code: b'q',
        ..LiveConfig::default()
    };
    let source = Scripted::new(vec![InputKey::Ascii(0x1D), InputKey::Ascii(b'q')]);
    let mut host = MockHost::new(20);

    let summary = run_live(
        &source,
        &mut host,
        LiveSettings::from_config(KeymapProfile::Interactive, &cfg),
        Arc::new(AtomicBool::new(false)),
    )
    .expect("run");

    // 0x1D is an ordinary (unmapped) key now; 'q' ends the session.
    assert_eq!(summary.ended_by, Some(TerminationCause::EscapeKey));
    assert_eq!(summary.stats.dropped_keys, 1);
}

#[test]
fn test_stop_flag_ends_live_session() {
    let source = Scripted::new(vec![]);
    let stop = Arc::new(AtomicBool::new(false));
    stop.store(true, Ordering::SeqCst);
    let mut host = MockHost::new(20);

    let summary = run_live(&source, &mut host, settings(KeymapProfile::Interactive), stop).expect("run");

    assert_eq!(summary.ended_by, Some(TerminationCause::StopRequested));
    assert_eq!(host.polls(), 1);
}
