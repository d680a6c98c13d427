//! File-deploy use case.
//!
//! Recreates a local file on the target by typing it:
//!
//! 1. idle for `startup_delay_polls` so the host can bind its driver,
//! 2. press the open-terminal hotkey (ctrl+alt+t by default),
//! 3. idle for `post_hotkey_delay_polls` while the terminal opens,
//! 4. type `cat > {name} << EOL`, the file content, and `EOL`.
//!
//! The name typed is the path exactly as given on the command line.

use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use hidinject_core::encoding::HereDocument;
use hidinject_core::keymap::TEXT;
use hidinject_core::{EncodeSummary, KeyboardSession, MacroEncoder, ReportQueue, TextEncoder};
use thiserror::Error;
use tracing::{info, warn};

use crate::application::drive::{drive_session, RunError, RunSummary, StopWhen};
use crate::infrastructure::config::{ConfigError, DeployConfig};
use crate::infrastructure::host::HostDriver;

/// Error type for preparing a deploy.
#[derive(Debug, Error)]
pub enum DeployError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// A fully encoded deploy, ready to drain.
#[derive(Debug, Clone)]
pub struct DeployPlan {
    pub file_name: String,
    pub queue: ReportQueue,
    /// Typing result for the here-document part.
    pub summary: EncodeSummary,
}

/// Encodes the whole deploy sequence for `content` saved as `file_name`.
pub fn plan_deploy(
    file_name: &str,
    content: &[u8],
    cfg: &DeployConfig,
) -> Result<DeployPlan, ConfigError> {
    let hotkey = cfg.open_terminal_hotkey.to_report()?;
    let framing = HereDocument::new(cfg.heredoc_terminator.clone());

    let mut queue = ReportQueue::with_capacity(
        cfg.startup_delay_polls + cfg.post_hotkey_delay_polls + 2 * (content.len() + 64),
    );
    MacroEncoder::new()
        .delay(cfg.startup_delay_polls)
        .chord(hotkey)
        .delay(cfg.post_hotkey_delay_polls)
        .encode(&mut queue);
    let summary = TextEncoder::new(&TEXT).save_file(&mut queue, file_name, content, &framing);

    if !summary.is_complete() {
        warn!(
            file_name,
            skipped = summary.skipped.len(),
            first_offset = summary.skipped[0].offset,
            "file contains characters that cannot be typed; they will be missing on the target"
        );
    }
    info!(file_name, bytes = content.len(), reports = queue.len(), "deploy planned");

    Ok(DeployPlan {
        file_name: file_name.to_string(),
        queue,
        summary,
    })
}

/// Reads `path` and plans its deploy.
pub fn plan_deploy_from_path(path: &Path, cfg: &DeployConfig) -> Result<DeployPlan, DeployError> {
    let content = std::fs::read(path).map_err(|source| DeployError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(plan_deploy(&path.to_string_lossy(), &content, cfg)?)
}

/// Drains `plan` through `host`.
///
/// Returns once everything is typed when `exit_when_drained` is set,
/// otherwise keeps the device idling until `stop` is raised.
pub fn run_deploy(
    plan: DeployPlan,
    host: &mut dyn HostDriver,
    stop: Arc<AtomicBool>,
    exit_when_drained: bool,
) -> Result<RunSummary, RunError> {
    let mut session = KeyboardSession::new(plan.queue).with_stop_flag(stop);
    let stop_when = if exit_when_drained {
        StopWhen::Drained
    } else {
        StopWhen::Terminated
    };
    drive_session(&mut session, host, None, stop_when)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::config::HotkeyConfig;
    use crate::infrastructure::host::mock::MockHost;
    use hidinject_core::{HidKeyCode, HidKeyReport, Modifiers, KEY_UP};

    fn quick_config() -> DeployConfig {
        DeployConfig {
            startup_delay_polls: 2,
            post_hotkey_delay_polls: 1,
            ..DeployConfig::default()
        }
    }

    #[test]
    fn test_plan_starts_with_delay_hotkey_delay() {
        // Arrange / Act
        let plan = plan_deploy("f", b"x\n", &quick_config()).expect("plan");

        // Assert
        let head: Vec<_> = plan.queue.iter().take(5).copied().collect();
        assert_eq!(
            head,
            vec![
                KEY_UP,
                KEY_UP,
                HidKeyReport::new(Modifiers::CTRL | Modifiers::ALT, HidKeyCode::KeyT),
                KEY_UP,
                KEY_UP,
            ]
        );
    }

    #[test]
    fn test_plan_length_covers_framing_and_content() {
        let cfg = DeployConfig::default();
        let plan = plan_deploy("a.txt", b"hi\n", &cfg).expect("plan");
        let typed = "cat > a.txt << EOL\nhi\nEOL\n".len();
        assert_eq!(plan.queue.len(), 100 + 2 + 100 + 2 * typed);
        assert!(plan.summary.is_complete());
    }

    #[test]
    fn test_invalid_hotkey_is_rejected() {
        let cfg = DeployConfig {
            open_terminal_hotkey: HotkeyConfig {
                modifiers: 0,
                keycode: 0xFF,
            },
            ..DeployConfig::default()
        };
        assert!(matches!(
            plan_deploy("f", b"", &cfg),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn test_missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = plan_deploy_from_path(&dir.path().join("nope.txt"), &quick_config()).unwrap_err();
        assert!(matches!(err, DeployError::Read { .. }));
    }

    #[test]
    fn test_file_name_is_the_path_as_given() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("script.sh");
        std::fs::write(&path, "echo hi\n").expect("write");

        let plan = plan_deploy_from_path(&path, &quick_config()).expect("plan");

        assert_eq!(plan.file_name, path.to_string_lossy());
    }

    #[test]
    fn test_run_deploy_sends_every_planned_report() {
        // Arrange
        let plan = plan_deploy("f", b"ok\n", &quick_config()).expect("plan");
        let expected = plan.queue.len();
        let mut host = MockHost::new(10_000);

        // Act
        let summary =
            run_deploy(plan, &mut host, Arc::new(AtomicBool::new(false)), true).expect("run");

        // Assert
        assert_eq!(host.sent().len(), expected);
        assert_eq!(summary.stats.sent as usize, expected);
        assert_eq!(summary.ended_by, None);
    }
}
