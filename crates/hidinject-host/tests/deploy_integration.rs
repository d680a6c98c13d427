//! Integration tests for the deploy pipeline and the `hidinject-deploy`
//! binary's command-line contract.

use std::process::Command;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use hidinject_core::keymap::TEXT;
use hidinject_core::report::descriptor::InterruptEndpoint;
use hidinject_core::HidKeyReport;
use hidinject_host::application::deploy_file::{plan_deploy_from_path, run_deploy};
use hidinject_host::infrastructure::config::{load_config_from, DeployConfig};
use hidinject_host::infrastructure::host::device_file::DeviceFileHost;
use hidinject_host::infrastructure::host::mock::MockHost;

const DEPLOY_BIN: &str = env!("CARGO_BIN_EXE_hidinject-deploy");

/// Maps key-down reports back to the characters that produced them.
fn typed_text(reports: &[HidKeyReport]) -> String {
    reports
        .iter()
        .filter(|r| !r.is_key_up())
        .filter_map(|r| (0u8..128).find(|&b| TEXT.lookup_byte(b) == Some(*r)))
        .map(char::from)
        .collect()
}

fn no_delay_config() -> DeployConfig {
    DeployConfig {
        startup_delay_polls: 0,
        post_hotkey_delay_polls: 0,
        ..DeployConfig::default()
    }
}

#[test]
fn test_deploy_types_here_document_for_file() {
    // Arrange
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("hello.sh");
    std::fs::write(&path, "echo 'Hello, world!'\n").expect("write");
    let plan = plan_deploy_from_path(&path, &no_delay_config()).expect("plan");
    let mut host = MockHost::new(100_000);

    // Act
    run_deploy(plan, &mut host, Arc::new(AtomicBool::new(false)), true).expect("run");

    // Assert: the hotkey comes first, then the here-document.
    let sent = host.sent();
    assert_eq!(sent[0].to_bytes(), [0x05, 0x00, 0x17]);
    assert!(sent[1].is_key_up());
    let expected = format!("cat > {} << EOL\necho 'Hello, world!'\nEOL\n", path.display());
    assert_eq!(typed_text(&sent[2..]), expected);
}

#[test]
fn test_deploy_to_device_file_writes_three_byte_frames() {
    // Arrange
    let dir = tempfile::tempdir().expect("tempdir");
    let source = dir.path().join("a");
    std::fs::write(&source, "x").expect("write");
    let device = dir.path().join("hidg0");
    std::fs::write(&device, b"").expect("create device stand-in");
    let plan = plan_deploy_from_path(&source, &no_delay_config()).expect("plan");
    let expected_reports = plan.queue.len();
    let mut host =
        DeviceFileHost::open(&device, InterruptEndpoint::DEPLOY.with_interval(1)).expect("open");

    // Act
    run_deploy(plan, &mut host, Arc::new(AtomicBool::new(false)), true).expect("run");

    // Assert
    let bytes = std::fs::read(&device).expect("read back");
    assert_eq!(bytes.len(), expected_reports * 3);
    assert!(bytes.chunks(3).all(|frame| frame[1] == 0));
}

#[test]
fn test_config_file_changes_terminator() {
    let dir = tempfile::tempdir().expect("tempdir");
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        "[deploy]\nstartup_delay_polls = 0\npost_hotkey_delay_polls = 0\nheredoc_terminator = \"END\"\n",
    )
    .expect("write config");
    let cfg = load_config_from(&cfg_path).expect("load");
    let file = dir.path().join("f");
    std::fs::write(&file, "z\n").expect("write");

    let plan = plan_deploy_from_path(&file, &cfg.deploy).expect("plan");
    let reports: Vec<_> = plan.queue.iter().copied().collect();

    assert!(typed_text(&reports).ends_with("z\nEND\n"));
}

#[test]
fn test_binary_without_argument_prints_usage_and_exits_zero() {
    let output = Command::new(DEPLOY_BIN).output().expect("spawn");

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Usage"));
}

#[test]
fn test_binary_with_extra_arguments_prints_usage_and_exits_zero() {
    let output = Command::new(DEPLOY_BIN)
        .args(["one.txt", "two.txt"])
        .output()
        .expect("spawn");

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Usage"));
}

#[test]
fn test_binary_dry_run_types_file_and_exits_zero() {
    // Arrange
    let dir = tempfile::tempdir().expect("tempdir");
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        "[deploy]\nstartup_delay_polls = 0\npost_hotkey_delay_polls = 0\n[transport]\nkind = \"simulated\"\n",
    )
    .expect("write config");
    let file = dir.path().join("tiny.txt");
    std::fs::write(&file, "ok\n").expect("write");

    // Act
    let output = Command::new(DEPLOY_BIN)
        .arg(&file)
        .env("HIDINJECT_CONFIG", &cfg_path)
        .env("RUST_LOG", "info")
        .output()
        .expect("spawn");

    // Assert
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(String::from_utf8_lossy(&output.stderr).contains("hidinject-deploy finished"));
}

#[test]
fn test_binary_with_unreadable_file_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = Command::new(DEPLOY_BIN)
        .arg(dir.path().join("missing.txt"))
        .env("HIDINJECT_CONFIG", dir.path().join("absent.toml"))
        .output()
        .expect("spawn");

    assert!(!output.status.success());
}
