//! Command-line plumbing shared by the binaries.
//!
//! A wrong argument count is not treated as a failure: the tools print their
//! usage line and exit with status 0.  `--help` and `--version` behave as
//! clap normally does.

use std::ffi::OsString;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Context;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use hidinject_core::keymap::KeymapProfile;
use hidinject_core::report::descriptor::InterruptEndpoint;
use tracing::info;

use crate::application::live_session::{run_live, LiveSettings};
use crate::infrastructure::config::load_config;
use crate::infrastructure::diagnostics::init_deferred_logging;
use crate::infrastructure::host::open_host;
use crate::infrastructure::key_capture::terminal::TerminalKeySource;

/// Parses `args`, or writes the usage line to `out` and returns `None`.
pub fn parse_or_usage<P, I, T>(args: I, out: &mut dyn Write) -> Option<P>
where
    P: Parser,
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match P::try_parse_from(args) {
        Ok(parsed) => Some(parsed),
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(_) => {
            // Usage goes to stdout; a failed write has nowhere better to go.
            let _ = writeln!(out, "{}", P::command().render_usage());
            None
        }
    }
}

/// Parses the process arguments, printing usage to stdout on a mismatch.
pub fn parse_args_or_usage<P: Parser>() -> Option<P> {
    parse_or_usage(std::env::args_os(), &mut std::io::stdout())
}

/// Raises `stop` when Ctrl+C is received.  Must be called inside a Tokio
/// runtime.
pub fn spawn_ctrl_c_handler(stop: Arc<AtomicBool>) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown signal received");
            stop.store(true, Ordering::SeqCst);
        }
    });
}

/// Shared body of the live and hotkeys tools.
///
/// Log output is held back while the terminal is in raw mode and written
/// once the session is over.
pub async fn run_live_tool(profile: KeymapProfile) -> anyhow::Result<()> {
    let cfg = load_config().context("failed to load configuration")?;
    let logs = init_deferred_logging(&cfg.general.log_level);

    let stop = Arc::new(AtomicBool::new(false));
    spawn_ctrl_c_handler(Arc::clone(&stop));

    let endpoint = InterruptEndpoint::INTERACTIVE.with_interval(cfg.live.poll_interval_ms);
    let mut host = open_host(&cfg.transport, endpoint).context("failed to start emulation host")?;
    let settings = LiveSettings::from_config(profile, &cfg.live);

    println!(
        "Typing is forwarded to the target. Press the escape key (code {}) to exit.",
        cfg.live.escape_code
    );

    let quiet = logs.suppress(|| {
        let _ = crossterm::terminal::disable_raw_mode();
    });
    let outcome = tokio::task::spawn_blocking(move || {
        let source = TerminalKeySource::new();
        run_live(&source, host.as_mut(), settings, stop)
    })
    .await;
    drop(quiet);

    let summary = outcome.context("live session task panicked")??;
    info!(
        sent = summary.stats.sent,
        dropped = summary.stats.dropped_keys,
        ended_by = ?summary.ended_by,
        "live session finished"
    );
    Ok(())
}
