//! hidinject-deploy: recreate a file on the target by typing it.
//!
//! ```text
//! hidinject-deploy <file>
//! ```
//!
//! Opens a terminal on the target with the configured hotkey, then types a
//! `cat > <file> << EOL` here-document containing the file.  A missing or
//! extra argument prints the usage line and exits with status 0.

use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use hidinject_core::report::descriptor::InterruptEndpoint;
use tracing::info;

use hidinject_host::application::deploy_file::{plan_deploy_from_path, run_deploy};
use hidinject_host::infrastructure::cli::{parse_args_or_usage, spawn_ctrl_c_handler};
use hidinject_host::infrastructure::config::load_config;
use hidinject_host::infrastructure::diagnostics::init_logging;
use hidinject_host::infrastructure::host::open_host;

/// Type a local file into a terminal on the target machine.
#[derive(Debug, Parser)]
#[command(name = "hidinject-deploy", version)]
struct Cli {
    /// File whose contents are typed; its path is also the name it is saved as.
    file: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let Some(cli) = parse_args_or_usage::<Cli>() else {
        return Ok(());
    };

    let cfg = load_config().context("failed to load configuration")?;
    init_logging(&cfg.general.log_level);
    info!(file = %cli.file.display(), "hidinject-deploy starting");

    let plan = plan_deploy_from_path(&cli.file, &cfg.deploy)
        .with_context(|| format!("cannot deploy {}", cli.file.display()))?;

    let stop = Arc::new(AtomicBool::new(false));
    spawn_ctrl_c_handler(Arc::clone(&stop));

    let endpoint = InterruptEndpoint::DEPLOY.with_interval(cfg.deploy.poll_interval_ms);
    let mut host = open_host(&cfg.transport, endpoint).context("failed to start emulation host")?;
    let exit_when_drained = cfg.deploy.exit_when_drained;

    let summary = tokio::task::spawn_blocking(move || {
        run_deploy(plan, host.as_mut(), stop, exit_when_drained)
    })
    .await
    .context("deploy task panicked")??;

    info!(sent = summary.stats.sent, ended_by = ?summary.ended_by, "hidinject-deploy finished");
    Ok(())
}
