//! hidinject-live: forward terminal typing to the target as a USB keyboard.
//!
//! Takes no arguments.  Every key typed is sent to the target, ctrl chords
//! included, until ctrl+`]` (or the configured escape code) is pressed.

use clap::Parser;
use hidinject_core::keymap::KeymapProfile;

use hidinject_host::infrastructure::cli::{parse_args_or_usage, run_live_tool};

/// Forward typing to the target machine.
#[derive(Debug, Parser)]
#[command(name = "hidinject-live", version)]
struct Cli {}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if parse_args_or_usage::<Cli>().is_none() {
        return Ok(());
    }
    run_live_tool(KeymapProfile::Interactive).await
}
