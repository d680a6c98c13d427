//! hidinject-hotkeys: trigger hotkey-bound actions on the target.
//!
//! Takes no arguments.  Keys `1`..`9` and `0` send ctrl+shift+F1..F10, `d`
//! sends ctrl+alt+del and `p` sends print screen.  Enter, escape and the
//! arrow keys pass through.  Ctrl+`]` exits.

use clap::Parser;
use hidinject_core::keymap::KeymapProfile;

use hidinject_host::infrastructure::cli::{parse_args_or_usage, run_live_tool};

/// Send hotkey chords to the target machine.
#[derive(Debug, Parser)]
#[command(name = "hidinject-hotkeys", version)]
struct Cli {}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if parse_args_or_usage::<Cli>().is_none() {
        return Ok(());
    }
    run_live_tool(KeymapProfile::Hotkeys).await
}
