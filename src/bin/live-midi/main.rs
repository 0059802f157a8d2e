//! live-midi - print notes played on a MIDI input device
//!
//! Run with: cargo run
//! Logs go to stderr; set RUST_LOG=debug to see every decoded message.

mod app;
mod terminal;

use app::LiveMidi;
use tracing_subscriber::EnvFilter;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    LiveMidi::new().client_name("live-midi").run()
}
