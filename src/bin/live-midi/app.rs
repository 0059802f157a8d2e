//! LiveMidi - application builder and runner

use color_eyre::eyre::{Result as EyreResult, WrapErr};

use live_midi::{
    io::{keys::KeyWatcher, port::MidirTransport},
    session::{self, Outcome},
    MonitorConfig,
};

use super::terminal::CrlfWriter;

/// Main application builder
pub struct LiveMidi {
    config: MonitorConfig,
}

impl LiveMidi {
    /// Create a new LiveMidi instance
    pub fn new() -> Self {
        Self {
            config: MonitorConfig::default(),
        }
    }

    /// Set the client name shown to other MIDI software
    pub fn client_name(mut self, name: &str) -> Self {
        self.config = self.config.client_name(name);
        self
    }

    /// Run the monitor (takes over the terminal until ESC)
    pub fn run(self) -> EyreResult<()> {
        let transport = MidirTransport::new(self.config.client_name.clone());
        let stdin = std::io::stdin();
        let mut input = stdin.lock();
        let mut out = CrlfWriter::new(std::io::stdout());

        let outcome = session::run(&transport, &self.config, &mut input, &mut out, || {
            KeyWatcher::spawn()
        })
        .wrap_err("MIDI monitor failed")?;

        match outcome {
            Outcome::NoPorts => tracing::info!("No MIDI input ports, nothing to do"),
            Outcome::Stopped {
                port,
                reason,
                events,
            } => tracing::info!(%port, ?reason, events, "Monitor stopped"),
        }
        Ok(())
    }
}

impl Default for LiveMidi {
    fn default() -> Self {
        Self::new()
    }
}
