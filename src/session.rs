//! One monitoring session: discover ports, ask which one, listen, close.

use std::io::{BufRead, Write};

use crossbeam_channel::bounded;

use crate::error::Result;
use crate::io::keys::{ControlSource, StopReason};
use crate::io::port::{MidiTransport, OpenPort};
use crate::monitor::{Monitor, MonitorConfig};
use crate::prompt;

pub const BANNER: &str = "Welcome to the Live MIDI Parser! Press ESC to stop.";
pub const NO_PORTS: &str =
    "No MIDI ports were found. Please connect your MIDI device and try again.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing to listen to; not an error.
    NoPorts,
    Stopped {
        port: String,
        reason: StopReason,
        events: u64,
    },
}

/// Runs a full session against `transport`.
///
/// `start_controls` is called only once the port is open, after the
/// selection has been read from `input`, so a keyboard watcher that takes
/// over the terminal cannot interfere with the prompt.
pub fn run<T, R, W, C, F>(
    transport: &T,
    config: &MonitorConfig,
    input: &mut R,
    out: &mut W,
    start_controls: F,
) -> Result<Outcome>
where
    T: MidiTransport,
    R: BufRead,
    W: Write,
    C: ControlSource,
    F: FnOnce() -> Result<C>,
{
    writeln!(out, "{BANNER}\n")?;

    let ports = transport.input_ports()?;
    tracing::debug!(count = ports.len(), "enumerated MIDI input ports");
    if ports.is_empty() {
        writeln!(out, "{NO_PORTS}")?;
        out.flush()?;
        return Ok(Outcome::NoPorts);
    }

    prompt::write_menu(out, &ports)?;
    let index = prompt::read_selection(input, out, ports.len())?;

    let (sender, events) = bounded(config.channel_capacity);
    let port = OpenPort::new(transport.open(index, sender)?);
    writeln!(out, "\nListening to MIDI port {}\n", port.name())?;
    out.flush()?;

    let controls = start_controls()?;
    let mut monitor = Monitor::new(config);
    let reason = monitor.listen(port.name(), &events, controls.controls(), out)?;

    let name = port.name().to_string();
    port.close()?;
    drop(controls);
    writeln!(out, "Exited gracefully.")?;
    out.flush()?;

    Ok(Outcome::Stopped {
        port: name,
        reason,
        events: monitor.handled(),
    })
}
