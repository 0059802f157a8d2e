//! The listening loop.
//!
//! [`Monitor::listen`] blocks until either a MIDI event or a keyboard
//! [`Control`] arrives, so an idle monitor costs no CPU. Events that are
//! already queued are handled as one bounded batch per wake-up.

use std::io::Write;

use crossbeam_channel::{select, Receiver, TryRecvError};

use crate::error::{Error, Result};
use crate::io::converter::{describe, key_state};
use crate::io::keys::{Control, StopReason};
use crate::io::midi::MidiEvent;
use crate::theory::chord::{identify, HeldNotes};

/// Default number of queued events handled per wake-up.
pub const DEFAULT_BATCH_LIMIT: usize = 64;

/// Default capacity of the transport → monitor event queue.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// Monitor settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorConfig {
    pub client_name: String,
    pub show_chords: bool,
    pub batch_limit: usize,
    pub channel_capacity: usize,
}

impl MonitorConfig {
    pub fn new() -> Self {
        Self {
            client_name: "live-midi".to_string(),
            show_chords: false,
            batch_limit: DEFAULT_BATCH_LIMIT,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }

    /// Name the MIDI client registers with the system.
    pub fn client_name(mut self, name: impl Into<String>) -> Self {
        self.client_name = name.into();
        self
    }

    /// Start with chord display on (it can still be toggled with `c`).
    pub fn show_chords(mut self, show: bool) -> Self {
        self.show_chords = show;
        self
    }

    /// Clamped to at least 1.
    pub fn batch_limit(mut self, limit: usize) -> Self {
        self.batch_limit = limit.max(1);
        self
    }

    pub fn channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity.max(1);
        self
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    Listening,
    Stopped(StopReason),
}

pub struct Monitor {
    state: MonitorState,
    show_chords: bool,
    batch_limit: usize,
    held: HeldNotes,
    /// Last chord line printed, so a chord is announced once per change
    last_chord: Option<String>,
    handled: u64,
}

impl Monitor {
    pub fn new(config: &MonitorConfig) -> Self {
        Self {
            state: MonitorState::Listening,
            show_chords: config.show_chords,
            batch_limit: config.batch_limit.max(1),
            held: HeldNotes::new(),
            last_chord: None,
            handled: 0,
        }
    }

    pub fn state(&self) -> MonitorState {
        self.state
    }

    /// Number of MIDI events handled so far, note or not.
    pub fn handled(&self) -> u64 {
        self.handled
    }

    /// Runs until a stop control arrives.
    ///
    /// `port_name` is only used in the error when the event stream ends.
    pub fn listen<W: Write>(
        &mut self,
        port_name: &str,
        events: &Receiver<MidiEvent>,
        controls: &Receiver<Control>,
        out: &mut W,
    ) -> Result<StopReason> {
        loop {
            if let MonitorState::Stopped(reason) = self.state {
                return Ok(reason);
            }
            select! {
                recv(controls) -> control => {
                    let control = control
                        .map_err(|_| Error::Keyboard("key watcher stopped".to_string()))?;
                    self.apply(control, out)?;
                }
                recv(events) -> event => {
                    let event = event
                        .map_err(|_| Error::PortDisconnected(port_name.to_string()))?;
                    self.handle_batch(event, events, controls, out)?;
                }
            }
        }
    }

    /// Handles `first` plus whatever is already queued, checking for a stop before each event.
    fn handle_batch<W: Write>(
        &mut self,
        first: MidiEvent,
        events: &Receiver<MidiEvent>,
        controls: &Receiver<Control>,
        out: &mut W,
    ) -> Result<()> {
        let mut next = Some(first);
        let mut remaining = self.batch_limit;

        while let Some(event) = next.take() {
            if self.poll_controls(controls, out)? {
                return Ok(());
            }
            self.handle_event(&event, out)?;
            remaining -= 1;
            if remaining == 0 {
                break;
            }
            next = events.try_recv().ok();
        }
        out.flush()?;
        Ok(())
    }

    /// Applies any pending controls. Returns true once stopped.
    fn poll_controls<W: Write>(&mut self, controls: &Receiver<Control>, out: &mut W) -> Result<bool> {
        loop {
            match controls.try_recv() {
                Ok(control) => {
                    self.apply(control, out)?;
                    if let MonitorState::Stopped(_) = self.state {
                        return Ok(true);
                    }
                }
                Err(TryRecvError::Empty) => return Ok(false),
                Err(TryRecvError::Disconnected) => {
                    return Err(Error::Keyboard("key watcher stopped".to_string()))
                }
            }
        }
    }

    pub fn apply<W: Write>(&mut self, control: Control, out: &mut W) -> Result<()> {
        match control {
            Control::Stop(reason) => {
                tracing::debug!(?reason, handled = self.handled, "stopping monitor");
                write!(out, "\nExiting...\n")?;
                out.flush()?;
                self.state = MonitorState::Stopped(reason);
            }
            Control::ToggleChords => {
                self.show_chords = !self.show_chords;
                self.last_chord = None;
                let label = if self.show_chords { "on" } else { "off" };
                writeln!(out, "Chord display {label}")?;
                out.flush()?;
            }
        }
        Ok(())
    }

    /// Writes the transcript line for one event. Non-note events produce nothing.
    pub fn handle_event<W: Write>(&mut self, event: &MidiEvent, out: &mut W) -> Result<()> {
        self.handled += 1;
        tracing::debug!(kind = event.kind(), channel = ?event.channel(), ?event, "midi event");

        if let Some(line) = describe(event) {
            writeln!(out, "{line}")?;
        }

        if let Some((key, pressed)) = key_state(event) {
            let changed = if pressed {
                self.held.press(key)
            } else {
                self.held.release(key)
            };
            if changed && self.show_chords {
                self.announce_chord(out)?;
            }
        }
        Ok(())
    }

    fn announce_chord<W: Write>(&mut self, out: &mut W) -> Result<()> {
        let chord = identify(&self.held);
        let name = chord.map(|c| c.to_string());
        if let (Some(chord), Some(name)) = (chord, &name) {
            if self.last_chord.as_ref() != Some(name) {
                writeln!(out, "Intervals: {}", chord.intervals())?;
                writeln!(out, "Chord: {name}")?;
            }
        }
        self.last_chord = name;
        Ok(())
    }
}
