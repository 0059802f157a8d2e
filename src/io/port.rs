//! MIDI input transport.
//!
//! [`MidiTransport`] enumerates and opens input ports. An opened port pushes
//! decoded events into a crossbeam channel until it is closed. [`OpenPort`]
//! owns the port for the length of a session and closes it exactly once.

use crossbeam_channel::{Sender, TrySendError};

use crate::error::Result;
use crate::io::midi::MidiEvent;

/// A connected input endpoint.
pub trait InputPort {
    fn name(&self) -> &str;

    /// Disconnects from the device. Events stop arriving after this returns.
    fn close(self) -> Result<()>;
}

pub trait MidiTransport {
    type Port: InputPort;

    /// Names of the available input ports, in enumeration order.
    fn input_ports(&self) -> Result<Vec<String>>;

    /// Connects to the port at `index` (0-based) and delivers its events to `events`.
    fn open(&self, index: usize, events: Sender<MidiEvent>) -> Result<Self::Port>;
}

/// Scoped ownership of an open port.
///
/// Call [`OpenPort::close`] on the normal path to see close errors. If the
/// guard is dropped first (early return, panic) the port is closed in `Drop`.
pub struct OpenPort<P: InputPort> {
    port: Option<P>,
    name: String,
}

impl<P: InputPort> OpenPort<P> {
    pub fn new(port: P) -> Self {
        let name = port.name().to_string();
        tracing::info!("Opened MIDI input port {}", name);
        Self {
            port: Some(port),
            name,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn close(mut self) -> Result<()> {
        match self.port.take() {
            Some(port) => {
                tracing::info!("Closing MIDI input port {}", self.name);
                port.close()
            }
            None => Ok(()),
        }
    }
}

impl<P: InputPort> Drop for OpenPort<P> {
    fn drop(&mut self) {
        if let Some(port) = self.port.take() {
            tracing::info!("Closing MIDI input port {} on drop", self.name);
            if let Err(e) = port.close() {
                tracing::warn!("Failed to close MIDI port {}: {}", self.name, e);
            }
        }
    }
}

/// Decodes one raw message and queues it without blocking.
///
/// Returns false if the message was dropped: malformed, queue full, or
/// nobody listening any more.
pub fn forward(events: &Sender<MidiEvent>, message: &[u8]) -> bool {
    let event = match MidiEvent::from_bytes(message) {
        Ok(event) => event,
        Err(e) => {
            tracing::debug!("Failed to parse MIDI message {:02x?}: {}", message, e);
            return false;
        }
    };
    match events.try_send(event) {
        Ok(()) => true,
        Err(TrySendError::Full(_)) => {
            tracing::debug!("MIDI event queue full, dropping event");
            false
        }
        // Monitor already gone; nothing left to deliver to
        Err(TrySendError::Disconnected(_)) => false,
    }
}

#[cfg(feature = "midi-io")]
pub use self::midir_backend::{MidirPort, MidirTransport};

#[cfg(feature = "midi-io")]
mod midir_backend {
    use crossbeam_channel::Sender;
    use midir::{Ignore, MidiInput, MidiInputConnection};

    use super::{forward, InputPort, MidiTransport};
    use crate::error::{Error, Result};
    use crate::io::midi::MidiEvent;

    /// Hardware and virtual ports through `midir`.
    #[derive(Debug, Clone)]
    pub struct MidirTransport {
        client_name: String,
    }

    impl MidirTransport {
        pub fn new(client_name: impl Into<String>) -> Self {
            Self {
                client_name: client_name.into(),
            }
        }

        fn client(&self) -> Result<MidiInput> {
            let mut input = MidiInput::new(&self.client_name)?;
            input.ignore(Ignore::None);
            Ok(input)
        }
    }

    impl MidiTransport for MidirTransport {
        type Port = MidirPort;

        fn input_ports(&self) -> Result<Vec<String>> {
            let input = self.client()?;
            input
                .ports()
                .iter()
                .map(|port| input.port_name(port).map_err(Error::from))
                .collect()
        }

        fn open(&self, index: usize, events: Sender<MidiEvent>) -> Result<MidirPort> {
            let input = self.client()?;
            let ports = input.ports();
            let port = ports.get(index).ok_or(Error::PortNotFound(index))?;
            let name = input.port_name(port)?;

            let connection = input.connect(
                port,
                &format!("{}-input", self.client_name),
                move |_stamp, message, _| {
                    forward(&events, message);
                },
                (),
            )?;

            Ok(MidirPort { connection, name })
        }
    }

    pub struct MidirPort {
        connection: MidiInputConnection<()>,
        name: String,
    }

    impl InputPort for MidirPort {
        fn name(&self) -> &str {
            &self.name
        }

        fn close(self) -> Result<()> {
            let _ = self.connection.close();
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingPort {
        closes: Arc<AtomicUsize>,
    }

    impl InputPort for CountingPort {
        fn name(&self) -> &str {
            "counting"
        }

        fn close(self) -> Result<()> {
            self.closes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[test]
    fn forward_drops_when_queue_is_full() {
        let (events, rx) = crossbeam_channel::bounded(1);
        assert!(forward(&events, &[0x90, 60, 100]));
        // Second message must not block on the full queue
        assert!(!forward(&events, &[0x80, 60, 0]));
        assert_eq!(rx.len(), 1);
        assert_eq!(
            rx.try_recv().unwrap(),
            MidiEvent::NoteOn {
                channel: 0,
                key: 60,
                velocity: 100
            }
        );
    }

    #[test]
    fn forward_skips_malformed_and_closed() {
        let (events, rx) = crossbeam_channel::bounded(4);
        assert!(!forward(&events, &[0x90, 60]));
        assert!(rx.is_empty());
        drop(rx);
        assert!(!forward(&events, &[0x90, 60, 100]));
    }

    #[test]
    fn explicit_close_runs_once() {
        let closes = Arc::new(AtomicUsize::new(0));
        let port = OpenPort::new(CountingPort {
            closes: closes.clone(),
        });
        assert_eq!(port.name(), "counting");
        port.close().unwrap();
        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn drop_closes_once() {
        let closes = Arc::new(AtomicUsize::new(0));
        {
            let _port = OpenPort::new(CountingPort {
                closes: closes.clone(),
            });
        }
        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unwinding_closes_once() {
        let closes = Arc::new(AtomicUsize::new(0));
        let inner = closes.clone();
        let result = std::panic::catch_unwind(move || {
            let _port = OpenPort::new(CountingPort { closes: inner });
            panic!("fault inside the listening loop");
        });
        assert!(result.is_err());
        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }
}
