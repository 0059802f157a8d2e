//! Error types for the monitor.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("MIDI device error: {0}")]
    MidiInit(String),

    #[error("MIDI port error: {0}")]
    MidiPort(String),

    #[error("MIDI port {0} not found")]
    PortNotFound(usize),

    #[error("invalid port number {0:?}, expected a whole number")]
    InvalidSelection(String),

    #[error("port number {selected} is out of range, choose 1 to {count}")]
    SelectionOutOfRange { selected: usize, count: usize },

    #[error("no port number entered")]
    NoSelection,

    #[error("MIDI port {0} stopped delivering events")]
    PortDisconnected(String),

    #[error("keyboard error: {0}")]
    Keyboard(String),
}

#[cfg(feature = "midi-io")]
impl From<midir::InitError> for Error {
    fn from(e: midir::InitError) -> Self {
        Error::MidiInit(e.to_string())
    }
}

#[cfg(feature = "midi-io")]
impl From<midir::ConnectError<midir::MidiInput>> for Error {
    fn from(e: midir::ConnectError<midir::MidiInput>) -> Self {
        Error::MidiPort(e.to_string())
    }
}

#[cfg(feature = "midi-io")]
impl From<midir::PortInfoError> for Error {
    fn from(e: midir::PortInfoError) -> Self {
        Error::MidiPort(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
