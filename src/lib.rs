pub mod error;
pub mod io; // MIDI transport, keyboard, event formatting
pub mod monitor;
pub mod prompt;
pub mod session;
pub mod theory; // Pitch names and chords

pub use error::{Error, Result};
pub use monitor::{Monitor, MonitorConfig};
pub use session::Outcome;
