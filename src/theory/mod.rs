// Purpose: note naming and chord recognition for incoming MIDI notes

pub mod chord;
pub mod notes;

pub use chord::{identify, interval_name, Chord, ChordQuality, HeldNotes};
pub use notes::{note_name, ParsePitchError, PitchName, PITCH_CLASSES};
