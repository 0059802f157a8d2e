use crate::{io::midi::MidiEvent, theory::notes::PitchName};

/// Transcript line for a note event, e.g. `"Note ON: C4"`.
///
/// Everything that is not a note-on or note-off yields `None`.
pub fn describe(event: &MidiEvent) -> Option<String> {
    match *event {
        MidiEvent::NoteOn { key, .. } => PitchName::new(key).map(|p| format!("Note ON: {p}")),
        MidiEvent::NoteOff { key, .. } => PitchName::new(key).map(|p| format!("Note OFF: {p}")),
        _ => None,
    }
}

/// Whether the event presses (`Some(true)`) or releases (`Some(false)`) a key.
pub fn key_state(event: &MidiEvent) -> Option<(u8, bool)> {
    match *event {
        MidiEvent::NoteOn { key, velocity, .. } => Some((key, velocity > 0)),
        MidiEvent::NoteOff { key, .. } => Some((key, false)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_lines() {
        let on = MidiEvent::NoteOn {
            channel: 0,
            key: 60,
            velocity: 90,
        };
        let off = MidiEvent::NoteOff {
            channel: 0,
            key: 60,
            velocity: 0,
        };
        assert_eq!(describe(&on).as_deref(), Some("Note ON: C4"));
        assert_eq!(describe(&off).as_deref(), Some("Note OFF: C4"));
    }

    #[test]
    fn other_messages_are_silent() {
        let cc = MidiEvent::ControlChange {
            channel: 0,
            controller: 64,
            value: 127,
        };
        assert_eq!(describe(&cc), None);
        assert_eq!(key_state(&cc), None);
    }

    #[test]
    fn zero_velocity_releases() {
        let on = MidiEvent::NoteOn {
            channel: 0,
            key: 64,
            velocity: 0,
        };
        assert_eq!(key_state(&on), Some((64, false)));
    }
}
