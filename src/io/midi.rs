//! Decoding of raw channel-voice bytes into [`MidiEvent`]s.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Centre position of the 14-bit pitch wheel.
pub const PITCH_BEND_CENTER: u16 = 0x2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MidiEvent {
    NoteOn { channel: u8, key: u8, velocity: u8 },
    NoteOff { channel: u8, key: u8, velocity: u8 },
    PolyPressure { channel: u8, key: u8, pressure: u8 },
    ControlChange { channel: u8, controller: u8, value: u8 },
    ProgramChange { channel: u8, program: u8 },
    ChannelPressure { channel: u8, pressure: u8 },
    PitchBend { channel: u8, value: u16 },
    /// System common / realtime / sysex; carried only so callers can ignore it.
    Other { status: u8 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("empty MIDI message")]
    Empty,
    #[error("byte {0:#04x} is not a status byte")]
    NotAStatusByte(u8),
    #[error("status {status:#04x} needs {expected} data bytes, got {actual}")]
    Truncated {
        status: u8,
        expected: usize,
        actual: usize,
    },
    #[error("data byte {0:#04x} has the high bit set")]
    InvalidDataByte(u8),
}

impl MidiEvent {
    /// Decodes one complete MIDI message (status byte first).
    ///
    /// Note-on with velocity 0 stays a `NoteOn`; the transport reports it that way.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        let (&status, data) = bytes.split_first().ok_or(DecodeError::Empty)?;
        if status & 0x80 == 0 {
            return Err(DecodeError::NotAStatusByte(status));
        }

        let channel = status & 0x0F;
        let expected = match status & 0xF0 {
            0xC0 | 0xD0 => 1,
            0xF0 => return Ok(MidiEvent::Other { status }),
            _ => 2,
        };
        if data.len() < expected {
            return Err(DecodeError::Truncated {
                status,
                expected,
                actual: data.len(),
            });
        }
        if let Some(&bad) = data[..expected].iter().find(|b| **b & 0x80 != 0) {
            return Err(DecodeError::InvalidDataByte(bad));
        }

        let event = match status & 0xF0 {
            0x80 => MidiEvent::NoteOff {
                channel,
                key: data[0],
                velocity: data[1],
            },
            0x90 => MidiEvent::NoteOn {
                channel,
                key: data[0],
                velocity: data[1],
            },
            0xA0 => MidiEvent::PolyPressure {
                channel,
                key: data[0],
                pressure: data[1],
            },
            0xB0 => MidiEvent::ControlChange {
                channel,
                controller: data[0],
                value: data[1],
            },
            0xC0 => MidiEvent::ProgramChange {
                channel,
                program: data[0],
            },
            0xD0 => MidiEvent::ChannelPressure {
                channel,
                pressure: data[0],
            },
            // 0xE0: LSB first, 7 bits each
            _ => MidiEvent::PitchBend {
                channel,
                value: ((data[1] as u16) << 7) | data[0] as u16,
            },
        };
        Ok(event)
    }

    /// Message type name, e.g. `"note_on"`.
    pub fn kind(&self) -> &'static str {
        match self {
            MidiEvent::NoteOn { .. } => "note_on",
            MidiEvent::NoteOff { .. } => "note_off",
            MidiEvent::PolyPressure { .. } => "polytouch",
            MidiEvent::ControlChange { .. } => "control_change",
            MidiEvent::ProgramChange { .. } => "program_change",
            MidiEvent::ChannelPressure { .. } => "aftertouch",
            MidiEvent::PitchBend { .. } => "pitchwheel",
            MidiEvent::Other { .. } => "other",
        }
    }

    pub fn channel(&self) -> Option<u8> {
        match *self {
            MidiEvent::NoteOn { channel, .. }
            | MidiEvent::NoteOff { channel, .. }
            | MidiEvent::PolyPressure { channel, .. }
            | MidiEvent::ControlChange { channel, .. }
            | MidiEvent::ProgramChange { channel, .. }
            | MidiEvent::ChannelPressure { channel, .. }
            | MidiEvent::PitchBend { channel, .. } => Some(channel),
            MidiEvent::Other { .. } => None,
        }
    }
}
