/*
Pitch Names
===========

Readable names for MIDI note numbers.
Middle C (C4) = MIDI note 60, which is the standard reference point.

Naming Convention:
- Natural notes: C4, D4, E4, etc.
- Sharps: C#4, D#4, etc. (flats are accepted when parsing, never produced)

Octave Range:
- C-1 (MIDI 0) to G9 (MIDI 127)

The MIDI formula: note_number = 12 * (octave + 1) + semitone
Where semitone: C=0, C#=1, D=2, D#=3, E=4, F=5, F#=6, G=7, G#=8, A=9, A#=10, B=11
*/

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Highest valid MIDI note number.
pub const MAX_NOTE: u8 = 127;

/// Pitch classes indexed by `note % 12`.
pub static PITCH_CLASSES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// A valid MIDI note number (0-127) that displays as its pitch name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PitchName(u8);

impl PitchName {
    /// Returns `None` for note numbers above 127.
    pub fn new(note: u8) -> Option<Self> {
        (note <= MAX_NOTE).then_some(Self(note))
    }

    pub fn note(self) -> u8 {
        self.0
    }

    /// Pitch class without octave, e.g. `"C#"`.
    pub fn pitch_class(self) -> &'static str {
        PITCH_CLASSES[(self.0 % 12) as usize]
    }

    /// Octave number, where note 0 sits in octave -1.
    pub fn octave(self) -> i8 {
        (self.0 / 12) as i8 - 1
    }
}

impl fmt::Display for PitchName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.pitch_class(), self.octave())
    }
}

/// Converts a MIDI note number to its pitch name, e.g. 60 -> `"C4"`.
///
/// Note numbers above 127 are rejected rather than wrapped.
pub fn note_name(note: u8) -> Option<String> {
    PitchName::new(note).map(|p| p.to_string())
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParsePitchError {
    #[error("unknown pitch class in {0:?}")]
    UnknownPitchClass(String),
    #[error("invalid octave in {0:?}")]
    InvalidOctave(String),
    #[error("{0:?} is outside the MIDI note range")]
    OutOfRange(String),
}

/// Semitone offset of a pitch class spelling, accepting sharps and flats.
fn semitone(class: &str) -> Option<i16> {
    let mut chars = class.chars();
    let base = match chars.next()?.to_ascii_uppercase() {
        'C' => 0,
        'D' => 2,
        'E' => 4,
        'F' => 5,
        'G' => 7,
        'A' => 9,
        'B' => 11,
        _ => return None,
    };
    let accidental = match chars.as_str() {
        "" => 0,
        "#" => 1,
        "b" => -1,
        _ => return None,
    };
    Some(base + accidental)
}

impl FromStr for PitchName {
    type Err = ParsePitchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        // Octave starts at the first digit or a leading minus sign after the class
        let split = s
            .char_indices()
            .skip(1)
            .find(|(_, c)| c.is_ascii_digit() || *c == '-')
            .map(|(i, _)| i)
            .ok_or_else(|| ParsePitchError::InvalidOctave(s.to_string()))?;
        let (class, octave) = s.split_at(split);

        let semitone =
            semitone(class).ok_or_else(|| ParsePitchError::UnknownPitchClass(s.to_string()))?;
        let octave: i16 = octave
            .parse()
            .map_err(|_| ParsePitchError::InvalidOctave(s.to_string()))?;

        octave
            .checked_add(1)
            .and_then(|o| o.checked_mul(12))
            .and_then(|n| n.checked_add(semitone))
            .and_then(|n| u8::try_from(n).ok())
            .and_then(PitchName::new)
            .ok_or_else(|| ParsePitchError::OutOfRange(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn middle_c_is_c4() {
        assert_eq!(note_name(60).as_deref(), Some("C4"));
    }

    #[test]
    fn a440_is_a4() {
        assert_eq!(note_name(69).as_deref(), Some("A4"));
    }

    #[test]
    fn range_ends() {
        assert_eq!(note_name(0).as_deref(), Some("C-1"));
        assert_eq!(note_name(127).as_deref(), Some("G9"));
    }

    #[test]
    fn sharps() {
        assert_eq!(note_name(61).as_deref(), Some("C#4"));
        assert_eq!(note_name(70).as_deref(), Some("A#4"));
    }

    #[test]
    fn matches_formula_for_every_note() {
        for n in 0..=MAX_NOTE {
            let expected = format!("{}{}", PITCH_CLASSES[(n % 12) as usize], n as i32 / 12 - 1);
            assert_eq!(note_name(n), Some(expected));
            // Pure: a second call gives the same answer
            assert_eq!(note_name(n), note_name(n));
        }
    }

    #[test]
    fn rejects_out_of_range() {
        for n in 128..=u8::MAX {
            assert_eq!(note_name(n), None);
            assert!(PitchName::new(n).is_none());
        }
    }

    #[test]
    fn parses_back_every_name() {
        for n in 0..=MAX_NOTE {
            let name = note_name(n).unwrap();
            let parsed: PitchName = name.parse().unwrap();
            assert_eq!(parsed.note(), n);
        }
    }

    #[test]
    fn parses_flats_as_aliases() {
        let db: PitchName = "Db4".parse().unwrap();
        let cs: PitchName = "C#4".parse().unwrap();
        assert_eq!(db, cs);
        assert_eq!(db.note(), 61);
    }

    #[test]
    fn parse_errors() {
        assert!(matches!(
            "H4".parse::<PitchName>(),
            Err(ParsePitchError::UnknownPitchClass(_))
        ));
        assert!(matches!(
            "C".parse::<PitchName>(),
            Err(ParsePitchError::InvalidOctave(_))
        ));
        assert!(matches!(
            "G#9".parse::<PitchName>(),
            Err(ParsePitchError::OutOfRange(_))
        ));
        assert!(matches!(
            "Cb-1".parse::<PitchName>(),
            Err(ParsePitchError::OutOfRange(_))
        ));
        for huge in ["C2730", "C32767", "B-32768"] {
            assert!(matches!(
                huge.parse::<PitchName>(),
                Err(ParsePitchError::OutOfRange(_))
            ));
        }
    }
}
