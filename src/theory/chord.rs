//! Held-note tracking and chord naming.
//!
//! Chords are matched on the set of pitch classes above the lowest held note,
//! so voicing and octave doubling do not matter: `C4 E4 G4` and `C3 G4 E5`
//! are both `C Major`.

use std::collections::BTreeSet;
use std::fmt;

use super::notes::PitchName;

/// Notes currently held down, ordered low to high.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeldNotes {
    notes: BTreeSet<u8>,
}

impl HeldNotes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the note was not already held.
    pub fn press(&mut self, note: u8) -> bool {
        self.notes.insert(note)
    }

    /// Returns true if the note was held.
    pub fn release(&mut self, note: u8) -> bool {
        self.notes.remove(&note)
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn lowest(&self) -> Option<u8> {
        self.notes.first().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.notes.iter().copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChordQuality {
    Major,
    Minor,
    Diminished,
    Augmented,
    Sus2,
    Sus4,
    Dominant7,
    Major7,
    Minor7,
    MinorMajor7,
    HalfDiminished7,
    Diminished7,
    Augmented7,
    Dominant9,
    Major9,
    Minor9,
    Dominant7Flat9,
    Dominant7Sharp9,
}

impl ChordQuality {
    pub fn name(self) -> &'static str {
        match self {
            ChordQuality::Major => "Major",
            ChordQuality::Minor => "Minor",
            ChordQuality::Diminished => "Diminished",
            ChordQuality::Augmented => "Augmented",
            ChordQuality::Sus2 => "Sus2",
            ChordQuality::Sus4 => "Sus4",
            ChordQuality::Dominant7 => "Dominant 7th",
            ChordQuality::Major7 => "Major 7th",
            ChordQuality::Minor7 => "Minor 7th",
            ChordQuality::MinorMajor7 => "Minor Major 7th",
            ChordQuality::HalfDiminished7 => "Half-Diminished 7th",
            ChordQuality::Diminished7 => "Diminished 7th",
            ChordQuality::Augmented7 => "Augmented 7th",
            ChordQuality::Dominant9 => "Dominant 9th",
            ChordQuality::Major9 => "Major 9th",
            ChordQuality::Minor9 => "Minor 9th",
            ChordQuality::Dominant7Flat9 => "Dominant 7b9",
            ChordQuality::Dominant7Sharp9 => "Dominant 7#9",
        }
    }

    /// Semitones above the root for each chord tone, ninths written above the octave.
    pub fn formula(self) -> &'static [u8] {
        match self {
            ChordQuality::Major => &[4, 7],
            ChordQuality::Minor => &[3, 7],
            ChordQuality::Diminished => &[3, 6],
            ChordQuality::Augmented => &[4, 8],
            ChordQuality::Sus2 => &[2, 7],
            ChordQuality::Sus4 => &[5, 7],
            ChordQuality::Dominant7 => &[4, 7, 10],
            ChordQuality::Major7 => &[4, 7, 11],
            ChordQuality::Minor7 => &[3, 7, 10],
            ChordQuality::MinorMajor7 => &[3, 7, 11],
            ChordQuality::HalfDiminished7 => &[3, 6, 10],
            ChordQuality::Diminished7 => &[3, 6, 9],
            ChordQuality::Augmented7 => &[4, 8, 10],
            ChordQuality::Dominant9 => &[4, 7, 10, 14],
            ChordQuality::Major9 => &[4, 7, 11, 14],
            ChordQuality::Minor9 => &[3, 7, 10, 14],
            ChordQuality::Dominant7Flat9 => &[4, 7, 10, 13],
            ChordQuality::Dominant7Sharp9 => &[4, 7, 10, 15],
        }
    }

    /// Matches pitch-class offsets above the root, sorted and without the root itself.
    fn from_pitch_classes(classes: &[u8]) -> Option<Self> {
        ALL_QUALITIES.iter().copied().find(|quality| {
            let mut reduced: Vec<u8> = quality.formula().iter().map(|i| i % 12).collect();
            reduced.sort_unstable();
            reduced == classes
        })
    }
}

const ALL_QUALITIES: [ChordQuality; 18] = [
    ChordQuality::Major,
    ChordQuality::Minor,
    ChordQuality::Diminished,
    ChordQuality::Augmented,
    ChordQuality::Sus2,
    ChordQuality::Sus4,
    ChordQuality::Dominant7,
    ChordQuality::Major7,
    ChordQuality::Minor7,
    ChordQuality::MinorMajor7,
    ChordQuality::HalfDiminished7,
    ChordQuality::Diminished7,
    ChordQuality::Augmented7,
    ChordQuality::Dominant9,
    ChordQuality::Major9,
    ChordQuality::Minor9,
    ChordQuality::Dominant7Flat9,
    ChordQuality::Dominant7Sharp9,
];

/// Short interval name for a distance in semitones, `P1` through `A9`.
pub fn interval_name(semitones: u8) -> Option<&'static str> {
    let name = match semitones {
        0 => "P1",
        1 => "m2",
        2 => "M2",
        3 => "m3",
        4 => "M3",
        5 => "P4",
        6 => "TT",
        7 => "P5",
        8 => "m6",
        9 => "M6",
        10 => "m7",
        11 => "M7",
        12 => "P8",
        13 => "m9",
        14 => "M9",
        15 => "A9",
        _ => return None,
    };
    Some(name)
}

/// A recognised chord rooted on the lowest held note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chord {
    pub root: PitchName,
    pub quality: ChordQuality,
}

impl Chord {
    /// Chord tones above the root as interval names, e.g. `"M3 + P5"`.
    pub fn intervals(&self) -> String {
        self.quality
            .formula()
            .iter()
            .filter_map(|&i| interval_name(i))
            .collect::<Vec<_>>()
            .join(" + ")
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.root.pitch_class(), self.quality.name())
    }
}

/// Names the chord formed by the held notes, if it is one we know.
pub fn identify(held: &HeldNotes) -> Option<Chord> {
    let root = PitchName::new(held.lowest()?)?;

    let classes: BTreeSet<u8> = held
        .iter()
        .map(|n| (n - root.note()) % 12)
        .filter(|&i| i != 0)
        .collect();
    let classes: Vec<u8> = classes.into_iter().collect();

    ChordQuality::from_pitch_classes(&classes).map(|quality| Chord { root, quality })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn held(notes: &[u8]) -> HeldNotes {
        let mut held = HeldNotes::new();
        for &n in notes {
            held.press(n);
        }
        held
    }

    fn name(notes: &[u8]) -> Option<String> {
        identify(&held(notes)).map(|c| c.to_string())
    }

    #[test]
    fn triads() {
        assert_eq!(name(&[60, 64, 67]).as_deref(), Some("C Major"));
        assert_eq!(name(&[57, 60, 64]).as_deref(), Some("A Minor"));
        assert_eq!(name(&[59, 62, 65]).as_deref(), Some("B Diminished"));
        assert_eq!(name(&[60, 64, 68]).as_deref(), Some("C Augmented"));
    }

    #[test]
    fn sevenths_and_ninths() {
        assert_eq!(name(&[55, 59, 62, 65]).as_deref(), Some("G Dominant 7th"));
        assert_eq!(name(&[60, 64, 67, 71]).as_deref(), Some("C Major 7th"));
        assert_eq!(name(&[62, 65, 69, 72]).as_deref(), Some("D Minor 7th"));
        assert_eq!(name(&[60, 64, 67, 70, 74]).as_deref(), Some("C Dominant 9th"));
        assert_eq!(name(&[60, 64, 67, 70, 73]).as_deref(), Some("C Dominant 7b9"));
    }

    #[test]
    fn voicing_does_not_matter() {
        assert_eq!(name(&[48, 67, 76]).as_deref(), Some("C Major"));
        assert_eq!(name(&[48, 60, 64, 67, 72]).as_deref(), Some("C Major"));
    }

    #[test]
    fn too_few_notes_is_not_a_chord() {
        assert_eq!(name(&[]), None);
        assert_eq!(name(&[60]), None);
        assert_eq!(name(&[60, 67]), None);
    }

    #[test]
    fn unknown_cluster() {
        assert_eq!(name(&[60, 61, 62]), None);
    }

    #[test]
    fn interval_breakdown() {
        let intervals = |notes: &[u8]| identify(&held(notes)).map(|c| c.intervals());
        assert_eq!(intervals(&[60, 64, 67]).as_deref(), Some("M3 + P5"));
        assert_eq!(intervals(&[55, 59, 62, 65]).as_deref(), Some("M3 + P5 + m7"));
        assert_eq!(
            intervals(&[60, 64, 67, 70, 75]).as_deref(),
            Some("M3 + P5 + m7 + A9")
        );
    }

    #[test]
    fn interval_names_cover_p1_to_a9() {
        assert_eq!(interval_name(0), Some("P1"));
        assert_eq!(interval_name(6), Some("TT"));
        assert_eq!(interval_name(14), Some("M9"));
        assert_eq!(interval_name(16), None);
    }

    #[test]
    fn press_and_release() {
        let mut held = HeldNotes::new();
        assert!(held.press(60));
        assert!(!held.press(60));
        assert_eq!(held.len(), 1);
        assert!(held.release(60));
        assert!(!held.release(60));
        assert!(held.is_empty());
    }
}
