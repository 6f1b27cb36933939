//! Pitch mapping: MIDI note numbers and note spellings to notated pitches.
//!
//! Every pitch class has exactly one spelling (sharps, never flats), so the
//! same MIDI note always draws the same way.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ScoreError;

/// Lowest MIDI note the mapper spells (A0).
pub const MIDI_LOW: u8 = 21;
/// Highest MIDI note the mapper spells (C8).
pub const MIDI_HIGH: u8 = 108;

/// Note letter name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Letter {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl Letter {
    /// Diatonic index within an octave (C = 0 … B = 6).
    pub fn index(self) -> i32 {
        match self {
            Letter::C => 0,
            Letter::D => 1,
            Letter::E => 2,
            Letter::F => 3,
            Letter::G => 4,
            Letter::A => 5,
            Letter::B => 6,
        }
    }

    /// Semitone offset from C of the natural letter.
    pub fn semitone(self) -> i32 {
        match self {
            Letter::C => 0,
            Letter::D => 2,
            Letter::E => 4,
            Letter::F => 5,
            Letter::G => 7,
            Letter::A => 9,
            Letter::B => 11,
        }
    }

    fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'C' => Some(Letter::C),
            'D' => Some(Letter::D),
            'E' => Some(Letter::E),
            'F' => Some(Letter::F),
            'G' => Some(Letter::G),
            'A' => Some(Letter::A),
            'B' => Some(Letter::B),
            _ => None,
        }
    }

    fn as_char(self) -> char {
        match self {
            Letter::C => 'C',
            Letter::D => 'D',
            Letter::E => 'E',
            Letter::F => 'F',
            Letter::G => 'G',
            Letter::A => 'A',
            Letter::B => 'B',
        }
    }
}

/// Chromatic alteration of a letter.
///
/// In a [`Pitch`], `Natural` means "no accidental in the spelling". As a drawn
/// mark it is the natural sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Accidental {
    Natural,
    Sharp,
    Flat,
}

impl Accidental {
    pub fn semitones(self) -> i32 {
        match self {
            Accidental::Natural => 0,
            Accidental::Sharp => 1,
            Accidental::Flat => -1,
        }
    }

    /// Spelling suffix: `#`, `b`, or nothing.
    pub fn symbol(self) -> &'static str {
        match self {
            Accidental::Natural => "",
            Accidental::Sharp => "#",
            Accidental::Flat => "b",
        }
    }
}

/// A notated pitch: letter, accidental and octave (middle C = C4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pitch {
    pub letter: Letter,
    pub accidental: Accidental,
    pub octave: i32,
}

/// Canonical spelling for each pitch class, indexed by `midi % 12`.
const PITCH_CLASS_SPELLINGS: [(Letter, Accidental); 12] = [
    (Letter::C, Accidental::Natural),
    (Letter::C, Accidental::Sharp),
    (Letter::D, Accidental::Natural),
    (Letter::D, Accidental::Sharp),
    (Letter::E, Accidental::Natural),
    (Letter::F, Accidental::Natural),
    (Letter::F, Accidental::Sharp),
    (Letter::G, Accidental::Natural),
    (Letter::G, Accidental::Sharp),
    (Letter::A, Accidental::Natural),
    (Letter::A, Accidental::Sharp),
    (Letter::B, Accidental::Natural),
];

/// Map a MIDI note number to its notated pitch.
///
/// Returns `None` outside 21..=108; callers skip such notes.
pub fn map_pitch(midi: u8) -> Option<Pitch> {
    Pitch::try_from_midi(midi).ok()
}

impl Pitch {
    pub fn new(letter: Letter, accidental: Accidental, octave: i32) -> Self {
        Self { letter, accidental, octave }
    }

    /// Spell a MIDI note number using the fixed table.
    pub fn try_from_midi(midi: u8) -> Result<Self, ScoreError> {
        if !(MIDI_LOW..=MIDI_HIGH).contains(&midi) {
            return Err(ScoreError::UnsupportedMidiNote(midi));
        }
        let (letter, accidental) = PITCH_CLASS_SPELLINGS[(midi % 12) as usize];
        let octave = (midi / 12) as i32 - 1;
        Ok(Self { letter, accidental, octave })
    }

    /// Parse a spelling such as `"C4"`, `"f#3"` or `"Bb5"`.
    ///
    /// The accepted pattern is `[A-Ga-g][#b]?[0-9]`; anything else fails with
    /// [`ScoreError::InvalidPitchSpelling`].
    pub fn parse(spelling: &str) -> Result<Self, ScoreError> {
        let invalid = || ScoreError::InvalidPitchSpelling(spelling.to_string());
        let mut chars = spelling.chars();

        let letter = chars.next().and_then(Letter::from_char).ok_or_else(invalid)?;
        let mut next = chars.next().ok_or_else(invalid)?;
        let accidental = match next {
            '#' => Accidental::Sharp,
            'b' => Accidental::Flat,
            _ => Accidental::Natural,
        };
        if accidental != Accidental::Natural {
            next = chars.next().ok_or_else(invalid)?;
        }
        let octave = next.to_digit(10).ok_or_else(invalid)? as i32;
        if chars.next().is_some() {
            return Err(invalid());
        }

        Ok(Self { letter, accidental, octave })
    }

    /// Convert to a MIDI note number. Middle C (C4) = 60.
    pub fn to_midi(&self) -> i32 {
        (self.octave + 1) * 12 + self.letter.semitone() + self.accidental.semitones()
    }

    /// Diatonic step counted from C0; one step is one line-or-space on a staff.
    pub fn diatonic_step(&self) -> i32 {
        self.octave * 7 + self.letter.index()
    }
}

impl FromStr for Pitch {
    type Err = ScoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Pitch::parse(s)
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.letter.as_char(), self.accidental.symbol(), self.octave)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn middle_c_and_its_sharp() {
        assert_eq!(map_pitch(60), Some(Pitch::new(Letter::C, Accidental::Natural, 4)));
        assert_eq!(map_pitch(61), Some(Pitch::new(Letter::C, Accidental::Sharp, 4)));
    }

    #[test]
    fn range_ends() {
        assert_eq!(map_pitch(21).map(|p| p.to_string()), Some("A0".to_string()));
        assert_eq!(map_pitch(108).map(|p| p.to_string()), Some("C8".to_string()));
        assert_eq!(map_pitch(20), None);
        assert_eq!(map_pitch(109), None);
        assert_eq!(map_pitch(0), None);
        assert_eq!(map_pitch(127), None);
    }

    #[test]
    fn every_supported_note_round_trips_to_its_number() {
        for midi in MIDI_LOW..=MIDI_HIGH {
            let pitch = map_pitch(midi).expect("in range");
            assert_eq!(pitch.to_midi(), midi as i32, "midi {midi} spelled {pitch}");
            assert_ne!(pitch.accidental, Accidental::Flat, "no flat spellings");
            assert_eq!(map_pitch(midi), Some(pitch));
        }
    }

    #[test]
    fn parse_accepts_both_cases_and_accidentals() {
        assert_eq!(Pitch::parse("F#4").unwrap(), Pitch::new(Letter::F, Accidental::Sharp, 4));
        assert_eq!(Pitch::parse("bb3").unwrap(), Pitch::new(Letter::B, Accidental::Flat, 3));
        assert_eq!(Pitch::parse("e5").unwrap(), Pitch::new(Letter::E, Accidental::Natural, 5));
        assert_eq!("Ab2".parse::<Pitch>().unwrap().to_string(), "Ab2");
    }

    #[test]
    fn parse_rejects_malformed_spellings() {
        for bad in ["H4", "C", "C#", "C10", "C##4", "4C", "", "Cx4", "C4 "] {
            assert_eq!(
                Pitch::parse(bad),
                Err(ScoreError::InvalidPitchSpelling(bad.to_string())),
                "{bad:?} should be rejected"
            );
        }
    }
}
