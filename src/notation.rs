//! Measure builder: turns a measure's note entries into notation-ready notes.

use serde::{Deserialize, Serialize};

use crate::error::ScoreError;
use crate::model::{Measure, NoteEntry};
use crate::pitch::{Accidental, Letter, Pitch};

/// Most dots a note may carry.
pub const MAX_DOTS: u8 = 2;

/// Vertical placeholder for rests. Carries no pitch meaning.
pub const REST_POSITION: Pitch = Pitch {
    letter: Letter::B,
    accidental: Accidental::Natural,
    octave: 4,
};

/// Base note value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Duration {
    Whole,
    Half,
    #[default]
    Quarter,
    Eighth,
    Sixteenth,
    ThirtySecond,
    SixtyFourth,
}

impl Duration {
    /// Parse a duration code (`w`/`1`, `h`/`2`, `q`/`4`, `8`, `16`, `32`, `64`).
    /// A trailing `r` rest marker is tolerated.
    pub fn parse(code: &str) -> Result<Self, ScoreError> {
        let base = code.trim();
        let base = base.strip_suffix('r').unwrap_or(base);
        match base {
            "w" | "1" => Ok(Duration::Whole),
            "h" | "2" => Ok(Duration::Half),
            "q" | "4" => Ok(Duration::Quarter),
            "8" => Ok(Duration::Eighth),
            "16" => Ok(Duration::Sixteenth),
            "32" => Ok(Duration::ThirtySecond),
            "64" => Ok(Duration::SixtyFourth),
            _ => Err(ScoreError::InvalidDuration(code.to_string())),
        }
    }

    /// Whether a duration code carries the trailing `r` rest marker.
    pub fn is_rest_code(code: &str) -> bool {
        code.trim().ends_with('r')
    }

    pub fn code(self) -> &'static str {
        match self {
            Duration::Whole => "w",
            Duration::Half => "h",
            Duration::Quarter => "q",
            Duration::Eighth => "8",
            Duration::Sixteenth => "16",
            Duration::ThirtySecond => "32",
            Duration::SixtyFourth => "64",
        }
    }

    /// Length in quarter notes, before dots.
    pub fn quarters(self) -> f64 {
        match self {
            Duration::Whole => 4.0,
            Duration::Half => 2.0,
            Duration::Quarter => 1.0,
            Duration::Eighth => 0.5,
            Duration::Sixteenth => 0.25,
            Duration::ThirtySecond => 0.125,
            Duration::SixtyFourth => 0.0625,
        }
    }

    /// Filled notehead (quarter and shorter).
    pub fn is_filled(self) -> bool {
        !matches!(self, Duration::Whole | Duration::Half)
    }

    pub fn has_stem(self) -> bool {
        self != Duration::Whole
    }

    pub fn flag_count(self) -> usize {
        match self {
            Duration::Eighth => 1,
            Duration::Sixteenth => 2,
            Duration::ThirtySecond => 3,
            Duration::SixtyFourth => 4,
            _ => 0,
        }
    }
}

/// A note, chord or rest ready to be drawn on a stave.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotationNote {
    /// Notehead positions; a rest holds [`REST_POSITION`]
    pub keys: Vec<Pitch>,
    pub is_rest: bool,
    pub duration: Duration,
    pub dots: u8,
    /// Accidental written in the spelling, per key (sharp/flat only)
    pub modifiers: Vec<Option<Accidental>>,
    /// Accidental actually drawn, per key; filled in by the accidental resolver
    pub drawn_accidentals: Vec<Option<Accidental>>,
}

impl NotationNote {
    pub fn rest(duration: Duration, dots: u8) -> Self {
        Self {
            keys: vec![REST_POSITION],
            is_rest: true,
            duration,
            dots,
            modifiers: vec![None],
            drawn_accidentals: vec![None],
        }
    }

    /// A chord (or single note) with modifiers taken from the spellings.
    /// Nothing is drawn until the accidental resolver runs.
    pub fn chord(keys: Vec<Pitch>, duration: Duration, dots: u8) -> Self {
        let modifiers: Vec<Option<Accidental>> = keys
            .iter()
            .map(|p| match p.accidental {
                Accidental::Natural => None,
                acc => Some(acc),
            })
            .collect();
        let drawn_accidentals = vec![None; keys.len()];
        Self {
            keys,
            is_rest: false,
            duration,
            dots,
            modifiers,
            drawn_accidentals,
        }
    }

    /// Length in quarter notes, dots included.
    pub fn quarters(&self) -> f64 {
        let base = self.duration.quarters();
        let mut total = base;
        let mut add = base;
        for _ in 0..self.dots {
            add /= 2.0;
            total += add;
        }
        total
    }
}

/// Build the notation notes for one measure, in entry order.
///
/// Fails on the first malformed spelling, unknown duration, or dot count
/// above [`MAX_DOTS`]; the caller rejects the whole score.
pub fn build_notes(measure: &Measure) -> Result<Vec<NotationNote>, ScoreError> {
    measure.entries.iter().map(build_note).collect()
}

fn build_note(entry: &NoteEntry) -> Result<NotationNote, ScoreError> {
    let duration = Duration::parse(&entry.duration)?;
    if entry.dots > MAX_DOTS as u32 {
        return Err(ScoreError::TooManyDots { dots: entry.dots });
    }
    let dots = entry.dots as u8;

    let keys = entry
        .pitches
        .iter()
        .map(|s| Pitch::parse(s))
        .collect::<Result<Vec<_>, _>>()?;

    // An `r` marker makes the entry a rest even when it lists pitches
    if entry.is_rest() || Duration::is_rest_code(&entry.duration) {
        return Ok(NotationNote::rest(duration, dots));
    }
    Ok(NotationNote::chord(keys, duration, dots))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entry(pitches: &[&str], duration: &str, dots: u32) -> NoteEntry {
        NoteEntry {
            pitches: pitches.iter().map(|s| s.to_string()).collect(),
            duration: duration.to_string(),
            dots,
        }
    }

    fn measure(entries: Vec<NoteEntry>) -> Measure {
        Measure { entries, ..Measure::default() }
    }

    #[test]
    fn chord_carries_spelling_modifiers() {
        let notes = build_notes(&measure(vec![entry(&["C4", "Eb4", "G#4"], "q", 0)])).unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].modifiers, vec![None, Some(Accidental::Flat), Some(Accidental::Sharp)]);
        assert_eq!(notes[0].drawn_accidentals, vec![None, None, None]);
        assert!(!notes[0].is_rest);
    }

    #[test]
    fn rests_have_no_modifiers() {
        let notes = build_notes(&measure(vec![entry(&[], "h", 0), entry(&[], "8r", 1)])).unwrap();
        assert!(notes.iter().all(|n| n.is_rest));
        assert!(notes.iter().all(|n| n.modifiers.iter().all(Option::is_none)));
        assert_eq!(notes[0].keys, vec![REST_POSITION]);
        assert_eq!(notes[1].duration, Duration::Eighth);
    }

    #[test]
    fn rest_marker_wins_over_pitches() {
        let notes = build_notes(&measure(vec![entry(&["C4"], "qr", 0), entry(&["C4"], "q", 0)])).unwrap();
        assert!(notes[0].is_rest);
        assert_eq!(notes[0].keys, vec![REST_POSITION]);
        assert_eq!(notes[0].duration, Duration::Quarter);
        assert!(!notes[1].is_rest);
        assert_eq!(
            build_notes(&measure(vec![entry(&["H4"], "qr", 0)])),
            Err(ScoreError::InvalidPitchSpelling("H4".to_string()))
        );
    }

    #[test]
    fn dots_extend_length() {
        let notes = build_notes(&measure(vec![entry(&["A4"], "h", 1), entry(&["A4"], "q", 2)])).unwrap();
        assert_eq!(notes[0].quarters(), 3.0);
        assert_eq!(notes[1].quarters(), 1.75);
    }

    #[test]
    fn invalid_input_is_rejected() {
        assert_eq!(
            build_notes(&measure(vec![entry(&["C4", "H4"], "q", 0)])),
            Err(ScoreError::InvalidPitchSpelling("H4".to_string()))
        );
        assert_eq!(
            build_notes(&measure(vec![entry(&["C4"], "x", 0)])),
            Err(ScoreError::InvalidDuration("x".to_string()))
        );
        assert_eq!(
            build_notes(&measure(vec![entry(&["C4"], "q", 3)])),
            Err(ScoreError::TooManyDots { dots: 3 })
        );
    }

    #[test]
    fn duration_codes() {
        assert_eq!(Duration::parse("4").unwrap(), Duration::Quarter);
        assert_eq!(Duration::parse("w").unwrap(), Duration::Whole);
        assert_eq!(Duration::parse("16").unwrap().flag_count(), 2);
        assert!(!Duration::Half.is_filled());
        assert!(Duration::Eighth.is_filled());
    }
}
