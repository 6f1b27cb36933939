//! Accidental resolution: decides which accidentals are drawn once the key
//! signature and earlier notes in the measure are taken into account.

use std::collections::HashMap;

use crate::model::KeySignature;
use crate::notation::NotationNote;
use crate::pitch::{Accidental, Letter};

/// Order in which sharps enter a key signature.
const SHARP_ORDER: [Letter; 7] =
    [Letter::F, Letter::C, Letter::G, Letter::D, Letter::A, Letter::E, Letter::B];
/// Order in which flats enter a key signature.
const FLAT_ORDER: [Letter; 7] =
    [Letter::B, Letter::E, Letter::A, Letter::D, Letter::G, Letter::C, Letter::F];

/// The sharps or flats a key signature implies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeySpec {
    /// `Sharp`, `Flat`, or `Natural` for keys without accidentals
    pub accidental: Accidental,
    /// Number of accidentals in the signature (0..=7)
    pub count: usize,
}

impl KeySpec {
    pub const NONE: KeySpec = KeySpec { accidental: Accidental::Natural, count: 0 };

    /// Look up a key identifier such as `"Eb"` or `"F#m"`.
    pub fn lookup(id: &str) -> Option<KeySpec> {
        let (accidental, count) = match id.trim() {
            "C" | "Am" => (Accidental::Natural, 0),
            "G" | "Em" => (Accidental::Sharp, 1),
            "D" | "Bm" => (Accidental::Sharp, 2),
            "A" | "F#m" => (Accidental::Sharp, 3),
            "E" | "C#m" => (Accidental::Sharp, 4),
            "B" | "G#m" => (Accidental::Sharp, 5),
            "F#" | "D#m" => (Accidental::Sharp, 6),
            "C#" | "A#m" => (Accidental::Sharp, 7),
            "F" | "Dm" => (Accidental::Flat, 1),
            "Bb" | "Gm" => (Accidental::Flat, 2),
            "Eb" | "Cm" => (Accidental::Flat, 3),
            "Ab" | "Fm" => (Accidental::Flat, 4),
            "Db" | "Bbm" => (Accidental::Flat, 5),
            "Gb" | "Ebm" => (Accidental::Flat, 6),
            "Cb" | "Abm" => (Accidental::Flat, 7),
            _ => return None,
        };
        Some(KeySpec { accidental, count })
    }

    /// Spec for an optional key; unknown identifiers count as no accidentals.
    pub fn for_key(key: Option<&KeySignature>) -> KeySpec {
        match key {
            None => KeySpec::NONE,
            Some(k) => KeySpec::lookup(k.as_str()).unwrap_or_else(|| {
                log::warn!("unknown key signature '{k}', resolving as C");
                KeySpec::NONE
            }),
        }
    }

    /// Letters altered by this key, in signature order.
    pub fn altered_letters(&self) -> &'static [Letter] {
        match self.accidental {
            Accidental::Sharp => &SHARP_ORDER[..self.count],
            Accidental::Flat => &FLAT_ORDER[..self.count],
            Accidental::Natural => &[],
        }
    }

    /// The accidental a letter carries under this key.
    pub fn default_for(&self, letter: Letter) -> Accidental {
        if self.altered_letters().contains(&letter) {
            self.accidental
        } else {
            Accidental::Natural
        }
    }
}

/// Fill in `drawn_accidentals` for one measure's notes, left to right.
///
/// An accidental is drawn when a pitch differs from what the key signature,
/// or an earlier note on the same letter and octave in this measure,
/// already implies. Memory does not carry into the next measure: call once
/// per measure.
pub fn resolve_accidentals(notes: &mut [NotationNote], key: Option<&KeySignature>) {
    let spec = KeySpec::for_key(key);
    let mut in_force: HashMap<(Letter, i32), Accidental> = HashMap::new();

    for note in notes.iter_mut() {
        if note.is_rest {
            note.drawn_accidentals = vec![None; note.keys.len()];
            continue;
        }

        let drawn = note
            .keys
            .iter()
            .map(|pitch| {
                let slot = (pitch.letter, pitch.octave);
                let current = in_force
                    .get(&slot)
                    .copied()
                    .unwrap_or_else(|| spec.default_for(pitch.letter));
                in_force.insert(slot, pitch.accidental);
                (pitch.accidental != current).then_some(pitch.accidental)
            })
            .collect();
        note.drawn_accidentals = drawn;
    }
}
