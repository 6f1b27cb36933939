//! Live overlay: tracks which MIDI notes are held and builds the chord
//! drawn over the first stave.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::events::NoteEvent;
use crate::notation::{Duration, NotationNote};
use crate::pitch::{map_pitch, Accidental, Pitch};

/// MIDI note numbers currently sounding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveNoteSet {
    notes: BTreeSet<u8>,
}

impl ActiveNoteSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one note event. Returns whether the set changed.
    pub fn apply(&mut self, event: NoteEvent) -> bool {
        match event {
            NoteEvent::On(note) => self.notes.insert(note),
            NoteEvent::Off(note) => self.notes.remove(&note),
        }
    }

    pub fn contains(&self, note: u8) -> bool {
        self.notes.contains(&note)
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Held notes in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.notes.iter().copied()
    }

    /// Build the overlay chord, or `None` when nothing drawable is held.
    pub fn overlay_chord(&self) -> Option<OverlayChord> {
        OverlayChord::from_notes(self.iter())
    }
}

/// The held notes as one chord, lowest MIDI note first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayChord {
    pub midi_notes: Vec<u8>,
    pub pitches: Vec<Pitch>,
}

impl OverlayChord {
    /// Spell `notes` and sort them by MIDI number. Notes outside the
    /// supported range are skipped.
    pub fn from_notes(notes: impl IntoIterator<Item = u8>) -> Option<Self> {
        let mut midi: Vec<u8> = notes.into_iter().collect();
        midi.sort_unstable();
        midi.dedup();

        let (midi_notes, pitches): (Vec<u8>, Vec<Pitch>) = midi
            .into_iter()
            .filter_map(|n| match map_pitch(n) {
                Some(p) => Some((n, p)),
                None => {
                    log::debug!("skipping MIDI note {n} outside the notated range");
                    None
                }
            })
            .unzip();

        if pitches.is_empty() {
            None
        } else {
            Some(Self { midi_notes, pitches })
        }
    }

    /// Notation for the chord. Every sharp in the spelling is drawn; the key
    /// signature is not consulted.
    pub fn to_notation(&self, duration: Duration) -> NotationNote {
        let mut note = NotationNote::chord(self.pitches.clone(), duration, 0);
        note.drawn_accidentals = self
            .pitches
            .iter()
            .map(|p| (p.accidental != Accidental::Natural).then_some(p.accidental))
            .collect();
        note
    }
}
