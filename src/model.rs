//! Data model for a score document.
//!
//! Measures keep only what the document says explicitly; inherited key and
//! time signatures are resolved by [`Score::measure_views`] on every call.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Key signature identifier, e.g. `"C"`, `"G"`, `"Bb"`, `"F#m"`.
///
/// Passed through to the renderer verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeySignature(pub String);

/// Time signature identifier, e.g. `"4/4"`, `"3/8"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeSignature(pub String);

impl KeySignature {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TimeSignature {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for KeySignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for TimeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A complete score: metadata plus a non-empty list of measures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Score {
    /// Document format version, if the document carried one
    pub version: Option<String>,
    pub title: String,
    /// Tempo in BPM (informational only)
    pub tempo: Option<f64>,
    /// Ordered measures; never empty
    pub measures: Vec<Measure>,
}

/// A single measure (bar).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Measure {
    /// Explicit key signature; inherited from earlier measures when absent
    pub key_signature: Option<KeySignature>,
    /// Explicit time signature; inherited from earlier measures when absent
    pub time_signature: Option<TimeSignature>,
    pub entries: Vec<NoteEntry>,
}

/// One rhythmic event: a note, a chord, or (with no pitches) a rest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteEntry {
    /// Pitch spellings such as `"C4"` or `"F#5"`; empty means rest
    pub pitches: Vec<String>,
    /// Base duration code: `w`, `h`, `q`, `8`, `16`, `32`, `64`
    pub duration: String,
    pub dots: u32,
}

impl NoteEntry {
    pub fn is_rest(&self) -> bool {
        self.pitches.is_empty()
    }
}

/// A measure together with the signatures in force at that point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasureView<'a> {
    pub index: usize,
    pub measure: &'a Measure,
    /// Effective key signature (explicit or inherited)
    pub key_signature: Option<&'a KeySignature>,
    /// Effective time signature (explicit or inherited)
    pub time_signature: Option<&'a TimeSignature>,
    /// The measure introduces a key signature different from the previous one
    pub shows_key_signature: bool,
    /// The measure introduces a time signature different from the previous one
    pub shows_time_signature: bool,
}

impl Score {
    /// The canonical empty score: one free-time measure with no entries.
    pub fn empty() -> Self {
        Self {
            version: None,
            title: String::new(),
            tempo: None,
            measures: vec![Measure::default()],
        }
    }

    pub fn measure_count(&self) -> usize {
        self.measures.len()
    }

    /// Whether this is structurally the canonical empty score.
    pub fn is_empty_score(&self) -> bool {
        self.measures.len() == 1 && self.measures[0] == Measure::default()
    }

    /// Walk the measures left to right, resolving inherited signatures.
    ///
    /// The first measure without an explicit signature has none in force.
    pub fn measure_views(&self) -> Vec<MeasureView<'_>> {
        let mut key: Option<&KeySignature> = None;
        let mut time: Option<&TimeSignature> = None;

        self.measures
            .iter()
            .enumerate()
            .map(|(index, measure)| {
                let shows_key_signature = match measure.key_signature.as_ref() {
                    Some(k) => key != Some(k),
                    None => false,
                };
                let shows_time_signature = match measure.time_signature.as_ref() {
                    Some(t) => time != Some(t),
                    None => false,
                };
                key = measure.key_signature.as_ref().or(key);
                time = measure.time_signature.as_ref().or(time);

                MeasureView {
                    index,
                    measure,
                    key_signature: key,
                    time_signature: time,
                    shows_key_signature,
                    shows_time_signature,
                }
            })
            .collect()
    }
}

impl Default for Score {
    fn default() -> Self {
        Self::empty()
    }
}
