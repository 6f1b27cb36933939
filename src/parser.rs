//! Score document parser: converts the JSON score document into the Score
//! data model.
//!
//! Document shape:
//! ```json
//! { "version": 1, "title": "...", "bpm": 90,
//!   "measures": [ { "key_signature": "G", "time_signature": "3/4",
//!                   "contents": [ { "notes": ["G4", "B4"], "duration": "q", "dots": 1 } ] } ] }
//! ```

use serde::Deserialize;
use serde_json::Value;

use crate::error::ScoreError;
use crate::model::*;

#[derive(Debug, Deserialize)]
struct ScoreDocument {
    #[serde(default)]
    version: Option<Value>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    bpm: Option<f64>,
    measures: Vec<MeasureDocument>,
}

#[derive(Debug, Deserialize)]
struct MeasureDocument {
    #[serde(default)]
    key_signature: Option<String>,
    #[serde(default)]
    time_signature: Option<String>,
    #[serde(default)]
    contents: Vec<EntryDocument>,
}

#[derive(Debug, Deserialize)]
struct EntryDocument {
    notes: Vec<String>,
    duration: String,
    #[serde(default)]
    dots: Option<u32>,
}

/// Parse a score document, falling back to the empty score.
///
/// Invalid JSON, missing `measures`, or an empty measure list all yield
/// [`Score::empty`]. Pitch spellings are not checked here.
pub fn parse_score(json: &str) -> Score {
    try_parse_score(json).unwrap_or_else(|e| {
        log::warn!("{e}; using empty score");
        Score::empty()
    })
}

/// Parse an optional document; `None` yields the empty score.
pub fn parse_optional_score(json: Option<&str>) -> Score {
    match json {
        Some(json) => parse_score(json),
        None => Score::empty(),
    }
}

/// Strict variant of [`parse_score`].
pub fn try_parse_score(json: &str) -> Result<Score, ScoreError> {
    let value: Value = serde_json::from_str(json)
        .map_err(|e| ScoreError::MalformedScoreDocument(format!("JSON parse error: {e}")))?;
    try_parse_score_value(value)
}

/// Parse an already-decoded JSON value.
pub fn try_parse_score_value(value: Value) -> Result<Score, ScoreError> {
    let doc: ScoreDocument = serde_json::from_value(value)
        .map_err(|e| ScoreError::MalformedScoreDocument(e.to_string()))?;

    if doc.measures.is_empty() {
        return Err(ScoreError::MalformedScoreDocument("no measures".to_string()));
    }

    let version = doc.version.and_then(|v| match v {
        Value::String(s) => Some(s),
        Value::Null => None,
        other => Some(other.to_string()),
    });

    let measures = doc
        .measures
        .into_iter()
        .map(|m| Measure {
            key_signature: non_blank(m.key_signature).map(KeySignature),
            time_signature: non_blank(m.time_signature).map(TimeSignature),
            entries: m
                .contents
                .into_iter()
                .map(|e| NoteEntry {
                    pitches: e.notes.into_iter().map(|n| n.trim().to_string()).collect(),
                    duration: e.duration.trim().to_string(),
                    dots: e.dots.unwrap_or(0),
                })
                .collect(),
        })
        .collect();

    Ok(Score {
        version,
        title: doc.title.unwrap_or_default(),
        tempo: doc.bpm,
        measures,
    })
}

// An empty string means "not specified", same as a missing field.
fn non_blank(s: Option<String>) -> Option<String> {
    s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}
