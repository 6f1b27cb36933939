//! Layout computation: places measures left to right on a single line and
//! sizes the canvas to hold them.

use serde::Serialize;

use crate::accidentals::KeySpec;
use crate::config::LayoutConfig;
use crate::model::*;

/// Clef shown at the start of a stave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Clef {
    Treble,
}

/// Glyphs drawn at the start of a stave, before its first note.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StaveDecorations {
    pub clef: Option<Clef>,
    pub key_signature: Option<KeySignature>,
    pub time_signature: Option<TimeSignature>,
}

/// Where one measure's stave goes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasurePlacement {
    pub measure_index: usize,
    pub x: f64,
    pub y: f64,
    /// Nominal width plus the width of any leading glyphs
    pub width: f64,
    pub decorations: StaveDecorations,
}

/// The full placement of a score at one viewport width.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutPlan {
    pub placements: Vec<MeasurePlacement>,
    pub canvas_width: f64,
    pub canvas_height: f64,
    /// Left offset that centers the first measure in the viewport
    pub first_measure_offset: f64,
    /// Index of the placement hosting the live overlay
    pub active_stave: usize,
}

impl LayoutPlan {
    pub fn active_placement(&self) -> Option<&MeasurePlacement> {
        self.placements.get(self.active_stave)
    }
}

/// Offset that centers a nominal-width measure in the viewport.
pub fn first_measure_offset(viewport_width: f64, config: &LayoutConfig) -> f64 {
    if !viewport_width.is_finite() || config.scale_factor <= 0.0 {
        return 0.0;
    }
    (viewport_width / config.scale_factor / 2.0 - config.measure_width / 2.0).max(0.0)
}

/// Width taken by the glyphs in front of the first note.
pub fn decorations_width(decorations: &StaveDecorations, config: &LayoutConfig) -> f64 {
    let mut w = 0.0;
    if decorations.clef.is_some() {
        w += config.clef_width;
    }
    if let Some(ref key) = decorations.key_signature {
        let count = KeySpec::lookup(key.as_str()).map_or(0, |spec| spec.count);
        if count > 0 {
            w += count as f64 * config.key_accidental_width + config.key_signature_padding;
        }
    }
    if decorations.time_signature.is_some() {
        w += config.time_signature_width;
    }
    w
}

/// Lay out every measure of `score` for a viewport `viewport_width` wide.
///
/// Pure: the same score and width always give the same plan.
pub fn layout(score: &Score, viewport_width: f64, config: &LayoutConfig) -> LayoutPlan {
    let offset = first_measure_offset(viewport_width, config);
    let mut x = offset;

    let placements: Vec<MeasurePlacement> = score
        .measure_views()
        .into_iter()
        .map(|view| {
            let decorations = StaveDecorations {
                clef: (view.index == 0).then_some(Clef::Treble),
                key_signature: view
                    .shows_key_signature
                    .then(|| view.key_signature.cloned())
                    .flatten(),
                time_signature: view
                    .shows_time_signature
                    .then(|| view.time_signature.cloned())
                    .flatten(),
            };
            let width = config.measure_width + decorations_width(&decorations, config);
            let placement = MeasurePlacement {
                measure_index: view.index,
                x,
                y: config.stave_y,
                width,
                decorations,
            };
            x += width + config.measure_padding;
            placement
        })
        .collect();

    LayoutPlan {
        placements,
        canvas_width: x,
        canvas_height: config.stave_height,
        first_measure_offset: offset,
        active_stave: 0,
    }
}
