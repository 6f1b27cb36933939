//! Drawing: the backend contract and the driver that feeds a layout plan
//! through it.
//!
//! The engine never paints anything itself. It hands stave geometry and
//! notation notes to a [`Renderer`]; [`SvgRenderer`] is the bundled backend.

mod constants;
mod notes;
mod staff;
mod svg;
mod svg_builder;

use serde::Serialize;

use crate::error::RenderError;
use crate::layout::{LayoutPlan, StaveDecorations};
use crate::notation::NotationNote;

pub use svg::SvgRenderer;

/// A stave drawn by a backend, handed back so notes can be placed on it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StaveHandle {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    /// Left edge of the note area, after clef and signatures
    pub note_start_x: f64,
}

/// Visual style for a group of notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteStyle {
    pub fill: String,
    pub stroke: String,
}

impl NoteStyle {
    pub fn solid(color: &str) -> Self {
        Self {
            fill: color.to_string(),
            stroke: color.to_string(),
        }
    }
}

/// A drawing surface.
///
/// Any method may return [`RenderError::RendererUnavailable`] when the
/// surface has gone away; the engine treats that as "skip this redraw".
pub trait Renderer {
    /// Start a fresh canvas of the given size, discarding earlier drawing.
    fn create_canvas(&mut self, width: f64, height: f64) -> Result<(), RenderError>;

    fn draw_stave(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        decorations: &StaveDecorations,
    ) -> Result<StaveHandle, RenderError>;

    fn draw_notes(
        &mut self,
        stave: &StaveHandle,
        notes: &[NotationNote],
        style: Option<&NoteStyle>,
    ) -> Result<(), RenderError>;
}

/// Draw every measure of a plan. `notes[i]` holds the resolved notes of
/// measure `i`. Returns the handle of the active stave.
pub fn draw_plan<R: Renderer + ?Sized>(
    renderer: &mut R,
    plan: &LayoutPlan,
    notes: &[Vec<NotationNote>],
) -> Result<Option<StaveHandle>, RenderError> {
    renderer.create_canvas(plan.canvas_width, plan.canvas_height)?;

    let active_index = plan.active_placement().map(|p| p.measure_index);
    let mut active = None;
    for placement in &plan.placements {
        let stave = renderer.draw_stave(
            placement.x,
            placement.y,
            placement.width,
            &placement.decorations,
        )?;
        if let Some(measure_notes) = notes.get(placement.measure_index) {
            if !measure_notes.is_empty() {
                renderer.draw_notes(&stave, measure_notes, None)?;
            }
        }
        if Some(placement.measure_index) == active_index {
            active = Some(stave);
        }
    }
    Ok(active)
}
