//! SVG backend for [`Renderer`].

use crate::accidentals::KeySpec;
use crate::config::LayoutConfig;
use crate::error::RenderError;
use crate::layout::{decorations_width, StaveDecorations};
use crate::notation::NotationNote;

use super::constants::*;
use super::notes::{note_x_positions, render_note};
use super::staff::*;
use super::svg_builder::{empty_svg, SvgBuilder};
use super::{NoteStyle, Renderer, StaveHandle};

/// Draws into an in-memory SVG document.
///
/// Until [`Renderer::create_canvas`] is called there is no surface, and
/// every drawing call fails with [`RenderError::RendererUnavailable`].
pub struct SvgRenderer {
    svg: Option<SvgBuilder>,
    config: LayoutConfig,
}

impl SvgRenderer {
    pub fn new(config: LayoutConfig) -> Self {
        Self { svg: None, config }
    }

    /// The SVG drawn so far, or a placeholder if no canvas exists yet.
    pub fn to_svg(&self) -> String {
        match self.svg {
            Some(ref svg) => svg.build(),
            None => empty_svg("Nothing rendered"),
        }
    }

    fn surface(&mut self) -> Result<&mut SvgBuilder, RenderError> {
        self.svg.as_mut().ok_or(RenderError::RendererUnavailable)
    }
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}

impl Renderer for SvgRenderer {
    fn create_canvas(&mut self, width: f64, height: f64) -> Result<(), RenderError> {
        if !(width.is_finite() && height.is_finite()) || width < 0.0 || height < 0.0 {
            return Err(RenderError::Backend(format!("invalid canvas size {width}x{height}")));
        }
        let mut svg = SvgBuilder::new(width, height);
        svg.rect(0.0, 0.0, width, height, BACKGROUND_COLOR);
        self.svg = Some(svg);
        Ok(())
    }

    fn draw_stave(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        decorations: &StaveDecorations,
    ) -> Result<StaveHandle, RenderError> {
        let config = self.config.clone();
        let svg = self.surface()?;
        let top_y = y + STAFF_TOP_MARGIN;

        render_staff_lines(svg, x, x + width, top_y);
        render_barline(svg, x + width, top_y);

        let mut gx = x;
        if let Some(clef) = decorations.clef {
            render_clef(svg, gx, top_y, clef);
            gx += config.clef_width;
        }
        if let Some(ref key) = decorations.key_signature {
            let spec = KeySpec::lookup(key.as_str()).unwrap_or(KeySpec::NONE);
            if spec.count > 0 {
                gx += render_key_signature(svg, gx, top_y, &spec, config.key_accidental_width);
                gx += config.key_signature_padding;
            }
        }
        if let Some(ref time) = decorations.time_signature {
            render_time_signature(svg, gx, top_y, time, config.time_signature_width);
        }

        Ok(StaveHandle {
            x,
            y,
            width,
            note_start_x: x + decorations_width(decorations, &config),
        })
    }

    fn draw_notes(
        &mut self,
        stave: &StaveHandle,
        notes: &[NotationNote],
        style: Option<&NoteStyle>,
    ) -> Result<(), RenderError> {
        let svg = self.surface()?;
        let color = style.map_or(NOTE_COLOR, |s| s.fill.as_str());
        let top_y = stave.y + STAFF_TOP_MARGIN;

        let start = stave.note_start_x + NOTE_AREA_INSET;
        let end = stave.x + stave.width - NOTE_AREA_INSET;
        let xs = note_x_positions(notes, start, end);

        for (note, x) in notes.iter().zip(xs) {
            render_note(svg, note, x, top_y, color);
        }
        Ok(())
    }
}
