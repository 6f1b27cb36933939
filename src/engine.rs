//! The engine: owns the current score and the held notes, and keeps the
//! drawing in step with both.
//!
//! Two kinds of input arrive, one at a time:
//! - score loads, which replace the score wholesale and re-lay it out;
//! - note events, which change the held-note set and repaint from the
//!   cached layout.
//!
//! Every repaint draws the staves first and the overlay chord last, on the
//! stave handle the same repaint just produced.

use crate::accidentals::resolve_accidentals;
use crate::config::EngineConfig;
use crate::error::{EngineError, RenderError, ScoreError};
use crate::events::{ChannelMessage, NoteEvent};
use crate::layout::{layout, LayoutPlan};
use crate::model::Score;
use crate::notation::{build_notes, NotationNote};
use crate::overlay::{ActiveNoteSet, OverlayChord};
use crate::parser::{parse_optional_score, parse_score};
use crate::renderer::{draw_plan, NoteStyle, Renderer, StaveHandle};

/// Build and resolve the notes of every measure.
///
/// Signatures are resolved by a fresh left-to-right scan; accidental memory
/// restarts at each measure.
pub fn prepare_score(score: &Score) -> Result<Vec<Vec<NotationNote>>, ScoreError> {
    score
        .measure_views()
        .into_iter()
        .map(|view| {
            let mut notes = build_notes(view.measure)?;
            resolve_accidentals(&mut notes, view.key_signature);
            Ok(notes)
        })
        .collect()
}

pub struct Engine<R: Renderer> {
    config: EngineConfig,
    score: Score,
    notes: Vec<Vec<NotationNote>>,
    active_notes: ActiveNoteSet,
    viewport_width: f64,
    plan: LayoutPlan,
    active_stave: Option<StaveHandle>,
    renderer: Option<R>,
}

impl<R: Renderer> Engine<R> {
    /// A new engine holding the empty score and no renderer.
    pub fn new(config: EngineConfig) -> Self {
        let score = Score::empty();
        let plan = layout(&score, 0.0, &config.layout);
        Self {
            config,
            notes: vec![Vec::new(); score.measure_count()],
            score,
            active_notes: ActiveNoteSet::new(),
            viewport_width: 0.0,
            plan,
            active_stave: None,
            renderer: None,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn score(&self) -> &Score {
        &self.score
    }

    /// Resolved notes of each measure of the current score.
    pub fn notes(&self) -> &[Vec<NotationNote>] {
        &self.notes
    }

    pub fn active_notes(&self) -> &ActiveNoteSet {
        &self.active_notes
    }

    pub fn plan(&self) -> &LayoutPlan {
        &self.plan
    }

    pub fn viewport_width(&self) -> f64 {
        self.viewport_width
    }

    /// Stave the overlay was last drawn on, if a repaint has completed.
    pub fn active_stave(&self) -> Option<&StaveHandle> {
        self.active_stave.as_ref()
    }

    pub fn overlay_chord(&self) -> Option<OverlayChord> {
        self.active_notes.overlay_chord()
    }

    pub fn renderer(&self) -> Option<&R> {
        self.renderer.as_ref()
    }

    /// Attach a drawing surface and paint the current state onto it.
    pub fn attach_renderer(&mut self, renderer: R) -> Result<(), RenderError> {
        self.renderer = Some(renderer);
        self.redraw()
    }

    /// Remove the drawing surface. Score and held notes are kept.
    pub fn detach_renderer(&mut self) -> Option<R> {
        self.active_stave = None;
        self.renderer.take()
    }

    /// Load a score document (JSON).
    ///
    /// A malformed document loads the empty score. An invalid note spelling,
    /// duration or dot count rejects the document and keeps the current score.
    pub fn load_score(&mut self, json: &str) -> Result<(), EngineError> {
        self.replace_score(parse_score(json))
    }

    /// Load an optional document; `None` loads the empty score.
    pub fn load_document(&mut self, json: Option<&str>) -> Result<(), EngineError> {
        self.replace_score(parse_optional_score(json))
    }

    /// Replace the score wholesale. Held notes are left alone.
    ///
    /// A score without measures is replaced by [`Score::empty`].
    pub fn replace_score(&mut self, score: Score) -> Result<(), EngineError> {
        let score = if score.measures.is_empty() {
            log::warn!("score '{}' has no measures; using empty score", score.title);
            Score::empty()
        } else {
            score
        };
        let notes = prepare_score(&score).map_err(|e| {
            log::warn!("rejecting score '{}': {e}", score.title);
            e
        })?;
        log::info!("loaded score '{}' ({} measures)", score.title, score.measure_count());

        self.score = score;
        self.notes = notes;
        self.relayout();
        self.redraw()?;
        Ok(())
    }

    /// Apply one note event and repaint if the held notes changed.
    pub fn apply_event(&mut self, event: NoteEvent) -> Result<(), RenderError> {
        if self.active_notes.apply(event) {
            self.redraw()?;
        }
        Ok(())
    }

    /// Apply a burst of note events, then repaint once.
    pub fn apply_events<I>(&mut self, events: I) -> Result<(), RenderError>
    where
        I: IntoIterator<Item = NoteEvent>,
    {
        let mut changed = false;
        for event in events {
            changed |= self.active_notes.apply(event);
        }
        if changed {
            self.redraw()?;
        }
        Ok(())
    }

    /// Decode and apply one event channel message. Messages without a note
    /// event are accepted and ignored.
    pub fn handle_message(&mut self, json: &str) -> Result<(), EngineError> {
        let message = ChannelMessage::from_json(json).map_err(EngineError::InvalidMessage)?;
        match message.note_event() {
            Some(event) => self.apply_event(event)?,
            None => log::debug!("ignoring channel message {message:?}"),
        }
        Ok(())
    }

    /// Change the viewport width; re-lays out and repaints when it differs.
    pub fn set_viewport_width(&mut self, width: f64) -> Result<(), RenderError> {
        if width == self.viewport_width {
            return Ok(());
        }
        self.viewport_width = width;
        self.relayout();
        self.redraw()
    }

    fn relayout(&mut self) {
        self.plan = layout(&self.score, self.viewport_width, &self.config.layout);
    }

    /// Repaint everything from the cached layout: staves and score notes,
    /// then the overlay chord on the active stave.
    ///
    /// Without a surface this does nothing.
    pub fn redraw(&mut self) -> Result<(), RenderError> {
        match self.paint() {
            Err(RenderError::RendererUnavailable) => {
                log::debug!("no drawing surface; skipping redraw");
                self.active_stave = None;
                Ok(())
            }
            other => other,
        }
    }

    fn paint(&mut self) -> Result<(), RenderError> {
        let renderer = self.renderer.as_mut().ok_or(RenderError::RendererUnavailable)?;

        self.active_stave = None;
        let active = draw_plan(renderer, &self.plan, &self.notes)?;

        if let (Some(stave), Some(chord)) = (active.as_ref(), self.active_notes.overlay_chord()) {
            let overlay = chord.to_notation(self.config.overlay.duration);
            let style = NoteStyle::solid(&self.config.overlay.color);
            renderer.draw_notes(stave, std::slice::from_ref(&overlay), Some(&style))?;
        }

        self.active_stave = active;
        Ok(())
    }
}

impl<R: Renderer> Default for Engine<R> {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
