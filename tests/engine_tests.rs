//! Integration tests for the engine: score loading, note events, and the
//! order in which drawing reaches the renderer.

use pretty_assertions::assert_eq;
use staffview::{
    Engine, EngineConfig, EngineError, NotationNote, NoteEvent, NoteStyle, RenderError,
    Renderer, Score, ScoreError, StaveDecorations, StaveHandle,
};

/// One recorded renderer call.
#[derive(Debug, Clone, PartialEq)]
enum Call {
    Canvas { width: f64, height: f64 },
    Stave { x: f64, width: f64, decorations: StaveDecorations },
    Notes { stave_x: f64, notes: Vec<NotationNote>, style: Option<NoteStyle> },
}

/// Renderer double that records every call. When `available` is false it
/// behaves like a missing surface.
#[derive(Default)]
struct Recorder {
    calls: Vec<Call>,
    available: bool,
}

impl Recorder {
    fn new() -> Self {
        Self { calls: Vec::new(), available: true }
    }

    fn overlay_calls(&self) -> Vec<&Call> {
        self.calls
            .iter()
            .filter(|c| matches!(c, Call::Notes { style: Some(_), .. }))
            .collect()
    }

    fn canvas_count(&self) -> usize {
        self.calls.iter().filter(|c| matches!(c, Call::Canvas { .. })).count()
    }
}

impl Renderer for Recorder {
    fn create_canvas(&mut self, width: f64, height: f64) -> Result<(), RenderError> {
        if !self.available {
            return Err(RenderError::RendererUnavailable);
        }
        self.calls.clear();
        self.calls.push(Call::Canvas { width, height });
        Ok(())
    }

    fn draw_stave(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        decorations: &StaveDecorations,
    ) -> Result<StaveHandle, RenderError> {
        self.calls.push(Call::Stave { x, width, decorations: decorations.clone() });
        Ok(StaveHandle { x, y, width, note_start_x: x })
    }

    fn draw_notes(
        &mut self,
        stave: &StaveHandle,
        notes: &[NotationNote],
        style: Option<&NoteStyle>,
    ) -> Result<(), RenderError> {
        self.calls.push(Call::Notes {
            stave_x: stave.x,
            notes: notes.to_vec(),
            style: style.cloned(),
        });
        Ok(())
    }
}

const TWO_MEASURES: &str = r#"{
    "version": 1, "title": "Two", "bpm": 100,
    "measures": [
        { "key_signature": "G", "time_signature": "4/4",
          "contents": [ { "notes": ["G4", "B4", "D5"], "duration": "h" },
                        { "notes": ["F4"], "duration": "q" },
                        { "notes": [], "duration": "q" } ] },
        { "contents": [ { "notes": ["F#4"], "duration": "w" } ] }
    ]
}"#;

fn engine_with_recorder() -> Engine<Recorder> {
    let mut engine = Engine::new(EngineConfig::default());
    engine.attach_renderer(Recorder::new()).unwrap();
    engine
}

fn recorder(engine: &Engine<Recorder>) -> &Recorder {
    engine.renderer().expect("renderer attached")
}

// ═══════════════════════════════════════════════════════════════════════
// Score loading
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn new_engine_holds_empty_score() {
    let engine: Engine<Recorder> = Engine::default();
    assert_eq!(engine.score(), &Score::empty());
    assert_eq!(engine.plan().placements.len(), 1);
}

#[test]
fn load_score_draws_every_measure() {
    let mut engine = engine_with_recorder();
    engine.load_score(TWO_MEASURES).unwrap();

    assert_eq!(engine.score().title, "Two");
    let staves = recorder(&engine)
        .calls
        .iter()
        .filter(|c| matches!(c, Call::Stave { .. }))
        .count();
    assert_eq!(staves, 2);
    assert_eq!(recorder(&engine).canvas_count(), 1);
    assert!(recorder(&engine).overlay_calls().is_empty());
}

#[test]
fn inherited_key_drives_accidentals_in_later_measures() {
    let mut engine = engine_with_recorder();
    engine.load_score(TWO_MEASURES).unwrap();

    let notes = engine.notes();
    // F natural against G major needs a natural sign
    assert_eq!(notes[0][1].drawn_accidentals, vec![Some(staffview::Accidental::Natural)]);
    // memory resets at the bar line: F# in measure 2 is covered by the key
    assert_eq!(notes[1][0].drawn_accidentals, vec![None]);
}

#[test]
fn malformed_document_loads_empty_score() {
    let mut engine = engine_with_recorder();
    engine.load_score(TWO_MEASURES).unwrap();
    engine.load_score("{}").unwrap();
    assert_eq!(engine.score(), &Score::empty());
    engine.load_score(TWO_MEASURES).unwrap();
    engine.load_document(None).unwrap();
    assert_eq!(engine.score(), &Score::empty());
}

#[test]
fn invalid_spelling_rejects_load_and_keeps_previous_score() {
    let mut engine = engine_with_recorder();
    engine.load_score(TWO_MEASURES).unwrap();
    let before = engine.score().clone();

    let err = engine
        .load_score(r#"{"measures": [{"contents": [{"notes": ["H4"], "duration": "q"}]}]}"#)
        .unwrap_err();
    assert_eq!(err, EngineError::Score(ScoreError::InvalidPitchSpelling("H4".to_string())));
    assert_eq!(engine.score(), &before);
}

#[test]
fn score_without_measures_is_replaced_by_empty_score() {
    let mut engine = engine_with_recorder();
    engine.apply_event(NoteEvent::On(60)).unwrap();
    engine
        .replace_score(Score { measures: Vec::new(), ..Score::empty() })
        .unwrap();

    assert_eq!(engine.score(), &Score::empty());
    assert_eq!(engine.plan().placements.len(), 1);
    assert!(engine.active_stave().is_some());
    assert_eq!(recorder(&engine).overlay_calls().len(), 1);
}

// ═══════════════════════════════════════════════════════════════════════
// Note events and overlay
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn note_on_then_zero_velocity_release() {
    let mut engine = engine_with_recorder();
    engine.handle_message(r#"{"type":"note_on","note":60,"velocity":90}"#).unwrap();
    engine.handle_message(r#"{"type":"note_on","note":61,"velocity":90}"#).unwrap();
    engine.handle_message(r#"{"type":"note_on","note":60,"velocity":0}"#).unwrap();

    assert_eq!(engine.active_notes().iter().collect::<Vec<_>>(), vec![61]);
    let chord = engine.overlay_chord().unwrap();
    assert_eq!(chord.midi_notes, vec![61]);
    assert_eq!(chord.pitches[0].to_string(), "C#4");
}

#[test]
fn overlay_is_drawn_last_on_the_first_stave() {
    let mut engine = engine_with_recorder();
    engine.set_viewport_width(1000.0).unwrap();
    engine.load_score(TWO_MEASURES).unwrap();
    engine.apply_event(NoteEvent::On(64)).unwrap();

    let calls = &recorder(&engine).calls;
    let first_stave_x = engine.plan().placements[0].x;
    match calls.last() {
        Some(Call::Notes { stave_x, notes, style: Some(style) }) => {
            assert_eq!(*stave_x, first_stave_x);
            assert_eq!(notes.len(), 1);
            assert_eq!(notes[0].keys[0].to_string(), "E4");
            assert_eq!(style.fill, "red");
        }
        other => panic!("expected overlay last, got {other:?}"),
    }
    assert_eq!(engine.active_stave().map(|s| s.x), Some(first_stave_x));
}

#[test]
fn repeated_note_on_does_not_repaint() {
    let mut engine = engine_with_recorder();
    engine.apply_event(NoteEvent::On(70)).unwrap();
    let calls_before = recorder(&engine).calls.clone();
    engine.apply_event(NoteEvent::On(70)).unwrap();
    engine.apply_event(NoteEvent::Off(71)).unwrap();
    assert_eq!(recorder(&engine).calls, calls_before);
}

#[test]
fn release_clears_the_overlay() {
    let mut engine = engine_with_recorder();
    engine.apply_event(NoteEvent::On(67)).unwrap();
    assert_eq!(recorder(&engine).overlay_calls().len(), 1);
    engine.apply_event(NoteEvent::Off(67)).unwrap();
    assert!(recorder(&engine).overlay_calls().is_empty());
}

#[test]
fn out_of_range_notes_are_held_but_not_drawn() {
    let mut engine = engine_with_recorder();
    engine.apply_event(NoteEvent::On(10)).unwrap();
    assert!(engine.active_notes().contains(10));
    assert!(recorder(&engine).overlay_calls().is_empty());

    engine.apply_event(NoteEvent::On(72)).unwrap();
    match recorder(&engine).overlay_calls().as_slice() {
        [Call::Notes { notes, .. }] => assert_eq!(notes[0].keys.len(), 1),
        other => panic!("expected one overlay call, got {other:?}"),
    }
}

#[test]
fn burst_applies_every_event_and_repaints_once() {
    let mut engine = engine_with_recorder();
    engine
        .apply_events([
            NoteEvent::On(60),
            NoteEvent::On(64),
            NoteEvent::On(67),
            NoteEvent::Off(64),
        ])
        .unwrap();
    assert_eq!(engine.active_notes().iter().collect::<Vec<_>>(), vec![60, 67]);
    let overlays = recorder(&engine).overlay_calls();
    assert_eq!(overlays.len(), 1);
    match overlays[0] {
        Call::Notes { notes, .. } => {
            let names: Vec<String> = notes[0].keys.iter().map(|p| p.to_string()).collect();
            assert_eq!(names, vec!["C4", "G4"]);
        }
        other => panic!("unexpected call {other:?}"),
    }
}

#[test]
fn switching_scores_keeps_held_notes() {
    let mut engine = engine_with_recorder();
    engine.apply_event(NoteEvent::On(62)).unwrap();
    engine.load_score(TWO_MEASURES).unwrap();
    assert!(engine.active_notes().contains(62));
    assert_eq!(recorder(&engine).overlay_calls().len(), 1);
}

#[test]
fn non_note_messages_are_ignored() {
    let mut engine = engine_with_recorder();
    engine.handle_message(r#"{"type":"mode_switch","input":"keyboard"}"#).unwrap();
    engine.handle_message(r#"{"type":"key_press","key":"a"}"#).unwrap();
    assert!(engine.active_notes().is_empty());
    assert!(matches!(
        engine.handle_message("{\"type\":\"bogus\"}"),
        Err(EngineError::InvalidMessage(_))
    ));
}

#[test]
fn note_numbers_outside_midi_range_are_not_held() {
    let mut engine = engine_with_recorder();
    assert!(matches!(
        engine.handle_message(r#"{"type":"note_on","note":200,"velocity":90}"#),
        Err(EngineError::InvalidMessage(_))
    ));
    assert!(engine.active_notes().is_empty());
}

// ═══════════════════════════════════════════════════════════════════════
// Surface and viewport
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn missing_surface_makes_redraw_a_noop() {
    let mut engine: Engine<Recorder> = Engine::default();
    engine.load_score(TWO_MEASURES).unwrap();
    engine.apply_event(NoteEvent::On(65)).unwrap();
    assert!(engine.active_stave().is_none());

    // a surface that refuses to draw behaves the same way
    let mut dead = Recorder::new();
    dead.available = false;
    engine.attach_renderer(dead).unwrap();
    engine.apply_event(NoteEvent::On(66)).unwrap();
    assert!(recorder(&engine).calls.is_empty());

    // state was kept and is drawn once a surface exists
    engine.detach_renderer();
    engine.attach_renderer(Recorder::new()).unwrap();
    let overlays = recorder(&engine).overlay_calls();
    assert_eq!(overlays.len(), 1);
    match overlays[0] {
        Call::Notes { notes, .. } => assert_eq!(notes[0].keys.len(), 2),
        other => panic!("unexpected call {other:?}"),
    }
}

#[test]
fn viewport_change_recenters_and_resizes_canvas() {
    let mut engine = engine_with_recorder();
    engine.load_score(TWO_MEASURES).unwrap();
    let narrow = engine.plan().clone();

    engine.set_viewport_width(1200.0).unwrap();
    let wide = engine.plan().clone();
    assert_eq!(wide.first_measure_offset, 1200.0 / 2.0 / 2.0 - 75.0);
    assert!(wide.canvas_width > narrow.canvas_width);
    assert_eq!(
        recorder(&engine).calls.first(),
        Some(&Call::Canvas { width: wide.canvas_width, height: wide.canvas_height })
    );

    // same width again: nothing to do
    let calls = recorder(&engine).calls.clone();
    engine.set_viewport_width(1200.0).unwrap();
    assert_eq!(recorder(&engine).calls, calls);
}
