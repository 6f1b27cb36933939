//! staffview: notation modeling and layout engine for a live MIDI staff viewer.
//!
//! A score document (JSON) is turned into measures of notation notes with
//! resolved accidentals, laid out left to right on a single line, and drawn
//! through a [`Renderer`]. Held MIDI notes are drawn as an overlay chord on
//! the first stave.
//!
//! # Example
//! ```no_run
//! use staffview::{Engine, SvgRenderer, NoteEvent};
//!
//! let mut engine: Engine<SvgRenderer> = Engine::default();
//! engine.attach_renderer(SvgRenderer::default()).unwrap();
//! engine.load_score(r#"{"title": "Scale", "measures": [{"key_signature": "G",
//!     "contents": [{"notes": ["G4"], "duration": "q"}]}]}"#).unwrap();
//! engine.apply_event(NoteEvent::On(61)).unwrap();
//! println!("{}", engine.renderer().unwrap().to_svg());
//! ```

pub mod accidentals;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod layout;
pub mod model;
pub mod notation;
pub mod overlay;
pub mod parser;
pub mod pitch;
pub mod renderer;

pub use accidentals::{resolve_accidentals, KeySpec};
pub use config::{EngineConfig, LayoutConfig, OverlayConfig};
pub use engine::{prepare_score, Engine};
pub use error::{EngineError, RenderError, ScoreError};
pub use events::{ChannelMessage, InputMode, NoteEvent};
pub use layout::{layout, LayoutPlan, MeasurePlacement, StaveDecorations};
pub use model::*;
pub use notation::{build_notes, Duration, NotationNote};
pub use overlay::{ActiveNoteSet, OverlayChord};
pub use parser::{parse_score, try_parse_score};
pub use pitch::{map_pitch, Accidental, Letter, Pitch};
pub use renderer::{NoteStyle, Renderer, StaveHandle, SvgRenderer};

/// Convert a parsed score to a JSON string.
/// Useful for passing data across FFI boundaries.
pub fn score_to_json(score: &Score) -> Result<String, String> {
    serde_json::to_string_pretty(score).map_err(|e| format!("JSON serialization error: {e}"))
}

/// Parse a score document and render it directly to SVG.
///
/// `viewport_width` is the host viewport width used to center the first
/// measure. Pass `None` to place it at the left edge.
pub fn render_document_to_svg(json: &str, viewport_width: Option<f64>) -> Result<String, EngineError> {
    let config = EngineConfig::default();
    let mut engine: Engine<SvgRenderer> = Engine::new(config.clone());
    engine.set_viewport_width(viewport_width.unwrap_or(0.0))?;
    engine.load_score(json)?;
    engine.attach_renderer(SvgRenderer::new(config.layout))?;
    Ok(engine.renderer().map(SvgRenderer::to_svg).unwrap_or_default())
}

// ═══════════════════════════════════════════════════════════════════════
// C FFI for embedding the engine in a host shell
// ═══════════════════════════════════════════════════════════════════════

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

/// Opaque engine handle for FFI callers.
pub struct FfiEngine(Engine<SvgRenderer>);

unsafe fn c_str_arg<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(ptr) }.to_str().ok()
}

/// Create an engine drawing to SVG. `config_json` may be null for defaults.
/// Free with `staffview_engine_free`.
///
/// # Safety
/// `config_json` must be null or a valid null-terminated UTF-8 C string.
#[no_mangle]
pub unsafe extern "C" fn staffview_engine_new(config_json: *const c_char) -> *mut FfiEngine {
    let config = match unsafe { c_str_arg(config_json) } {
        Some(json) => match EngineConfig::from_json(json) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("{e}; using default config");
                EngineConfig::default()
            }
        },
        None => EngineConfig::default(),
    };
    let mut engine = Engine::new(config.clone());
    if let Err(e) = engine.attach_renderer(SvgRenderer::new(config.layout)) {
        log::error!("initial render failed: {e}");
    }
    Box::into_raw(Box::new(FfiEngine(engine)))
}

/// Free an engine created by `staffview_engine_new`.
///
/// # Safety
/// `engine` must be null or a pointer returned by `staffview_engine_new`.
#[no_mangle]
pub unsafe extern "C" fn staffview_engine_free(engine: *mut FfiEngine) {
    if !engine.is_null() {
        drop(unsafe { Box::from_raw(engine) });
    }
}

/// Load a score document. A null `json` loads the empty score.
/// Returns 0 on success, -1 if the document was rejected.
///
/// # Safety
/// `engine` must be a live engine pointer; `json` null or a valid C string.
#[no_mangle]
pub unsafe extern "C" fn staffview_engine_load_score(engine: *mut FfiEngine, json: *const c_char) -> i32 {
    let Some(engine) = (unsafe { engine.as_mut() }) else {
        return -1;
    };
    match engine.0.load_document(unsafe { c_str_arg(json) }) {
        Ok(()) => 0,
        Err(e) => {
            log::warn!("score load failed: {e}");
            -1
        }
    }
}

/// Apply one event channel message (JSON). Returns 0 on success, -1 on error.
///
/// # Safety
/// `engine` must be a live engine pointer; `json` a valid C string.
#[no_mangle]
pub unsafe extern "C" fn staffview_engine_handle_message(engine: *mut FfiEngine, json: *const c_char) -> i32 {
    let (Some(engine), Some(json)) = (unsafe { engine.as_mut() }, unsafe { c_str_arg(json) }) else {
        return -1;
    };
    match engine.0.handle_message(json) {
        Ok(()) => 0,
        Err(e) => {
            log::warn!("message rejected: {e}");
            -1
        }
    }
}

/// Set the viewport width. Returns 0 on success, -1 on error.
///
/// # Safety
/// `engine` must be a live engine pointer.
#[no_mangle]
pub unsafe extern "C" fn staffview_engine_set_viewport(engine: *mut FfiEngine, width: f64) -> i32 {
    let Some(engine) = (unsafe { engine.as_mut() }) else {
        return -1;
    };
    match engine.0.set_viewport_width(width) {
        Ok(()) => 0,
        Err(_) => -1,
    }
}

/// Current drawing as an SVG C string.
/// The caller must free the returned string with `staffview_free_string`.
///
/// # Safety
/// `engine` must be a live engine pointer.
#[no_mangle]
pub unsafe extern "C" fn staffview_engine_render_svg(engine: *const FfiEngine) -> *mut c_char {
    let Some(engine) = (unsafe { engine.as_ref() }) else {
        return std::ptr::null_mut();
    };
    match engine.0.renderer() {
        Some(r) => CString::new(r.to_svg()).unwrap_or_default().into_raw(),
        None => std::ptr::null_mut(),
    }
}

/// Free a string previously returned by staffview functions.
///
/// # Safety
/// `ptr` must be a string previously returned by a staffview function, or null.
#[no_mangle]
pub unsafe extern "C" fn staffview_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        unsafe {
            let _ = CString::from_raw(ptr);
        }
    }
}
