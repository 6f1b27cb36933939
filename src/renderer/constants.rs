//! Shared constants for the SVG backend (all in SVG user units).

// ── Staff dimensions ────────────────────────────────────────────────
pub(super) const STAFF_LINE_SPACING: f64 = 10.0; // distance between staff lines
pub(super) const STAFF_HEIGHT: f64 = 40.0; // 5 lines, 4 spaces
pub(super) const STAFF_TOP_MARGIN: f64 = 40.0; // stave y to top line
pub(super) const HALF_SPACE: f64 = STAFF_LINE_SPACING / 2.0;

// ── Reference pitches (diatonic steps from C0) ─────────────────────
pub(super) const TOP_LINE_STEP: i32 = 38; // F5 on a treble staff
pub(super) const BOTTOM_LINE_STEP: i32 = 30; // E4 on a treble staff

// ── Prefix glyph placement ──────────────────────────────────────────
pub(super) const CLEF_X_OFFSET: f64 = 6.0;
pub(super) const KEY_SIG_X_OFFSET: f64 = 4.0;
pub(super) const NOTE_AREA_INSET: f64 = 14.0; // gap before the first note and after the last

// ── Note dimensions ─────────────────────────────────────────────────
pub(super) const NOTEHEAD_RX: f64 = 5.5; // notehead ellipse x-radius
pub(super) const NOTEHEAD_RY: f64 = 4.0; // notehead ellipse y-radius
pub(super) const STEM_LENGTH: f64 = 30.0;
pub(super) const STEM_WIDTH: f64 = 1.2;
pub(super) const BARLINE_WIDTH: f64 = 1.0;
pub(super) const STAFF_LINE_WIDTH: f64 = 0.8;
pub(super) const LEDGER_LINE_WIDTH: f64 = 0.8;
pub(super) const LEDGER_LINE_EXTEND: f64 = 5.0;
pub(super) const ACCIDENTAL_GAP: f64 = 4.0;
pub(super) const DOT_GAP: f64 = 4.0;

// ── Colors ──────────────────────────────────────────────────────────
pub(super) const NOTE_COLOR: &str = "#1a1a1a";
pub(super) const STAFF_COLOR: &str = "#555555";
pub(super) const BARLINE_COLOR: &str = "#333333";
pub(super) const BACKGROUND_COLOR: &str = "#ffffff";
