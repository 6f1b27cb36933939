//! Staff, clef, key signature, time signature and barline rendering.

use crate::accidentals::KeySpec;
use crate::layout::Clef;
use crate::model::TimeSignature;
use crate::pitch::{Accidental, Letter};

use super::constants::*;
use super::svg_builder::SvgBuilder;

/// Y of a diatonic step on a treble staff whose top line is at `top_y`.
pub(super) fn step_y(top_y: f64, step: i32) -> f64 {
    top_y + (TOP_LINE_STEP - step) as f64 * HALF_SPACE
}

pub(super) fn render_staff_lines(svg: &mut SvgBuilder, x1: f64, x2: f64, top_y: f64) {
    for i in 0..5 {
        let y = top_y + i as f64 * STAFF_LINE_SPACING;
        svg.line(x1, y, x2, y, STAFF_COLOR, STAFF_LINE_WIDTH);
    }
}

pub(super) fn render_barline(svg: &mut SvgBuilder, x: f64, top_y: f64) {
    svg.line(x, top_y, x, top_y + STAFF_HEIGHT, BARLINE_COLOR, BARLINE_WIDTH);
}

pub(super) fn render_clef(svg: &mut SvgBuilder, x: f64, top_y: f64, clef: Clef) {
    match clef {
        Clef::Treble => {
            // G clef glyph, baseline a little below the staff
            svg.text(x + CLEF_X_OFFSET, top_y + STAFF_HEIGHT + 6.0, "\u{1D11E}", 50.0, "normal", NOTE_COLOR, "start");
        }
    }
}

// Treble-staff positions of key signature accidentals, in signature order.
fn key_signature_step(accidental: Accidental, letter: Letter) -> i32 {
    match (accidental, letter) {
        (Accidental::Sharp, Letter::F) => 38,
        (Accidental::Sharp, Letter::C) => 35,
        (Accidental::Sharp, Letter::G) => 39,
        (Accidental::Sharp, Letter::D) => 36,
        (Accidental::Sharp, Letter::A) => 33,
        (Accidental::Sharp, Letter::E) => 37,
        (Accidental::Sharp, Letter::B) => 34,
        (_, Letter::B) => 34,
        (_, Letter::E) => 37,
        (_, Letter::A) => 33,
        (_, Letter::D) => 36,
        (_, Letter::G) => 32,
        (_, Letter::C) => 35,
        (_, Letter::F) => 31,
    }
}

pub(super) fn accidental_glyph(accidental: Accidental) -> &'static str {
    match accidental {
        Accidental::Sharp => "\u{266F}",
        Accidental::Flat => "\u{266D}",
        Accidental::Natural => "\u{266E}",
    }
}

/// Render a key signature; returns the width used.
pub(super) fn render_key_signature(
    svg: &mut SvgBuilder,
    x: f64,
    top_y: f64,
    spec: &KeySpec,
    accidental_width: f64,
) -> f64 {
    let letters = spec.altered_letters();
    for (i, &letter) in letters.iter().enumerate() {
        let gx = x + KEY_SIG_X_OFFSET + i as f64 * accidental_width;
        let gy = step_y(top_y, key_signature_step(spec.accidental, letter));
        svg.text(gx, gy + 5.0, accidental_glyph(spec.accidental), 16.0, "normal", NOTE_COLOR, "start");
    }
    letters.len() as f64 * accidental_width
}

/// Render a time signature such as `3/4` as two stacked numbers. Anything
/// without a slash (e.g. `C`) is drawn as a single centered symbol.
pub(super) fn render_time_signature(svg: &mut SvgBuilder, x: f64, top_y: f64, time: &TimeSignature, width: f64) {
    let cx = x + width / 2.0;
    match time.as_str().split_once('/') {
        Some((num, den)) => {
            svg.text(cx, top_y + 18.0, num.trim(), 22.0, "bold", NOTE_COLOR, "middle");
            svg.text(cx, top_y + 38.0, den.trim(), 22.0, "bold", NOTE_COLOR, "middle");
        }
        None => {
            svg.text(cx, top_y + 28.0, time.as_str(), 22.0, "bold", NOTE_COLOR, "middle");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staff_lines_map_to_expected_steps() {
        assert_eq!(step_y(0.0, TOP_LINE_STEP), 0.0);
        assert_eq!(step_y(0.0, BOTTOM_LINE_STEP), STAFF_HEIGHT);
        // middle C sits one ledger line below the staff
        assert_eq!(step_y(0.0, 28), STAFF_HEIGHT + STAFF_LINE_SPACING);
    }
}
