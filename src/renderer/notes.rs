//! Note, rest, accidental, dot and ledger line rendering.

use crate::notation::{Duration, NotationNote};

use super::constants::*;
use super::staff::{accidental_glyph, step_y};
use super::svg_builder::SvgBuilder;

/// X position of each note, spaced by onset time across the note area.
pub(super) fn note_x_positions(notes: &[NotationNote], start_x: f64, end_x: f64) -> Vec<f64> {
    let total: f64 = notes.iter().map(NotationNote::quarters).sum();
    let usable = (end_x - start_x).max(0.0);
    let mut onset = 0.0;
    notes
        .iter()
        .map(|note| {
            let x = if total > 0.0 { start_x + onset / total * usable } else { start_x };
            onset += note.quarters();
            x
        })
        .collect()
}

pub(super) fn render_note(svg: &mut SvgBuilder, note: &NotationNote, x: f64, top_y: f64, color: &str) {
    if note.is_rest {
        render_rest(svg, x, top_y, note.duration, color);
        render_dots(svg, x, step_y(top_y, 35), note.dots, color);
        return;
    }

    let steps: Vec<i32> = note.keys.iter().map(|p| p.diatonic_step()).collect();
    let (Some(&lowest), Some(&highest)) = (steps.iter().min(), steps.iter().max()) else {
        return;
    };

    for (i, &step) in steps.iter().enumerate() {
        let y = step_y(top_y, step);
        render_ledger_lines(svg, x, step, top_y);
        svg.notehead(x, y, note.duration.is_filled(), color);

        // Dots sit in a space
        let dot_y = if step % 2 == 0 { y - HALF_SPACE } else { y };
        render_dots(svg, x, dot_y, note.dots, color);

        if let Some(acc) = note.drawn_accidentals.get(i).copied().flatten() {
            svg.text(
                x - NOTEHEAD_RX - ACCIDENTAL_GAP,
                y + 5.0,
                accidental_glyph(acc),
                16.0,
                "normal",
                color,
                "end",
            );
        }
    }

    if note.duration.has_stem() {
        let stem_up = lowest + highest < 2 * 34;
        let (sx, y1, y2) = if stem_up {
            let x = x + NOTEHEAD_RX - 1.0;
            (x, step_y(top_y, lowest), step_y(top_y, highest) - STEM_LENGTH)
        } else {
            let x = x - NOTEHEAD_RX + 1.0;
            (x, step_y(top_y, highest), step_y(top_y, lowest) + STEM_LENGTH)
        };
        svg.line(sx, y1, sx, y2, color, STEM_WIDTH);
        render_flags(svg, sx, y2, note.duration.flag_count(), stem_up, color);
    }
}

fn render_dots(svg: &mut SvgBuilder, x: f64, y: f64, dots: u8, color: &str) {
    for d in 0..dots {
        svg.circle(x + NOTEHEAD_RX + DOT_GAP + d as f64 * 5.0, y, 1.8, color);
    }
}

fn render_flags(svg: &mut SvgBuilder, stem_x: f64, tip_y: f64, count: usize, stem_up: bool, color: &str) {
    let dir = if stem_up { 1.0 } else { -1.0 };
    for i in 0..count {
        let y = tip_y + dir * i as f64 * 7.0;
        let d = format!(
            "M{:.1},{:.1} q8,{:.1} 7,{:.1}",
            stem_x,
            y,
            dir * 8.0,
            dir * 18.0
        );
        svg.path(&d, "none", color, 1.6);
    }
}

fn render_ledger_lines(svg: &mut SvgBuilder, x: f64, step: i32, top_y: f64) {
    let x1 = x - NOTEHEAD_RX - LEDGER_LINE_EXTEND / 2.0;
    let x2 = x + NOTEHEAD_RX + LEDGER_LINE_EXTEND / 2.0;

    let mut s = BOTTOM_LINE_STEP - 2;
    while s >= step {
        let y = step_y(top_y, s);
        svg.line(x1, y, x2, y, STAFF_COLOR, LEDGER_LINE_WIDTH);
        s -= 2;
    }
    let mut s = TOP_LINE_STEP + 2;
    while s <= step {
        let y = step_y(top_y, s);
        svg.line(x1, y, x2, y, STAFF_COLOR, LEDGER_LINE_WIDTH);
        s += 2;
    }
}

fn render_rest(svg: &mut SvgBuilder, x: f64, top_y: f64, duration: Duration, color: &str) {
    match duration {
        // Whole rest hangs from the fourth line, half rest sits on the middle line
        Duration::Whole => svg.rect(x - 6.0, top_y + STAFF_LINE_SPACING, 12.0, 5.0, color),
        Duration::Half => svg.rect(x - 6.0, top_y + 2.0 * STAFF_LINE_SPACING - 5.0, 12.0, 5.0, color),
        Duration::Quarter => {
            let y = top_y + 8.0;
            let d = format!(
                "M{:.1},{:.1} l6,8 l-6,7 l6,8 q-8,-3 -3,8",
                x - 3.0,
                y
            );
            svg.path(&d, "none", color, 2.2);
        }
        short => {
            let flags = short.flag_count();
            let top = top_y + 2.0 * STAFF_LINE_SPACING - 8.0;
            let bottom = top + 14.0 + flags as f64 * 6.0;
            svg.line(x + 3.0, top, x - 2.0, bottom, color, 1.4);
            for i in 0..flags {
                svg.circle(x - 2.0, top + 3.0 + i as f64 * 7.0, 2.4, color);
            }
        }
    }
}
