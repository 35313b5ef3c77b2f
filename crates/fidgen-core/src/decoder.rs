//! Reading markers back from an axis-aligned raster.
//!
//! This is the inverse of [`crate::render`] for undistorted pages: it samples
//! the center of every glyph unit, matches each cell against the glyph table,
//! reassembles the code in cell order and ranks it. It is used to check sheets
//! before printing, not to track markers in camera images.

use crate::canvas::{Canvas, Tone};
use crate::dictionary::{CODE_LEN, MarkerCode, MarkerId};
use crate::glyph::{self, GLYPH_COLUMNS, GLYPH_ROWS, GlyphPattern};
use crate::layout::PageGeometry;
use crate::render::{CELL_LAYOUT, UnitFrame};

/// A marker recovered from pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodedMarker {
    /// Identifier derived from the code.
    pub id: MarkerId,
    /// Code read from the glyph cells.
    pub code: MarkerCode,
}

/// Read the glyph in the cell whose top-left unit is `(x, y)`.
///
/// Returns `None` if the cell does not hold one of the six glyphs.
pub fn read_cell<C: Canvas + ?Sized>(canvas: &C, frame: &UnitFrame, x: i64, y: i64) -> Option<u8> {
    let mut bits = 0u16;
    for (row, uy) in (0..GLYPH_ROWS).zip(y + 1..) {
        for (col, ux) in (0..GLYPH_COLUMNS).zip(x + 1..) {
            let (px, py) = frame.unit_center(ux, uy);
            if canvas.pixel(px, py)? == Tone::Black {
                bits |= 1 << (row * GLYPH_COLUMNS + col);
            }
        }
    }
    glyph::symbol_for(GlyphPattern::from_bits(bits))
}

/// Decode the marker drawn at `frame`.
///
/// Returns `None` if any cell is unreadable or the symbols do not form a valid
/// code.
pub fn decode_marker<C: Canvas + ?Sized>(canvas: &C, frame: &UnitFrame) -> Option<DecodedMarker> {
    let mut symbols = [0u8; CODE_LEN];
    for &(x, y, position) in &CELL_LAYOUT {
        symbols[position] = read_cell(canvas, frame, x, y)?;
    }
    let code = MarkerCode::new(symbols)?;
    Some(DecodedMarker { id: code.id(), code })
}

/// Decode every slot of a page, in slot order.
///
/// Empty slots decode to `None`.
pub fn decode_page<C: Canvas + ?Sized>(
    canvas: &C,
    geometry: &PageGeometry,
) -> Vec<Option<DecodedMarker>> {
    let mut out = Vec::with_capacity(geometry.slots_per_page());
    for row in 0..geometry.rows() {
        for column in 0..geometry.columns() {
            let (x, y) = geometry.slot_origin(column, row);
            out.push(decode_marker(canvas, &UnitFrame::new(x, y, geometry.unit())));
        }
    }
    out
}
