//! Marker rendering.
//!
//! A marker is a 21x21 unit square: a one unit white margin, a black body, and
//! six white 8x5 unit cells each holding one 5x3 glyph. The marker's numeric
//! tag is printed as upward text just right of the square. Units are scaled to
//! device pixels by an integer factor, so every edge lands on a pixel boundary.

use crate::canvas::{Canvas, Tone};
use crate::dictionary::{MarkerCode, MarkerId};
use crate::glyph;

/// Side of a marker in units.
pub const MARKER_UNITS: i64 = 21;

/// Width of the white margin around the black body, in units.
pub const MARGIN_UNITS: i64 = 1;

/// Glyph cell width in units.
pub const CELL_WIDTH_UNITS: i64 = 8;

/// Glyph cell height in units.
pub const CELL_HEIGHT_UNITS: i64 = 5;

/// Glyph cells as `(x, y, code position)` in marker units.
///
/// The right column runs backwards through the code.
pub const CELL_LAYOUT: [(i64, i64, usize); 6] = [
    (2, 2, 0),
    (2, 8, 1),
    (2, 14, 2),
    (11, 2, 5),
    (11, 8, 4),
    (11, 14, 3),
];

/// Tag text anchor in tenths of a unit.
const TAG_ANCHOR_TENTHS: (i64, i64) = (213, 40);

/// Maps marker units onto device pixels for one marker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnitFrame {
    /// Device x of the marker's top-left corner.
    pub origin_x: i64,
    /// Device y of the marker's top-left corner.
    pub origin_y: i64,
    /// Pixels per unit.
    pub unit: i64,
}

impl UnitFrame {
    /// Create a frame.
    #[must_use]
    pub fn new(origin_x: i64, origin_y: i64, unit: u32) -> Self {
        Self {
            origin_x,
            origin_y,
            unit: i64::from(unit),
        }
    }

    /// Fill a `w` x `h` unit block whose top-left unit is `(x, y)`.
    pub fn fill_units<C: Canvas + ?Sized>(
        &self,
        canvas: &mut C,
        x: i64,
        y: i64,
        w: i64,
        h: i64,
        tone: Tone,
    ) {
        canvas.fill_rect(
            x * self.unit + self.origin_x,
            y * self.unit + self.origin_y,
            (x + w) * self.unit - 1 + self.origin_x,
            (y + h) * self.unit - 1 + self.origin_y,
            tone,
        );
    }

    /// Device pixel at the center of unit `(x, y)`.
    #[must_use]
    pub fn unit_center(&self, x: i64, y: i64) -> (i64, i64) {
        (
            x * self.unit + self.unit / 2 + self.origin_x,
            y * self.unit + self.unit / 2 + self.origin_y,
        )
    }

    /// Device anchor of the tag text.
    #[must_use]
    pub fn tag_anchor(&self) -> (i64, i64) {
        (
            TAG_ANCHOR_TENTHS.0 * self.unit / 10 + self.origin_x,
            TAG_ANCHOR_TENTHS.1 * self.unit / 10 + self.origin_y,
        )
    }
}

/// Draw one marker with its tag.
///
/// The output depends only on the arguments; nothing besides `canvas` is
/// touched.
pub fn render_marker<C: Canvas + ?Sized>(
    canvas: &mut C,
    code: &MarkerCode,
    id: MarkerId,
    frame: &UnitFrame,
) {
    let body = MARKER_UNITS - 2 * MARGIN_UNITS;
    frame.fill_units(canvas, 0, 0, MARKER_UNITS, MARKER_UNITS, Tone::White);
    frame.fill_units(canvas, MARGIN_UNITS, MARGIN_UNITS, body, body, Tone::Black);

    for &(x, y, position) in &CELL_LAYOUT {
        render_cell(canvas, code.symbol(position), x, y, frame);
    }

    let (tx, ty) = frame.tag_anchor();
    canvas.draw_text_up(tx, ty, &id.to_string(), Tone::Black);
}

/// Draw one glyph cell for `symbol` with its top-left unit at `(x, y)`.
///
/// A missing or unknown symbol leaves the cell blank.
fn render_cell<C: Canvas + ?Sized>(
    canvas: &mut C,
    symbol: Option<u8>,
    x: i64,
    y: i64,
    frame: &UnitFrame,
) {
    frame.fill_units(canvas, x, y, CELL_WIDTH_UNITS, CELL_HEIGHT_UNITS, Tone::White);
    let Some(pattern) = symbol.and_then(glyph::glyph_for) else {
        return;
    };
    for (col, row) in pattern.cells() {
        let (Ok(col), Ok(row)) = (i64::try_from(col), i64::try_from(row)) else {
            continue;
        };
        frame.fill_units(canvas, x + col + 1, y + row + 1, 1, 1, Tone::Black);
    }
}
