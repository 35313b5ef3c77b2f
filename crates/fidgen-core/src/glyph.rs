#![allow(clippy::unreadable_literal)]
//! Glyph bitmaps for the six marker symbols.
//!
//! Each glyph is a 5x3 grid. Bit `row * 5 + col` is set when the grid cell is
//! drawn black. The patterns are fixed: printed markers are decoded by
//! comparing against exactly these shapes.

/// Glyph grid width in cells.
pub const GLYPH_COLUMNS: usize = 5;

/// Glyph grid height in cells.
pub const GLYPH_ROWS: usize = 3;

/// A 5x3 binary bitmap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GlyphPattern(u16);

impl GlyphPattern {
    /// Build a glyph from rows of cells (non-zero = black).
    #[must_use]
    pub const fn from_rows(rows: [[u8; GLYPH_COLUMNS]; GLYPH_ROWS]) -> Self {
        let mut bits = 0u16;
        let mut row = 0;
        while row < GLYPH_ROWS {
            let mut col = 0;
            while col < GLYPH_COLUMNS {
                if rows[row][col] != 0 {
                    bits |= 1 << (row * GLYPH_COLUMNS + col);
                }
                col += 1;
            }
            row += 1;
        }
        Self(bits)
    }

    /// Build a glyph from its packed bits.
    #[must_use]
    pub const fn from_bits(bits: u16) -> Self {
        Self(bits & 0x7fff)
    }

    /// Packed bit representation.
    #[must_use]
    pub const fn bits(self) -> u16 {
        self.0
    }

    /// Whether the cell at `(col, row)` is black.
    #[must_use]
    pub const fn is_set(self, col: usize, row: usize) -> bool {
        col < GLYPH_COLUMNS && row < GLYPH_ROWS && (self.0 >> (row * GLYPH_COLUMNS + col)) & 1 != 0
    }

    /// Iterate over the `(col, row)` positions of black cells, row-major.
    pub fn cells(self) -> impl Iterator<Item = (usize, usize)> {
        (0..GLYPH_ROWS)
            .flat_map(|row| (0..GLYPH_COLUMNS).map(move |col| (col, row)))
            .filter(move |&(col, row)| self.is_set(col, row))
    }
}

/// Glyphs for symbols 1 through 6, indexed by `symbol - 1`.
pub static GLYPHS: [GlyphPattern; 6] = [
    GlyphPattern::from_rows([
        [1, 0, 0, 0, 1],
        [1, 1, 1, 1, 1],
        [1, 0, 0, 0, 0],
    ]),
    GlyphPattern::from_rows([
        [1, 1, 1, 0, 1],
        [1, 0, 0, 0, 1],
        [1, 0, 1, 1, 1],
    ]),
    GlyphPattern::from_rows([
        [1, 0, 1, 0, 1],
        [1, 0, 1, 0, 1],
        [1, 0, 1, 0, 1],
    ]),
    GlyphPattern::from_rows([
        [0, 0, 1, 0, 1],
        [0, 0, 1, 0, 0],
        [1, 0, 1, 0, 1],
    ]),
    GlyphPattern::from_rows([
        [1, 0, 1, 1, 1],
        [0, 0, 0, 0, 0],
        [1, 0, 1, 0, 1],
    ]),
    GlyphPattern::from_rows([
        [1, 0, 1, 0, 1],
        [0, 0, 0, 0, 0],
        [1, 0, 1, 0, 1],
    ]),
];

/// Glyph for a symbol in `1..=6`.
#[must_use]
pub fn glyph_for(symbol: u8) -> Option<GlyphPattern> {
    usize::from(symbol)
        .checked_sub(1)
        .and_then(|i| GLYPHS.get(i))
        .copied()
}

/// Symbol whose glyph has exactly these bits.
#[must_use]
pub fn symbol_for(pattern: GlyphPattern) -> Option<u8> {
    GLYPHS
        .iter()
        .position(|&g| g == pattern)
        .and_then(|i| u8::try_from(i + 1).ok())
}
