//! Built-in 5x8 bitmap digits for marker tags.
//!
//! Only `0`-`9` are needed: tags are decimal marker identifiers.

/// Character cell width in pixels.
pub const FONT_WIDTH: usize = 5;

/// Character cell height in pixels.
pub const FONT_HEIGHT: usize = 8;

/// Digit rows, top to bottom. Bit 4 is the leftmost pixel.
static DIGITS: [[u8; FONT_HEIGHT]; 10] = [
    [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110, 0],
    [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110, 0],
    [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111, 0],
    [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110, 0],
    [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010, 0],
    [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110, 0],
    [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110, 0],
    [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000, 0],
    [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110, 0],
    [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100, 0],
];

/// Bitmap of one character, if the font has it.
#[derive(Clone, Copy, Debug)]
pub struct CharBitmap(&'static [u8; FONT_HEIGHT]);

impl CharBitmap {
    /// Look up a character.
    #[must_use]
    pub fn for_char(c: char) -> Option<Self> {
        let digit = c.to_digit(10)?;
        DIGITS.get(digit as usize).map(Self)
    }

    /// Whether the pixel at column `cx`, row `cy` is inked.
    #[must_use]
    pub fn is_set(self, cx: usize, cy: usize) -> bool {
        cx < FONT_WIDTH && cy < FONT_HEIGHT && (self.0[cy] >> (FONT_WIDTH - 1 - cx)) & 1 != 0
    }

    /// Iterate over inked `(cx, cy)` positions.
    pub fn pixels(self) -> impl Iterator<Item = (usize, usize)> {
        (0..FONT_HEIGHT)
            .flat_map(|cy| (0..FONT_WIDTH).map(move |cx| (cx, cy)))
            .filter(move |&(cx, cy)| self.is_set(cx, cy))
    }
}
