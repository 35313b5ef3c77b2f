//! Helpers for checking generated sheets in tests and benches.

use std::io;

use crate::canvas::GrayCanvas;
use crate::decoder;
use crate::dictionary::MarkerId;
use crate::error::ExportError;
use crate::layout::PageGeometry;
use crate::sink::{MemorySheet, MemorySink, SheetArtifact, SheetSink};

/// Identifiers read from every slot of a page, in slot order.
#[must_use]
pub fn decode_slot_ids(canvas: &GrayCanvas, geometry: &PageGeometry) -> Vec<Option<MarkerId>> {
    decoder::decode_page(canvas, geometry)
        .into_iter()
        .map(|m| m.map(|m| m.id))
        .collect()
}

/// Identifiers read from a PNG-encoded page, skipping empty slots.
///
/// # Errors
/// If `png` cannot be decoded.
pub fn decode_sheet_png(
    png: &[u8],
    geometry: &PageGeometry,
) -> Result<Vec<MarkerId>, image::ImageError> {
    let canvas = GrayCanvas::decode_png(png)?;
    Ok(decode_slot_ids(&canvas, geometry).into_iter().flatten().collect())
}

/// Identifiers read from all sheets in export order.
///
/// # Panics
/// If a sheet is not a valid PNG.
#[must_use]
#[allow(clippy::expect_used)]
pub fn decode_sheets(sheets: &[MemorySheet], geometry: &PageGeometry) -> Vec<MarkerId> {
    sheets
        .iter()
        .flat_map(|sheet| decode_sheet_png(&sheet.png, geometry).expect("sheet is a valid PNG"))
        .collect()
}

/// A sink that refuses selected pages and stores the rest in memory.
#[derive(Debug, Default)]
pub struct FailingSink {
    fail_on: Vec<String>,
    attempts: Vec<String>,
    inner: MemorySink,
}

impl FailingSink {
    /// Fail every page whose name is in `names`.
    #[must_use]
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fail_on: names.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Names of every page handed to the sink, including refused ones.
    #[must_use]
    pub fn attempts(&self) -> &[String] {
        &self.attempts
    }

    /// Pages that were accepted.
    #[must_use]
    pub fn sheets(&self) -> &[MemorySheet] {
        self.inner.sheets()
    }
}

impl SheetSink for FailingSink {
    fn export(&mut self, name: &str, canvas: &GrayCanvas) -> Result<SheetArtifact, ExportError> {
        self.attempts.push(name.to_string());
        if self.fail_on.iter().any(|n| n == name) {
            return Err(ExportError::Io(io::Error::other(format!("refusing {name}"))));
        }
        self.inner.export(name, canvas)
    }
}
