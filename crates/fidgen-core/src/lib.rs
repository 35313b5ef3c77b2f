//! Core generation logic for the fidgen fiducial sheet generator.
//!
//! fidgen produces a fixed family of 120 two-tone square markers and tiles
//! them onto printable PNG sheets with cut guides. Each marker shows six glyphs
//! whose sequence encodes its identifier.
//!
//! # Architecture Overview
//!
//! 1. **Encoding**:
//!    - Every code is `1` followed by a permutation of `2..=6`.
//!    - Codes are numbered by their Lehmer rank, giving a closed-form bijection
//!      between codes and identifiers `0..120` (see [`permutation`]).
//!    - The table is built once into [`MARKER_TABLE`] and verified.
//!
//! 2. **Rendering**:
//!    - Markers are drawn on a 21x21 unit grid scaled by an integer unit size
//!      (see [`render`]).
//!    - Drawing goes through the [`canvas::Canvas`] trait; [`GrayCanvas`] backs
//!      it with an 8-bit grayscale image.
//!
//! 3. **Layout**:
//!    - [`SheetGenerator`] paginates markers row-major in ascending id order,
//!      draws cut guides and hands each finished page to a [`SheetSink`].
//!    - Pages are independent, so they can also be drawn on the rayon pool.
//!
//! 4. **Verification**:
//!    - [`decoder`] reads markers back from rendered pages.
//!
//! # Example
//!
//! ```
//! use fidgen_core::{MemorySink, SheetConfig, SheetGenerator};
//!
//! let config = SheetConfig::builder().unit_size(2).columns(10).rows(12).build();
//! let generator = SheetGenerator::new(config)?;
//! let mut sink = MemorySink::new();
//! let report = generator.generate_pages(&mut sink);
//! assert!(report.is_success());
//! assert_eq!(sink.sheets()[0].name, "Sheet_00");
//! # Ok::<(), fidgen_core::Error>(())
//! ```

/// Drawing surface abstraction and the grayscale raster.
pub mod canvas;
/// Sheet layout configuration.
pub mod config;
/// Reading markers back from rendered pages.
pub mod decoder;
/// Marker codes, identifiers and the marker table.
pub mod dictionary;
/// Error types.
pub mod error;
/// Bitmap digit font for marker tags.
pub mod font;
/// Glyph bitmaps for code symbols.
pub mod glyph;
/// Page geometry and the generation engine.
pub mod layout;
/// Lehmer ranking of permutations.
pub mod permutation;
/// Run plans and marker manifests.
pub mod plan;
/// Single marker rendering.
pub mod render;
/// Page output destinations.
pub mod sink;
/// Utilities for testing rendered output.
pub mod test_utils;

pub use crate::canvas::{Canvas, GrayCanvas, Tone};
pub use crate::config::SheetConfig;
pub use crate::dictionary::{MARKER_TABLE, MarkerCode, MarkerId, MarkerTable, N_FIDUCIALS};
pub use crate::error::{ConfigError, Error, ExportError, InvalidMarkerId};
pub use crate::layout::{GenerationReport, Page, SheetGenerator};
pub use crate::plan::{SheetManifest, SheetPlan};
pub use crate::sink::{MemorySink, PngDirectorySink, SheetArtifact, SheetSink};

/// Draw and export all markers with `config` over the shared table.
///
/// # Errors
/// [`Error::Config`] if `config` is degenerate. Export failures are reported
/// per page in the returned [`GenerationReport`].
pub fn generate_pages<S: SheetSink + ?Sized>(
    config: SheetConfig,
    sink: &mut S,
) -> Result<GenerationReport, Error> {
    Ok(SheetGenerator::new(config)?.generate_pages(sink))
}

/// Returns version and build information for the core library.
#[must_use]
pub fn core_info() -> String {
    format!("fidgen core v{}", env!("CARGO_PKG_VERSION"))
}
