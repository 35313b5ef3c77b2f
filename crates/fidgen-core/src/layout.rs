//! Page layout: tiling markers onto sheets with cut guides.
//!
//! # Geometry
//!
//! Each slot reserves 23x21 units: the 21 unit marker plus two units to its
//! right for the tag. Slots are separated by a one pixel gap and the page has a
//! one pixel border, so for unit size `u` the slot at `(column, row)` starts at
//!
//! ```text
//! x = 1 + column * (23u + 1)
//! y = 1 + row * (21u + 1)
//! ```
//!
//! A cut guide is a small cross centered one pixel up and left of each slot
//! origin, with arms of `u` pixels. Guides are also drawn one column past the
//! last slot and one row below it, so every slot is framed on all four sides.
//!
//! # Ordering
//!
//! Slots are filled row-major (rows outer, columns inner), and marker
//! identifiers are assigned in ascending order across the whole page sequence:
//! page `p` holds ids `p * slots .. min(120, (p + 1) * slots)`. Slots past
//! the last marker get guides only.

use std::ops::Range;

use rayon::prelude::*;

use crate::canvas::{Canvas, GrayCanvas, Tone};
use crate::config::SheetConfig;
use crate::dictionary::{MARKER_TABLE, MarkerCode, MarkerId, MarkerTable, N_FIDUCIALS};
use crate::error::{ConfigError, Error};
use crate::plan::{PagePlan, SheetPlan};
use crate::render::{UnitFrame, render_marker};
use crate::sink::{SheetArtifact, SheetSink};

/// Slot width in units (marker plus tag column).
pub const SLOT_WIDTH_UNITS: u32 = 23;

/// Slot height in units.
pub const SLOT_HEIGHT_UNITS: u32 = 21;

/// Gap between slots and around the page, in pixels.
pub const PADDING_PX: u32 = 1;

/// Prefix of page artifact names.
pub const SHEET_PREFIX: &str = "Sheet";

/// Artifact name of page `index`: `Sheet_00`, `Sheet_01`, ...
#[must_use]
pub fn sheet_name(index: usize) -> String {
    format!("{SHEET_PREFIX}_{index:02}")
}

/// Pixel geometry of a page, derived from a validated [`SheetConfig`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageGeometry {
    unit: u32,
    columns: u32,
    rows: u32,
    width: u32,
    height: u32,
}

impl PageGeometry {
    /// Compute the geometry, rejecting degenerate configurations.
    ///
    /// # Errors
    /// See [`SheetConfig::validate`].
    pub fn new(config: &SheetConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let (width, height) = config.page_size_u64();
        Ok(Self {
            unit: config.unit_size,
            columns: config.columns,
            rows: config.rows,
            width: u32::try_from(width).map_err(|_| ConfigError::PageTooLarge { width, height })?,
            height: u32::try_from(height).map_err(|_| ConfigError::PageTooLarge { width, height })?,
        })
    }

    /// Pixels per unit.
    #[must_use]
    pub fn unit(&self) -> u32 {
        self.unit
    }

    /// Slots per row.
    #[must_use]
    pub fn columns(&self) -> u32 {
        self.columns
    }

    /// Slots per column.
    #[must_use]
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Page width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Page height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Slots on one page.
    #[must_use]
    pub fn slots_per_page(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    /// Pages needed for all markers.
    #[must_use]
    pub fn page_count(&self) -> usize {
        N_FIDUCIALS.div_ceil(self.slots_per_page())
    }

    /// Identifiers placed on page `index`. Empty past the last page.
    #[must_use]
    pub fn page_ids(&self, index: usize) -> Range<usize> {
        let slots = self.slots_per_page();
        let start = index.saturating_mul(slots).min(N_FIDUCIALS);
        let end = index.saturating_add(1).saturating_mul(slots).min(N_FIDUCIALS);
        start..end
    }

    /// Device position of the top-left pixel of slot `(column, row)`.
    ///
    /// Also defined one past the last column and row, where the closing
    /// guides sit.
    #[must_use]
    pub fn slot_origin(&self, column: u32, row: u32) -> (i64, i64) {
        let unit = i64::from(self.unit);
        let pad = i64::from(PADDING_PX);
        let x = pad + i64::from(column) * (i64::from(SLOT_WIDTH_UNITS) * unit + pad);
        let y = pad + i64::from(row) * (i64::from(SLOT_HEIGHT_UNITS) * unit + pad);
        (x, y)
    }

    /// Where marker `id` lands.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn placement(&self, id: MarkerId) -> SlotPlacement {
        let slots = self.slots_per_page();
        let slot = id.index() % slots;
        SlotPlacement {
            page: id.index() / slots,
            column: (slot % self.columns as usize) as u32,
            row: (slot / self.columns as usize) as u32,
        }
    }

    /// Draw the cut cross at the top-left corner of slot `(column, row)`.
    pub fn draw_cut_guide<C: Canvas + ?Sized>(&self, canvas: &mut C, column: u32, row: u32) {
        let (dx, dy) = self.slot_origin(column, row);
        let pad = i64::from(PADDING_PX);
        let arm = i64::from(self.unit);
        let (cx, cy) = (dx - pad, dy - pad);
        canvas.draw_line(cx - arm, cy, cx + arm, cy, Tone::Black);
        canvas.draw_line(cx, cy - arm, cx, cy + arm, Tone::Black);
    }
}

/// Page and slot of one marker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SlotPlacement {
    /// Page index.
    pub page: usize,
    /// Slot column on the page.
    pub column: u32,
    /// Slot row on the page.
    pub row: u32,
}

/// A marker drawn on a page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlacedMarker {
    /// Marker identifier.
    pub id: MarkerId,
    /// Displayed code.
    pub code: MarkerCode,
    /// Slot column.
    pub column: u32,
    /// Slot row.
    pub row: u32,
    /// Device position of the marker's top-left pixel.
    pub origin: (i64, i64),
}

/// A fully drawn page.
#[derive(Clone, Debug)]
pub struct Page {
    /// Page index, from 0.
    pub index: usize,
    /// Rendered raster.
    pub canvas: GrayCanvas,
    /// Markers in slot order.
    pub markers: Vec<PlacedMarker>,
}

impl Page {
    /// Artifact name for this page.
    #[must_use]
    pub fn name(&self) -> String {
        sheet_name(self.index)
    }
}

/// Result of exporting one page.
#[derive(Debug)]
pub struct PageOutcome {
    /// Page index.
    pub index: usize,
    /// Artifact name.
    pub name: String,
    /// Identifiers drawn on the page.
    pub ids: Range<usize>,
    /// What the sink reported.
    pub result: Result<SheetArtifact, Error>,
}

/// Outcome of a generation run, one entry per page in page order.
#[derive(Debug, Default)]
pub struct GenerationReport {
    /// Per-page outcomes.
    pub pages: Vec<PageOutcome>,
}

impl GenerationReport {
    /// `true` if every page was exported.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.pages.iter().all(|p| p.result.is_ok())
    }

    /// Artifacts of the pages that were exported.
    pub fn artifacts(&self) -> impl Iterator<Item = &SheetArtifact> {
        self.pages.iter().filter_map(|p| p.result.as_ref().ok())
    }

    /// Errors of the pages that failed.
    pub fn failures(&self) -> impl Iterator<Item = &Error> {
        self.pages.iter().filter_map(|p| p.result.as_ref().err())
    }

    /// All artifacts, or the first failure.
    ///
    /// # Errors
    /// The error of the first page that failed to export.
    pub fn into_result(self) -> Result<Vec<SheetArtifact>, Error> {
        self.pages.into_iter().map(|p| p.result).collect()
    }
}

/// Lays out and exports every marker for one configuration.
///
/// Holds the validated geometry and a reference to the marker table; both are
/// read-only, so one generator may render pages from several threads.
#[derive(Clone, Copy, Debug)]
pub struct SheetGenerator<'a> {
    config: SheetConfig,
    geometry: PageGeometry,
    table: &'a MarkerTable,
}

impl SheetGenerator<'static> {
    /// Generator over the process-wide [`MARKER_TABLE`].
    ///
    /// # Errors
    /// [`Error::Config`] if `config` is degenerate. No canvas is allocated in
    /// that case.
    pub fn new(config: SheetConfig) -> Result<Self, Error> {
        Self::with_table(config, &MARKER_TABLE)
    }
}

impl<'a> SheetGenerator<'a> {
    /// Generator over an explicit table.
    ///
    /// # Errors
    /// [`Error::Config`] if `config` is degenerate.
    pub fn with_table(config: SheetConfig, table: &'a MarkerTable) -> Result<Self, Error> {
        let geometry = PageGeometry::new(&config)?;
        tracing::debug!(
            width = geometry.width(),
            height = geometry.height(),
            pages = geometry.page_count(),
            "sheet geometry"
        );
        Ok(Self {
            config,
            geometry,
            table,
        })
    }

    /// The configuration this generator was built from.
    #[must_use]
    pub fn config(&self) -> &SheetConfig {
        &self.config
    }

    /// Page geometry.
    #[must_use]
    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    /// Describe the run without drawing.
    #[must_use]
    pub fn plan(&self) -> SheetPlan {
        let g = &self.geometry;
        let pages = (0..g.page_count())
            .map(|index| {
                let ids = g.page_ids(index);
                PagePlan {
                    index,
                    name: sheet_name(index),
                    first_id: ids.start,
                    marker_count: ids.len(),
                }
            })
            .collect();
        SheetPlan {
            config: self.config,
            page_width: g.width(),
            page_height: g.height(),
            slots_per_page: g.slots_per_page(),
            page_count: g.page_count(),
            pages,
        }
    }

    /// Draw page `index` on its own. `None` past the last page.
    #[must_use]
    pub fn render_page(&self, index: usize) -> Option<Page> {
        if index >= self.geometry.page_count() {
            return None;
        }
        let mut next_marker = self.geometry.page_ids(index).start;
        Some(self.draw_page(index, &mut next_marker))
    }

    /// Draw and export every page in order.
    ///
    /// A failed export is recorded in the report and the run continues with
    /// the next page.
    pub fn generate_pages<S: SheetSink + ?Sized>(&self, sink: &mut S) -> GenerationReport {
        let mut next_marker = 0usize;
        let pages = (0..self.geometry.page_count())
            .map(|index| {
                let page = self.draw_page(index, &mut next_marker);
                self.export(&mut *sink, &page)
            })
            .collect();
        debug_assert_eq!(next_marker, N_FIDUCIALS);
        GenerationReport { pages }
    }

    /// Like [`generate_pages`](Self::generate_pages), but draws pages on the
    /// rayon pool. Exports still happen in page order on the calling thread.
    pub fn generate_pages_parallel<S: SheetSink + ?Sized>(&self, sink: &mut S) -> GenerationReport {
        let drawn: Vec<Page> = (0..self.geometry.page_count())
            .into_par_iter()
            .filter_map(|index| self.render_page(index))
            .collect();
        let pages = drawn
            .iter()
            .map(|page| self.export(&mut *sink, page))
            .collect();
        GenerationReport { pages }
    }

    fn draw_page(&self, index: usize, next_marker: &mut usize) -> Page {
        let _span = tracing::info_span!("render_page", index).entered();
        let g = &self.geometry;
        let mut canvas = GrayCanvas::new(g.width(), g.height());
        canvas.clear(Tone::White);
        let mut markers = Vec::with_capacity(g.page_ids(index).len());

        for row in 0..g.rows() {
            for column in 0..g.columns() {
                g.draw_cut_guide(&mut canvas, column, row);
                let Some(id) = MarkerId::new(*next_marker) else {
                    continue;
                };
                let code = self.table.code(id);
                let (x, y) = g.slot_origin(column, row);
                render_marker(&mut canvas, &code, id, &UnitFrame::new(x, y, g.unit()));
                markers.push(PlacedMarker {
                    id,
                    code,
                    column,
                    row,
                    origin: (x, y),
                });
                *next_marker += 1;
            }
        }

        for row in 0..g.rows() {
            g.draw_cut_guide(&mut canvas, g.columns(), row);
        }
        for column in 0..=g.columns() {
            g.draw_cut_guide(&mut canvas, column, g.rows());
        }

        tracing::debug!(markers = markers.len(), "page drawn");
        Page {
            index,
            canvas,
            markers,
        }
    }

    fn export<S: SheetSink + ?Sized>(&self, sink: &mut S, page: &Page) -> PageOutcome {
        let name = page.name();
        let _span = tracing::info_span!("export_page", name = %name).entered();
        let result = sink.export(&name, &page.canvas).map_err(|source| Error::Export {
            name: name.clone(),
            source,
        });
        match &result {
            Ok(artifact) => tracing::debug!(bytes = artifact.bytes, "page exported"),
            Err(e) => tracing::warn!(error = %e, "page export failed"),
        }
        PageOutcome {
            index: page.index,
            name,
            ids: self.geometry.page_ids(page.index),
            result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySink;

    fn generator(unit: u32, columns: u32, rows: u32) -> SheetGenerator<'static> {
        let config = SheetConfig::builder()
            .unit_size(unit)
            .columns(columns)
            .rows(rows)
            .build();
        SheetGenerator::new(config).unwrap()
    }

    #[test]
    fn test_sheet_names() {
        assert_eq!(sheet_name(0), "Sheet_00");
        assert_eq!(sheet_name(7), "Sheet_07");
        assert_eq!(sheet_name(119), "Sheet_119");
    }

    #[test]
    fn test_default_geometry() {
        let g = *generator(5, 8, 5).geometry();
        assert_eq!(g.width(), 929);
        assert_eq!(g.height(), 531);
        assert_eq!(g.slots_per_page(), 40);
        assert_eq!(g.page_count(), 3);
        assert_eq!(g.slot_origin(0, 0), (1, 1));
        assert_eq!(g.slot_origin(1, 0), (1 + 116, 1));
        assert_eq!(g.slot_origin(0, 1), (1, 1 + 106));
        // Closing guides sit on the last pixel row and column.
        assert_eq!(g.slot_origin(8, 5), (929, 531));
    }

    #[test]
    fn test_page_count_rounds_up() {
        assert_eq!(generator(1, 7, 3).geometry().page_count(), 6);
        assert_eq!(generator(1, 11, 11).geometry().page_count(), 1);
        assert_eq!(generator(1, 1, 1).geometry().page_count(), 120);
    }

    #[test]
    fn test_page_ids() {
        let g = *generator(1, 7, 7).geometry();
        assert_eq!(g.page_ids(0), 0..49);
        assert_eq!(g.page_ids(2), 98..120);
        assert!(g.page_ids(3).is_empty());
    }

    #[test]
    fn test_placement() {
        let g = *generator(1, 8, 5).geometry();
        let p = g.placement(MarkerId::new(53).unwrap());
        assert_eq!(p, SlotPlacement { page: 1, column: 5, row: 1 });
    }

    #[test]
    fn test_cut_guide_cross() {
        let g = *generator(3, 1, 1).geometry();
        let mut canvas = GrayCanvas::new(g.width(), g.height());
        g.draw_cut_guide(&mut canvas, 0, 0);
        // Corner at (0, 0); only the positive arms are on the canvas.
        assert_eq!(canvas.count_black(), 7);
        for i in 0..=3 {
            assert_eq!(canvas.pixel(i, 0), Some(Tone::Black));
            assert_eq!(canvas.pixel(0, i), Some(Tone::Black));
        }
    }

    #[test]
    fn test_closing_guides() {
        let generator = generator(3, 2, 2);
        let g = *generator.geometry();
        let page = generator.render_page(0).unwrap();
        let (w, h) = (i64::from(g.width()), i64::from(g.height()));
        assert_eq!((w, h), (141, 129));

        // Right edge, one per row.
        for row in 0..2 {
            let cy = g.slot_origin(0, row).1 - 1;
            assert_eq!(page.canvas.pixel(w - 1, cy), Some(Tone::Black), "row {row}");
            assert_eq!(page.canvas.pixel(w - 4, cy), Some(Tone::Black), "row {row}");
        }
        // Bottom edge, one per column plus the corner.
        for column in 0..=2 {
            let cx = g.slot_origin(column, 0).0 - 1;
            assert_eq!(page.canvas.pixel(cx, h - 1), Some(Tone::Black), "column {column}");
            assert_eq!(page.canvas.pixel(cx, h - 4), Some(Tone::Black), "column {column}");
        }

        // The last pixel row holds only the bottom arms: 4 + 7 + 4.
        let bottom = (0..w)
            .filter(|&x| page.canvas.pixel(x, h - 1) == Some(Tone::Black))
            .count();
        assert_eq!(bottom, 15);
        let left = (0..h)
            .filter(|&y| page.canvas.pixel(0, y) == Some(Tone::Black))
            .count();
        assert_eq!(left, 15);
    }

    #[test]
    fn test_slots_without_marker_get_guides_only() {
        let generator = generator(2, 7, 7);
        let page = generator.render_page(2).unwrap();
        assert_eq!(page.markers.len(), 22);
        let last = page.markers.last().unwrap();
        assert_eq!(last.id.index(), 119);
        assert_eq!((last.column, last.row), (0, 3));

        // Slot (1, 3) is empty: its interior is white.
        let (x, y) = generator.geometry().slot_origin(1, 3);
        let frame = UnitFrame::new(x, y, 2);
        let (cx, cy) = frame.unit_center(10, 10);
        assert_eq!(page.canvas.pixel(cx, cy), Some(Tone::White));
        // Its guide is still drawn.
        assert_eq!(page.canvas.pixel(x - 1, y - 1), Some(Tone::Black));
    }

    #[test]
    fn test_render_page_out_of_range() {
        assert!(generator(5, 8, 5).render_page(3).is_none());
    }

    #[test]
    fn test_plan_matches_geometry() {
        let plan = generator(5, 5, 8).plan();
        assert_eq!(plan.page_count, 3);
        assert_eq!(plan.pages.len(), 3);
        assert_eq!(plan.pages[1].first_id, 40);
        assert_eq!(plan.pages[2].marker_count, 40);
        assert_eq!(plan.pages[2].name, "Sheet_02");
    }

    #[test]
    fn test_generate_pages_exports_every_page() {
        let mut sink = MemorySink::new();
        let report = generator(1, 8, 5).generate_pages(&mut sink);
        assert!(report.is_success());
        assert_eq!(report.pages.len(), 3);
        assert_eq!(report.artifacts().count(), 3);
        assert_eq!(report.pages[2].ids, 80..120);
        assert_eq!(sink.sheets().len(), 3);
    }

    #[test]
    fn test_config_error_before_generation() {
        let config = SheetConfig::builder().columns(0).build();
        let err = SheetGenerator::new(config).unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::ZeroColumns)));
        let huge = SheetConfig::builder().unit_size(180_000_000).columns(1).rows(1).build();
        assert!(matches!(
            SheetGenerator::new(huge),
            Err(Error::Config(ConfigError::PageTooLarge { .. }))
        ));
    }
}
