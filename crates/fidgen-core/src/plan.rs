//! Run descriptions that do not require drawing.
//!
//! [`SheetPlan`] summarizes page geometry and pagination; [`SheetManifest`]
//! adds the code and position of every marker, which is what a tracker needs
//! to map detected codes back to printed sheets.

use crate::config::SheetConfig;
use crate::dictionary::{MarkerCode, MarkerId, MarkerTable};
use crate::layout::{PageGeometry, SlotPlacement};

/// One page of a [`SheetPlan`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PagePlan {
    /// Page index.
    pub index: usize,
    /// Artifact name.
    pub name: String,
    /// Identifier in the first slot.
    pub first_id: usize,
    /// Number of markers on the page.
    pub marker_count: usize,
}

/// Geometry and pagination of a run.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SheetPlan {
    /// Configuration the plan was computed from.
    pub config: SheetConfig,
    /// Page width in pixels.
    pub page_width: u32,
    /// Page height in pixels.
    pub page_height: u32,
    /// Slots per page.
    pub slots_per_page: usize,
    /// Number of pages.
    pub page_count: usize,
    /// Per-page breakdown.
    pub pages: Vec<PagePlan>,
}

/// One marker of a [`SheetManifest`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ManifestEntry {
    /// Marker identifier.
    pub id: MarkerId,
    /// Displayed code.
    pub code: MarkerCode,
    /// Where the marker is printed.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub placement: SlotPlacement,
}

/// A plan plus the placement of every marker.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SheetManifest {
    /// Run summary.
    pub plan: SheetPlan,
    /// All markers in id order.
    pub markers: Vec<ManifestEntry>,
}

impl SheetManifest {
    /// Build the manifest for `plan` from the table.
    #[must_use]
    pub fn new(plan: SheetPlan, geometry: &PageGeometry, table: &MarkerTable) -> Self {
        let markers = table
            .iter()
            .map(|(id, code)| ManifestEntry {
                id,
                code,
                placement: geometry.placement(id),
            })
            .collect();
        Self { plan, markers }
    }

    /// Entry for one marker.
    #[must_use]
    pub fn entry(&self, id: MarkerId) -> Option<&ManifestEntry> {
        self.markers.get(id.index())
    }
}
