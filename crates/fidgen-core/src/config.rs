//! Sheet layout configuration.
//!
//! [`SheetConfig`] holds the three layout parameters. It is plain data; call
//! [`SheetConfig::validate`] (or construct a
//! [`SheetGenerator`](crate::layout::SheetGenerator), which does) before
//! drawing anything.

use crate::error::ConfigError;
use crate::layout::{PADDING_PX, SLOT_HEIGHT_UNITS, SLOT_WIDTH_UNITS};

/// Largest page, in pixels, that [`SheetConfig::validate`] accepts (256 MiB of
/// 8-bit luma).
pub const MAX_PAGE_PIXELS: u64 = 1 << 28;

/// Layout parameters for a run of sheets.
///
/// # Example
/// ```
/// use fidgen_core::config::SheetConfig;
///
/// let config = SheetConfig::builder()
///     .unit_size(4)
///     .columns(5)
///     .rows(8)
///     .build();
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SheetConfig {
    /// Pixels per layout unit (default: 5).
    pub unit_size: u32,
    /// Markers per row (default: 8).
    pub columns: u32,
    /// Markers per column (default: 5).
    pub rows: u32,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            unit_size: 5,
            columns: 8,
            rows: 5,
        }
    }
}

impl SheetConfig {
    /// Create a new builder for `SheetConfig`.
    #[must_use]
    pub fn builder() -> SheetConfigBuilder {
        SheetConfigBuilder::default()
    }

    /// Check that the configuration describes a drawable page.
    ///
    /// # Errors
    /// Returns the first offending parameter, or
    /// [`ConfigError::PageTooLarge`] if a side does not fit a `u32` or the page
    /// holds more than [`MAX_PAGE_PIXELS`] pixels.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.unit_size == 0 {
            return Err(ConfigError::ZeroUnitSize);
        }
        if self.columns == 0 {
            return Err(ConfigError::ZeroColumns);
        }
        if self.rows == 0 {
            return Err(ConfigError::ZeroRows);
        }
        let (width, height) = self.page_size_u64();
        if width > u64::from(u32::MAX)
            || height > u64::from(u32::MAX)
            || width.saturating_mul(height) > MAX_PAGE_PIXELS
        {
            return Err(ConfigError::PageTooLarge { width, height });
        }
        Ok(())
    }

    /// Markers per page.
    #[must_use]
    pub fn slots_per_page(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    /// Page size in pixels, computed without overflow.
    pub(crate) fn page_size_u64(&self) -> (u64, u64) {
        let unit = u64::from(self.unit_size);
        let pad = u64::from(PADDING_PX);
        let extent = |slot_units: u32, count: u32| {
            (unit * u64::from(slot_units) + pad)
                .saturating_mul(u64::from(count))
                .saturating_add(pad)
        };
        (
            extent(SLOT_WIDTH_UNITS, self.columns),
            extent(SLOT_HEIGHT_UNITS, self.rows),
        )
    }
}

/// Builder for [`SheetConfig`].
#[derive(Default)]
pub struct SheetConfigBuilder {
    unit_size: Option<u32>,
    columns: Option<u32>,
    rows: Option<u32>,
}

impl SheetConfigBuilder {
    /// Set pixels per layout unit.
    #[must_use]
    pub fn unit_size(mut self, size: u32) -> Self {
        self.unit_size = Some(size);
        self
    }

    /// Set markers per row.
    #[must_use]
    pub fn columns(mut self, columns: u32) -> Self {
        self.columns = Some(columns);
        self
    }

    /// Set markers per column.
    #[must_use]
    pub fn rows(mut self, rows: u32) -> Self {
        self.rows = Some(rows);
        self
    }

    /// Build the configuration, using defaults for unset fields.
    #[must_use]
    pub fn build(self) -> SheetConfig {
        let d = SheetConfig::default();
        SheetConfig {
            unit_size: self.unit_size.unwrap_or(d.unit_size),
            columns: self.columns.unwrap_or(d.columns),
            rows: self.rows.unwrap_or(d.rows),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sheet_config_builder() {
        let config = SheetConfig::builder().unit_size(3).rows(2).build();
        assert_eq!(config.unit_size, 3);
        assert_eq!(config.rows, 2);
        // Check defaults
        assert_eq!(config.columns, 8);
    }

    #[test]
    fn test_sheet_config_defaults() {
        let config = SheetConfig::default();
        assert_eq!(config.unit_size, 5);
        assert_eq!(config.columns, 8);
        assert_eq!(config.rows, 5);
        assert_eq!(config.slots_per_page(), 40);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_page_size() {
        let (w, h) = SheetConfig::default().page_size_u64();
        assert_eq!(w, (5 * 23 + 1) * 8 + 1);
        assert_eq!(h, (5 * 21 + 1) * 5 + 1);
    }

    #[test]
    fn test_rejects_zero_parameters() {
        let zero_unit = SheetConfig::builder().unit_size(0).build();
        assert_eq!(zero_unit.validate(), Err(ConfigError::ZeroUnitSize));
        let zero_cols = SheetConfig::builder().columns(0).build();
        assert_eq!(zero_cols.validate(), Err(ConfigError::ZeroColumns));
        let zero_rows = SheetConfig::builder().rows(0).build();
        assert_eq!(zero_rows.validate(), Err(ConfigError::ZeroRows));
    }

    #[test]
    fn test_rejects_oversized_page() {
        let config = SheetConfig::builder()
            .unit_size(u32::MAX)
            .columns(2)
            .build();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::PageTooLarge { .. })
        ));
    }

    #[test]
    fn test_rejects_page_over_pixel_budget() {
        // Both sides fit a u32, but the raster could never be allocated.
        let config = SheetConfig::builder()
            .unit_size(180_000_000)
            .columns(1)
            .rows(1)
            .build();
        assert_eq!(
            config.validate(),
            Err(ConfigError::PageTooLarge {
                width: 4_140_000_002,
                height: 3_780_000_002,
            })
        );

        let wide = SheetConfig::builder().unit_size(1).columns(2_000_000).rows(1).build();
        assert!(matches!(
            wide.validate(),
            Err(ConfigError::PageTooLarge { .. })
        ));
    }

    #[test]
    fn test_large_page_within_budget() {
        let config = SheetConfig::builder().unit_size(100).build();
        let (w, h) = config.page_size_u64();
        assert!(w * h <= MAX_PAGE_PIXELS);
        assert!(config.validate().is_ok());
    }
}
