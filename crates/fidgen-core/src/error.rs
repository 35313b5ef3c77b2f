//! Error types for sheet generation.

use thiserror::Error;

/// Rejected sheet configuration.
///
/// Raised by [`SheetConfig::validate`](crate::config::SheetConfig::validate)
/// before any canvas is allocated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Pixels per layout unit must be at least one.
    #[error("unit size must be positive")]
    ZeroUnitSize,
    /// Markers per row must be at least one.
    #[error("number of markers per row must be positive")]
    ZeroColumns,
    /// Markers per column must be at least one.
    #[error("number of markers per column must be positive")]
    ZeroRows,
    /// The page would not fit in a 32-bit raster.
    #[error("page of {width}x{height} pixels exceeds the maximum raster size")]
    PageTooLarge {
        /// Requested page width in pixels.
        width: u64,
        /// Requested page height in pixels.
        height: u64,
    },
}

/// An identifier outside the marker range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("marker id {value} is outside [0, 120)")]
pub struct InvalidMarkerId {
    /// The rejected value.
    pub value: u8,
}

/// Failure to write one finished page.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The destination could not be written.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    /// The raster could not be encoded.
    #[error("encoding error: {0}")]
    Encode(#[from] image::ImageError),
}

/// Top-level error for the generation pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid layout parameters.
    #[error("invalid sheet configuration: {0}")]
    Config(#[from] ConfigError),
    /// The marker table does not cover every identifier exactly once.
    ///
    /// This can only be caused by a defect in the ranking code.
    #[error("marker table is inconsistent: {0}")]
    InternalConsistency(String),
    /// A page could not be exported.
    #[error("failed to export {name}: {source}")]
    Export {
        /// Artifact name of the page (e.g. `Sheet_00`).
        name: String,
        /// Underlying sink failure.
        #[source]
        source: ExportError,
    },
}
