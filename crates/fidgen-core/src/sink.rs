//! Destinations for finished pages.

use std::fs;
use std::path::{Path, PathBuf};

use crate::canvas::GrayCanvas;
use crate::error::ExportError;

/// File extension used by [`PngDirectorySink`].
pub const PNG_EXTENSION: &str = "png";

/// Record of one exported page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SheetArtifact {
    /// Artifact name (e.g. `Sheet_00`).
    pub name: String,
    /// File written, if the sink writes to the filesystem.
    pub path: Option<PathBuf>,
    /// Encoded size in bytes.
    pub bytes: usize,
}

/// Receives finished pages.
///
/// A page is handed over exactly once, fully drawn. Implementations must not
/// retry on failure; the caller reports the error and moves on.
pub trait SheetSink {
    /// Export one page under `name`.
    ///
    /// # Errors
    /// Any failure to encode or store the page.
    fn export(&mut self, name: &str, canvas: &GrayCanvas) -> Result<SheetArtifact, ExportError>;
}

impl<S: SheetSink + ?Sized> SheetSink for &mut S {
    fn export(&mut self, name: &str, canvas: &GrayCanvas) -> Result<SheetArtifact, ExportError> {
        (**self).export(name, canvas)
    }
}

/// Writes each page as `<dir>/<name>.png`.
#[derive(Clone, Debug)]
pub struct PngDirectorySink {
    dir: PathBuf,
}

impl PngDirectorySink {
    /// Sink writing into an existing directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Sink writing into `dir`, creating it if needed.
    ///
    /// # Errors
    /// If the directory cannot be created.
    pub fn create(dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Output directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path a page named `name` is written to.
    #[must_use]
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(name).with_extension(PNG_EXTENSION)
    }
}

impl SheetSink for PngDirectorySink {
    fn export(&mut self, name: &str, canvas: &GrayCanvas) -> Result<SheetArtifact, ExportError> {
        let png = canvas.encode_png()?;
        let path = self.path_for(name);
        fs::write(&path, &png)?;
        Ok(SheetArtifact {
            name: name.to_string(),
            path: Some(path),
            bytes: png.len(),
        })
    }
}

/// A page held by [`MemorySink`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemorySheet {
    /// Artifact name.
    pub name: String,
    /// PNG-encoded page.
    pub png: Vec<u8>,
}

/// Keeps encoded pages in memory, in export order.
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    sheets: Vec<MemorySheet>,
}

impl MemorySink {
    /// Empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Exported pages so far.
    #[must_use]
    pub fn sheets(&self) -> &[MemorySheet] {
        &self.sheets
    }

    /// Take the exported pages.
    #[must_use]
    pub fn into_sheets(self) -> Vec<MemorySheet> {
        self.sheets
    }
}

impl SheetSink for MemorySink {
    fn export(&mut self, name: &str, canvas: &GrayCanvas) -> Result<SheetArtifact, ExportError> {
        let png = canvas.encode_png()?;
        let bytes = png.len();
        self.sheets.push(MemorySheet {
            name: name.to_string(),
            png,
        });
        Ok(SheetArtifact {
            name: name.to_string(),
            path: None,
            bytes,
        })
    }
}
