//! Output directory for generated patterns.

use pawbox_camtools::{BoxDimensions, OutputFormat};
use pawbox_core::Result;
use std::path::{Path, PathBuf};
use tracing::info;
use uuid::Uuid;

/// Writes serialized patterns under one directory.
///
/// Deterministic names overwrite earlier output for the same box; unique
/// names carry a random UUID prefix so concurrent requests never collide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputStore {
    directory: PathBuf,
    unique_names: bool,
}

impl OutputStore {
    pub fn new(directory: impl Into<PathBuf>, unique_names: bool) -> Self {
        Self {
            directory: directory.into(),
            unique_names,
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// `box_{w}x{h}x{d}.{ext}` with the dimensions truncated to integers.
    pub fn base_name(dims: &BoxDimensions, format: OutputFormat) -> String {
        format!(
            "box_{}x{}x{}.{}",
            dims.width.trunc() as i64,
            dims.height.trunc() as i64,
            dims.depth.trunc() as i64,
            format.extension()
        )
    }

    pub fn file_name(&self, dims: &BoxDimensions, format: OutputFormat) -> String {
        let base = Self::base_name(dims, format);
        if self.unique_names {
            format!("{}_{}", Uuid::new_v4(), base)
        } else {
            base
        }
    }

    /// Write `bytes` under `name`, creating the directory on first use.
    pub async fn write(&self, name: &str, bytes: &[u8]) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.directory).await?;
        let path = self.directory.join(name);
        tokio::fs::write(&path, bytes).await?;
        info!(path = %path.display(), bytes = bytes.len(), "wrote pattern");
        Ok(path)
    }
}
