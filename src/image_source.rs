//! Image references: a path plus its decoded pixel dimensions.

use std::path::{Path, PathBuf};

use image::RgbaImage;
use image::imageops::FilterType;

use crate::error::LabelError;

/// Image being labeled. Immutable once opened; navigation replaces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    path: PathBuf,
    width: u32,
    height: u32,
}

impl ImageRef {
    /// Read the dimensions of an image file without decoding its pixels.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, LabelError> {
        let path = path.into();
        let (width, height) =
            image::image_dimensions(&path).map_err(|e| LabelError::image(&path, e))?;
        Self::with_dimensions(path, width, height)
    }

    /// Build a reference from known dimensions.
    pub fn with_dimensions(
        path: impl Into<PathBuf>,
        width: u32,
        height: u32,
    ) -> Result<Self, LabelError> {
        let path = path.into();
        if width == 0 || height == 0 {
            return Err(LabelError::EmptyImage {
                path,
                width,
                height,
            });
        }
        Ok(Self {
            path,
            width,
            height,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Dimensions as floating point, for coordinate math.
    pub fn size(&self) -> (f64, f64) {
        (f64::from(self.width), f64::from(self.height))
    }

    /// File name for display.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// Size of the bitmap rendered at `scale`, at least one pixel per side.
    pub fn scaled_dimensions(&self, scale: f64) -> (u32, u32) {
        let scale_axis = |v: u32| ((f64::from(v) * scale) as u32).max(1);
        (scale_axis(self.width), scale_axis(self.height))
    }

    /// Decode the image and resample it for display at `scale`.
    ///
    /// Uses Lanczos3 so that downscaled views stay sharp.
    pub fn resampled(&self, scale: f64) -> Result<RgbaImage, LabelError> {
        let decoded = image::open(&self.path).map_err(|e| LabelError::image(&self.path, e))?;
        let (width, height) = self.scaled_dimensions(scale);
        log::trace!(
            "Resampling {:?} to {}x{} ({:.2}x)",
            self.path,
            width,
            height,
            scale
        );
        Ok(decoded
            .resize_exact(width, height, FilterType::Lanczos3)
            .to_rgba8())
    }
}
